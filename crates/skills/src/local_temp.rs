//! Local Temperature
//!
//! Reads the user's postal code, region and unit from the settings store,
//! resolves the postal code to coordinates and speaks the current
//! temperature there.

use crate::weather::{OpenMeteoClient, TemperatureUnit, WeatherService, celsius_to_fahrenheit};
use calico_core::{IntentMessage, Skill, SkillContext, SkillError, SkillSession, settings::SettingsStore};
use std::sync::Arc;
use tracing::{info, warn};

pub const APOLOGY: &str = "Sorry, I can't get the temperature right now.";

pub struct LocalTempSkill {
    session: SkillSession,
    settings: SettingsStore,
    weather: Arc<dyn WeatherService>,
}

impl LocalTempSkill {
    pub fn new(context: &SkillContext, weather: Arc<dyn WeatherService>) -> Self {
        Self {
            session: SkillSession::new("Local_Temp", "", context.outbound.clone()),
            settings: context.settings.clone(),
            weather,
        }
    }

    pub fn factory(context: &SkillContext) -> Result<Box<dyn Skill>, SkillError> {
        let weather = OpenMeteoClient::new()?;
        Ok(Box::new(Self::new(context, Arc::new(weather))))
    }

    fn required_setting(&self, key: &str) -> Result<String, SkillError> {
        self.settings
            .get_string(key)
            .ok_or_else(|| SkillError::MissingSetting(key.to_string()))
    }

    fn report(&self) -> Result<String, SkillError> {
        let zip_code = self.required_setting("zip_code")?;
        let region = self.required_setting("region")?;
        let unit = TemperatureUnit::from_setting(&self.required_setting("temp_unit")?);

        let place = self.weather.locate(&zip_code, &region)?;
        let celsius = self.weather.current_temperature(place.latitude, place.longitude)?;
        let temperature = match unit {
            TemperatureUnit::Fahrenheit => celsius_to_fahrenheit(celsius),
            TemperatureUnit::Celsius => celsius,
        };

        let location = if place.name.is_empty() || place.state.is_empty() {
            "your area".to_string()
        } else {
            format!("{}, {}", place.name, place.state)
        };
        Ok(format!(
            "It's currently {temperature:.1} degrees {} in {location}.",
            unit.name()
        ))
    }
}

impl Skill for LocalTempSkill {
    fn name(&self) -> &'static str {
        "LocalTempSkill"
    }

    fn session(&self) -> &SkillSession {
        &self.session
    }

    fn session_mut(&mut self) -> &mut SkillSession {
        &mut self.session
    }

    fn handle_intent(&mut self, message: &IntentMessage) -> Result<(), SkillError> {
        self.session.open(message)?;
        match self.report() {
            Ok(sentence) => {
                self.session.speak(&sentence)?;
                info!("Successfully provided local temperature to the user.");
            }
            Err(e) => {
                warn!(error = %e, "Failed to provide the user with local temperature.");
                self.session.speak(APOLOGY)?;
            }
        }
        Ok(())
    }
}
