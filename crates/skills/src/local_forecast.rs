//! Local Forecast
//!
//! Speaks today's or tomorrow's forecast for the configured postal code. The
//! day comes from the `today_or_tomorrow` slot.

use crate::weather::{Forecast, OpenMeteoClient, TemperatureUnit, WeatherService, describe_weather_code};
use anyhow::{Context, anyhow};
use calico_core::{IntentMessage, Skill, SkillContext, SkillError, SkillSession, settings::SettingsStore};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

pub const DAY_SLOT: &str = "today_or_tomorrow";
pub const NO_ZIP_CODE: &str = "I can't get the forecast because your zip code isn't set.";
pub const APOLOGY: &str = "Sorry, I'm having trouble getting the forecast right now.";

const PRECIPITATION_THRESHOLD: f64 = 10.0;

/// Renders the forecast for `day`. Only "today" maps to the first entry and
/// mentions the current temperature; any other day reads the second entry.
/// Whole degrees for speech; `-0.3` reads as "0", not "-0".
fn spoken_degrees(value: f64) -> i64 {
    value.round() as i64
}

pub fn format_forecast(day: &str, forecast: &Forecast) -> anyhow::Result<String> {
    let is_today = day == "today";
    let index = if is_today { 0 } else { 1 };
    let daily = forecast
        .days
        .get(index)
        .ok_or_else(|| anyhow!("Forecast has no entry for {day}"))?;

    let mut text = format!(
        "For {day}, expect {}. ",
        describe_weather_code(daily.weather_code)
    );
    if is_today {
        text.push_str(&format!(
            "It's currently {} degrees. ",
            spoken_degrees(forecast.current_temperature)
        ));
    }
    text.push_str(&format!(
        "The high will be {} and the low {}. ",
        spoken_degrees(daily.high),
        spoken_degrees(daily.low)
    ));
    if daily.precipitation_probability > PRECIPITATION_THRESHOLD {
        text.push_str(&format!(
            "There is a maximum {} percent chance of precipitation for the day.",
            spoken_degrees(daily.precipitation_probability)
        ));
    } else {
        text.push_str("There is a low chance of precipitation.");
    }
    Ok(text)
}

pub struct LocalForecastSkill {
    session: SkillSession,
    settings: SettingsStore,
    weather: Arc<dyn WeatherService>,
}

impl LocalForecastSkill {
    pub fn new(context: &SkillContext, weather: Arc<dyn WeatherService>) -> Self {
        Self {
            session: SkillSession::new("Local_Forecast", "", context.outbound.clone()),
            settings: context.settings.clone(),
            weather,
        }
    }

    pub fn factory(context: &SkillContext) -> Result<Box<dyn Skill>, SkillError> {
        let weather = OpenMeteoClient::new()?;
        Ok(Box::new(Self::new(context, Arc::new(weather))))
    }

    fn setting_or(&self, key: &str, default: &str) -> String {
        self.settings
            .get_string(key)
            .unwrap_or_else(|| default.to_string())
    }

    fn report(&self, day: &str, zip_code: &str) -> anyhow::Result<String> {
        let unit = TemperatureUnit::from_setting(&self.setting_or("temp_unit", "f"));
        let region = self.setting_or("region", "us");
        let place = self.weather.locate(zip_code, &region)?;
        let forecast = self
            .weather
            .forecast(place.latitude, place.longitude, unit)
            .context("Forecast request failed")?;
        format_forecast(day, &forecast)
    }
}

impl Skill for LocalForecastSkill {
    fn name(&self) -> &'static str {
        "LocalForecastSkill"
    }

    fn session(&self) -> &SkillSession {
        &self.session
    }

    fn session_mut(&mut self) -> &mut SkillSession {
        &mut self.session
    }

    fn handle_intent(&mut self, message: &IntentMessage) -> Result<(), SkillError> {
        self.session.open(message)?;
        let day = match message.slot_value(DAY_SLOT) {
            Some(Value::String(day)) if !day.is_empty() => day.clone(),
            _ => "today".to_string(),
        };

        let Some(zip_code) = self.settings.get_string("zip_code") else {
            self.session.speak(NO_ZIP_CODE)?;
            return Ok(());
        };

        match self.report(&day, &zip_code) {
            Ok(text) => {
                self.session.speak(&text)?;
                info!(%day, "Successfully spoke forecast request.");
            }
            Err(e) => {
                error!(error = ?e, "Error getting forecast");
                self.session.speak(APOLOGY)?;
            }
        }
        Ok(())
    }
}
