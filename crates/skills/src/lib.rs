//! Built-in Calico Skills
//!
//! Skill implementations shipped with the service, and the [`catalog`] that
//! maps manifest names to their constructors.

pub mod ask_me_colors;
pub mod hello;
pub mod local_forecast;
pub mod local_temp;
pub mod open_gmail;
pub mod tell_time;
pub mod weather;

#[cfg(test)]
mod test_util;

use calico_core::SkillCatalog;

pub use ask_me_colors::AskMeColorsSkill;
pub use hello::HelloSkill;
pub use local_forecast::LocalForecastSkill;
pub use local_temp::LocalTempSkill;
pub use open_gmail::OpenGmailSkill;
pub use tell_time::TellTimeSkill;

/// Every built-in skill, keyed by the handler identifier its manifest
/// resolves to.
pub fn catalog() -> SkillCatalog {
    SkillCatalog::new()
        .with("AskMeColorsSkill", AskMeColorsSkill::factory)
        .with("HelloSkill", HelloSkill::factory)
        .with("LocalForecastSkill", LocalForecastSkill::factory)
        .with("LocalTempSkill", LocalTempSkill::factory)
        .with("OpenGmailSkill", OpenGmailSkill::factory)
        .with("TellTimeSkill", TellTimeSkill::factory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use calico_core::loader::handler_identifier;

    #[test]
    fn test_catalog_matches_manifest_names() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 6);
        for stem in [
            "Hello",
            "Tell_Time",
            "Ask_Me_Colors",
            "Local_Temp",
            "Local_Forecast",
            "Open_Gmail",
        ] {
            let identifier = handler_identifier(stem);
            assert!(catalog.get(&identifier).is_some(), "missing {identifier}");
        }
    }
}
