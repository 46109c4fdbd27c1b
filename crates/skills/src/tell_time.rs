//! Speaks the local wall-clock time in 12-hour form.

use calico_core::{IntentMessage, Skill, SkillContext, SkillError, SkillSession};
use chrono::{Local, NaiveTime, Timelike};
use rand::seq::IndexedRandom;
use tracing::info;

pub const PREFIXES: [&str; 3] = ["The time is", "It is currently", "The clock says it's"];

/// Builds the spoken sentence. The meridiem is spelled phonetically so the
/// TTS engine does not read it as the word "am".
pub fn time_sentence(prefix: &str, time: impl Timelike) -> String {
    let (is_pm, hour) = time.hour12();
    let cycle = if is_pm { "pee em" } else { "ae em" };
    format!("{prefix} {hour} {:02}, {cycle}.", time.minute())
}

pub struct TellTimeSkill {
    session: SkillSession,
    clock: fn() -> NaiveTime,
}

impl TellTimeSkill {
    pub fn new(context: &SkillContext) -> Self {
        Self::with_clock(context, || Local::now().time())
    }

    pub fn with_clock(context: &SkillContext, clock: fn() -> NaiveTime) -> Self {
        Self {
            session: SkillSession::new("Tell_Time", "", context.outbound.clone()),
            clock,
        }
    }

    pub fn factory(context: &SkillContext) -> Result<Box<dyn Skill>, SkillError> {
        Ok(Box::new(Self::new(context)))
    }
}

impl Skill for TellTimeSkill {
    fn name(&self) -> &'static str {
        "TellTimeSkill"
    }

    fn session(&self) -> &SkillSession {
        &self.session
    }

    fn session_mut(&mut self) -> &mut SkillSession {
        &mut self.session
    }

    fn handle_intent(&mut self, message: &IntentMessage) -> Result<(), SkillError> {
        self.session.open(message)?;
        let prefix = PREFIXES.choose(&mut rand::rng()).copied().unwrap_or(PREFIXES[0]);
        self.session.speak(&time_sentence(prefix, (self.clock)()))?;
        info!("Successfully spoke the current time to the user.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{intent, recording_context};
    use calico_core::topic::{END_SESSION, TTS_SAY};

    #[test]
    fn test_time_sentence() {
        let afternoon = NaiveTime::from_hms_opt(15, 5, 0).unwrap();
        assert_eq!(time_sentence("It is currently", afternoon), "It is currently 3 05, pee em.");

        let midnight = NaiveTime::from_hms_opt(0, 30, 0).unwrap();
        assert_eq!(time_sentence("The time is", midnight), "The time is 12 30, ae em.");

        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        assert_eq!(time_sentence("The time is", noon), "The time is 12 00, pee em.");
    }

    #[test]
    fn test_tell_time_uses_clock() {
        let (context, recorder) = recording_context();
        let mut skill =
            TellTimeSkill::with_clock(&context, || NaiveTime::from_hms_opt(9, 41, 0).unwrap());

        skill.handle_intent(&intent("Tell_Time", "S1")).unwrap();

        let said = recorder.on_topic(TTS_SAY);
        assert_eq!(said.len(), 1);
        let text = said[0]["text"].as_str().unwrap();
        assert!(text.ends_with(" 9 41, ae em."), "unexpected sentence: {text}");
        assert!(PREFIXES.iter().any(|p| text.starts_with(p)));
        assert_eq!(recorder.on_topic(END_SESSION).len(), 1);
    }
}
