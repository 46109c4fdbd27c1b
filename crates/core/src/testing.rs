//! Skills and message builders shared by the unit tests of this crate.

use crate::{
    bus::RecordingPublisher,
    error::SkillError,
    message::{Intent, IntentMessage, NotRecognizedMessage},
    protocol::Outbound,
    session::SkillSession,
    settings::SettingsStore,
    skill::{Skill, SkillContext},
};
use anyhow::anyhow;
use std::sync::Arc;

pub fn recording_context() -> (SkillContext, Arc<RecordingPublisher>) {
    let recorder = Arc::new(RecordingPublisher::new());
    let context = SkillContext {
        outbound: Outbound::new(recorder.clone()),
        settings: SettingsStore::new("/nonexistent/config.json"),
    };
    (context, recorder)
}

pub fn intent(name: &str, session_id: &str) -> IntentMessage {
    IntentMessage {
        session_id: session_id.to_string(),
        site_id: "default".to_string(),
        intent: Intent {
            intent_name: name.to_string(),
        },
        ..Default::default()
    }
}

pub fn not_recognized(session_id: &str) -> NotRecognizedMessage {
    NotRecognizedMessage {
        session_id: session_id.to_string(),
        ..Default::default()
    }
}

/// Asks a question on the trigger, echoes the input on the answer.
pub struct EchoSkill {
    name: &'static str,
    session: SkillSession,
}

impl EchoSkill {
    pub fn new(name: &'static str, trigger: &str, answer: &str, context: &SkillContext) -> Self {
        Self {
            name,
            session: SkillSession::new(trigger, answer, context.outbound.clone()),
        }
    }
}

impl Skill for EchoSkill {
    fn name(&self) -> &'static str {
        self.name
    }

    fn session(&self) -> &SkillSession {
        &self.session
    }

    fn session_mut(&mut self) -> &mut SkillSession {
        &mut self.session
    }

    fn handle_intent(&mut self, message: &IntentMessage) -> Result<(), SkillError> {
        if self.session.is_awaiting_answer(message) {
            self.session.speak(&format!("You said {}", message.input))?;
        } else if message.intent_name() == self.session.trigger_intent() {
            self.session.open(message)?;
            if self.session.answer_intent().is_some() {
                self.session.continue_session("Say something")?;
            } else {
                self.session.speak("Done")?;
            }
        }
        Ok(())
    }
}

/// Fails or panics on every intent.
pub struct BrokenSkill {
    pub panics: bool,
    session: SkillSession,
}

impl BrokenSkill {
    pub fn new(trigger: &str, panics: bool, context: &SkillContext) -> Self {
        Self {
            panics,
            session: SkillSession::new(trigger, "", context.outbound.clone()),
        }
    }
}

impl Skill for BrokenSkill {
    fn name(&self) -> &'static str {
        "BrokenSkill"
    }

    fn session(&self) -> &SkillSession {
        &self.session
    }

    fn session_mut(&mut self) -> &mut SkillSession {
        &mut self.session
    }

    fn handle_intent(&mut self, _message: &IntentMessage) -> Result<(), SkillError> {
        if self.panics {
            panic!("handler exploded");
        }
        Err(anyhow!("backend unavailable").into())
    }
}
