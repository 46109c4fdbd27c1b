//! Intent Router
//!
//! The single entry point for inbound bus messages. Each payload is decoded,
//! classified by topic and handed to exactly one skill: by intent name for
//! recognized intents, or by active session for not-recognized events.
//!
//! Nothing that happens inside a skill can escape this boundary: handler
//! errors and panics are logged and reported as a [`DispatchOutcome`].

use crate::{
    error::{DispatchError, SkillError},
    loader::panic_message,
    message::{IntentMessage, NotRecognizedMessage},
    registry::SkillRegistry,
    skill::Skill,
    topic::InboundTopic,
};
use serde_json::Value;
use std::panic::{AssertUnwindSafe, catch_unwind};
use tracing::{debug, error, info, info_span, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    MalformedPayload,
    MissingSessionId,
    MissingIntentName,
    UnknownTopic,
}

/// What happened to one inbound message.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// A skill handled the message to completion.
    Handled { skill: &'static str },
    /// No skill is registered for the intent.
    NoSkill { intent: String },
    /// A not-recognized event arrived for a session nobody owns.
    NoActiveSession { session_id: String },
    Dropped(DropReason),
    Failed {
        skill: &'static str,
        error: DispatchError,
    },
}

pub struct Router {
    registry: SkillRegistry,
}

impl Router {
    pub fn new(registry: SkillRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &SkillRegistry {
        &self.registry
    }

    /// Routes one message. Never panics and never returns an error; the
    /// outcome is informational.
    pub fn dispatch(&mut self, topic: &str, payload: &[u8]) -> DispatchOutcome {
        let value: Value = match serde_json::from_slice(payload) {
            Ok(value) => value,
            Err(e) => {
                error!(topic, error = %e, "Could not decode JSON from MQTT message");
                return DispatchOutcome::Dropped(DropReason::MalformedPayload);
            }
        };

        match InboundTopic::classify(topic) {
            InboundTopic::NotRecognized => self.dispatch_not_recognized(value),
            InboundTopic::Intent(_) => self.dispatch_intent(topic, value),
            InboundTopic::Other => {
                debug!(topic, "Ignoring message on unrelated topic");
                DispatchOutcome::Dropped(DropReason::UnknownTopic)
            }
        }
    }

    fn dispatch_not_recognized(&mut self, value: Value) -> DispatchOutcome {
        let message: NotRecognizedMessage = match serde_json::from_value(value) {
            Ok(message) => message,
            Err(e) => {
                error!(error = %e, "Malformed intentNotRecognized payload");
                return DispatchOutcome::Dropped(DropReason::MalformedPayload);
            }
        };
        if message.session_id.is_empty() {
            return DispatchOutcome::Dropped(DropReason::MissingSessionId);
        }

        let session_id = message.session_id.clone();
        match self.registry.find_by_session_mut(&session_id) {
            Some(skill) => {
                info!(skill = skill.name(), %session_id, "Intent not recognized. Dispatching to active skill.");
                invoke(skill, |skill| skill.handle_intent_not_recognized(&message))
            }
            None => {
                info!(%session_id, "Intent not recognized, but no active skill conversation owns this session.");
                DispatchOutcome::NoActiveSession { session_id }
            }
        }
    }

    fn dispatch_intent(&mut self, topic: &str, value: Value) -> DispatchOutcome {
        let message: IntentMessage = match serde_json::from_value(value) {
            Ok(message) => message,
            Err(e) => {
                error!(topic, error = %e, "Malformed intent payload");
                return DispatchOutcome::Dropped(DropReason::MalformedPayload);
            }
        };
        let intent = message.intent_name();
        if intent.is_empty() {
            warn!(topic, "Received message on intent topic without an intent name.");
            return DispatchOutcome::Dropped(DropReason::MissingIntentName);
        }

        match self.registry.get_mut(intent) {
            Some(skill) => {
                info!(%intent, skill = skill.name(), "Dispatching intent");
                invoke(skill, |skill| skill.handle_intent(&message))
            }
            None => {
                warn!(%intent, "Received intent but no skill is loaded to handle it.");
                DispatchOutcome::NoSkill {
                    intent: intent.to_string(),
                }
            }
        }
    }
}

fn invoke<F>(skill: &mut Box<dyn Skill>, handler: F) -> DispatchOutcome
where
    F: FnOnce(&mut Box<dyn Skill>) -> Result<(), SkillError>,
{
    let name = skill.name();
    let span = info_span!("skill", skill = name);
    let _guard = span.enter();

    match catch_unwind(AssertUnwindSafe(|| handler(skill))) {
        Ok(Ok(())) => DispatchOutcome::Handled { skill: name },
        Ok(Err(e)) => {
            error!(error = ?e, "Skill handler failed");
            DispatchOutcome::Failed {
                skill: name,
                error: DispatchError::Skill(e),
            }
        }
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            error!(panic = %message, "Skill handler panicked");
            DispatchOutcome::Failed {
                skill: name,
                error: DispatchError::Panicked(message),
            }
        }
    }
}
