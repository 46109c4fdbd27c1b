//! Outbound Dialogue Protocol
//!
//! Formats and publishes the three messages a skill sends back to the dialogue
//! manager: speak, end session and continue session.

use crate::{
    bus::Publisher,
    error::BusError,
    topic::{CONTINUE_SESSION, END_SESSION, TTS_SAY},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

/// Text-to-speech request on `hermes/tts/say`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SayPayload {
    pub text: String,
    pub site_id: String,
}

/// Closes a dialogue session, optionally speaking a final sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndSessionPayload {
    pub session_id: String,
    pub text: String,
}

/// Keeps a session open and restricts the next turn to `intent_filter`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContinueSessionPayload {
    pub session_id: String,
    pub text: String,
    pub intent_filter: Vec<String>,
    /// Asks the dialogue manager to report misunderstandings instead of
    /// silently dropping them, which drives the retry logic.
    pub send_intent_not_recognized: bool,
}

/// A command issued by a skill to the dialogue manager.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogueCommand {
    Say(SayPayload),
    EndSession(EndSessionPayload),
    ContinueSession(ContinueSessionPayload),
}

impl DialogueCommand {
    pub fn topic(&self) -> &'static str {
        match self {
            Self::Say(_) => TTS_SAY,
            Self::EndSession(_) => END_SESSION,
            Self::ContinueSession(_) => CONTINUE_SESSION,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        match self {
            Self::Say(p) => serde_json::to_string(p),
            Self::EndSession(p) => serde_json::to_string(p),
            Self::ContinueSession(p) => serde_json::to_string(p),
        }
    }
}

/// Cheap-to-clone handle that every skill uses to talk to the bus.
///
/// Publishing never fails from the caller's point of view: errors are logged
/// here so a broken connection cannot take down a handler.
#[derive(Clone)]
pub struct Outbound {
    publisher: Arc<dyn Publisher>,
}

impl Outbound {
    pub fn new(publisher: Arc<dyn Publisher>) -> Self {
        Self { publisher }
    }

    pub fn say(&self, text: &str, site_id: &str) {
        self.send(DialogueCommand::Say(SayPayload {
            text: text.to_string(),
            site_id: site_id.to_string(),
        }));
    }

    pub fn end_session(&self, session_id: &str, text: &str) {
        self.send(DialogueCommand::EndSession(EndSessionPayload {
            session_id: session_id.to_string(),
            text: text.to_string(),
        }));
    }

    pub fn continue_session(&self, session_id: &str, text: &str, intent_filter: &[String]) {
        self.send(DialogueCommand::ContinueSession(ContinueSessionPayload {
            session_id: session_id.to_string(),
            text: text.to_string(),
            intent_filter: intent_filter.to_vec(),
            send_intent_not_recognized: true,
        }));
    }

    pub fn send(&self, command: DialogueCommand) {
        let topic = command.topic();
        let result = command
            .to_json()
            .map_err(|e| BusError::Encode {
                topic: topic.to_string(),
                source: e,
            })
            .and_then(|payload| {
                info!(topic, %payload, "Publishing to MQTT topic");
                self.publisher.publish(topic, &payload)
            });
        if let Err(e) = result {
            error!(topic, error = %e, "Failed to publish dialogue command");
        }
    }
}
