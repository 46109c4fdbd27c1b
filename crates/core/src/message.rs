//! Inbound Message Types
//!
//! Payloads published by the dialogue manager that the router hands to skills.
//! Every field is optional on the wire; absent or `null` strings decode as
//! empty so the router can decide what to drop.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A recognized intent, as published on `hermes/intent/<name>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentMessage {
    /// Identifies one open conversation.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub session_id: String,
    /// The device/microphone the conversation is bound to.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub site_id: String,
    #[serde(default)]
    pub intent: Intent,
    #[serde(default)]
    pub slots: Vec<Slot>,
    /// Raw transcribed text.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub input: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub intent_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub slot_name: String,
    #[serde(default)]
    pub value: SlotValue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlotValue {
    #[serde(default)]
    pub value: Value,
}

impl IntentMessage {
    pub fn intent_name(&self) -> &str {
        &self.intent.intent_name
    }

    /// Returns the raw value of the first slot named `name`.
    pub fn slot_value(&self, name: &str) -> Option<&Value> {
        self.slots
            .iter()
            .find(|slot| slot.slot_name == name)
            .map(|slot| &slot.value.value)
    }

    /// Returns a slot value rendered as text. Numbers and booleans are
    /// stringified; `null`, arrays and objects yield `None`.
    pub fn slot_text(&self, name: &str) -> Option<String> {
        match self.slot_value(name)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

/// Published on `hermes/nlu/intentNotRecognized`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotRecognizedMessage {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub session_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub site_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub input: String,
}
