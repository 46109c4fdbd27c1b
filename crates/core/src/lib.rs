//! Calico Skill Engine
//!
//! Intent dispatch and conversational sessions for voice-assistant skills.
//! Inbound Hermes messages are routed by the [`router::Router`] to skills held
//! in a [`registry::SkillRegistry`]; each skill embeds a
//! [`session::SkillSession`] that publishes replies through the
//! [`protocol::Outbound`] helper.

pub mod bus;
pub mod error;
pub mod loader;
pub mod message;
pub mod protocol;
pub mod registry;
pub mod router;
pub mod session;
pub mod settings;
pub mod skill;
pub mod topic;

#[cfg(test)]
mod testing;

pub use error::{
    BusError, DispatchError, LoadError, RegistryError, SessionError, SettingsError, SkillError,
};
pub use message::{IntentMessage, NotRecognizedMessage};
pub use protocol::{DialogueCommand, Outbound};
pub use registry::SkillRegistry;
pub use router::{DispatchOutcome, Router};
pub use session::{ConversationState, SkillSession};
pub use skill::{Skill, SkillCatalog, SkillContext, SkillFactory};
