//! Skill Contract
//!
//! A skill is a long-lived handler bound to one trigger intent and optionally
//! one answer intent. Shared conversation behaviour lives in the embedded
//! [`SkillSession`]; the trait only asks each skill to expose it and to handle
//! intents.

use crate::{
    error::SkillError,
    message::{IntentMessage, NotRecognizedMessage},
    protocol::Outbound,
    session::SkillSession,
    settings::SettingsStore,
};
use std::collections::BTreeMap;

/// Everything a skill receives when it is constructed.
#[derive(Clone)]
pub struct SkillContext {
    pub outbound: Outbound,
    pub settings: SettingsStore,
}

pub trait Skill: Send {
    /// Handler identifier, e.g. `AskMeColorsSkill`.
    fn name(&self) -> &'static str;

    fn session(&self) -> &SkillSession;

    fn session_mut(&mut self) -> &mut SkillSession;

    /// Called for the trigger intent and, if declared, the answer intent.
    fn handle_intent(&mut self, message: &IntentMessage) -> Result<(), SkillError>;

    /// Called when the NLU failed to understand a turn of this skill's active
    /// session. The default applies the bounded-retry policy.
    fn handle_intent_not_recognized(
        &mut self,
        message: &NotRecognizedMessage,
    ) -> Result<(), SkillError> {
        self.session_mut().handle_not_recognized(message)?;
        Ok(())
    }

    fn trigger_intent(&self) -> &str {
        self.session().trigger_intent()
    }

    fn answer_intent(&self) -> Option<&str> {
        self.session().answer_intent()
    }

    fn active_session_id(&self) -> Option<&str> {
        self.session().active_session_id()
    }
}

/// Constructor registered in a [`SkillCatalog`].
pub type SkillFactory = fn(&SkillContext) -> Result<Box<dyn Skill>, SkillError>;

/// Static table of the skills compiled into the service, keyed by handler
/// identifier.
#[derive(Default, Clone)]
pub struct SkillCatalog {
    factories: BTreeMap<String, SkillFactory>,
}

impl SkillCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, identifier: &str, factory: SkillFactory) -> Self {
        self.register(identifier, factory);
        self
    }

    /// Adds a factory; a second factory under the same identifier replaces
    /// the first and returns `true`.
    pub fn register(&mut self, identifier: &str, factory: SkillFactory) -> bool {
        self.factories
            .insert(identifier.to_string(), factory)
            .is_some()
    }

    pub fn get(&self, identifier: &str) -> Option<SkillFactory> {
        self.factories.get(identifier).copied()
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
