//! Skill Registry
//!
//! Maps intent names to skill instances. A skill is indexed under its trigger
//! intent and, when it has one, its answer intent; both keys point at the same
//! instance. No intent may be claimed by two skills.

use crate::{error::RegistryError, skill::Skill};
use std::collections::HashMap;

#[derive(Default)]
pub struct SkillRegistry {
    skills: Vec<Box<dyn Skill>>,
    by_intent: HashMap<String, usize>,
}

impl SkillRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a skill under its intents.
    ///
    /// Registration is all-or-nothing: if either intent is already taken the
    /// skill is rejected and the registry is left untouched.
    pub fn register(&mut self, skill: Box<dyn Skill>) -> Result<(), RegistryError> {
        let trigger = skill.trigger_intent().to_string();
        if trigger.is_empty() {
            return Err(RegistryError::EmptyTriggerIntent {
                skill: skill.name().to_string(),
            });
        }

        let mut intents = vec![trigger];
        if let Some(answer) = skill.answer_intent() {
            if answer != intents[0] {
                intents.push(answer.to_string());
            }
        }

        for intent in &intents {
            if let Some(&existing) = self.by_intent.get(intent) {
                return Err(RegistryError::IntentCollision {
                    intent: intent.clone(),
                    existing: self.skills[existing].name().to_string(),
                    rejected: skill.name().to_string(),
                });
            }
        }

        let index = self.skills.len();
        self.skills.push(skill);
        for intent in intents {
            self.by_intent.insert(intent, index);
        }
        Ok(())
    }

    pub fn get(&self, intent: &str) -> Option<&dyn Skill> {
        self.by_intent
            .get(intent)
            .map(|&index| self.skills[index].as_ref())
    }

    pub fn get_mut(&mut self, intent: &str) -> Option<&mut Box<dyn Skill>> {
        let index = *self.by_intent.get(intent)?;
        self.skills.get_mut(index)
    }

    /// Finds the skill whose active session is `session_id`.
    pub fn find_by_session_mut(&mut self, session_id: &str) -> Option<&mut Box<dyn Skill>> {
        self.skills
            .iter_mut()
            .find(|skill| skill.active_session_id() == Some(session_id))
    }

    /// Every registered intent, sorted.
    pub fn intents(&self) -> Vec<&str> {
        let mut intents: Vec<&str> = self.by_intent.keys().map(String::as_str).collect();
        intents.sort_unstable();
        intents
    }

    /// The unique skill instances, in registration order.
    pub fn skills(&self) -> impl Iterator<Item = &dyn Skill> {
        self.skills.iter().map(|skill| skill.as_ref())
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

impl std::fmt::Debug for SkillRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkillRegistry")
            .field("skills", &self.skills().map(|s| s.name()).collect::<Vec<_>>())
            .field("intents", &self.intents())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{EchoSkill, intent, recording_context};

    #[test]
    fn test_trigger_and_answer_share_instance() {
        let (context, _) = recording_context();
        let mut registry = SkillRegistry::new();
        registry
            .register(Box::new(EchoSkill::new("AskMeColorsSkill", "Ask_Me_Colors", "Answer_Colors", &context)))
            .unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.intents(), vec!["Answer_Colors", "Ask_Me_Colors"]);
        assert_eq!(registry.get("Ask_Me_Colors").unwrap().name(), "AskMeColorsSkill");
        assert_eq!(registry.get("Answer_Colors").unwrap().name(), "AskMeColorsSkill");

        // A session opened through one key is visible through the other.
        let skill = registry.get_mut("Ask_Me_Colors").unwrap();
        skill.handle_intent(&intent("Ask_Me_Colors", "S1")).unwrap();
        assert_eq!(registry.get("Answer_Colors").unwrap().active_session_id(), Some("S1"));
    }

    #[test]
    fn test_one_shot_skill_registers_only_trigger() {
        let (context, _) = recording_context();
        let mut registry = SkillRegistry::new();
        registry
            .register(Box::new(EchoSkill::new("HelloSkill", "Hello", "", &context)))
            .unwrap();
        assert_eq!(registry.intents(), vec!["Hello"]);
        assert!(registry.get("").is_none());
    }

    #[test]
    fn test_collision_is_rejected_without_side_effects() {
        let (context, _) = recording_context();
        let mut registry = SkillRegistry::new();
        registry
            .register(Box::new(EchoSkill::new("FirstSkill", "Ask_Me_Colors", "Answer_Colors", &context)))
            .unwrap();

        let err = registry
            .register(Box::new(EchoSkill::new("SecondSkill", "Pick_Color", "Answer_Colors", &context)))
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::IntentCollision {
                intent: "Answer_Colors".to_string(),
                existing: "FirstSkill".to_string(),
                rejected: "SecondSkill".to_string(),
            }
        );
        assert_eq!(registry.len(), 1);
        assert!(registry.get("Pick_Color").is_none());
        assert_eq!(registry.get("Answer_Colors").unwrap().name(), "FirstSkill");
    }

    #[test]
    fn test_empty_trigger_is_rejected() {
        let (context, _) = recording_context();
        let mut registry = SkillRegistry::new();
        let err = registry
            .register(Box::new(EchoSkill::new("NamelessSkill", "", "", &context)))
            .unwrap_err();
        assert!(matches!(err, RegistryError::EmptyTriggerIntent { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_find_by_session() {
        let (context, _) = recording_context();
        let mut registry = SkillRegistry::new();
        registry
            .register(Box::new(EchoSkill::new("AskMeColorsSkill", "Ask_Me_Colors", "Answer_Colors", &context)))
            .unwrap();
        registry
            .register(Box::new(EchoSkill::new("PickNumberSkill", "Pick_Number", "Answer_Number", &context)))
            .unwrap();

        registry
            .get_mut("Pick_Number")
            .unwrap()
            .handle_intent(&intent("Pick_Number", "S7"))
            .unwrap();

        assert_eq!(registry.find_by_session_mut("S7").unwrap().name(), "PickNumberSkill");
        assert!(registry.find_by_session_mut("S8").is_none());
    }
}
