use calico_core::{IntentMessage, Skill, SkillContext, SkillError, SkillSession};
use rand::seq::IndexedRandom;
use tracing::info;

pub const GREETINGS: [&str; 7] = [
    "Hi!",
    "Hello!",
    "Hey!",
    "Hello there!",
    "Hi there!",
    "Hey there!",
    "Hello, human!",
];

/// Answers `Hello` with a random greeting.
pub struct HelloSkill {
    session: SkillSession,
}

impl HelloSkill {
    pub fn new(context: &SkillContext) -> Self {
        Self {
            session: SkillSession::new("Hello", "", context.outbound.clone()),
        }
    }

    pub fn factory(context: &SkillContext) -> Result<Box<dyn Skill>, SkillError> {
        Ok(Box::new(Self::new(context)))
    }
}

impl Skill for HelloSkill {
    fn name(&self) -> &'static str {
        "HelloSkill"
    }

    fn session(&self) -> &SkillSession {
        &self.session
    }

    fn session_mut(&mut self) -> &mut SkillSession {
        &mut self.session
    }

    fn handle_intent(&mut self, message: &IntentMessage) -> Result<(), SkillError> {
        self.session.open(message)?;
        let greeting = GREETINGS.choose(&mut rand::rng()).copied().unwrap_or("Hello!");
        self.session.speak(greeting)?;
        info!("Successfully spoke a greeting back to the user.");
        Ok(())
    }
}
