use calico_core::{IntentMessage, Skill, SkillContext, SkillError, SkillSession};
use tracing::{info, warn};

pub const QUESTION: &str = "What is your favorite color?";

/// Two-turn conversation: asks for a favourite color, then comments on it.
pub struct AskMeColorsSkill {
    session: SkillSession,
}

impl AskMeColorsSkill {
    pub fn new(context: &SkillContext) -> Self {
        Self {
            session: SkillSession::new("Ask_Me_Colors", "Answer_Colors", context.outbound.clone()),
        }
    }

    pub fn factory(context: &SkillContext) -> Result<Box<dyn Skill>, SkillError> {
        Ok(Box::new(Self::new(context)))
    }
}

impl Skill for AskMeColorsSkill {
    fn name(&self) -> &'static str {
        "AskMeColorsSkill"
    }

    fn session(&self) -> &SkillSession {
        &self.session
    }

    fn session_mut(&mut self) -> &mut SkillSession {
        &mut self.session
    }

    fn handle_intent(&mut self, message: &IntentMessage) -> Result<(), SkillError> {
        if message.intent_name() == self.session.trigger_intent() {
            self.session.open(message)?;
            info!("Starting 'Ask Me Colors' conversation.");
            self.session.continue_session(QUESTION)?;
        } else if self.session.is_awaiting_answer(message) {
            let color = match message.input.trim() {
                "" => "that color",
                input => input,
            };
            info!(%color, "User responded with color");
            self.session
                .speak(&format!("Wow! {color} is a great color. Mine is orange."))?;
        } else {
            warn!(
                intent = %message.intent_name(),
                session_id = %message.session_id,
                "Answer arrived while no question was pending. Ignoring."
            );
        }
        Ok(())
    }
}
