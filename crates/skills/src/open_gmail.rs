use calico_core::{IntentMessage, Skill, SkillContext, SkillError, SkillSession};
use tracing::{error, info};

pub const INBOX_URL: &str = "https://mail.google.com";

/// Opens a URL in the user's browser.
pub type Opener = fn(&str) -> std::io::Result<()>;

/// Opens the Gmail inbox in the default browser.
pub struct OpenGmailSkill {
    session: SkillSession,
    opener: Opener,
}

impl OpenGmailSkill {
    pub fn new(context: &SkillContext) -> Self {
        Self::with_opener(context, webbrowser::open)
    }

    pub fn with_opener(context: &SkillContext, opener: Opener) -> Self {
        Self {
            session: SkillSession::new("Open_Gmail", "", context.outbound.clone()),
            opener,
        }
    }

    pub fn factory(context: &SkillContext) -> Result<Box<dyn Skill>, SkillError> {
        Ok(Box::new(Self::new(context)))
    }
}

impl Skill for OpenGmailSkill {
    fn name(&self) -> &'static str {
        "OpenGmailSkill"
    }

    fn session(&self) -> &SkillSession {
        &self.session
    }

    fn session_mut(&mut self) -> &mut SkillSession {
        &mut self.session
    }

    fn handle_intent(&mut self, message: &IntentMessage) -> Result<(), SkillError> {
        self.session.open(message)?;
        info!("Attempting to open Gmail.");
        match (self.opener)(INBOX_URL) {
            Ok(()) => {
                info!(url = INBOX_URL, "Successfully opened in browser.");
                self.session.speak("Here is your inbox.")?;
            }
            Err(e) => {
                error!(error = %e, "Failed to open web browser");
                self.session.speak("Sorry, I could not open your inbox right now.")?;
            }
        }
        Ok(())
    }
}
