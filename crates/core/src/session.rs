//! Conversational Session State Machine
//!
//! Every skill embeds one [`SkillSession`]. It remembers which dialogue
//! session and site the skill is currently serving, whether a follow-up
//! answer is expected, and how many consecutive misunderstandings have
//! happened, and it owns the open/continue/end/retry transitions.
//!
//! ```text
//!   Idle --open--> Active --continue--> AwaitingAnswer --(answer | give up)--> Idle
//!                    |                        |  ^
//!                    +--------end-------------+  +--not recognized (retry < max)
//! ```

use crate::{
    error::SessionError,
    message::{IntentMessage, NotRecognizedMessage},
    protocol::Outbound,
};
use rand::seq::IndexedRandom;
use tracing::{error, info, warn};

/// Consecutive not-recognized events tolerated before a skill gives up.
pub const MAX_RETRIES: u32 = 3;

/// Prompts used to ask the user to repeat themselves.
pub const RETRY_PROMPTS: [&str; 4] = [
    "I'm sorry, I didn't catch that. Could you say it again?",
    "I didn't quite get that. Please repeat yourself.",
    "Could you say that one more time?",
    "I'm having a little trouble understanding. What was that?",
];

/// Spoken once the retry budget is exhausted.
pub const GIVE_UP_MESSAGE: &str = "I'm still not understanding. Let's try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversationState {
    /// No open conversation.
    #[default]
    Idle,
    /// A trigger arrived and the skill is handling it.
    Active,
    /// A follow-up question was asked; the answer intent is the only
    /// acceptable next intent.
    AwaitingAnswer,
}

/// The dialogue session a skill is currently bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSession {
    pub session_id: String,
    pub site_id: String,
}

/// What a not-recognized event did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryOutcome {
    /// The event was for a different session.
    Ignored,
    /// The question was asked again; `attempt` is the new retry count.
    Reprompted { attempt: u32 },
    /// The retry budget ran out and the session was ended with an apology.
    GaveUp,
    /// The session was open but not waiting for an answer, so it was closed.
    Abandoned,
}

pub struct SkillSession {
    trigger_intent: String,
    answer_intent: Option<String>,
    outbound: Outbound,
    active: Option<ActiveSession>,
    state: ConversationState,
    retries: u32,
    max_retries: u32,
}

impl SkillSession {
    /// Creates an idle session for a skill. An empty `answer_intent` means the
    /// skill never expects a follow-up.
    pub fn new(
        trigger_intent: impl Into<String>,
        answer_intent: impl Into<String>,
        outbound: Outbound,
    ) -> Self {
        let answer_intent = answer_intent.into();
        Self {
            trigger_intent: trigger_intent.into(),
            answer_intent: (!answer_intent.is_empty()).then_some(answer_intent),
            outbound,
            active: None,
            state: ConversationState::Idle,
            retries: 0,
            max_retries: MAX_RETRIES,
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    pub fn trigger_intent(&self) -> &str {
        &self.trigger_intent
    }

    pub fn answer_intent(&self) -> Option<&str> {
        self.answer_intent.as_deref()
    }

    pub fn state(&self) -> ConversationState {
        self.state
    }

    pub fn retry_count(&self) -> u32 {
        self.retries
    }

    pub fn active(&self) -> Option<&ActiveSession> {
        self.active.as_ref()
    }

    pub fn active_session_id(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.session_id.as_str())
    }

    pub fn active_site_id(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.site_id.as_str())
    }

    pub fn outbound(&self) -> &Outbound {
        &self.outbound
    }

    pub fn owns_session(&self, session_id: &str) -> bool {
        self.active_session_id() == Some(session_id)
    }

    /// True when `message` is the answer this skill is waiting for.
    pub fn is_awaiting_answer(&self, message: &IntentMessage) -> bool {
        self.state == ConversationState::AwaitingAnswer
            && self.answer_intent.as_deref() == Some(message.intent_name())
            && self.owns_session(&message.session_id)
    }

    /// Binds the skill to the session carried by a trigger intent.
    ///
    /// A different session still held by this skill is ended first so the
    /// dialogue manager does not keep it open.
    pub fn open(&mut self, message: &IntentMessage) -> Result<(), SessionError> {
        if message.session_id.is_empty() {
            return Err(SessionError::MissingSessionId {
                intent: message.intent_name().to_string(),
            });
        }

        if let Some(previous) = self.active.take() {
            if previous.session_id != message.session_id {
                warn!(
                    skill = %self.trigger_intent,
                    previous_session = %previous.session_id,
                    session_id = %message.session_id,
                    "New trigger arrived while a session was open. Ending the previous session."
                );
                self.outbound.end_session(&previous.session_id, "");
            }
        }

        self.active = Some(ActiveSession {
            session_id: message.session_id.clone(),
            site_id: message.site_id.clone(),
        });
        self.state = ConversationState::Active;
        self.retries = 0;
        info!(
            skill = %self.trigger_intent,
            session_id = %message.session_id,
            site_id = %message.site_id,
            "Handling intent for session"
        );
        Ok(())
    }

    /// Asks a follow-up question and keeps the session open, accepting only
    /// the answer intent next.
    pub fn continue_session(&mut self, text: &str) -> Result<(), SessionError> {
        let Some(active) = &self.active else {
            error!(skill = %self.trigger_intent, "Cannot continue a session that is not active.");
            return Err(SessionError::NoActiveSession {
                skill: self.trigger_intent.clone(),
            });
        };
        let Some(answer_intent) = &self.answer_intent else {
            error!(skill = %self.trigger_intent, "Cannot continue a session without an answer intent.");
            return Err(SessionError::NoAnswerIntent {
                skill: self.trigger_intent.clone(),
            });
        };

        info!(
            skill = %self.trigger_intent,
            session_id = %active.session_id,
            question = %text,
            "Continuing session"
        );
        self.outbound.continue_session(
            &active.session_id,
            text,
            std::slice::from_ref(answer_intent),
        );
        self.state = ConversationState::AwaitingAnswer;
        Ok(())
    }

    /// Speaks on the active site without touching the session.
    pub fn say(&self, text: &str) -> Result<(), SessionError> {
        match self.active_site_id() {
            Some(site_id) if !site_id.is_empty() => {
                info!(skill = %self.trigger_intent, %text, "Speaking response");
                self.outbound.say(text, site_id);
                Ok(())
            }
            _ => {
                error!(skill = %self.trigger_intent, "Cannot speak without a valid site ID.");
                Err(SessionError::NoActiveSite {
                    skill: self.trigger_intent.clone(),
                })
            }
        }
    }

    /// Speaks and then ends the session.
    ///
    /// When the session has no site ID the text is handed to the dialogue
    /// manager as the end-session text instead, so the session still closes.
    pub fn speak(&mut self, text: &str) -> Result<(), SessionError> {
        match self.active_site_id().map(str::is_empty) {
            Some(false) => {
                self.say(text)?;
                self.end("");
            }
            Some(true) => {
                warn!(
                    skill = %self.trigger_intent,
                    "Session has no site ID. Speaking through endSession instead."
                );
                self.end(text);
            }
            None => {
                error!(skill = %self.trigger_intent, "Cannot speak without an active session.");
                return Err(SessionError::NoActiveSite {
                    skill: self.trigger_intent.clone(),
                });
            }
        }
        Ok(())
    }

    /// Ends the active session. Ending when nothing is active only warns.
    pub fn end(&mut self, text: &str) {
        let Some(active) = self.active.take() else {
            warn!(skill = %self.trigger_intent, "Attempted to end a session that was not active.");
            return;
        };
        info!(skill = %self.trigger_intent, session_id = %active.session_id, "Ending session");
        self.outbound.end_session(&active.session_id, text);
        self.state = ConversationState::Idle;
        self.retries = 0;
    }

    /// Applies the bounded-retry policy to a misunderstanding.
    pub fn handle_not_recognized(
        &mut self,
        message: &NotRecognizedMessage,
    ) -> Result<RetryOutcome, SessionError> {
        if !self.owns_session(&message.session_id) {
            return Ok(RetryOutcome::Ignored);
        }

        if self.state != ConversationState::AwaitingAnswer {
            warn!(
                skill = %self.trigger_intent,
                session_id = %message.session_id,
                "Intent not recognized for a session that expects no answer. Closing it."
            );
            self.end("");
            return Ok(RetryOutcome::Abandoned);
        }

        self.retries += 1;
        warn!(
            skill = %self.trigger_intent,
            attempt = self.retries,
            max = self.max_retries,
            "Intent not recognized."
        );

        if self.retries >= self.max_retries {
            error!(skill = %self.trigger_intent, "Maximum retry limit reached. Ending conversation.");
            self.speak(GIVE_UP_MESSAGE)?;
            return Ok(RetryOutcome::GaveUp);
        }

        let prompt = RETRY_PROMPTS
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or(RETRY_PROMPTS[0]);
        self.continue_session(prompt)?;
        Ok(RetryOutcome::Reprompted {
            attempt: self.retries,
        })
    }
}

impl std::fmt::Debug for SkillSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkillSession")
            .field("trigger_intent", &self.trigger_intent)
            .field("answer_intent", &self.answer_intent)
            .field("active", &self.active)
            .field("state", &self.state)
            .field("retries", &self.retries)
            .finish()
    }
}
