//! Hermes bus topics used by the dialogue manager and the skill service.

/// Wildcard subscription covering every recognized intent.
pub const INTENT_WILDCARD: &str = "hermes/intent/#";
/// Prefix shared by all recognized-intent topics.
pub const INTENT_PREFIX: &str = "hermes/intent/";
/// Published by the NLU when speech was heard but no intent matched.
pub const INTENT_NOT_RECOGNIZED: &str = "hermes/nlu/intentNotRecognized";

pub const TTS_SAY: &str = "hermes/tts/say";
pub const END_SESSION: &str = "hermes/dialogueManager/endSession";
pub const CONTINUE_SESSION: &str = "hermes/dialogueManager/continueSession";

/// The topics the skill service subscribes to after every (re)connect.
pub const SUBSCRIPTIONS: [&str; 2] = [INTENT_WILDCARD, INTENT_NOT_RECOGNIZED];

/// Classification of an inbound topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundTopic<'a> {
    /// A recognized intent; carries the intent name taken from the topic path.
    Intent(&'a str),
    NotRecognized,
    Other,
}

impl<'a> InboundTopic<'a> {
    pub fn classify(topic: &'a str) -> Self {
        if topic == INTENT_NOT_RECOGNIZED {
            return Self::NotRecognized;
        }
        match topic.strip_prefix(INTENT_PREFIX) {
            Some(name) => Self::Intent(name),
            None => Self::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_topics() {
        assert_eq!(
            InboundTopic::classify("hermes/intent/Ask_Me_Colors"),
            InboundTopic::Intent("Ask_Me_Colors")
        );
        assert_eq!(
            InboundTopic::classify(INTENT_NOT_RECOGNIZED),
            InboundTopic::NotRecognized
        );
        assert_eq!(
            InboundTopic::classify("hermes/hotword/default/detected"),
            InboundTopic::Other
        );
    }
}
