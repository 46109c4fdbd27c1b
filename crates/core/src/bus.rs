//! Publisher Seam
//!
//! Skills never talk to the broker directly. They publish through a
//! [`Publisher`], which the service backs with its MQTT client and tests back
//! with an in-memory recorder.

use crate::error::BusError;

/// Fire-and-forget publishing of a JSON document to a bus topic.
///
/// Implementations must not block waiting for broker acknowledgement.
#[cfg_attr(test, mockall::automock)]
pub trait Publisher: Send + Sync {
    fn publish(&self, topic: &str, payload: &str) -> Result<(), BusError>;
}

#[cfg(any(test, feature = "test-support"))]
pub use recording::{PublishedMessage, RecordingPublisher};

#[cfg(any(test, feature = "test-support"))]
mod recording {
    use super::Publisher;
    use crate::error::BusError;
    use serde_json::Value;
    use std::sync::{Mutex, PoisonError};

    /// A message captured by [`RecordingPublisher`].
    #[derive(Debug, Clone, PartialEq)]
    pub struct PublishedMessage {
        pub topic: String,
        pub payload: Value,
    }

    /// Records every publish in memory, in order.
    #[derive(Debug, Default)]
    pub struct RecordingPublisher {
        messages: Mutex<Vec<PublishedMessage>>,
    }

    impl RecordingPublisher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn messages(&self) -> Vec<PublishedMessage> {
            self.messages
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Returns and forgets everything recorded so far.
        pub fn take(&self) -> Vec<PublishedMessage> {
            std::mem::take(&mut *self.messages.lock().unwrap_or_else(PoisonError::into_inner))
        }

        pub fn on_topic(&self, topic: &str) -> Vec<Value> {
            self.messages()
                .into_iter()
                .filter(|m| m.topic == topic)
                .map(|m| m.payload)
                .collect()
        }

        pub fn len(&self) -> usize {
            self.messages
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .len()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }

    impl Publisher for RecordingPublisher {
        fn publish(&self, topic: &str, payload: &str) -> Result<(), BusError> {
            let payload = serde_json::from_str(payload).map_err(|e| BusError::Encode {
                topic: topic.to_string(),
                source: e,
            })?;
            self.messages
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(PublishedMessage {
                    topic: topic.to_string(),
                    payload,
                });
            Ok(())
        }
    }
}
