//! Listener contract

use crate::event::Event;
use std::fmt;

/// Identity of a registered listener
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(String);

impl ListenerId {
    /// Create an id from a name
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ListenerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Synchronous receiver of subject notifications
///
/// A listener keeps at most a non-owning back-reference to whatever it
/// observes; the subject tracks nothing beyond the subscription entry and
/// never manages listener lifetime.
pub trait Listener: Send {
    /// Stable identity used for subscription bookkeeping
    fn id(&self) -> ListenerId;

    /// Receive one event
    ///
    /// # Errors
    /// Failures are isolated per listener: a failing listener is recorded in
    /// the delivery report and delivery continues with later subscribers.
    fn on_event(&mut self, event: &Event) -> Result<(), ListenerError>;
}

/// Listener-side failure surfaced in a delivery report
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListenerError {
    /// Listener rejected the event
    #[error("event rejected: {0}")]
    Rejected(String),

    /// Listener cannot process events right now
    #[error("listener unavailable: {0}")]
    Unavailable(String),
}
