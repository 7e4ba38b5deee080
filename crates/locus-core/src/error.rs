//! Error taxonomy shared by every Locus subsystem.

use std::error::Error;
use std::fmt;

/// Broad category of a spatial failure.
///
/// Each subsystem error exposes a `kind()` so callers can tell a rejected
/// request apart from a malformed one without matching every variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed request: empty or unknown id, invalid position, duplicate id.
    InvalidInput,
    /// Well-formed request denied by world state: an occupant blocks the
    /// cell, or a connection is not passable. Retrying with a different
    /// target may succeed.
    Blocked,
    /// A room, connection or path does not exist.
    NotFound,
    /// Persisted room data names a grid type that cannot be built.
    GridConstruction,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput => write!(f, "invalid input"),
            Self::Blocked => write!(f, "blocked"),
            Self::NotFound => write!(f, "not found"),
            Self::GridConstruction => write!(f, "grid construction"),
        }
    }
}

/// Failure reported by an injected [`EventBus`](crate::EventBus).
///
/// Publication failures are logged by the publisher and never fail the
/// spatial operation that produced the event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublishError {
    /// Topic the event was published on.
    pub topic: &'static str,
    /// Human-readable description from the bus.
    pub reason: String,
}

impl PublishError {
    /// Create a publish error for `topic`.
    pub fn new(topic: &'static str, reason: impl Into<String>) -> Self {
        Self {
            topic,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to publish on '{}': {}", self.topic, self.reason)
    }
}

impl Error for PublishError {}
