//! Strongly-typed string identifiers.
//!
//! Entity, room and connection identity is owned by the caller; these
//! newtypes only keep the three namespaces from being mixed up.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Borrow the id as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns `true` if the id is the empty string.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(v: &str) -> Self {
                Self(v.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(v: String) -> Self {
                Self(v)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id! {
    /// Identifies an entity placed in a room.
    EntityId
}

string_id! {
    /// Identifies a room managed by an orchestrator.
    RoomId
}

string_id! {
    /// Identifies an abstract room-to-room connection.
    ConnectionId
}

string_id! {
    /// Identifies a room orchestrator.
    ///
    /// Either supplied by the caller or allocated with
    /// [`OrchestratorId::next`].
    OrchestratorId
}

/// Counter for [`OrchestratorId`] allocation.
static ORCHESTRATOR_COUNTER: AtomicU64 = AtomicU64::new(1);

impl OrchestratorId {
    /// Allocate a fresh id of the form `orchestrator-<n>`.
    ///
    /// Each call returns an id never returned before within this process.
    /// Thread-safe.
    pub fn next() -> Self {
        let n = ORCHESTRATOR_COUNTER.fetch_add(1, Ordering::Relaxed);
        Self(format!("orchestrator-{n}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn display_is_the_raw_string() {
        assert_eq!(EntityId::from("hero").to_string(), "hero");
        assert_eq!(RoomId::from(String::from("crypt")).to_string(), "crypt");
    }

    #[test]
    fn lookup_by_str_through_borrow() {
        let mut map = HashMap::new();
        map.insert(RoomId::from("a"), 1);
        assert_eq!(map.get("a"), Some(&1));
    }

    #[test]
    fn orchestrator_ids_are_unique() {
        let a = OrchestratorId::next();
        let b = OrchestratorId::next();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("orchestrator-"));
    }

    #[test]
    fn serializes_transparently() {
        let json = serde_json::to_string(&ConnectionId::from("door-1")).unwrap();
        assert_eq!(json, "\"door-1\"");
    }
}
