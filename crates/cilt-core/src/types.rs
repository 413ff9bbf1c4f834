//! Identifier newtypes for the entities that own a schedule.
//!
//! Identities are assigned by the remote store; nothing in this workspace
//! generates them except the in-memory store used for tests and offline runs.

use serde::{Deserialize, Serialize};

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_id!(
    /// Persisted identity of a schedule, owned by the remote store.
    ScheduleId
);
numeric_id!(
    /// Plant site owning a CILT.
    SiteId
);
numeric_id!(
    /// CILT (clean, inspect, lubricate, tighten) routine.
    CiltId
);
numeric_id!(
    /// Maintenance sequence within a CILT.
    SequenceId
);
