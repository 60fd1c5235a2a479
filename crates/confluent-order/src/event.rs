use serde::{Deserialize, Serialize};

use crate::index::VersionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Begin,
    End,
}

/// One bracket of a version in the event sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Event {
    pub version: VersionId,
    pub role: Role,
}

impl Event {
    pub fn begin(version: VersionId) -> Self {
        Self {
            version,
            role: Role::Begin,
        }
    }

    pub fn end(version: VersionId) -> Self {
        Self {
            version,
            role: Role::End,
        }
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.role {
            Role::Begin => write!(f, "({}", self.version),
            Role::End => write!(f, "{})", self.version),
        }
    }
}

/// Arena slot: an event, its label and its neighbours in sequence order.
#[derive(Debug, Clone)]
pub(crate) struct EventNode {
    pub(crate) event: Event,
    pub(crate) label: u64,
    pub(crate) prev: Option<usize>,
    pub(crate) next: Option<usize>,
}
