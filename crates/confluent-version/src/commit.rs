use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::VersionId;

/// The list edit that produced a version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ListOp {
    PushFront,
    PushBack,
    PopFront,
    PopBack,
    Insert { index: usize },
    Erase { index: usize },
}

impl std::fmt::Display for ListOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListOp::PushFront => write!(f, "push_front"),
            ListOp::PushBack => write!(f, "push_back"),
            ListOp::PopFront => write!(f, "pop_front"),
            ListOp::PopBack => write!(f, "pop_back"),
            ListOp::Insert { index } => write!(f, "insert@{}", index),
            ListOp::Erase { index } => write!(f, "erase@{}", index),
        }
    }
}

/// A version in the history tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    pub id: Uuid,
    pub version: VersionId,
    /// `None` only for the root version.
    pub parent: Option<VersionId>,
    #[serde(default)]
    pub op: Option<ListOp>,
    pub created_at: DateTime<Utc>,
    /// Free-form note attached with `VersionController::describe`.
    #[serde(default)]
    pub message: String,
}

impl Commit {
    pub(crate) fn root() -> Self {
        Self {
            id: Uuid::new_v4(),
            version: confluent_order::ROOT_VERSION,
            parent: None,
            op: None,
            created_at: Utc::now(),
            message: String::new(),
        }
    }

    pub(crate) fn new(version: VersionId, parent: VersionId, op: ListOp) -> Self {
        Self {
            id: Uuid::new_v4(),
            version,
            parent: Some(parent),
            op: Some(op),
            created_at: Utc::now(),
            message: String::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
