//! Persistent singly-linked list with a registry of immutable versions.
//!
//! Every edit reads one existing version and appends a new one. Unchanged
//! suffixes are shared between versions instead of copied.

pub mod cursor;
pub mod list;

pub use cursor::{Cursor, Iter};
pub use list::{Edit, VersionId, VersionedList};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
    #[error("Invalid version {version} (registry holds {count} versions)")]
    InvalidVersion { version: VersionId, count: usize },
    #[error("Version {0} is empty")]
    EmptyVersion(VersionId),
    #[error("Iterator is out of range")]
    IteratorOutOfRange,
    #[error("Cursor does not belong to version {version}")]
    ForeignCursor { version: VersionId },
}

pub type Result<T> = std::result::Result<T, ListError>;
