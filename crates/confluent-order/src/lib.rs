//! Ancestor queries over a branching version tree in O(1).
//!
//! Each version owns a Begin/End bracket in a single event sequence. Events
//! carry integer labels kept in sequence order by a list-labeling scheme, so
//! "is `a` an ancestor of `b`" becomes two label comparisons.

pub mod config;
pub mod event;
pub mod index;
mod labeling;

pub use config::LabelingConfig;
pub use event::{Event, Role};
pub use index::{VersionId, VersionOrderIndex, ROOT_VERSION};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrderError {
    #[error("Version order index is empty")]
    EmptyIndex,
    #[error("Version order index doesn't contain parent version {0}")]
    UnknownParent(VersionId),
    #[error("Version order index doesn't contain version {0}")]
    UnknownVersion(VersionId),
    #[error("Version {0} is already in the order index")]
    DuplicateVersion(VersionId),
    #[error("Label universe of {0} cannot hold every event")]
    LabelSpaceExhausted(u64),
    #[error("Invalid labeling config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, OrderError>;
