//! Branching version history for a persistent list.
//!
//! [`VersionController`] owns a [`VersionedList`] and a [`VersionOrderIndex`]
//! and keeps their version ids in step, so every list version also has a
//! place in the version tree.

pub mod commit;
pub mod controller;
pub mod shared;

pub use commit::{Commit, ListOp};
pub use confluent_list::{VersionId, VersionedList};
pub use confluent_order::{LabelingConfig, VersionOrderIndex};
pub use controller::VersionController;
pub use shared::SharedHistory;

use confluent_list::ListError;
use confluent_order::OrderError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HistoryError {
    #[error("List error: {0}")]
    List(#[from] ListError),
    #[error("Order error: {0}")]
    Order(#[from] OrderError),
    #[error("Index {index} out of bounds for version {version} of length {len}")]
    IndexOutOfBounds {
        version: VersionId,
        index: usize,
        len: usize,
    },
}

pub type Result<T> = std::result::Result<T, HistoryError>;
