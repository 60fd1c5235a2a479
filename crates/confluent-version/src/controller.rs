use confluent_list::{ListError, VersionId, VersionedList};
use confluent_order::{LabelingConfig, VersionOrderIndex, ROOT_VERSION};

use crate::commit::{Commit, ListOp};
use crate::{HistoryError, Result};

/// Owns both engines and registers every new list version under its parent
/// in the order index.
///
/// Version ids are shared: id `n` names the `n`-th list version, its bracket
/// in the order index and `commits()[n]`.
#[derive(Debug, Clone)]
pub struct VersionController<T> {
    list: VersionedList<T>,
    order: VersionOrderIndex,
    commits: Vec<Commit>,
}

impl<T> VersionController<T> {
    pub fn new() -> Self {
        Self::from_index(VersionOrderIndex::new())
    }

    pub fn with_config(config: LabelingConfig) -> Result<Self> {
        Ok(Self::from_index(VersionOrderIndex::with_config(config)?))
    }

    fn from_index(order: VersionOrderIndex) -> Self {
        Self {
            list: VersionedList::new(),
            order,
            commits: vec![Commit::root()],
        }
    }

    pub fn list(&self) -> &VersionedList<T> {
        &self.list
    }

    pub fn order_index(&self) -> &VersionOrderIndex {
        &self.order
    }

    pub fn version_count(&self) -> usize {
        self.list.versions_count()
    }

    /// Most recently created version.
    pub fn head(&self) -> VersionId {
        self.list.latest()
    }

    pub fn len(&self, version: VersionId) -> Result<usize> {
        Ok(self.list.len(version)?)
    }

    pub fn is_empty(&self, version: VersionId) -> Result<bool> {
        Ok(self.list.is_empty(version)?)
    }

    pub fn commit(&self, version: VersionId) -> Result<&Commit> {
        self.commits.get(version).ok_or_else(|| {
            HistoryError::List(ListError::InvalidVersion {
                version,
                count: self.commits.len(),
            })
        })
    }

    pub fn commits(&self) -> &[Commit] {
        &self.commits
    }

    /// Attach `message` to the commit that created `version`, replacing any
    /// earlier one.
    pub fn describe(&mut self, version: VersionId, message: impl Into<String>) -> Result<()> {
        let count = self.commits.len();
        let commit = self
            .commits
            .get_mut(version)
            .ok_or(HistoryError::List(ListError::InvalidVersion { version, count }))?;
        commit.message = message.into();
        tracing::trace!(version, "described version");
        Ok(())
    }

    /// True iff `ancestor` is `descendant` or lies on its path to the root.
    pub fn is_ancestor(&self, ancestor: VersionId, descendant: VersionId) -> Result<bool> {
        Ok(self.order.order(ancestor, descendant)?)
    }

    /// Path from `version` up to the root, `version` first.
    pub fn lineage(&self, version: VersionId) -> Result<Vec<VersionId>> {
        let mut path = Vec::new();
        let mut current = Some(version);
        while let Some(v) = current {
            path.push(v);
            current = self.commit(v)?.parent;
        }
        Ok(path)
    }

    /// Deepest version that is an ancestor of both `a` and `b`.
    pub fn common_ancestor(&self, a: VersionId, b: VersionId) -> Result<VersionId> {
        self.commit(b)?;
        for candidate in self.lineage(a)? {
            if self.order.order(candidate, b)? {
                return Ok(candidate);
            }
        }
        Ok(ROOT_VERSION)
    }

    /// Drop all history and start again from the empty root version.
    pub fn clear(&mut self) {
        self.list.clear();
        self.order.clear();
        self.commits = vec![Commit::root()];
    }
}

impl<T: Clone> VersionController<T> {
    pub fn contents(&self, version: VersionId) -> Result<Vec<T>> {
        Ok(self.list.to_vec(version)?)
    }

    /// Register the next version id under `parent`, then run `edit` to create
    /// it. Callers validate `edit`'s preconditions first.
    fn apply<F>(&mut self, parent: VersionId, op: ListOp, edit: F) -> Result<VersionId>
    where
        F: FnOnce(&mut VersionedList<T>) -> confluent_list::Result<VersionId>,
    {
        let version = self.list.versions_count();
        self.order.insert(version, parent)?;
        let created = edit(&mut self.list)?;
        debug_assert_eq!(created, version);

        tracing::debug!(version, parent, %op, "committed version");
        self.commits.push(Commit::new(version, parent, op));
        Ok(version)
    }

    pub fn push_front(&mut self, parent: VersionId, value: T) -> Result<VersionId> {
        self.list.len(parent)?;
        self.apply(parent, ListOp::PushFront, |list| list.push_front(parent, value))
    }

    pub fn push_back(&mut self, parent: VersionId, value: T) -> Result<VersionId> {
        self.list.len(parent)?;
        self.apply(parent, ListOp::PushBack, |list| list.push_back(parent, value))
    }

    /// Returns `None` and records nothing when `parent` is empty.
    pub fn pop_front(&mut self, parent: VersionId) -> Result<Option<VersionId>> {
        if self.list.is_empty(parent)? {
            return Ok(None);
        }
        self.apply(parent, ListOp::PopFront, |list| {
            list.pop_front(parent)?.ok_or(ListError::EmptyVersion(parent))
        })
        .map(Some)
    }

    /// Returns `None` and records nothing when `parent` is empty.
    pub fn pop_back(&mut self, parent: VersionId) -> Result<Option<VersionId>> {
        if self.list.is_empty(parent)? {
            return Ok(None);
        }
        self.apply(parent, ListOp::PopBack, |list| {
            list.pop_back(parent)?.ok_or(ListError::EmptyVersion(parent))
        })
        .map(Some)
    }

    /// Insert `value` so that it ends up at `index`; `index == len` appends.
    pub fn insert_at(&mut self, parent: VersionId, index: usize, value: T) -> Result<VersionId> {
        let len = self.list.len(parent)?;
        if index > len {
            return Err(HistoryError::IndexOutOfBounds {
                version: parent,
                index,
                len,
            });
        }
        self.apply(parent, ListOp::Insert { index }, |list| {
            let pos = list.cursor_at(parent, index)?;
            Ok(list.insert(parent, &pos, value)?.version)
        })
    }

    pub fn erase_at(&mut self, parent: VersionId, index: usize) -> Result<VersionId> {
        let len = self.list.len(parent)?;
        if index >= len {
            return Err(HistoryError::IndexOutOfBounds {
                version: parent,
                index,
                len,
            });
        }
        self.apply(parent, ListOp::Erase { index }, |list| {
            let pos = list.cursor_at(parent, index)?;
            list.erase(parent, &pos)?
                .map(|edit| edit.version)
                .ok_or(ListError::IteratorOutOfRange)
        })
    }
}

impl<T> Default for VersionController<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_stay_in_sync() {
        let mut history = VersionController::new();
        let v1 = history.push_back(0, 'a').unwrap();
        let v2 = history.push_back(v1, 'b').unwrap();
        assert_eq!(history.version_count(), 3);
        assert_eq!(history.order_index().len(), 3);
        assert_eq!(history.commits().len(), 3);
        assert_eq!(history.commit(v2).unwrap().parent, Some(v1));
        assert_eq!(history.head(), v2);
    }

    #[test]
    fn test_describe_sets_message() {
        let mut history = VersionController::new();
        let v1 = history.push_back(0, 1).unwrap();
        assert_eq!(history.commit(v1).unwrap().message, "");
        history.describe(v1, "first value").unwrap();
        history.describe(0, "empty list").unwrap();
        assert_eq!(history.commit(v1).unwrap().message, "first value");
        assert_eq!(history.commit(0).unwrap().message, "empty list");
        assert!(matches!(
            history.describe(5, "missing"),
            Err(HistoryError::List(ListError::InvalidVersion { version: 5, count: 2 }))
        ));
    }

    #[test]
    fn test_noop_pop_records_nothing() {
        let mut history = VersionController::<i32>::new();
        assert_eq!(history.pop_front(0), Ok(None));
        assert_eq!(history.pop_back(0), Ok(None));
        assert_eq!(history.version_count(), 1);
        assert_eq!(history.commits().len(), 1);
    }

    #[test]
    fn test_bad_parent_changes_nothing() {
        let mut history = VersionController::new();
        history.push_back(0, 1).unwrap();
        let err = history.push_back(9, 2).unwrap_err();
        assert!(matches!(
            err,
            HistoryError::List(ListError::InvalidVersion { version: 9, .. })
        ));
        assert_eq!(
            history.insert_at(1, 5, 3),
            Err(HistoryError::IndexOutOfBounds {
                version: 1,
                index: 5,
                len: 1
            })
        );
        assert_eq!(history.version_count(), 2);
        assert_eq!(history.order_index().len(), 2);
    }

    #[test]
    fn test_lineage_walks_to_root() {
        let mut history = VersionController::new();
        let v1 = history.push_back(0, 1).unwrap();
        let _v2 = history.push_back(0, 2).unwrap();
        let v3 = history.push_front(v1, 0).unwrap();
        assert_eq!(history.lineage(v3).unwrap(), vec![v3, v1, 0]);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut history = VersionController::new();
        history.push_back(0, 1).unwrap();
        history.clear();
        assert_eq!(history.version_count(), 1);
        assert!(history.order_index().is_empty());
        assert_eq!(history.commits().len(), 1);
        assert_eq!(history.push_back(0, 5).unwrap(), 1);
    }
}
