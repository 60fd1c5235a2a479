use std::fmt;
use std::sync::Arc;

use crate::cursor::{Cell, Cursor, Iter, Link};
use crate::{ListError, Result};

/// Dense version identifier: the creation index in the registry.
pub type VersionId = usize;

/// Snapshot of one version: the head of its chain and its length.
struct VersionRecord<T> {
    root: Link<T>,
    len: usize,
}

impl<T> VersionRecord<T> {
    fn empty() -> Self {
        Self { root: None, len: 0 }
    }

    fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.root, self.len)
    }
}

impl<T> Clone for VersionRecord<T> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            len: self.len,
        }
    }
}

impl<T: PartialEq> PartialEq for VersionRecord<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.len != other.len {
            return false;
        }
        match (&self.root, &other.root) {
            (Some(a), Some(b)) if Arc::ptr_eq(a, b) => true,
            _ => self.iter().eq(other.iter()),
        }
    }
}

/// Result of a positional edit: the id of the new version and a cursor
/// into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit<T> {
    pub version: VersionId,
    pub cursor: Cursor<T>,
}

/// Append-only registry of immutable list versions.
///
/// Version 0 is the empty list. Edits copy only the cells in front of the
/// edit position; the rest of the chain is shared with the source version.
pub struct VersionedList<T> {
    versions: Vec<VersionRecord<T>>,
}

impl<T> VersionedList<T> {
    pub fn new() -> Self {
        Self {
            versions: vec![VersionRecord::empty()],
        }
    }

    fn record(&self, version: VersionId) -> Result<&VersionRecord<T>> {
        self.versions
            .get(version)
            .ok_or(ListError::InvalidVersion {
                version,
                count: self.versions.len(),
            })
    }

    fn append(&mut self, root: Link<T>, len: usize) -> VersionId {
        self.versions.push(VersionRecord { root, len });
        let id = self.versions.len() - 1;
        tracing::trace!(version = id, len, "appended list version");
        id
    }

    pub fn versions_count(&self) -> usize {
        self.versions.len()
    }

    /// Id of the most recently created version.
    pub fn latest(&self) -> VersionId {
        self.versions.len().saturating_sub(1)
    }

    pub fn is_empty(&self, version: VersionId) -> Result<bool> {
        Ok(self.record(version)?.len == 0)
    }

    pub fn len(&self, version: VersionId) -> Result<usize> {
        Ok(self.record(version)?.len)
    }

    pub fn front(&self, version: VersionId) -> Result<&T> {
        self.record(version)?
            .root
            .as_deref()
            .map(|cell| &cell.value)
            .ok_or(ListError::EmptyVersion(version))
    }

    /// Last value of a version. Walks the whole chain.
    pub fn back(&self, version: VersionId) -> Result<&T> {
        self.record(version)?
            .iter()
            .last()
            .ok_or(ListError::EmptyVersion(version))
    }

    pub fn begin(&self, version: VersionId) -> Result<Cursor<T>> {
        Ok(Cursor::from_link(self.record(version)?.root.clone()))
    }

    pub fn end(&self) -> Cursor<T> {
        Cursor::end()
    }

    /// Cursor at `index`; `index == len` yields the end cursor.
    pub fn cursor_at(&self, version: VersionId, index: usize) -> Result<Cursor<T>> {
        let record = self.record(version)?;
        if index > record.len {
            return Err(ListError::IteratorOutOfRange);
        }
        let mut cursor = Cursor::from_link(record.root.clone());
        for _ in 0..index {
            cursor.advance()?;
        }
        Ok(cursor)
    }

    pub fn iter(&self, version: VersionId) -> Result<Iter<'_, T>> {
        Ok(self.record(version)?.iter())
    }

    /// Drop every version and start over from a single empty version 0.
    /// Cursors handed out earlier stay readable.
    pub fn clear(&mut self) {
        self.versions.clear();
        self.versions.push(VersionRecord::empty());
    }
}

impl<T: Clone> VersionedList<T> {
    pub fn to_vec(&self, version: VersionId) -> Result<Vec<T>> {
        Ok(self.iter(version)?.cloned().collect())
    }

    /// Split `version` at `pos`: copies of the values in front of it, and the
    /// link starting at it. Fails if `pos` is not reachable from the root.
    fn split_at(&self, version: VersionId, pos: &Cursor<T>) -> Result<(Vec<T>, Link<T>)> {
        let mut prefix = Vec::new();
        let mut current = self.record(version)?.root.as_ref();
        loop {
            match current {
                Some(cell) if pos.points_to(cell) => return Ok((prefix, Some(Arc::clone(cell)))),
                Some(cell) => {
                    prefix.push(cell.value.clone());
                    current = cell.next.as_ref();
                }
                None if pos.is_end() => return Ok((prefix, None)),
                None => return Err(ListError::ForeignCursor { version }),
            }
        }
    }

    /// Insert `value` in front of `pos`, producing a new version.
    ///
    /// Inserting at the head costs O(1); otherwise every cell before `pos`
    /// is copied and the new cell links to the shared remainder.
    pub fn insert(&mut self, version: VersionId, pos: &Cursor<T>, value: T) -> Result<Edit<T>> {
        let len = self.record(version)?.len;
        let (prefix, at) = self.split_at(version, pos)?;

        let cell = Cell::new(value, at);
        let cursor = Cursor::from_link(Some(Arc::clone(&cell)));
        let root = relink(prefix, Some(cell));
        let version = self.append(root, len + 1);
        Ok(Edit { version, cursor })
    }

    /// Remove the value at `pos`, producing a new version.
    ///
    /// Returns `None` without creating a version when the source is empty or
    /// `pos` is the end cursor. The returned cursor points at the element that
    /// followed the erased one.
    pub fn erase(&mut self, version: VersionId, pos: &Cursor<T>) -> Result<Option<Edit<T>>> {
        let len = self.record(version)?.len;
        if len == 0 || pos.is_end() {
            return Ok(None);
        }
        let (prefix, at) = self.split_at(version, pos)?;
        let Some(erased) = at else {
            return Ok(None);
        };

        let rest = erased.next.clone();
        let cursor = Cursor::from_link(rest.clone());
        let root = relink(prefix, rest);
        let version = self.append(root, len - 1);
        Ok(Some(Edit { version, cursor }))
    }

    pub fn push_front(&mut self, version: VersionId, value: T) -> Result<VersionId> {
        let head = self.begin(version)?;
        Ok(self.insert(version, &head, value)?.version)
    }

    /// Append at the tail. O(len): the whole chain is copied.
    pub fn push_back(&mut self, version: VersionId, value: T) -> Result<VersionId> {
        Ok(self.insert(version, &Cursor::end(), value)?.version)
    }

    pub fn pop_front(&mut self, version: VersionId) -> Result<Option<VersionId>> {
        let head = self.begin(version)?;
        Ok(self.erase(version, &head)?.map(|edit| edit.version))
    }

    /// Remove the last value. O(len): the whole remaining chain is copied.
    pub fn pop_back(&mut self, version: VersionId) -> Result<Option<VersionId>> {
        let len = self.len(version)?;
        if len == 0 {
            return Ok(None);
        }
        let last = self.cursor_at(version, len - 1)?;
        Ok(self.erase(version, &last)?.map(|edit| edit.version))
    }
}

/// Build fresh cells for `prefix` in order, ending in `tail`.
fn relink<T>(prefix: Vec<T>, tail: Link<T>) -> Link<T> {
    prefix
        .into_iter()
        .rev()
        .fold(tail, |next, value| Some(Cell::new(value, next)))
}

impl<T> Default for VersionedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for VersionedList<T> {
    fn clone(&self) -> Self {
        Self {
            versions: self.versions.clone(),
        }
    }
}

impl<T: PartialEq> PartialEq for VersionedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.versions == other.versions
    }
}

impl<T: fmt::Debug> fmt::Debug for VersionedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.versions
                    .iter()
                    .enumerate()
                    .map(|(id, record)| (id, DebugValues(record))),
            )
            .finish()
    }
}

struct DebugValues<'a, T>(&'a VersionRecord<T>);

impl<T: fmt::Debug> fmt::Debug for DebugValues<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}
