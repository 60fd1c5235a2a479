use std::fmt;
use std::sync::Arc;

use crate::{ListError, Result};

pub(crate) type Link<T> = Option<Arc<Cell<T>>>;

/// An immutable list cell, shared by every version whose chain passes through it.
pub(crate) struct Cell<T> {
    pub(crate) value: T,
    pub(crate) next: Link<T>,
}

impl<T> Cell<T> {
    pub(crate) fn new(value: T, next: Link<T>) -> Arc<Self> {
        Arc::new(Self { value, next })
    }
}

impl<T> Drop for Cell<T> {
    fn drop(&mut self) {
        // Unlink uniquely owned successors in a loop; stop at the first cell
        // another version still holds.
        let mut next = self.next.take();
        while let Some(cell) = next {
            match Arc::try_unwrap(cell) {
                Ok(mut cell) => next = cell.next.take(),
                Err(_) => break,
            }
        }
    }
}

/// Forward, read-only position inside one version of a [`VersionedList`].
///
/// A cursor keeps the cells it points at alive, even if the list registry is
/// cleared. Two cursors are equal when they reference the same cell, not
/// merely equal values; the end cursor is equal to every other end cursor.
///
/// [`VersionedList`]: crate::VersionedList
pub struct Cursor<T> {
    cell: Link<T>,
}

impl<T> Cursor<T> {
    pub(crate) fn from_link(cell: Link<T>) -> Self {
        Self { cell }
    }

    /// The past-the-end cursor, shared by all versions.
    pub fn end() -> Self {
        Self { cell: None }
    }

    pub fn is_end(&self) -> bool {
        self.cell.is_none()
    }

    /// Value under the cursor.
    pub fn get(&self) -> Result<&T> {
        self.cell
            .as_deref()
            .map(|cell| &cell.value)
            .ok_or(ListError::IteratorOutOfRange)
    }

    /// Move to the next cell. Fails when already past the end.
    pub fn advance(&mut self) -> Result<()> {
        let next = match self.cell.as_deref() {
            Some(cell) => cell.next.clone(),
            None => return Err(ListError::IteratorOutOfRange),
        };
        self.cell = next;
        Ok(())
    }

    pub(crate) fn points_to(&self, cell: &Arc<Cell<T>>) -> bool {
        self.cell
            .as_ref()
            .is_some_and(|own| Arc::ptr_eq(own, cell))
    }
}

impl<T> Clone for Cursor<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T> PartialEq for Cursor<T> {
    fn eq(&self, other: &Self) -> bool {
        match (&self.cell, &other.cell) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T> Eq for Cursor<T> {}

impl<T: fmt::Debug> fmt::Debug for Cursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell.as_deref() {
            Some(cell) => f.debug_tuple("Cursor").field(&cell.value).finish(),
            None => f.write_str("Cursor(end)"),
        }
    }
}

/// Borrowing iterator over the values of one version.
pub struct Iter<'a, T> {
    next: Option<&'a Cell<T>>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(root: &'a Link<T>, len: usize) -> Self {
        Self {
            next: root.as_deref(),
            remaining: len,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let cell = self.next?;
        self.next = cell.next.as_deref();
        self.remaining = self.remaining.saturating_sub(1);
        Some(&cell.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
