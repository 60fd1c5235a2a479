use std::sync::Arc;

use parking_lot::RwLock;

use crate::controller::VersionController;
use crate::{Result, VersionId};

/// Cloneable handle to a controller shared between threads.
///
/// Reads run concurrently; edits take the write lock, so a reader never sees
/// a half-finished relabel or a version id missing from one of the engines.
pub struct SharedHistory<T> {
    inner: Arc<RwLock<VersionController<T>>>,
}

impl<T> SharedHistory<T> {
    pub fn new(controller: VersionController<T>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(controller)),
        }
    }

    pub fn read<R>(&self, f: impl FnOnce(&VersionController<T>) -> R) -> R {
        f(&*self.inner.read())
    }

    pub fn write<R>(&self, f: impl FnOnce(&mut VersionController<T>) -> R) -> R {
        f(&mut *self.inner.write())
    }

    pub fn is_ancestor(&self, ancestor: VersionId, descendant: VersionId) -> Result<bool> {
        self.inner.read().is_ancestor(ancestor, descendant)
    }

    pub fn head(&self) -> VersionId {
        self.inner.read().head()
    }
}

impl<T: Clone> SharedHistory<T> {
    pub fn contents(&self, version: VersionId) -> Result<Vec<T>> {
        self.inner.read().contents(version)
    }

    pub fn push_back(&self, parent: VersionId, value: T) -> Result<VersionId> {
        self.inner.write().push_back(parent, value)
    }

    pub fn push_front(&self, parent: VersionId, value: T) -> Result<VersionId> {
        self.inner.write().push_front(parent, value)
    }
}

impl<T> Clone for SharedHistory<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for SharedHistory<T> {
    fn default() -> Self {
        Self::new(VersionController::new())
    }
}
