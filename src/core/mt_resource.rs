//! A thread-safe, reference-counted resource container.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Shared ownership of a value with read-write locking.
///
/// `MtResource` is how chunks are shared between the primary thread and the
/// worker pool: cloning the handle is cheap, reads can happen concurrently,
/// and writes take the lock exclusively. It is a thin wrapper around
/// `Arc<RwLock<T>>` that keeps the locking vocabulary (`get`/`get_mut`)
/// consistent across the codebase.
///
/// # Examples
/// ```
/// use voxel_terrain::core::MtResource;
///
/// let counter = MtResource::new(0);
/// *counter.get_mut() += 1;
/// assert_eq!(*counter.get(), 1);
/// ```
#[derive(Debug)]
pub struct MtResource<T: Send + Sync> {
    resource: Arc<RwLock<T>>,
}

impl<T: Send + Sync + 'static> MtResource<T> {
    /// Wraps `resource` in a new shared handle.
    pub fn new(resource: T) -> Self {
        Self {
            resource: Arc::new(RwLock::new(resource)),
        }
    }

    /// Returns a read guard for the contained value.
    ///
    /// # Panics
    /// Panics if the lock is poisoned.
    pub fn get(&self) -> RwLockReadGuard<'_, T> {
        self.resource.read().unwrap()
    }

    /// Returns a write guard for the contained value.
    ///
    /// # Panics
    /// Panics if the lock is poisoned.
    pub fn get_mut(&self) -> RwLockWriteGuard<'_, T> {
        self.resource.write().unwrap()
    }
}

impl<T: Send + Sync> Clone for MtResource<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}
