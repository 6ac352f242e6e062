use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A thread-safe, reference-counted handle with read-write locking.
///
/// `MtResource` wraps an `Arc<RwLock<T>>`. The world hands chunks out as
/// `MtResource<Chunk>` so a worker can hold a read guard while meshing while the
/// main thread keeps its own handle for edits. Clones share the same value.
///
/// A poisoned lock is not treated as fatal: the guard is recovered from the
/// poison error. Every writer in this crate leaves the value consistent before
/// any point that could panic, so the recovered value is still valid.
///
/// # Examples
///
/// ```
/// use voxel_chunk_manager::core::MtResource;
///
/// let counter = MtResource::new(0);
/// let shared = counter.clone();
///
/// std::thread::spawn(move || *shared.get_mut() += 1).join().unwrap();
/// assert_eq!(*counter.get(), 1);
/// ```
pub struct MtResource<T: Send + Sync> {
    resource: Arc<RwLock<T>>,
}

impl<T: Send + Sync> MtResource<T> {
    /// Wraps `resource` in a new shared handle.
    pub fn new(resource: T) -> Self {
        Self {
            resource: Arc::new(RwLock::new(resource)),
        }
    }

    /// Blocks until shared read access is available.
    pub fn get(&self) -> RwLockReadGuard<'_, T> {
        self.resource.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Blocks until exclusive write access is available.
    pub fn get_mut(&self) -> RwLockWriteGuard<'_, T> {
        self.resource.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns `true` when both handles point at the same value.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.resource, &other.resource)
    }

    /// Number of live handles sharing this value.
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.resource)
    }
}

impl<T: Send + Sync> Clone for MtResource<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}

impl<T: Send + Sync + std::fmt::Debug> std::fmt::Debug for MtResource<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("MtResource").field(&*self.get()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_value() {
        let a = MtResource::new(vec![1, 2, 3]);
        let b = a.clone();
        b.get_mut().push(4);
        assert_eq!(a.get().len(), 4);
        assert!(a.ptr_eq(&b));
        assert_eq!(a.handle_count(), 2);
    }

    #[test]
    fn survives_a_poisoned_lock() {
        let value = MtResource::new(7);
        let poisoner = value.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.get_mut();
            panic!("poison the lock");
        })
        .join();

        assert_eq!(*value.get(), 7);
        *value.get_mut() = 8;
        assert_eq!(*value.get(), 8);
    }
}
