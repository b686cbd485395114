//! # IDs
//! Shapes (and anything else needing identity that survives cloning) are named by a `StableID<T>`,
//! a process-unique ID namespaced by the type T. Order of IDs is not guaranteed.
//!
//! To get a fresh ID, use `StableID<YourNamespaceTy>`'s `Default` impl. Cloning an ID-carrying
//! value keeps the ID, which is what lets undo snapshots and selections agree on who is who.

// Collection of counters by type.
// RWLock'd BTreeMap from TypeId to the next available raw ID.
static ID_SERVER: parking_lot::RwLock<
    std::collections::BTreeMap<std::any::TypeId, std::sync::atomic::AtomicU64>,
> = parking_lot::const_rwlock(std::collections::BTreeMap::new());

/// ID that is guaranteed unique within this execution of the program.
/// IDs with different types may share a value but should not be considered equal.
pub struct StableID<T: std::any::Any> {
    id: std::num::NonZeroU64,
    // Namespace marker
    _phantom: std::marker::PhantomData<T>,
}
impl<T: std::any::Any> Clone for StableID<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T: std::any::Any> Copy for StableID<T> {}
impl<T: std::any::Any> PartialEq for StableID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl<T: std::any::Any> Eq for StableID<T> {}
impl<T: std::any::Any> std::hash::Hash for StableID<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
// Safety - it's just a u64. The marker type is never stored.
unsafe impl<T: std::any::Any> Send for StableID<T> {}
unsafe impl<T: std::any::Any> Sync for StableID<T> {}

impl<T: std::any::Any> StableID<T> {
    /// Get the raw numeric value of this ID.
    /// IDs from differing namespaces may share the same numeric ID!
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id.get()
    }
    fn allocate() -> Self {
        let ty = std::any::TypeId::of::<T>();
        let raw = {
            let read = ID_SERVER.upgradable_read();
            if let Some(counter) = read.get(&ty) {
                counter.fetch_add(1, std::sync::atomic::Ordering::Relaxed)
            } else {
                // First ID of this namespace. Rare, so take the slow path.
                let mut write = parking_lot::RwLockUpgradableReadGuard::upgrade(read);
                // Counter may have been created between the read and the upgrade.
                write
                    .entry(ty)
                    .or_insert_with(|| std::sync::atomic::AtomicU64::new(1))
                    .fetch_add(1, std::sync::atomic::Ordering::Relaxed)
            }
        };
        let Some(id) = std::num::NonZeroU64::new(raw) else {
            // Only reachable after u64::MAX allocations. Global state is unrecoverable.
            log::error!("{} ID overflow! Aborting!", std::any::type_name::<T>());
            log::logger().flush();
            std::process::abort();
        };
        Self {
            id,
            _phantom: std::marker::PhantomData,
        }
    }
}
impl<T: std::any::Any> Default for StableID<T> {
    fn default() -> Self {
        Self::allocate()
    }
}
impl<T: std::any::Any> std::fmt::Display for StableID<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = std::any::type_name::<T>();
        let short = name.rsplit("::").next().unwrap_or(name);
        write!(f, "{short}#{}", self.id)
    }
}
impl<T: std::any::Any> std::fmt::Debug for StableID<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as std::fmt::Display>::fmt(self, f)
    }
}
