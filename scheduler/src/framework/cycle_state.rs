use std::any::Any;
use std::fmt;
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use uuid::Uuid;

use crate::error::StateError;

type StateData = Arc<dyn Any + Send + Sync>;
type Slot = Arc<OnceLock<StateData>>;

/// Identifies one memoized value: the pod being scheduled and what was
/// derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateKey {
    pub pod: Uuid,
    pub kind: &'static str,
}

impl StateKey {
    pub fn new(pod: Uuid, kind: &'static str) -> Self {
        Self { pod, kind }
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.pod, self.kind)
    }
}

/// Values derived once per scheduling cycle and shared by every plugin and
/// node evaluated in that cycle.
///
/// Each key is computed at most once. Concurrent first readers of the same
/// key block on the computing caller and all observe its value. A new
/// `CycleState` is created for every cycle and dropped when it ends.
#[derive(Default)]
pub struct CycleState {
    storage: DashMap<StateKey, Slot>,
}

impl CycleState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value under `key`, running `compute` if nobody did yet.
    ///
    /// `compute` runs outside the map's shard locks, so it may read other
    /// keys. It must not request `key` itself.
    pub fn get_or_compute<T, F>(&self, key: StateKey, compute: F) -> Result<Arc<T>, StateError>
    where
        T: Any + Send + Sync,
        F: FnOnce() -> T,
    {
        // clone the slot so the shard guard is dropped before computing
        let slot: Slot = Arc::clone(&self.storage.entry(key.clone()).or_default());

        let data = slot.get_or_init(|| {
            tracing::trace!(key=%key, "Computing cycle state entry");
            let data: StateData = Arc::new(compute());
            data
        });

        Arc::clone(data)
            .downcast::<T>()
            .map_err(|_| StateError::KeyType(key))
    }

    /// Reads a value some earlier call already stored.
    pub fn read<T>(&self, key: &StateKey) -> Result<Arc<T>, StateError>
    where
        T: Any + Send + Sync,
    {
        let data = self
            .storage
            .get(key)
            .and_then(|slot| slot.value().get().cloned())
            .ok_or_else(|| StateError::NotFound(key.clone()))?;

        data.downcast::<T>()
            .map_err(|_| StateError::KeyType(key.clone()))
    }

    pub fn contains(&self, key: &StateKey) -> bool {
        self.storage
            .get(key)
            .is_some_and(|slot| slot.value().get().is_some())
    }

    /// Number of computed entries.
    pub fn len(&self) -> usize {
        self.storage
            .iter()
            .filter(|entry| entry.value().get().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for CycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CycleState")
            .field("entries", &self.len())
            .finish()
    }
}
