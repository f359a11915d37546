use std::any::Any;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use eframe::egui;
use parking_lot::RawRwLock;
use parking_lot::RwLock;

pub type ArcReadGuard<T> = parking_lot::lock_api::ArcRwLockReadGuard<RawRwLock, T>;
pub type ArcWriteGuard<T> = parking_lot::lock_api::ArcRwLockWriteGuard<RawRwLock, T>;

/// Shared handle to one piece of per-instance state.
pub type SharedState<T> = Arc<RwLock<T>>;

/// Type-erased per-instance state, keyed by egui ids.
///
/// Two timelines on the same page get two entries here, so nothing about a
/// timeline instance lives in globals.
#[derive(Debug, Default)]
pub struct StateStore {
    states: RwLock<HashMap<egui::Id, Arc<dyn Any + Send + Sync>>>,
    next: AtomicU64,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<T: Send + Sync + 'static>(&self, id: egui::Id) -> Option<SharedState<T>> {
        let entry = self.states.read().get(&id).cloned()?;
        entry.downcast::<RwLock<T>>().ok()
    }

    /// The state stored under `id`, inserting `init()` when missing.
    ///
    /// An entry of a different type is replaced.
    pub fn get_or_insert_with<T: Send + Sync + 'static>(
        &self,
        id: egui::Id,
        init: impl FnOnce() -> T,
    ) -> SharedState<T> {
        if let Some(existing) = self.get::<T>(id) {
            return existing;
        }

        let mut states = self.states.write();
        if let Some(existing) = states
            .get(&id)
            .and_then(|entry| entry.clone().downcast::<RwLock<T>>().ok())
        {
            return existing;
        }
        let state = Arc::new(RwLock::new(init()));
        if states.insert(id, state.clone()).is_some() {
            log::warn!("state {id:?} replaced by a value of another type");
        }
        state
    }

    /// Store `init` under a fresh id.
    pub fn insert<T: Send + Sync + 'static>(&self, init: T) -> StateId<T> {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        let id = StateId::new(egui::Id::new(("careerline-state", n)));
        self.states
            .write()
            .insert(id.id(), Arc::new(RwLock::new(init)));
        id
    }

    pub fn remove(&self, id: egui::Id) -> bool {
        self.states.write().remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.states.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
pub struct StateId<T> {
    id: egui::Id,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Copy for StateId<T> {}

impl<T> Clone for StateId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> StateId<T> {
    pub fn new(id: egui::Id) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    pub fn id(self) -> egui::Id {
        self.id
    }
}

impl<T: Send + Sync + 'static> StateId<T> {
    pub fn shared(self, store: &StateStore) -> Option<SharedState<T>> {
        store.get(self.id)
    }

    pub fn read(self, store: &StateStore) -> Option<ArcReadGuard<T>> {
        Some(self.shared(store)?.read_arc())
    }

    pub fn write(self, store: &StateStore) -> Option<ArcWriteGuard<T>> {
        Some(self.shared(store)?.write_arc())
    }

    pub fn try_write(self, store: &StateStore) -> Option<ArcWriteGuard<T>> {
        self.shared(store)?.try_write_arc()
    }
}
