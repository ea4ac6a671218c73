//! In-memory object registry — a mutable set of live object ids.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use valvehub_app::ports::ObjectRegistry;
use valvehub_domain::id::ObjectId;

/// Object registry backed by a plain set.
///
/// Objects can be removed at any time to simulate an operator deleting the
/// actuator out from under a configured instance.
#[derive(Default)]
pub struct InMemoryRegistry {
    known: Mutex<HashSet<ObjectId>>,
}

impl InMemoryRegistry {
    /// Registry already containing the given ids.
    #[must_use]
    pub fn with_objects(ids: impl IntoIterator<Item = ObjectId>) -> Self {
        Self {
            known: Mutex::new(ids.into_iter().collect()),
        }
    }

    /// Add an object to the registry.
    pub fn register(&self, id: ObjectId) {
        self.lock().insert(id);
    }

    /// Remove an object, making every reference to it stale.
    pub fn remove(&self, id: ObjectId) {
        self.lock().remove(&id);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<ObjectId>> {
        self.known.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ObjectRegistry for InMemoryRegistry {
    fn exists(&self, id: ObjectId) -> bool {
        self.lock().contains(&id)
    }
}
