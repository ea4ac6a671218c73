//! In-memory observable state store — the host's variable tree, reduced to
//! a queryable map.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use valvehub_app::ports::StateSink;
use valvehub_domain::observe::{ObservedField, ObservedValue};

/// Stores the latest published value per observable field.
#[derive(Default)]
pub struct InMemoryStateStore {
    values: Mutex<HashMap<ObservedField, ObservedValue>>,
}

impl InMemoryStateStore {
    /// Latest value published for `field`, if any.
    #[must_use]
    pub fn get(&self, field: ObservedField) -> Option<ObservedValue> {
        self.lock().get(&field).cloned()
    }

    /// Copy of all published values.
    #[must_use]
    pub fn snapshot(&self) -> HashMap<ObservedField, ObservedValue> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<ObservedField, ObservedValue>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StateSink for InMemoryStateStore {
    fn set(&self, field: ObservedField, value: ObservedValue) {
        self.lock().insert(field, value);
    }
}
