//! Object registry port — resolving references in the host's object space.

use valvehub_domain::id::ObjectId;

/// Answers whether a reference currently resolves to a live object.
///
/// Used to validate the actuator reference before every operate attempt;
/// a reference can go stale at any time when the operator deletes or
/// re-creates the underlying device.
pub trait ObjectRegistry {
    /// Whether `id` exists in the host's object space right now.
    fn exists(&self, id: ObjectId) -> bool;
}

impl<T: ObjectRegistry> ObjectRegistry for std::sync::Arc<T> {
    fn exists(&self, id: ObjectId) -> bool {
        (**self).exists(id)
    }
}
