//! Actuator port — commanding the physical solenoid valve.

use std::future::Future;

use valvehub_domain::id::ObjectId;

/// Commands the physical valve through the host's action dispatch.
///
/// The call is idempotent from the controller's point of view and may fail
/// transiently; the controller retries exactly once and otherwise reports
/// the failure to the caller.
pub trait Actuator {
    /// Ask the actuator `target` to open (`true`) or close (`false`).
    ///
    /// Returns whether the device accepted the command.
    fn request_action(&self, target: ObjectId, open: bool) -> impl Future<Output = bool> + Send;
}

impl<T: Actuator + Send + Sync> Actuator for std::sync::Arc<T> {
    fn request_action(&self, target: ObjectId, open: bool) -> impl Future<Output = bool> + Send {
        (**self).request_action(target, open)
    }
}
