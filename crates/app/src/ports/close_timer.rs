//! Close-timer port — the single one-shot auto-close slot.

use std::time::Duration;

/// One named timer slot per controller instance, scheduled by the host's
/// timer service.
///
/// At most one deadline is pending at a time: arming replaces any earlier
/// deadline, disarming clears it. The host guarantees a cleared slot never
/// fires a stale callback.
pub trait CloseTimer {
    /// Schedule (or reschedule) the auto-close to fire after `delay`.
    fn arm(&self, delay: Duration);

    /// Clear any pending deadline.
    fn disarm(&self);
}

impl<T: CloseTimer> CloseTimer for std::sync::Arc<T> {
    fn arm(&self, delay: Duration) {
        (**self).arm(delay);
    }

    fn disarm(&self) {
        (**self).disarm();
    }
}
