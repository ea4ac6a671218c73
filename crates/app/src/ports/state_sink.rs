//! State sink port — publishing observable state to the host.

use valvehub_domain::observe::{ObservedField, ObservedValue};

/// Write-only sink for the controller's externally visible fields.
///
/// The host mirrors these into its variable tree for dashboards and
/// automations. Control flow never reads them back; the controller keeps
/// its own authoritative copy of every field it publishes.
pub trait StateSink {
    /// Publish a new value for `field`.
    fn set(&self, field: ObservedField, value: ObservedValue);
}

impl<T: StateSink> StateSink for std::sync::Arc<T> {
    fn set(&self, field: ObservedField, value: ObservedValue) {
        (**self).set(field, value);
    }
}
