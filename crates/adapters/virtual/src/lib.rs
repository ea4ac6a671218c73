//! # valvehub-adapter-virtual
//!
//! Virtual host adapter that provides simulated collaborators for testing
//! and demonstration purposes.
//!
//! ## Provided pieces
//!
//! | Piece | Port | Behaviour |
//! |-------|------|-----------|
//! | [`VirtualValve`] | `Actuator` | Simulated solenoid with failure injection |
//! | [`InMemoryRegistry`] | `ObjectRegistry` | Mutable set of live object ids |
//! | [`TokioCloseTimer`] | `CloseTimer` | Delivers [`HostEvent::CloseTimerElapsed`] over a channel |
//! | [`InMemoryStateStore`] | `StateSink` | Queryable snapshot of the observables |
//!
//! ## Dependency rule
//!
//! Depends on `valvehub-app` (port traits) and `valvehub-domain` only.

mod registry;
mod state_store;
mod timer;
mod valve;

pub use registry::InMemoryRegistry;
pub use state_store::InMemoryStateStore;
pub use timer::TokioCloseTimer;
pub use valve::VirtualValve;

/// Callback notifications the simulated host delivers to the serial event
/// loop that drives the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// The armed close timer's deadline elapsed.
    CloseTimerElapsed,
    /// The actuator reported a state change.
    ActuatorStateChanged {
        /// The state the actuator now reports.
        reported: bool,
        /// Host change-detection flag; false for repeat notifications.
        changed: bool,
    },
}
