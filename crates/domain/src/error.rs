//! Common error types used across the workspace.
//!
//! Each layer defines typed errors here and converts via `#[from]` where a
//! broader error is needed. Actuator-facing failures are always surfaced as
//! values, never panics: a failed valve command blocks one request, nothing
//! more.

use crate::id::ObjectId;

/// Why an open/close request was refused or failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValveError {
    /// The actuator reference is unset or does not resolve to an object.
    /// Operator must fix the instance configuration.
    #[error("no solenoid valve configured")]
    ActuatorNotConfigured,

    /// Both attempts to command the physical valve failed. Transient or
    /// hardware fault; the caller may retry later.
    #[error("solenoid valve {actuator} did not accept the command")]
    CommandFailed {
        /// The actuator that rejected the command.
        actuator: ObjectId,
    },

    /// Open requests are locked out while maintenance mode is enabled.
    #[error("maintenance mode is active")]
    MaintenanceModeActive,
}

/// A configuration value that cannot be operated with.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Cycle time must be strictly positive and within the profile bounds.
    #[error("cycle time of {seconds} s is outside the valid range {min}..={max} s")]
    CycleTimeOutOfRange {
        seconds: f64,
        min: f64,
        max: f64,
    },
}
