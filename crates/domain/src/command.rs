//! Command — a typed request directed at a managed valve.
//!
//! The host runtime dispatches actions by string identifier; this enum is
//! the typed replacement. Every external entry point of the controller maps
//! to exactly one variant.

use serde::{Deserialize, Serialize};

/// A control request for a single managed valve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ValveCommand {
    /// Open when `open` is true, close otherwise.
    Toggle { open: bool },
    /// Store a new cycle time. Does not touch an already-armed timer.
    SetCycleTime { seconds: f64 },
    /// Open the valve and arm the auto-close timer.
    Open,
    /// Close the valve and disarm the timer.
    Close,
    /// Immediate close with the observable emergency flag raised.
    EmergencyStop,
}
