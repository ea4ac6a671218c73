//! Observable state — the externally visible variables of a managed valve.
//!
//! The host runtime mirrors these into its variable tree for dashboards and
//! automations. They are informational: control flow never reads them back.

use serde::{Deserialize, Serialize};

/// Text shown in [`ObservedField::TimerInfo`] while no auto-close is armed.
pub const TIMER_INFO_IDLE: &str = "-";

/// The observable variables a valve instance publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservedField {
    /// Last *commanded* state: true while the valve is open.
    ValveOpen,
    /// Last state *reported* by the actuator. May lag or disagree with
    /// [`ValveOpen`](Self::ValveOpen) when the hardware misbehaves.
    ValveState,
    /// Configured cycle time in seconds.
    CycleTime,
    /// True while an emergency close is in progress or unresolved.
    EmergencyStop,
    /// Human-readable auto-close deadline, or [`TIMER_INFO_IDLE`].
    TimerInfo,
}

impl std::fmt::Display for ObservedField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ValveOpen => f.write_str("valve_open"),
            Self::ValveState => f.write_str("valve_state"),
            Self::CycleTime => f.write_str("cycle_time"),
            Self::EmergencyStop => f.write_str("emergency_stop"),
            Self::TimerInfo => f.write_str("timer_info"),
        }
    }
}

/// A single typed observable value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObservedValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl std::fmt::Display for ObservedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(value) => value.fmt(f),
            Self::Int(value) => value.fmt(f),
            Self::Float(value) => value.fmt(f),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<bool> for ObservedValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for ObservedValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for ObservedValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}
