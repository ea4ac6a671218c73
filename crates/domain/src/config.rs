//! Configuration for a managed valve instance.
//!
//! Mirrors the instance properties the host runtime persists: the actuator
//! reference, the cycle time, the maintenance flag, and the capability
//! toggles that unify the plain and the maintenance/emergency-capable
//! module variants into one controller.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::id::ObjectId;

/// Smallest accepted cycle time, in seconds (operator profile lower bound).
pub const CYCLE_TIME_MIN: f64 = 1.0;
/// Largest accepted cycle time, in seconds (operator profile upper bound).
pub const CYCLE_TIME_MAX: f64 = 60.0;

/// Optional behaviors a valve instance can be created with.
///
/// All of them default to on; disabling individual flags reproduces the
/// leaner of the two legacy module variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    /// Reject open requests while maintenance mode is enabled.
    pub maintenance_lockout: bool,
    /// Expose the emergency-stop operation and its observable flag.
    pub emergency_stop: bool,
    /// Publish the human-readable auto-close deadline.
    pub timer_info: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            maintenance_lockout: true,
            emergency_stop: true,
            timer_info: true,
        }
    }
}

/// Properties a valve controller is configured from at apply time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValveConfig {
    /// Reference to the solenoid-valve actuator. [`ObjectId::UNSET`] means
    /// "not configured"; every operate attempt will then be rejected.
    pub actuator: ObjectId,
    /// Seconds the valve stays open before the auto-close fires.
    pub cycle_time_seconds: f64,
    /// Operator lockout; only honored with
    /// [`Capabilities::maintenance_lockout`] set.
    pub maintenance_mode: bool,
    /// Feature toggles for this instance.
    pub capabilities: Capabilities,
}

impl Default for ValveConfig {
    fn default() -> Self {
        Self {
            actuator: ObjectId::UNSET,
            cycle_time_seconds: 10.0,
            maintenance_mode: false,
            capabilities: Capabilities::default(),
        }
    }
}

impl ValveConfig {
    /// Check the configuration is operable.
    ///
    /// An unset actuator is *not* rejected here: the instance may be saved
    /// before the hardware exists, and every operate attempt re-validates
    /// the reference anyway.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::CycleTimeOutOfRange`] when the cycle time is
    /// not strictly positive or lies outside the profile bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.cycle_time_seconds.is_finite()
            || self.cycle_time_seconds < CYCLE_TIME_MIN
            || self.cycle_time_seconds > CYCLE_TIME_MAX
        {
            return Err(ConfigError::CycleTimeOutOfRange {
                seconds: self.cycle_time_seconds,
                min: CYCLE_TIME_MIN,
                max: CYCLE_TIME_MAX,
            });
        }
        Ok(())
    }
}
