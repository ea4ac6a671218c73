//! Typed reference to an object in the host's object space.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Opaque reference to an object managed by the host runtime, such as the
/// solenoid-valve actuator.
///
/// The host hands out small positive integers; `0` is the conventional
/// "not configured" value and never resolves to a real object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(u32);

impl ObjectId {
    /// The "not configured" reference.
    pub const UNSET: Self = Self(0);

    /// Wrap a raw host object id.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Whether this reference points at anything at all.
    ///
    /// A configured reference may still fail to resolve; existence is
    /// checked against the object registry at operate time.
    #[must_use]
    pub fn is_configured(self) -> bool {
        self.0 != 0
    }

    /// Access the raw host object id.
    #[must_use]
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ObjectId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}
