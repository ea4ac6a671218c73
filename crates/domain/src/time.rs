//! Time and timestamp helpers.

use chrono::{DateTime, Local};

/// Local timestamp used for the auto-close deadline shown to operators.
pub type Timestamp = DateTime<Local>;

/// Return the current local time.
#[must_use]
pub fn now() -> Timestamp {
    Local::now()
}

/// Render an auto-close deadline the way the operator UI shows it.
#[must_use]
pub fn format_deadline(ts: Timestamp) -> String {
    ts.format("%d.%m.%Y, %H:%M:%S").to_string()
}
