//! Clock-face rendering of the remaining time.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Digits shown on the clock face for a given remaining time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayTime {
    /// True once count-up-after-end has taken the timer past zero.
    pub overtime: bool,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl DisplayTime {
    pub fn from_remaining_ms(remaining_ms: i64) -> Self {
        let abs_seconds = remaining_ms.unsigned_abs() / 1000;
        let hours = abs_seconds / 3600;
        let minutes = if hours > 0 {
            (abs_seconds % 3600) / 60
        } else {
            abs_seconds / 60
        };
        Self {
            overtime: remaining_ms < 0,
            hours,
            minutes,
            seconds: abs_seconds % 60,
        }
    }
}

impl fmt::Display for DisplayTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.overtime {
            f.write_str("+")?;
        }
        if self.hours > 0 {
            write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
        } else {
            write!(f, "{}:{:02}", self.minutes, self.seconds)
        }
    }
}

/// Zero-padded `HH:MM:SS`, the form used to prefill a duration edit.
pub fn format_hms(ms: u64) -> String {
    let total_seconds = ms / 1000;
    format!(
        "{:02}:{:02}:{:02}",
        total_seconds / 3600,
        (total_seconds % 3600) / 60,
        total_seconds % 60
    )
}
