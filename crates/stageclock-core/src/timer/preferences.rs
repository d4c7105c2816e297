use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

/// Feature flags the engine consults on every tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerPreferences {
    /// Play a sound when the countdown reaches zero.
    #[serde(default = "default_true")]
    pub sound_end: bool,
    /// Short beep on each of the last ten seconds.
    #[serde(default)]
    pub sound_last10: bool,
    /// Keep running past zero, counting up.
    #[serde(default)]
    pub count_up_after_end: bool,
    /// System notification on completion while the host is hidden.
    #[serde(default)]
    pub notify_on_end: bool,
    /// Play the `half` / `oneMin` custom sounds when they are configured.
    #[serde(default = "default_true")]
    pub sound_milestones: bool,
}

fn default_true() -> bool {
    true
}

impl Default for TimerPreferences {
    fn default() -> Self {
        Self {
            sound_end: true,
            sound_last10: false,
            count_up_after_end: false,
            notify_on_end: false,
            sound_milestones: true,
        }
    }
}

/// Read-only view of the user's preferences.
///
/// The engine never writes preferences; the host owns the write path.
pub trait PreferenceSource {
    fn preferences(&self) -> TimerPreferences;
}

impl PreferenceSource for TimerPreferences {
    fn preferences(&self) -> TimerPreferences {
        self.clone()
    }
}

/// Preferences shared with a host that may edit them mid-run.
///
/// A poisoned lock falls back to the built-in defaults.
impl PreferenceSource for Arc<RwLock<TimerPreferences>> {
    fn preferences(&self) -> TimerPreferences {
        self.read()
            .map(|prefs| prefs.clone())
            .unwrap_or_default()
    }
}
