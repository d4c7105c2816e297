mod adjust;
mod display;
mod engine;
mod input;
mod preferences;

pub use adjust::adjusted_total_ms;
pub use display::{format_hms, DisplayTime};
pub use engine::{TimerEngine, TimerState, DEFAULT_DURATION_MS};
pub use input::parse_time_input;
pub use preferences::{PreferenceSource, TimerPreferences};
