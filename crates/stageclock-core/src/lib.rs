//! # Stageclock Core Library
//!
//! This library provides the core logic for the Stageclock presentation
//! countdown. All behavior lives here; the `stageclock` CLI binary is a thin
//! terminal front end over the same engine.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A wall-clock-based state machine anchored on the end
//!   instant of the current cycle. The caller invokes `tick()` periodically
//!   while it runs.
//! - **Completion Notifier**: Sound, system notification and in-app toast
//!   fired once per cycle, through pluggable host collaborators.
//! - **Tick Scheduler**: Armed-only-while-running interval driving `tick()`.
//! - **Storage**: TOML-based configuration, a SQLite key-value store for the
//!   repeat flag, and a cache of user-supplied sound files.
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core countdown state machine
//! - [`CompletionNotifier`]: End-of-cycle side effects
//! - [`TickScheduler`]: Periodic tick source
//! - [`Config`]: Application configuration management
//! - [`Database`]: Persisted repeat flag

pub mod clock;
pub mod error;
pub mod events;
pub mod notify;
pub mod scheduler;
pub mod storage;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{AudioError, ConfigError, NotifyError, StorageError, TimeInputError};
pub use events::Event;
pub use notify::{
    AudioOutput, AudioResource, AudioResourceLookup, CompletionNotifier, HostSurface,
    NotificationPermission, PlaybackHandle, SoundKey, Tone,
};
pub use scheduler::{TickScheduler, DEFAULT_TICK_INTERVAL};
pub use storage::{Config, Database, SoundLibrary};
pub use timer::{
    adjusted_total_ms, format_hms, parse_time_input, DisplayTime, PreferenceSource, TimerEngine,
    TimerPreferences, TimerState,
};
