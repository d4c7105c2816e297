use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::notify::SoundKey;
use crate::timer::TimerState;

/// Every state change in the engine produces an Event.
/// The CLI prints them; tests assert on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        remaining_ms: i64,
        total_ms: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_ms: i64,
        at: DateTime<Utc>,
    },
    TimerReset {
        total_ms: u64,
        at: DateTime<Utc>,
    },
    DurationChanged {
        total_ms: u64,
        remaining_ms: i64,
        running: bool,
        at: DateTime<Utc>,
    },
    RepeatChanged {
        repeat: bool,
        at: DateTime<Utc>,
    },
    /// One of the last ten seconds was announced.
    CountdownCue {
        seconds_left: i64,
        at: DateTime<Utc>,
    },
    /// A custom milestone sound (`half` / `oneMin`) was played.
    MilestoneReached {
        sound: SoundKey,
        at: DateTime<Utc>,
    },
    /// Remaining time crossed zero. Emitted once per cycle.
    TimerCompleted {
        total_ms: u64,
        at: DateTime<Utc>,
    },
    /// Repeat mode started the next cycle.
    CycleRearmed {
        total_ms: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        remaining_ms: i64,
        total_ms: u64,
        repeat: bool,
        display: String,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Stable name, matching the serialized `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::TimerStarted { .. } => "timer_started",
            Event::TimerPaused { .. } => "timer_paused",
            Event::TimerReset { .. } => "timer_reset",
            Event::DurationChanged { .. } => "duration_changed",
            Event::RepeatChanged { .. } => "repeat_changed",
            Event::CountdownCue { .. } => "countdown_cue",
            Event::MilestoneReached { .. } => "milestone_reached",
            Event::TimerCompleted { .. } => "timer_completed",
            Event::CycleRearmed { .. } => "cycle_rearmed",
            Event::StateSnapshot { .. } => "state_snapshot",
        }
    }
}
