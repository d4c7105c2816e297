//! Countdown engine.
//!
//! The engine is a wall-clock-based state machine. It does not use internal
//! threads - the caller is responsible for calling `tick()` periodically
//! (nominally every 200 ms, and only while running).
//!
//! Remaining time is never decremented. While running, the absolute end
//! instant of the cycle is the source of truth and `remaining_ms` is
//! recomputed from it on every tick, so scheduler jitter cannot accumulate.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Paused | Completed | Overtime) -> Idle
//!            ^                  |
//!            +---- repeat ------+
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(CompletionNotifier::silent());
//! engine.start();
//! // In a loop:
//! let events = engine.tick();
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::adjust::adjusted_total_ms;
use super::display::DisplayTime;
use super::input::parse_time_input;
use super::preferences::{PreferenceSource, TimerPreferences};
use crate::clock::{Clock, SystemClock};
use crate::error::TimeInputError;
use crate::events::Event;
use crate::notify::{CompletionNotifier, SoundKey};

/// Duration of a freshly created engine: five minutes.
pub const DEFAULT_DURATION_MS: u64 = 5 * 60 * 1000;

const CUE_WINDOW_SECS: i64 = 10;
const ONE_MINUTE_MS: i64 = 60_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    /// Stopped with the full duration on the clock.
    Idle,
    Running,
    Paused,
    /// Reached zero and halted.
    Completed,
    /// Past zero and counting up.
    Overtime,
}

/// Per-cycle guards for the `half` / `oneMin` sounds.
#[derive(Debug, Clone, Copy, Default)]
struct Milestones {
    half: bool,
    one_minute: bool,
}

/// Core countdown engine.
pub struct TimerEngine<C: Clock = SystemClock> {
    clock: C,
    preferences: Box<dyn PreferenceSource>,
    notifier: CompletionNotifier,
    total_ms: u64,
    /// Cached projection while running; free-standing while stopped.
    remaining_ms: i64,
    /// Absolute end of the current cycle. `Some` exactly while running.
    target_end_ms: Option<i64>,
    repeat: bool,
    completion_signaled: bool,
    last_cue_second: Option<i64>,
    milestones: Milestones,
}

impl TimerEngine<SystemClock> {
    /// Create an engine on the system clock with the default duration.
    pub fn new(notifier: CompletionNotifier) -> Self {
        Self::with_clock(SystemClock, notifier)
    }
}

impl<C: Clock> TimerEngine<C> {
    pub fn with_clock(clock: C, notifier: CompletionNotifier) -> Self {
        Self {
            clock,
            preferences: Box::new(TimerPreferences::default()),
            notifier,
            total_ms: DEFAULT_DURATION_MS,
            remaining_ms: signed(DEFAULT_DURATION_MS),
            target_end_ms: None,
            repeat: false,
            completion_signaled: false,
            last_cue_second: None,
            milestones: Milestones::default(),
        }
    }

    pub fn with_duration_ms(mut self, total_ms: u64) -> Self {
        self.total_ms = total_ms;
        self.remaining_ms = signed(total_ms);
        self
    }

    pub fn with_repeat(mut self, repeat: bool) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn with_preferences(mut self, preferences: impl PreferenceSource + 'static) -> Self {
        self.preferences = Box::new(preferences);
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn is_running(&self) -> bool {
        self.target_end_ms.is_some()
    }

    pub fn total_ms(&self) -> u64 {
        self.total_ms
    }

    /// Remaining time. While running this is projected from the end
    /// instant, not read from the value cached by the last tick.
    pub fn remaining_ms(&self) -> i64 {
        match self.target_end_ms {
            Some(target) => {
                let left = target.saturating_sub(self.clock.now_ms());
                if left < 0 && !self.preferences.preferences().count_up_after_end {
                    0
                } else {
                    left
                }
            }
            None => self.remaining_ms,
        }
    }

    pub fn repeat(&self) -> bool {
        self.repeat
    }

    pub fn preferences(&self) -> TimerPreferences {
        self.preferences.preferences()
    }

    pub fn state(&self) -> TimerState {
        if self.is_running() {
            if self.remaining_ms < 0 {
                TimerState::Overtime
            } else {
                TimerState::Running
            }
        } else if self.remaining_ms == signed(self.total_ms) {
            TimerState::Idle
        } else if self.remaining_ms <= 0 && self.completion_signaled {
            TimerState::Completed
        } else {
            TimerState::Paused
        }
    }

    pub fn display(&self) -> DisplayTime {
        DisplayTime::from_remaining_ms(self.remaining_ms())
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state(),
            remaining_ms: self.remaining_ms(),
            total_ms: self.total_ms,
            repeat: self.repeat,
            display: self.display().to_string(),
            at: self.now(),
        }
    }

    /// Whether a custom sound is still playing.
    pub fn is_playing_sound(&mut self) -> bool {
        self.notifier.has_active_playback()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start or resume from wherever the remaining time sits. Starting a
    /// cycle that already ran out ends it again on the next tick.
    pub fn start(&mut self) -> Option<Event> {
        if self.total_ms == 0 || self.is_running() {
            return None;
        }
        let total = signed(self.total_ms);
        let fresh = self.remaining_ms == total;
        let run_ms = if fresh { total } else { self.remaining_ms };
        if fresh {
            self.begin_cycle();
        }

        let now = self.clock.now_ms();
        self.target_end_ms = Some(now.saturating_add(run_ms));
        self.remaining_ms = run_ms;
        self.completion_signaled = false;
        tracing::debug!(remaining_ms = run_ms, total_ms = self.total_ms, "timer started");
        Some(Event::TimerStarted {
            remaining_ms: run_ms,
            total_ms: self.total_ms,
            at: timestamp(now),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        let target = self.target_end_ms.take()?;
        let now = self.clock.now_ms();
        self.remaining_ms = target.saturating_sub(now).max(0);
        self.notifier.stop_active();
        tracing::debug!(remaining_ms = self.remaining_ms, "timer paused");
        Some(Event::TimerPaused {
            remaining_ms: self.remaining_ms,
            at: timestamp(now),
        })
    }

    pub fn toggle(&mut self) -> Option<Event> {
        if self.is_running() {
            self.pause()
        } else {
            self.start()
        }
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.target_end_ms = None;
        self.remaining_ms = signed(self.total_ms);
        self.completion_signaled = false;
        self.begin_cycle();
        self.notifier.stop_active();
        Some(Event::TimerReset {
            total_ms: self.total_ms,
            at: self.now(),
        })
    }

    /// Replace the duration. Editing the duration always stops the run.
    pub fn set_custom_duration(&mut self, minutes: u64, seconds: u64) -> Option<Event> {
        let next = minutes
            .saturating_mul(60_000)
            .saturating_add(seconds.min(59) * 1000);
        self.total_ms = next;
        self.remaining_ms = signed(next);
        self.target_end_ms = None;
        self.begin_cycle();
        Some(Event::DurationChanged {
            total_ms: next,
            remaining_ms: self.remaining_ms,
            running: false,
            at: self.now(),
        })
    }

    /// Parse free-text input and apply it as the new duration.
    ///
    /// # Errors
    /// Returns the parse error and leaves the engine untouched.
    pub fn apply_time_input(&mut self, raw: &str) -> Result<Option<Event>, TimeInputError> {
        let ms = parse_time_input(raw)?;
        Ok(self.set_custom_duration(ms / 60_000, (ms % 60_000) / 1000))
    }

    /// Nudge the duration with the quantized rounding policy. A running
    /// cycle keeps its elapsed progress.
    pub fn adjust_by(&mut self, delta_ms: i64) -> Option<Event> {
        let old_total = self.total_ms;
        let new_total = adjusted_total_ms(old_total, delta_ms);
        self.total_ms = new_total;

        let now = self.clock.now_ms();
        match self.target_end_ms {
            None => self.remaining_ms = signed(new_total),
            Some(target) => {
                let shift = signed(new_total).saturating_sub(signed(old_total));
                // Remaining time never exceeds the new total.
                let latest = now.saturating_add(signed(new_total));
                let shifted = target.saturating_add(shift).min(latest);
                self.target_end_ms = Some(shifted);
                self.remaining_ms = shifted.saturating_sub(now).max(0);
            }
        }

        Some(Event::DurationChanged {
            total_ms: new_total,
            remaining_ms: self.remaining_ms,
            running: self.is_running(),
            at: timestamp(now),
        })
    }

    pub fn set_repeat(&mut self, repeat: bool) -> Option<Event> {
        if self.repeat == repeat {
            return None;
        }
        self.repeat = repeat;
        Some(Event::RepeatChanged {
            repeat,
            at: self.now(),
        })
    }

    /// Call periodically while running. Returns the events of this tick in
    /// the order their side effects fired.
    pub fn tick(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        let Some(target) = self.target_end_ms else {
            return events;
        };
        let now = self.clock.now_ms();
        let at = timestamp(now);
        let prefs = self.preferences.preferences();
        let ms_left = target.saturating_sub(now);

        let seconds_left = whole_seconds_left(ms_left);
        if prefs.sound_last10
            && (1..=CUE_WINDOW_SECS).contains(&seconds_left)
            && self.last_cue_second != Some(seconds_left)
        {
            self.notifier.countdown_cue();
            self.last_cue_second = Some(seconds_left);
            events.push(Event::CountdownCue { seconds_left, at });
        }

        if prefs.sound_milestones && ms_left > 0 {
            self.check_milestones(ms_left, at, &mut events);
        }

        if ms_left > 0 {
            self.remaining_ms = ms_left;
            return events;
        }

        if !self.completion_signaled {
            self.notifier.notify_done(&prefs);
            self.completion_signaled = true;
            tracing::info!(total_ms = self.total_ms, "countdown completed");
            events.push(Event::TimerCompleted {
                total_ms: self.total_ms,
                at,
            });
        }

        if self.repeat && self.total_ms > 0 {
            let total = signed(self.total_ms);
            self.target_end_ms = Some(now.saturating_add(total));
            self.remaining_ms = total;
            self.completion_signaled = false;
            self.begin_cycle();
            events.push(Event::CycleRearmed {
                total_ms: self.total_ms,
                at,
            });
        } else if prefs.count_up_after_end {
            self.remaining_ms = ms_left;
        } else {
            self.target_end_ms = None;
            self.remaining_ms = 0;
        }
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn check_milestones(&mut self, ms_left: i64, at: DateTime<Utc>, events: &mut Vec<Event>) {
        let total = signed(self.total_ms);
        if !self.milestones.half && total > 0 && ms_left.saturating_mul(2) <= total {
            self.milestones.half = true;
            if self.notifier.milestone(SoundKey::Half) {
                events.push(Event::MilestoneReached {
                    sound: SoundKey::Half,
                    at,
                });
            }
        }
        if !self.milestones.one_minute && total > ONE_MINUTE_MS && ms_left <= ONE_MINUTE_MS {
            self.milestones.one_minute = true;
            if self.notifier.milestone(SoundKey::OneMin) {
                events.push(Event::MilestoneReached {
                    sound: SoundKey::OneMin,
                    at,
                });
            }
        }
    }

    /// Clear the guards that belong to a single cycle.
    fn begin_cycle(&mut self) {
        self.last_cue_second = None;
        self.milestones = Milestones::default();
    }

    fn now(&self) -> DateTime<Utc> {
        timestamp(self.clock.now_ms())
    }
}

impl<C: Clock> std::fmt::Debug for TimerEngine<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerEngine")
            .field("total_ms", &self.total_ms)
            .field("remaining_ms", &self.remaining_ms)
            .field("target_end_ms", &self.target_end_ms)
            .field("repeat", &self.repeat)
            .field("completion_signaled", &self.completion_signaled)
            .finish_non_exhaustive()
    }
}

fn signed(ms: u64) -> i64 {
    i64::try_from(ms).unwrap_or(i64::MAX)
}

fn timestamp(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}

/// Whole seconds left, rounded up; zero or less once the cycle is over.
fn whole_seconds_left(ms_left: i64) -> i64 {
    if ms_left <= 0 {
        0
    } else {
        ms_left.saturating_add(999) / 1000
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::notify::testing::{FakeAudio, FakeHost, FakeSounds, Recorder};
    use crate::notify::NotificationPermission;

    const T0: i64 = 1_700_000_000_000;

    fn engine(clock: &ManualClock) -> TimerEngine<ManualClock> {
        TimerEngine::with_clock(clock.clone(), CompletionNotifier::silent())
    }

    fn recording_engine(
        clock: &ManualClock,
        log: &Recorder,
        sounds: FakeSounds,
        prefs: TimerPreferences,
    ) -> TimerEngine<ManualClock> {
        let notifier = CompletionNotifier::new(
            sounds,
            FakeAudio { log: log.clone(), fail: false },
            FakeHost {
                log: log.clone(),
                hidden: false,
                permission: NotificationPermission::Denied,
                fail_notifications: false,
            },
        );
        TimerEngine::with_clock(clock.clone(), notifier).with_preferences(prefs)
    }

    fn run_for(engine: &mut TimerEngine<ManualClock>, clock: &ManualClock, ms: i64) -> Vec<Event> {
        let mut events = Vec::new();
        for _ in 0..ms / 200 {
            clock.advance(200);
            events.extend(engine.tick());
        }
        events
    }

    #[test]
    fn start_pause_resume() {
        let clock = ManualClock::new(T0);
        let mut e = engine(&clock);
        assert_eq!(e.state(), TimerState::Idle);

        assert!(e.start().is_some());
        assert_eq!(e.state(), TimerState::Running);

        clock.advance(1_000);
        assert!(e.pause().is_some());
        assert_eq!(e.state(), TimerState::Paused);
        assert_eq!(e.remaining_ms(), DEFAULT_DURATION_MS as i64 - 1_000);

        clock.advance(60_000);
        assert!(e.start().is_some());
        clock.advance(500);
        assert_eq!(e.remaining_ms(), DEFAULT_DURATION_MS as i64 - 1_500);
    }

    #[test]
    fn start_is_noop_at_zero_duration() {
        let clock = ManualClock::new(T0);
        let mut e = engine(&clock).with_duration_ms(0);
        assert!(e.start().is_none());
        assert!(!e.is_running());
    }

    #[test]
    fn pause_twice_is_same_as_once() {
        let clock = ManualClock::new(T0);
        let mut e = engine(&clock);
        e.start();
        clock.advance(2_000);
        assert!(e.pause().is_some());
        let after_first = (e.remaining_ms(), e.state());
        clock.advance(2_000);
        assert!(e.pause().is_none());
        assert_eq!((e.remaining_ms(), e.state()), after_first);
    }

    #[test]
    fn toggle_alternates() {
        let clock = ManualClock::new(T0);
        let mut e = engine(&clock);
        assert!(matches!(e.toggle(), Some(Event::TimerStarted { .. })));
        assert!(matches!(e.toggle(), Some(Event::TimerPaused { .. })));
    }

    #[test]
    fn custom_duration_stops_the_run_and_clamps_seconds() {
        let clock = ManualClock::new(T0);
        let mut e = engine(&clock);
        e.start();
        e.set_custom_duration(2, 75);
        assert!(!e.is_running());
        assert_eq!(e.total_ms(), 179_000);
        assert_eq!(e.remaining_ms(), 179_000);
    }

    #[test]
    fn invalid_input_leaves_state_untouched() {
        let clock = ManualClock::new(T0);
        let mut e = engine(&clock);
        e.start();
        assert!(e.apply_time_input("1:75").is_err());
        assert!(e.is_running());
        assert_eq!(e.total_ms(), DEFAULT_DURATION_MS);

        assert!(e.apply_time_input("1:30").unwrap().is_some());
        assert_eq!(e.total_ms(), 90_000);
        assert!(!e.is_running());
    }

    #[test]
    fn adjust_while_paused_mirrors_total() {
        let clock = ManualClock::new(T0);
        let mut e = engine(&clock).with_duration_ms(90_000);
        e.adjust_by(60_000);
        assert_eq!(e.total_ms(), 180_000);
        assert_eq!(e.remaining_ms(), 180_000);
    }

    #[test]
    fn adjust_while_running_keeps_elapsed_progress() {
        let clock = ManualClock::new(T0);
        let mut e = engine(&clock).with_duration_ms(300_000);
        e.start();
        clock.advance(30_000);
        e.adjust_by(60_000);
        assert_eq!(e.total_ms(), 360_000);
        assert_eq!(e.remaining_ms(), 330_000);
        assert!(e.is_running());

        e.adjust_by(-300_000);
        assert_eq!(e.total_ms(), 60_000);
        assert_eq!(e.remaining_ms(), 30_000);
    }

    #[test]
    fn adjust_below_elapsed_floors_remaining_at_zero() {
        let clock = ManualClock::new(T0);
        let mut e = engine(&clock).with_duration_ms(300_000);
        e.start();
        clock.advance(240_000);
        e.adjust_by(-120_000);
        assert_eq!(e.total_ms(), 180_000);
        assert_eq!(e.remaining_ms(), 0);
        let events = e.tick();
        assert!(events.iter().any(|ev| matches!(ev, Event::TimerCompleted { .. })));
        assert_eq!(e.state(), TimerState::Completed);
    }

    #[test]
    fn runs_to_completion_and_halts() {
        let clock = ManualClock::new(T0);
        let log = Recorder::default();
        let mut e = recording_engine(&clock, &log, FakeSounds::default(), TimerPreferences::default());
        e.set_custom_duration(0, 5);
        e.start();
        let events = run_for(&mut e, &clock, 6_000);

        assert!(!e.is_running());
        assert_eq!(e.remaining_ms(), 0);
        assert_eq!(e.state(), TimerState::Completed);
        let completions = events.iter().filter(|ev| ev.kind() == "timer_completed").count();
        assert_eq!(completions, 1);
        assert_eq!(log.count("toast:"), 1);
        assert_eq!(log.count("tones:880"), 1);
    }

    #[test]
    fn start_after_completion_signals_again_and_halts() {
        let clock = ManualClock::new(T0);
        let log = Recorder::default();
        let mut e = recording_engine(&clock, &log, FakeSounds::default(), TimerPreferences::default())
            .with_duration_ms(1_000);
        e.start();
        run_for(&mut e, &clock, 1_200);
        assert_eq!(e.state(), TimerState::Completed);
        assert_eq!(log.count("toast:"), 1);

        assert!(matches!(
            e.start(),
            Some(Event::TimerStarted { remaining_ms: 0, .. })
        ));
        let kinds: Vec<&str> = run_for(&mut e, &clock, 200).iter().map(Event::kind).collect();
        assert_eq!(kinds, vec!["timer_completed"]);
        assert!(!e.is_running());
        assert_eq!(e.remaining_ms(), 0);
        assert_eq!(log.count("toast:"), 2);

        // Reset restores a full cycle.
        e.reset();
        assert!(matches!(
            e.start(),
            Some(Event::TimerStarted { remaining_ms: 1_000, .. })
        ));
    }

    #[test]
    fn pause_stops_overtime_end_sound() {
        let clock = ManualClock::new(T0);
        let log = Recorder::default();
        let prefs = TimerPreferences {
            count_up_after_end: true,
            ..TimerPreferences::default()
        };
        let mut e = recording_engine(&clock, &log, FakeSounds::with(&[SoundKey::End]), prefs)
            .with_duration_ms(1_000);
        e.start();
        run_for(&mut e, &clock, 1_400);
        assert_eq!(e.state(), TimerState::Overtime);
        assert!(e.is_playing_sound());

        assert!(e.pause().is_some());
        assert_eq!(log.count("stop:end"), 1);
        assert!(!e.is_playing_sound());
        assert_eq!(e.remaining_ms(), 0);
    }

    #[test]
    fn repeat_rearms_and_signals_once_per_boundary() {
        let clock = ManualClock::new(T0);
        let log = Recorder::default();
        let mut e = recording_engine(&clock, &log, FakeSounds::default(), TimerPreferences::default())
            .with_duration_ms(2_000)
            .with_repeat(true);
        e.start();
        clock.advance(2_000);
        let events = e.tick();
        let kinds: Vec<&str> = events.iter().map(Event::kind).collect();
        assert_eq!(kinds, vec!["timer_completed", "cycle_rearmed"]);
        assert!(e.is_running());
        assert_eq!(e.remaining_ms(), 2_000);

        clock.advance(200);
        assert!(e.tick().is_empty());
        assert_eq!(log.count("toast:"), 1);
    }

    #[test]
    fn count_up_goes_negative_and_keeps_running() {
        let clock = ManualClock::new(T0);
        let prefs = TimerPreferences {
            count_up_after_end: true,
            ..TimerPreferences::default()
        };
        let mut e = engine(&clock).with_duration_ms(1_000).with_preferences(prefs);
        e.start();
        run_for(&mut e, &clock, 1_000);
        let mut previous = e.remaining_ms();
        for _ in 0..5 {
            clock.advance(200);
            assert!(e.tick().is_empty());
            assert!(e.is_running());
            assert!(e.remaining_ms() < previous);
            previous = e.remaining_ms();
        }
        assert_eq!(e.state(), TimerState::Overtime);
        assert_eq!(e.display().to_string(), "+0:01");
    }

    #[test]
    fn last_ten_seconds_cue_fires_once_per_second() {
        let clock = ManualClock::new(T0);
        let log = Recorder::default();
        let prefs = TimerPreferences {
            sound_last10: true,
            sound_end: false,
            ..TimerPreferences::default()
        };
        let mut e = recording_engine(&clock, &log, FakeSounds::default(), prefs).with_duration_ms(12_000);
        e.start();
        let events = run_for(&mut e, &clock, 12_000);
        let cues: Vec<i64> = events
            .iter()
            .filter_map(|ev| match ev {
                Event::CountdownCue { seconds_left, .. } => Some(*seconds_left),
                _ => None,
            })
            .collect();
        assert_eq!(cues, (1..=10).rev().collect::<Vec<_>>());
        assert_eq!(log.count("tones:700"), 10);
    }

    #[test]
    fn cue_precedes_completion_within_a_tick() {
        let clock = ManualClock::new(T0);
        let log = Recorder::default();
        let prefs = TimerPreferences {
            sound_last10: true,
            ..TimerPreferences::default()
        };
        let mut e = recording_engine(&clock, &log, FakeSounds::default(), prefs).with_duration_ms(60_000);
        e.start();
        clock.advance(59_500);
        let kinds: Vec<&str> = e.tick().iter().map(Event::kind).collect();
        assert_eq!(kinds, vec!["countdown_cue"]);
        clock.advance(500);
        let kinds: Vec<&str> = e.tick().iter().map(Event::kind).collect();
        assert_eq!(kinds, vec!["timer_completed"]);
    }

    #[test]
    fn milestones_play_custom_sounds_once() {
        let clock = ManualClock::new(T0);
        let log = Recorder::default();
        let mut e = recording_engine(
            &clock,
            &log,
            FakeSounds::with(&[SoundKey::Half, SoundKey::OneMin]),
            TimerPreferences::default(),
        )
        .with_duration_ms(180_000);
        e.start();
        let events = run_for(&mut e, &clock, 150_000);
        let sounds: Vec<SoundKey> = events
            .iter()
            .filter_map(|ev| match ev {
                Event::MilestoneReached { sound, .. } => Some(*sound),
                _ => None,
            })
            .collect();
        assert_eq!(sounds, vec![SoundKey::Half, SoundKey::OneMin]);
        assert_eq!(log.entries(), vec!["play:half", "stop:half", "play:oneMin"]);
    }

    #[test]
    fn reset_stops_audio_and_restores_duration() {
        let clock = ManualClock::new(T0);
        let log = Recorder::default();
        let mut e = recording_engine(
            &clock,
            &log,
            FakeSounds::with(&[SoundKey::End]),
            TimerPreferences::default(),
        )
        .with_duration_ms(1_000);
        e.start();
        run_for(&mut e, &clock, 1_000);
        assert!(e.is_playing_sound());
        e.reset();
        assert!(!e.is_playing_sound());
        assert_eq!(e.state(), TimerState::Idle);
        assert_eq!(e.remaining_ms(), 1_000);
        assert_eq!(log.count("stop:end"), 1);
    }

    #[test]
    fn set_repeat_reports_only_changes() {
        let clock = ManualClock::new(T0);
        let mut e = engine(&clock);
        assert!(e.set_repeat(false).is_none());
        assert!(e.set_repeat(true).is_some());
        assert!(e.repeat());
    }

    #[test]
    fn snapshot_returns_valid_event() {
        let clock = ManualClock::new(T0);
        let e = engine(&clock);
        match e.snapshot() {
            Event::StateSnapshot {
                state,
                remaining_ms,
                display,
                ..
            } => {
                assert_eq!(state, TimerState::Idle);
                assert_eq!(remaining_ms, 300_000);
                assert_eq!(display, "5:00");
            }
            other => panic!("Expected StateSnapshot, got {other:?}"),
        }
    }
}
