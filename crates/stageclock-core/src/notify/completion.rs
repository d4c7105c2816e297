//! Completion notification: sound, system notification, toast.
//!
//! Everything here is best effort. A failing collaborator is logged and
//! skipped; it never reaches the engine.

use super::{
    AudioOutput, AudioResource, AudioResourceLookup, HeadlessHost, HostSurface, MuteAudio,
    NoSounds, NotificationPermission, PlaybackHandle, SoundKey, COMPLETION_CHIME, COUNTDOWN_CUE,
};
use crate::timer::TimerPreferences;

pub const DONE_TITLE: &str = "Time is up!";
pub const DONE_BODY: &str = "Press R to reset, or start again.";

/// Fires the end-of-cycle side effects and owns the one playback handle.
pub struct CompletionNotifier {
    sounds: Box<dyn AudioResourceLookup>,
    audio: Box<dyn AudioOutput>,
    host: Box<dyn HostSurface>,
    /// At most one custom sound plays at a time.
    active: Option<Box<dyn PlaybackHandle>>,
}

impl CompletionNotifier {
    pub fn new(
        sounds: impl AudioResourceLookup + 'static,
        audio: impl AudioOutput + 'static,
        host: impl HostSurface + 'static,
    ) -> Self {
        Self {
            sounds: Box::new(sounds),
            audio: Box::new(audio),
            host: Box::new(host),
            active: None,
        }
    }

    /// No sounds, no notifications, no toasts.
    pub fn silent() -> Self {
        Self::new(NoSounds, MuteAudio, HeadlessHost)
    }

    /// Run the completion side effects in order: sound, system
    /// notification (only while hidden), toast.
    pub fn notify_done(&mut self, prefs: &TimerPreferences) {
        if prefs.sound_end {
            match self.sounds.lookup(SoundKey::End) {
                Some(resource) => self.play_exclusive(&resource),
                None => {
                    if let Err(e) = self.audio.play_tones(&COMPLETION_CHIME) {
                        tracing::debug!(error = %e, "completion chime failed");
                    }
                }
            }
        }

        if prefs.notify_on_end
            && self.host.is_hidden()
            && self.host.notification_permission() == NotificationPermission::Granted
        {
            if let Err(e) = self.host.show_system_notification(DONE_TITLE, DONE_BODY) {
                tracing::debug!(error = %e, "system notification failed");
            }
        }

        self.host.show_toast(DONE_TITLE, DONE_BODY);
    }

    /// Short beep for the last-ten-seconds countdown.
    pub fn countdown_cue(&mut self) {
        if let Err(e) = self.audio.play_tones(&[COUNTDOWN_CUE]) {
            tracing::debug!(error = %e, "countdown cue failed");
        }
    }

    /// Play the custom sound for a milestone. Returns false when none is
    /// configured (milestones have no synthesized fallback).
    pub fn milestone(&mut self, key: SoundKey) -> bool {
        match self.sounds.lookup(key) {
            Some(resource) => {
                self.play_exclusive(&resource);
                true
            }
            None => false,
        }
    }

    /// Stop and rewind whatever custom sound is playing.
    pub fn stop_active(&mut self) {
        if let Some(mut handle) = self.active.take() {
            handle.stop();
        }
    }

    pub fn has_active_playback(&mut self) -> bool {
        if self.active.as_mut().is_some_and(|h| h.is_finished()) {
            self.active = None;
        }
        self.active.is_some()
    }

    fn play_exclusive(&mut self, resource: &AudioResource) {
        self.stop_active();
        match self.audio.play_resource(resource) {
            Ok(handle) => self.active = Some(handle),
            Err(e) => {
                tracing::warn!(sound = %resource.key, error = %e, "custom sound failed to play");
            }
        }
    }
}

impl std::fmt::Debug for CompletionNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionNotifier")
            .field("active", &self.active.is_some())
            .finish_non_exhaustive()
    }
}
