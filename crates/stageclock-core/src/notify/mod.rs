//! Completion side effects and the collaborators they run through.
//!
//! The engine only knows these traits. Hosts plug in real audio and
//! notification backends; tests plug in recorders.

mod completion;
#[cfg(test)]
pub(crate) mod testing;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{AudioError, NotifyError};

pub use completion::{CompletionNotifier, DONE_BODY, DONE_TITLE};

/// Logical name of a user-supplied sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundKey {
    #[serde(rename = "end")]
    End,
    #[serde(rename = "half")]
    Half,
    #[serde(rename = "oneMin")]
    OneMin,
}

impl SoundKey {
    pub const ALL: [SoundKey; 3] = [SoundKey::End, SoundKey::Half, SoundKey::OneMin];

    pub fn as_str(self) -> &'static str {
        match self {
            SoundKey::End => "end",
            SoundKey::Half => "half",
            SoundKey::OneMin => "oneMin",
        }
    }
}

impl fmt::Display for SoundKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SoundKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SoundKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown sound key '{s}' (expected end, half or oneMin)"))
    }
}

/// A loaded, playable sound.
#[derive(Debug, Clone)]
pub struct AudioResource {
    pub key: SoundKey,
    pub path: PathBuf,
    pub bytes: Arc<[u8]>,
}

/// One synthesized sine pulse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency_hz: f32,
    pub duration_ms: u64,
    /// Delay from the start of the sequence.
    pub offset_ms: u64,
}

/// Three-pulse chime used when no custom `end` sound exists.
pub const COMPLETION_CHIME: [Tone; 3] = [
    Tone { frequency_hz: 880.0, duration_ms: 200, offset_ms: 0 },
    Tone { frequency_hz: 660.0, duration_ms: 200, offset_ms: 250 },
    Tone { frequency_hz: 990.0, duration_ms: 200, offset_ms: 500 },
];

/// Beep for each of the last ten seconds.
pub const COUNTDOWN_CUE: Tone = Tone { frequency_hz: 700.0, duration_ms: 60, offset_ms: 0 };

/// Resolves a logical sound key to a playable resource.
///
/// Implementations must answer without blocking; a resource that is still
/// loading is reported as absent.
pub trait AudioResourceLookup {
    fn lookup(&self, key: SoundKey) -> Option<AudioResource>;
}

/// A sound that is currently playing.
pub trait PlaybackHandle {
    /// Stop playback and rewind to the start.
    fn stop(&mut self);
    fn is_finished(&mut self) -> bool;
}

pub trait AudioOutput {
    fn play_tones(&self, tones: &[Tone]) -> Result<(), AudioError>;
    fn play_resource(&self, resource: &AudioResource) -> Result<Box<dyn PlaybackHandle>, AudioError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPermission {
    Granted,
    Denied,
}

/// The surface hosting the clock: visibility, system notifications, toasts.
pub trait HostSurface {
    /// True when the clock is not in front of the user.
    fn is_hidden(&self) -> bool;
    fn notification_permission(&self) -> NotificationPermission;
    fn show_system_notification(&self, title: &str, body: &str) -> Result<(), NotifyError>;
    /// In-app banner. Always shown, so it cannot fail.
    fn show_toast(&self, title: &str, body: &str);
}

/// Lookup with no custom sounds configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSounds;

impl AudioResourceLookup for NoSounds {
    fn lookup(&self, _key: SoundKey) -> Option<AudioResource> {
        None
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MuteAudio;

impl AudioOutput for MuteAudio {
    fn play_tones(&self, _tones: &[Tone]) -> Result<(), AudioError> {
        Ok(())
    }

    fn play_resource(&self, resource: &AudioResource) -> Result<Box<dyn PlaybackHandle>, AudioError> {
        Err(AudioError::Unavailable(format!(
            "muted output cannot play {}",
            resource.path.display()
        )))
    }
}

/// Host that is always visible, has no notifications and drops toasts.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessHost;

impl HostSurface for HeadlessHost {
    fn is_hidden(&self) -> bool {
        false
    }

    fn notification_permission(&self) -> NotificationPermission {
        NotificationPermission::Denied
    }

    fn show_system_notification(&self, _title: &str, _body: &str) -> Result<(), NotifyError> {
        Err(NotifyError::PermissionDenied)
    }

    fn show_toast(&self, _title: &str, _body: &str) {}
}
