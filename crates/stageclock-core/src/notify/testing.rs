//! Recording collaborators for unit tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use super::{
    AudioOutput, AudioResource, AudioResourceLookup, HostSurface, NotificationPermission,
    PlaybackHandle, SoundKey, Tone,
};
use crate::error::{AudioError, NotifyError};

/// Shared, ordered log of every side effect.
#[derive(Debug, Clone, Default)]
pub struct Recorder(Rc<RefCell<Vec<String>>>);

impl Recorder {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.0.borrow().iter().filter(|e| e.starts_with(prefix)).count()
    }
}

pub fn resource(key: SoundKey) -> AudioResource {
    AudioResource {
        key,
        path: PathBuf::from(format!("/sounds/{key}.ogg")),
        bytes: Arc::from(vec![0u8; 4]),
    }
}

#[derive(Default)]
pub struct FakeSounds(pub HashMap<SoundKey, AudioResource>);

impl FakeSounds {
    pub fn with(keys: &[SoundKey]) -> Self {
        Self(keys.iter().map(|k| (*k, resource(*k))).collect())
    }
}

impl AudioResourceLookup for FakeSounds {
    fn lookup(&self, key: SoundKey) -> Option<AudioResource> {
        self.0.get(&key).cloned()
    }
}

pub struct FakeAudio {
    pub log: Recorder,
    pub fail: bool,
}

impl AudioOutput for FakeAudio {
    fn play_tones(&self, tones: &[Tone]) -> Result<(), AudioError> {
        if self.fail {
            return Err(AudioError::Unavailable("no device".into()));
        }
        let freqs: Vec<String> = tones.iter().map(|t| format!("{}", t.frequency_hz)).collect();
        self.log.push(format!("tones:{}", freqs.join(",")));
        Ok(())
    }

    fn play_resource(&self, resource: &AudioResource) -> Result<Box<dyn PlaybackHandle>, AudioError> {
        if self.fail {
            return Err(AudioError::PlaybackFailed {
                resource: resource.key.to_string(),
                message: "no device".into(),
            });
        }
        self.log.push(format!("play:{}", resource.key));
        Ok(Box::new(FakeHandle {
            key: resource.key,
            log: self.log.clone(),
        }))
    }
}

struct FakeHandle {
    key: SoundKey,
    log: Recorder,
}

impl PlaybackHandle for FakeHandle {
    fn stop(&mut self) {
        self.log.push(format!("stop:{}", self.key));
    }

    fn is_finished(&mut self) -> bool {
        false
    }
}

pub struct FakeHost {
    pub log: Recorder,
    pub hidden: bool,
    pub permission: NotificationPermission,
    pub fail_notifications: bool,
}

impl HostSurface for FakeHost {
    fn is_hidden(&self) -> bool {
        self.hidden
    }

    fn notification_permission(&self) -> NotificationPermission {
        self.permission
    }

    fn show_system_notification(&self, title: &str, _body: &str) -> Result<(), NotifyError> {
        if self.fail_notifications {
            return Err(NotifyError::ShowFailed("daemon gone".into()));
        }
        self.log.push(format!("system:{title}"));
        Ok(())
    }

    fn show_toast(&self, title: &str, _body: &str) {
        self.log.push(format!("toast:{title}"));
    }
}
