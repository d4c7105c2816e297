//! User-supplied sound files.
//!
//! Files are read in the background and cached by key. Lookups only touch
//! the cache, so the tick path never waits on disk; a sound that has not
//! finished loading simply reads as absent.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use crate::notify::{AudioResource, AudioResourceLookup, SoundKey};

#[derive(Debug, Clone, Default)]
pub struct SoundLibrary {
    cache: Arc<RwLock<HashMap<SoundKey, AudioResource>>>,
}

impl SoundLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every source into the cache. Unreadable files are skipped.
    /// Returns how many sounds were loaded.
    pub async fn preload(&self, sources: Vec<(SoundKey, PathBuf)>) -> usize {
        let mut loaded = 0;
        for (key, path) in sources {
            match tokio::fs::read(&path).await {
                Ok(bytes) => {
                    tracing::debug!(sound = %key, path = %path.display(), size = bytes.len(), "sound loaded");
                    self.insert(AudioResource {
                        key,
                        path,
                        bytes: Arc::from(bytes),
                    });
                    loaded += 1;
                }
                Err(e) => {
                    tracing::warn!(sound = %key, path = %path.display(), error = %e, "could not load sound");
                }
            }
        }
        loaded
    }

    pub fn insert(&self, resource: AudioResource) {
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(resource.key, resource);
        }
    }

    pub fn remove(&self, key: SoundKey) -> bool {
        self.cache
            .write()
            .map(|mut cache| cache.remove(&key).is_some())
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.cache.read().map(|cache| cache.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AudioResourceLookup for SoundLibrary {
    fn lookup(&self, key: SoundKey) -> Option<AudioResource> {
        self.cache.read().ok()?.get(&key).cloned()
    }
}
