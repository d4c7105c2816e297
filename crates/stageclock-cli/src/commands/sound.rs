use std::path::PathBuf;
use std::time::Duration;

use clap::Subcommand;
use stageclock_core::notify::COMPLETION_CHIME;
use stageclock_core::{AudioOutput, AudioResourceLookup, Config, SoundKey, SoundLibrary};

use crate::audio::Audio;

/// Longest a `sound test` waits for playback to finish.
const TEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Subcommand)]
pub enum SoundAction {
    /// Use an audio file for a sound slot (end, half, oneMin)
    Set {
        key: SoundKey,
        path: PathBuf,
    },
    /// Remove a custom sound
    Clear {
        key: SoundKey,
    },
    /// Show configured sounds
    List,
    /// Play a sound slot once
    Test {
        key: SoundKey,
    },
}

pub async fn run(action: SoundAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SoundAction::Set { key, path } => {
            let path = std::fs::canonicalize(&path)
                .map_err(|e| format!("cannot use {}: {e}", path.display()))?;
            let mut config = Config::load()?;
            config.set_sound(key, &path);
            config.save()?;
            println!("{key}: {}", path.display());
        }
        SoundAction::Clear { key } => {
            let mut config = Config::load()?;
            if config.clear_sound(key) {
                config.save()?;
                println!("{key}: cleared");
            } else {
                println!("{key}: not set");
            }
        }
        SoundAction::List => {
            let config = Config::load()?;
            let sources = config.sound_sources();
            for key in SoundKey::ALL {
                match sources.iter().find(|(k, _)| *k == key) {
                    Some((_, path)) => println!("{key}\t{}", path.display()),
                    None if key == SoundKey::End => println!("{key}\t(built-in chime)"),
                    None => println!("{key}\t(none)"),
                }
            }
        }
        SoundAction::Test { key } => test(key).await?,
    }
    Ok(())
}

async fn test(key: SoundKey) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let audio = Audio::detect();
    let source = config.sound_sources().into_iter().find(|(k, _)| *k == key);

    let Some((_, path)) = source else {
        if key != SoundKey::End {
            return Err(format!("no sound configured for {key}").into());
        }
        audio.play_tones(&COMPLETION_CHIME)?;
        let span = COMPLETION_CHIME
            .iter()
            .map(|tone| tone.offset_ms + tone.duration_ms)
            .max()
            .unwrap_or(0);
        tokio::time::sleep(Duration::from_millis(span)).await;
        return Ok(());
    };

    let library = SoundLibrary::new();
    library.preload(vec![(key, path.clone())]).await;
    let resource = library
        .lookup(key)
        .ok_or_else(|| format!("could not read {}", path.display()))?;

    let mut handle = audio.play_resource(&resource)?;
    let deadline = tokio::time::Instant::now() + TEST_TIMEOUT;
    while !handle.is_finished() && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    handle.stop();
    Ok(())
}
