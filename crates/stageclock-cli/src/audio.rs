//! Audio backends for the terminal.
//!
//! Without the `rodio` feature, tones are a terminal bell and sound files
//! are handed to an external player process. With it, both go through the
//! default output device.

use std::io::{IsTerminal, Write};
use std::process::{Child, Command, Stdio};

use stageclock_core::error::AudioError;
use stageclock_core::{AudioOutput, AudioResource, PlaybackHandle, Tone};

#[cfg(target_os = "macos")]
const PLAYERS: &[&str] = &["afplay"];
#[cfg(not(target_os = "macos"))]
const PLAYERS: &[&str] = &["paplay", "aplay"];

/// Whichever backend could be opened.
pub enum Audio {
    System(SystemAudio),
    #[cfg(feature = "rodio")]
    Rodio(rodio_backend::RodioAudio),
}

impl Audio {
    pub fn detect() -> Self {
        #[cfg(feature = "rodio")]
        {
            match rodio_backend::RodioAudio::open() {
                Ok(audio) => return Self::Rodio(audio),
                Err(e) => tracing::warn!(error = %e, "falling back to system audio"),
            }
        }
        Self::System(SystemAudio)
    }
}

impl AudioOutput for Audio {
    fn play_tones(&self, tones: &[Tone]) -> Result<(), AudioError> {
        match self {
            Self::System(audio) => audio.play_tones(tones),
            #[cfg(feature = "rodio")]
            Self::Rodio(audio) => audio.play_tones(tones),
        }
    }

    fn play_resource(&self, resource: &AudioResource) -> Result<Box<dyn PlaybackHandle>, AudioError> {
        match self {
            Self::System(audio) => audio.play_resource(resource),
            #[cfg(feature = "rodio")]
            Self::Rodio(audio) => audio.play_resource(resource),
        }
    }
}

/// Terminal bell plus an external player.
pub struct SystemAudio;

impl AudioOutput for SystemAudio {
    fn play_tones(&self, tones: &[Tone]) -> Result<(), AudioError> {
        if tones.is_empty() {
            return Ok(());
        }
        let mut stderr = std::io::stderr();
        if !stderr.is_terminal() {
            return Err(AudioError::Unavailable("stderr is not a terminal".into()));
        }
        stderr.write_all(b"\x07")?;
        stderr.flush()?;
        Ok(())
    }

    fn play_resource(&self, resource: &AudioResource) -> Result<Box<dyn PlaybackHandle>, AudioError> {
        for program in PLAYERS {
            let spawned = Command::new(program)
                .arg(&resource.path)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn();
            match spawned {
                Ok(child) => {
                    tracing::debug!(player = program, sound = %resource.key, "playing sound");
                    return Ok(Box::new(ChildPlayback { child }));
                }
                Err(e) => tracing::debug!(player = program, error = %e, "player unavailable"),
            }
        }
        Err(AudioError::Unavailable(format!(
            "no audio player found (tried {})",
            PLAYERS.join(", ")
        )))
    }
}

/// A running external player process.
struct ChildPlayback {
    child: Child,
}

impl PlaybackHandle for ChildPlayback {
    fn stop(&mut self) {
        if let Err(e) = self.child.kill() {
            tracing::debug!(error = %e, "player already exited");
        }
        // Reap so the player does not linger as a zombie.
        let _ = self.child.wait();
    }

    fn is_finished(&mut self) -> bool {
        !matches!(self.child.try_wait(), Ok(None))
    }
}

impl Drop for ChildPlayback {
    fn drop(&mut self) {
        if !self.is_finished() {
            self.stop();
        }
    }
}


#[cfg(feature = "rodio")]
mod rodio_backend {
    use std::io::Cursor;
    use std::time::Duration;

    use rodio::source::{SineWave, Source};
    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
    use stageclock_core::error::AudioError;
    use stageclock_core::{AudioOutput, AudioResource, PlaybackHandle, Tone};

    const TONE_VOLUME: f32 = 0.2;

    pub struct RodioAudio {
        // Dropping the stream silences every sink.
        _stream: OutputStream,
        handle: OutputStreamHandle,
    }

    impl RodioAudio {
        pub fn open() -> Result<Self, AudioError> {
            let (stream, handle) =
                OutputStream::try_default().map_err(|e| AudioError::Unavailable(e.to_string()))?;
            Ok(Self {
                _stream: stream,
                handle,
            })
        }
    }

    impl AudioOutput for RodioAudio {
        fn play_tones(&self, tones: &[Tone]) -> Result<(), AudioError> {
            for tone in tones {
                let source = SineWave::new(tone.frequency_hz)
                    .take_duration(Duration::from_millis(tone.duration_ms))
                    .amplify(TONE_VOLUME)
                    .delay(Duration::from_millis(tone.offset_ms));
                self.handle
                    .play_raw(source)
                    .map_err(|e| AudioError::Unavailable(e.to_string()))?;
            }
            Ok(())
        }

        fn play_resource(&self, resource: &AudioResource) -> Result<Box<dyn PlaybackHandle>, AudioError> {
            let failed = |message: String| AudioError::PlaybackFailed {
                resource: resource.path.display().to_string(),
                message,
            };
            let source = Decoder::new(Cursor::new(resource.bytes.clone()))
                .map_err(|e| failed(e.to_string()))?;
            let sink = Sink::try_new(&self.handle).map_err(|e| failed(e.to_string()))?;
            sink.append(source);
            Ok(Box::new(SinkPlayback { sink }))
        }
    }

    struct SinkPlayback {
        sink: Sink,
    }

    impl PlaybackHandle for SinkPlayback {
        fn stop(&mut self) {
            self.sink.stop();
        }

        fn is_finished(&mut self) -> bool {
            self.sink.empty()
        }
    }
}
