//! Sound cues
//!
//! Playback sits behind a small trait so the app never assumes a specific
//! OS audio command. The production player synthesizes short sine cues on
//! a dedicated thread; failures are logged and never surface to the UI.

use std::sync::mpsc;
use std::time::Duration;

use rodio::source::{SineWave, Source};
use rodio::OutputStream;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Correct,
    Incorrect,
}

pub trait SoundPlayer: Send + Sync {
    fn play(&self, cue: SoundCue);
}

/// Player that does nothing; used when sound is disabled and in tests.
pub struct NullPlayer;

impl SoundPlayer for NullPlayer {
    fn play(&self, _cue: SoundCue) {}
}

/// Plays synthesized cues through the default output device. The rodio
/// output stream is not `Send`, so it lives on its own thread fed by a
/// channel; dropping the player closes the channel and ends the thread.
pub struct RodioPlayer {
    tx: mpsc::Sender<SoundCue>,
}

impl RodioPlayer {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel::<SoundCue>();
        std::thread::spawn(move || {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(out) => out,
                Err(err) => {
                    tracing::warn!("No audio output available, sound cues disabled: {}", err);
                    return;
                }
            };
            // Keep the stream alive for the lifetime of the thread.
            let _stream = stream;

            while let Ok(cue) = rx.recv() {
                let source = match cue {
                    SoundCue::Correct => SineWave::new(880.0)
                        .take_duration(Duration::from_millis(120))
                        .amplify(0.20),
                    SoundCue::Incorrect => SineWave::new(220.0)
                        .take_duration(Duration::from_millis(180))
                        .amplify(0.20),
                };
                if let Err(err) = handle.play_raw(source) {
                    tracing::debug!("Failed to play sound cue: {}", err);
                }
            }
        });
        Self { tx }
    }
}

impl Default for RodioPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl SoundPlayer for RodioPlayer {
    fn play(&self, cue: SoundCue) {
        // A closed channel means the audio thread never started; ignore.
        let _ = self.tx.send(cue);
    }
}
