//! Alarm playback service
//!
//! A dedicated OS thread owns the rodio output stream and the single
//! live sink; commands arrive over a channel. rodio's `OutputStream` is
//! not `Send`, so all device interaction stays on that thread.
//!
//! At most one alarm plays at a time: a new `Play` replaces the current
//! sink, and `Stop` is idempotent and safe when nothing is playing.

use crate::config;
use crate::error::{AppError, Result};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

enum AudioCommand {
    Play { path: PathBuf, volume: f32 },
    Stop,
}

/// Handle to the audio thread
pub struct AlarmPlayer {
    tx: mpsc::Sender<AudioCommand>,
}

impl AlarmPlayer {
    /// Spawn the audio thread. The thread exits when the player is
    /// dropped and the channel closes.
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("alarm-audio".into())
            .spawn(move || audio_loop(rx))
            .expect("failed to spawn audio thread");
        Self { tx }
    }

    /// Start playing an alarm sound at the given volume, replacing any
    /// alarm already sounding. The file must exist; a missing resource
    /// is reported so the caller can clear the alarm guard and retry on
    /// a later expiry.
    pub fn play(&self, path: PathBuf, volume: f32) -> Result<()> {
        if !path.exists() {
            return Err(AppError::Audio(format!(
                "alarm sound not found: {:?}",
                path
            )));
        }

        self.tx
            .send(AudioCommand::Play {
                path,
                volume: volume.clamp(0.0, 1.0),
            })
            .map_err(|_| AppError::Audio("audio thread is gone".to_string()))
    }

    /// Stop the current alarm, if any
    pub fn stop(&self) {
        // A closed channel means the thread is gone and nothing plays
        let _ = self.tx.send(AudioCommand::Stop);
    }
}

fn audio_loop(rx: mpsc::Receiver<AudioCommand>) {
    use rodio::{Decoder, OutputStream, Sink};
    use std::fs::File;
    use std::io::BufReader;

    let mut output: Option<(OutputStream, rodio::OutputStreamHandle)> = None;
    let mut current: Option<Sink> = None;

    while let Ok(command) = rx.recv() {
        match command {
            AudioCommand::Play { path, volume } => {
                if let Some(sink) = current.take() {
                    sink.stop();
                }

                // Device init is deferred to first playback and retried
                // if it failed before
                if output.is_none() {
                    match OutputStream::try_default() {
                        Ok(pair) => output = Some(pair),
                        Err(e) => {
                            tracing::warn!("No audio output device available: {}", e);
                            continue;
                        }
                    }
                }
                let Some((_stream, handle)) = output.as_ref() else {
                    continue;
                };

                let file = match File::open(&path) {
                    Ok(file) => file,
                    Err(e) => {
                        tracing::warn!("Failed to open alarm sound {:?}: {}", path, e);
                        continue;
                    }
                };
                let source = match Decoder::new(BufReader::new(file)) {
                    Ok(source) => source,
                    Err(e) => {
                        tracing::warn!("Failed to decode alarm sound {:?}: {}", path, e);
                        continue;
                    }
                };
                let sink = match Sink::try_new(handle) {
                    Ok(sink) => sink,
                    Err(e) => {
                        tracing::warn!("Failed to create audio sink: {}", e);
                        continue;
                    }
                };

                sink.set_volume(volume);
                sink.append(source);
                tracing::debug!("Alarm playing: {:?} at volume {}", path, volume);
                current = Some(sink);
            }
            AudioCommand::Stop => {
                if let Some(sink) = current.take() {
                    sink.stop();
                    tracing::debug!("Alarm stopped");
                }
            }
        }
    }
}

/// Resolve a sound identifier against the bundled sounds directory.
/// Identifiers outside the known list are rejected, which also keeps
/// path traversal out.
pub fn resolve_sound_path(sounds_dir: &Path, sound_id: &str) -> Result<PathBuf> {
    if !config::VALID_ALARM_SOUNDS.contains(&sound_id) {
        return Err(AppError::Audio(format!(
            "unknown alarm sound: {}",
            sound_id
        )));
    }
    Ok(sounds_dir.join(sound_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn resolves_known_sound_ids() {
        let path = resolve_sound_path(Path::new("/app/sounds"), "gong.mp3").unwrap();
        assert_eq!(path, Path::new("/app/sounds/gong.mp3"));
    }

    #[test]
    fn rejects_unknown_sound_ids() {
        assert!(resolve_sound_path(Path::new("/app/sounds"), "nope.mp3").is_err());
        assert!(resolve_sound_path(Path::new("/app/sounds"), "../alarm.mp3").is_err());
    }

    #[test]
    fn stop_without_playback_is_safe() {
        let player = AlarmPlayer::spawn();
        player.stop();
        player.stop();
    }

    #[test]
    fn play_missing_file_is_reported() {
        let player = AlarmPlayer::spawn();
        let result = player.play(PathBuf::from("/definitely/not/there.mp3"), 0.5);
        assert!(result.is_err());
    }
}
