//! Rodio-based reply playback adapter
//!
//! Materializes reply bytes as one fixed temp file, plays it through the
//! default output device, and deletes the file exactly once per cycle.
//! Decoding happens before the output device is opened, so an unplayable
//! reply fails with `DecodeFailed` even on machines without audio hardware.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rodio::{Decoder, OutputStream, Sink};
use tokio::sync::oneshot;

use crate::application::ports::{AudioPlayer, CleanupError, PlaybackError, PlaybackHandle};
use crate::domain::audio::AudioPayload;

/// Name of the temp playback file inside the system temp directory
pub const TEMP_FILE_NAME: &str = "voice-loop-reply.wav";

/// Reply player backed by rodio.
pub struct RodioPlayer {
    temp_path: PathBuf,
    volume: f32,
}

impl RodioPlayer {
    /// Create a player using the system temp directory
    pub fn new(volume: f32) -> Self {
        Self::with_temp_dir(std::env::temp_dir(), volume)
    }

    /// Create a player with a custom temp directory
    pub fn with_temp_dir(temp_dir: impl Into<PathBuf>, volume: f32) -> Self {
        Self {
            temp_path: temp_dir.into().join(TEMP_FILE_NAME),
            volume: volume.clamp(0.0, 1.0),
        }
    }

    /// The fixed temp playback file path
    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }
}

#[async_trait]
impl AudioPlayer for RodioPlayer {
    async fn play(&self, audio: AudioPayload) -> Result<PlaybackHandle, PlaybackError> {
        // Overwrites any previous cycle's temp file in place
        tokio::fs::write(&self.temp_path, audio.data())
            .await
            .map_err(|e| PlaybackError::InitFailed(format!("temp file: {}", e)))?;

        let (started_tx, started_rx) = oneshot::channel();
        let (finished_tx, finished_rx) = oneshot::channel();
        let path = self.temp_path.clone();
        let volume = self.volume;

        tokio::task::spawn_blocking(move || run_playback(path, volume, started_tx, finished_tx));

        match started_rx.await {
            Ok(Ok(())) => Ok(PlaybackHandle::new(finished_rx)),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(PlaybackError::InitFailed(
                "playback thread exited during setup".to_string(),
            )),
        }
    }
}

/// One playback cycle on a blocking thread: decode, open the device,
/// signal start, drain, delete the temp file. The file is deleted on every
/// exit path, exactly once.
fn run_playback(
    path: PathBuf,
    volume: f32,
    started_tx: oneshot::Sender<Result<(), PlaybackError>>,
    finished_tx: oneshot::Sender<()>,
) {
    let setup = (|| {
        let file = File::open(&path)
            .map_err(|e| PlaybackError::InitFailed(format!("temp file: {}", e)))?;
        let source = Decoder::new(BufReader::new(file))
            .map_err(|e| PlaybackError::DecodeFailed(e.to_string()))?;

        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| PlaybackError::InitFailed(e.to_string()))?;
        let sink =
            Sink::try_new(&stream_handle).map_err(|e| PlaybackError::InitFailed(e.to_string()))?;

        sink.set_volume(volume);
        sink.append(source);
        Ok((stream, sink))
    })();

    match setup {
        Ok((_stream, sink)) => {
            let _ = started_tx.send(Ok(()));
            sink.sleep_until_end();
            delete_temp_file(&path);
            let _ = finished_tx.send(());
        }
        Err(e) => {
            delete_temp_file(&path);
            let _ = started_tx.send(Err(e));
        }
    }
}

/// Delete the temp playback file; failure is logged, never fatal
fn delete_temp_file(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        let err = CleanupError::DeleteFailed(format!("{}: {}", path.display(), e));
        log::warn!("{}", err);
    }
}
