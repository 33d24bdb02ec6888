//! Round-trip session coordination use case

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration};

use crate::domain::audio::LevelFrame;
use crate::domain::session::{CaptureSession, CaptureState};

use super::ports::{
    AudioCapture, AudioPlayer, CaptureError, PlaybackError, PlaybackHandle, UploadError, Uploader,
};

/// Level sampler cadence in milliseconds
const SAMPLE_INTERVAL_MS: u64 = 100;

/// Errors from the round-trip use case
#[derive(Debug, Error)]
pub enum RoundTripError {
    #[error("Capture failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("Upload failed: {0}")]
    Upload(#[from] UploadError),

    #[error("Playback failed: {0}")]
    Playback(#[from] PlaybackError),

    #[error("A round trip is already in flight")]
    SubmitInFlight,
}

/// Output from one successful submit
#[derive(Debug)]
pub struct RoundTripOutput {
    /// Handle resolving when reply playback completes
    pub playback: PlaybackHandle,
    /// Transcription of the uploaded clip (legacy envelope replies only)
    pub transcript: Option<String>,
    /// Response text (legacy envelope replies only)
    pub response_text: Option<String>,
    /// Reply audio size in human-readable form
    pub reply_size: String,
}

/// Coordinates the single mutable capture session, the live level signal,
/// and the upload-then-play round trip.
///
/// Observable state (`levels`, `busy`) is published through watch channels;
/// consumers subscribe and never mutate. All session state lives behind one
/// async mutex, so transitions are strictly serialized.
pub struct SessionCoordinator<C, U, P>
where
    C: AudioCapture + 'static,
    U: Uploader,
    P: AudioPlayer,
{
    capture: Arc<C>,
    uploader: U,
    player: P,
    session: Mutex<CaptureSession>,
    sampler: Mutex<Option<JoinHandle<()>>>,
    in_flight: AtomicBool,
    levels_tx: watch::Sender<LevelFrame>,
    levels_rx: watch::Receiver<LevelFrame>,
    busy_tx: watch::Sender<bool>,
    busy_rx: watch::Receiver<bool>,
}

impl<C, U, P> SessionCoordinator<C, U, P>
where
    C: AudioCapture + 'static,
    U: Uploader,
    P: AudioPlayer,
{
    /// Create a new coordinator over the given adapters
    pub fn new(capture: Arc<C>, uploader: U, player: P) -> Self {
        let (levels_tx, levels_rx) = watch::channel(LevelFrame::baseline());
        let (busy_tx, busy_rx) = watch::channel(false);
        Self {
            capture,
            uploader,
            player,
            session: Mutex::new(CaptureSession::new()),
            sampler: Mutex::new(None),
            in_flight: AtomicBool::new(false),
            levels_tx,
            levels_rx,
            busy_tx,
            busy_rx,
        }
    }

    /// Subscribe to the published level frames
    pub fn levels(&self) -> watch::Receiver<LevelFrame> {
        self.levels_rx.clone()
    }

    /// Subscribe to the busy indicator
    pub fn busy(&self) -> watch::Receiver<bool> {
        self.busy_rx.clone()
    }

    /// Get the current capture state
    pub async fn state(&self) -> CaptureState {
        self.session.lock().await.state()
    }

    /// Begin a capture session and start the level sampler.
    ///
    /// The domain transition happens first, so a second start never touches
    /// the device. A device failure rolls the session back to idle and
    /// leaves `busy` untouched.
    pub async fn start_capture(&self) -> Result<(), RoundTripError> {
        {
            let mut session = self.session.lock().await;
            session.start().map_err(|_| CaptureError::AlreadyRecording)?;
        }

        if let Err(e) = self.capture.start().await {
            self.session.lock().await.abort();
            return Err(e.into());
        }

        self.start_sampler().await;
        Ok(())
    }

    /// Stop the capture session: cancel the sampler, publish the baseline
    /// frame, release the device. Idempotent.
    pub async fn stop_capture(&self) {
        self.stop_sampler().await;
        let _ = self.levels_tx.send(LevelFrame::baseline());

        self.capture.stop().await;

        let path = self.capture.capture_path();
        self.session.lock().await.stop(&path);
    }

    /// Upload the captured clip and play the reply.
    ///
    /// `busy` is true from entry until the first of {playback started, any
    /// failure}, and toggles exactly once per call. A second submit while
    /// one is in flight is rejected without touching `busy`. No retry on
    /// any failure; the captured file is untouched.
    pub async fn submit(&self) -> Result<RoundTripOutput, RoundTripError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(RoundTripError::SubmitInFlight);
        }

        let _ = self.busy_tx.send(true);
        let result = self.round_trip().await;
        let _ = self.busy_tx.send(false);
        self.in_flight.store(false, Ordering::SeqCst);

        result
    }

    /// One upload-then-play exchange
    async fn round_trip(&self) -> Result<RoundTripOutput, RoundTripError> {
        let path = self.submit_path().await;

        let reply = self.uploader.upload(&path).await?;
        let reply_size = reply.audio.human_readable_size();

        let playback = self.player.play(reply.audio).await?;

        Ok(RoundTripOutput {
            playback,
            transcript: reply.transcript,
            response_text: reply.response_text,
            reply_size,
        })
    }

    /// Path submitted for upload: the last completed capture, falling back
    /// to the fixed capture path (the uploader reports an unreadable file)
    async fn submit_path(&self) -> PathBuf {
        let session = self.session.lock().await;
        session
            .last_capture()
            .map(PathBuf::from)
            .unwrap_or_else(|| self.capture.capture_path())
    }

    /// Spawn the level sampler, replacing (never duplicating) a prior one
    async fn start_sampler(&self) {
        let mut slot = self.sampler.lock().await;
        if let Some(handle) = slot.take() {
            handle.abort();
        }

        let capture = Arc::clone(&self.capture);
        let levels_tx = self.levels_tx.clone();
        *slot = Some(tokio::spawn(async move {
            let mut ticker = interval(Duration::from_millis(SAMPLE_INTERVAL_MS));
            loop {
                ticker.tick().await;
                let frame = LevelFrame::from_power_db(capture.power_db());
                let _ = levels_tx.send(frame);
            }
        }));
    }

    async fn stop_sampler(&self) {
        let mut slot = self.sampler.lock().await;
        if let Some(handle) = slot.take() {
            handle.abort();
        }
    }
}
