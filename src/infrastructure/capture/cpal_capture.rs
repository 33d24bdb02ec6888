//! Cross-platform microphone capture using cpal
//!
//! Writes mono 16-bit WAV at the device's native sample rate to one fixed
//! file path, overwritten on every start. Per-buffer RMS power feeds the
//! level meter.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::SampleFormat;
use tokio::sync::oneshot;

use crate::application::ports::capture::SILENCE_DB;
use crate::application::ports::{AudioCapture, CaptureError};

/// Name of the capture file inside the capture directory
pub const CAPTURE_FILE_NAME: &str = "recording.wav";

type WavWriter = hound::WavWriter<BufWriter<File>>;
type SharedWriter = Arc<StdMutex<Option<WavWriter>>>;

/// Microphone capture adapter.
///
/// The cpal stream is not Send, so it lives on a dedicated thread for the
/// whole recording; `stop` flags the thread down and joins it, so the WAV
/// header is finalized before `stop` returns.
pub struct CpalCapture {
    path: PathBuf,
    is_recording: Arc<AtomicBool>,
    /// Instantaneous power in dBFS, stored as f32 bits for atomic access
    power_db_bits: Arc<AtomicU32>,
    thread: StdMutex<Option<std::thread::JoinHandle<()>>>,
}

impl CpalCapture {
    /// Create a capture writing to `<capture_dir>/recording.wav`
    pub fn new(capture_dir: impl Into<PathBuf>) -> Self {
        Self {
            path: capture_dir.into().join(CAPTURE_FILE_NAME),
            is_recording: Arc::new(AtomicBool::new(false)),
            power_db_bits: Arc::new(AtomicU32::new(SILENCE_DB.to_bits())),
            thread: StdMutex::new(None),
        }
    }

    /// Mix interleaved frames down to mono by averaging channels
    fn mix_to_mono(samples: &[i16], channels: u16) -> Vec<i16> {
        if channels <= 1 {
            return samples.to_vec();
        }

        samples
            .chunks(channels as usize)
            .map(|frame| {
                let sum: i32 = frame.iter().map(|&s| s as i32).sum();
                (sum / channels as i32) as i16
            })
            .collect()
    }

    /// RMS power of a mono buffer in dBFS, clamped to [-60, 0]
    fn rms_db(samples: &[i16]) -> f32 {
        if samples.is_empty() {
            return SILENCE_DB;
        }

        let sum_sq: f64 = samples
            .iter()
            .map(|&s| {
                let normalized = s as f64 / 32768.0;
                normalized * normalized
            })
            .sum();
        let rms = (sum_sq / samples.len() as f64).sqrt();

        if rms <= 0.0 {
            return SILENCE_DB;
        }

        (20.0 * rms.log10() as f32).clamp(SILENCE_DB, 0.0)
    }

    /// Append a mono buffer to the WAV file and refresh the power reading
    fn consume_buffer(mono: &[i16], writer: &SharedWriter, power_db_bits: &AtomicU32) {
        if let Ok(mut guard) = writer.lock() {
            if let Some(w) = guard.as_mut() {
                for &sample in mono {
                    if w.write_sample(sample).is_err() {
                        break;
                    }
                }
            }
        }
        power_db_bits.store(Self::rms_db(mono).to_bits(), Ordering::SeqCst);
    }

    /// Take ownership of the stream thread handle, if one is running
    fn take_thread(&self) -> Option<std::thread::JoinHandle<()>> {
        self.thread.lock().ok().and_then(|mut slot| slot.take())
    }
}

#[async_trait]
impl AudioCapture for CpalCapture {
    async fn start(&self) -> Result<(), CaptureError> {
        if self
            .is_recording
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(CaptureError::AlreadyRecording);
        }

        self.power_db_bits
            .store(SILENCE_DB.to_bits(), Ordering::SeqCst);

        let (setup_tx, setup_rx) = oneshot::channel();
        let path = self.path.clone();
        let is_recording = Arc::clone(&self.is_recording);
        let power_db_bits = Arc::clone(&self.power_db_bits);

        let handle = std::thread::spawn(move || {
            capture_thread(path, is_recording, power_db_bits, setup_tx);
        });
        if let Ok(mut slot) = self.thread.lock() {
            *slot = Some(handle);
        }

        match setup_rx.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                self.is_recording.store(false, Ordering::SeqCst);
                self.take_thread();
                Err(e)
            }
            Err(_) => {
                self.is_recording.store(false, Ordering::SeqCst);
                self.take_thread();
                Err(CaptureError::DeviceUnavailable(
                    "capture thread exited during setup".to_string(),
                ))
            }
        }
    }

    async fn stop(&self) {
        if !self.is_recording.swap(false, Ordering::SeqCst) {
            return;
        }

        // Join the stream thread so the WAV header is finalized before
        // the capture file can be uploaded
        if let Some(handle) = self.take_thread() {
            let _ = tokio::task::spawn_blocking(move || {
                let _ = handle.join();
            })
            .await;
        }

        self.power_db_bits
            .store(SILENCE_DB.to_bits(), Ordering::SeqCst);
    }

    fn capture_path(&self) -> PathBuf {
        self.path.clone()
    }

    fn power_db(&self) -> f32 {
        if !self.is_recording.load(Ordering::SeqCst) {
            return SILENCE_DB;
        }
        f32::from_bits(self.power_db_bits.load(Ordering::SeqCst))
    }
}

/// Owns the cpal stream for one recording: set up device and WAV writer,
/// report the outcome, then hold the stream until flagged down.
fn capture_thread(
    path: PathBuf,
    is_recording: Arc<AtomicBool>,
    power_db_bits: Arc<AtomicU32>,
    setup_tx: oneshot::Sender<Result<(), CaptureError>>,
) {
    let writer: SharedWriter = Arc::new(StdMutex::new(None));

    let stream = match build_stream(&path, &writer, &power_db_bits) {
        Ok(s) => s,
        Err(e) => {
            let _ = setup_tx.send(Err(e));
            return;
        }
    };

    if let Err(e) = stream.play() {
        let _ = setup_tx.send(Err(CaptureError::DeviceUnavailable(e.to_string())));
        return;
    }

    let _ = setup_tx.send(Ok(()));

    while is_recording.load(Ordering::SeqCst) {
        std::thread::sleep(std::time::Duration::from_millis(50));
    }

    drop(stream);

    let finalized = writer
        .lock()
        .ok()
        .and_then(|mut guard| guard.take())
        .map(|w| w.finalize());
    if let Some(Err(e)) = finalized {
        log::warn!("failed to finalize capture file: {}", e);
    }
}

/// Open the default input device and build an input stream that writes
/// mono i16 into the shared WAV writer
fn build_stream(
    path: &Path,
    writer: &SharedWriter,
    power_db_bits: &Arc<AtomicU32>,
) -> Result<cpal::Stream, CaptureError> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or_else(|| CaptureError::DeviceUnavailable("no default input device".to_string()))?;

    let config = device
        .default_input_config()
        .map_err(|e| CaptureError::DeviceUnavailable(e.to_string()))?;
    let channels = config.channels();
    let sample_format = config.sample_format();
    let stream_config: cpal::StreamConfig = config.into();

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: stream_config.sample_rate.0,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let wav = hound::WavWriter::create(path, spec)
        .map_err(|e| CaptureError::DeviceUnavailable(format!("capture file: {}", e)))?;
    if let Ok(mut guard) = writer.lock() {
        *guard = Some(wav);
    }

    let err_fn = |err| log::warn!("audio input stream error: {}", err);

    let stream = match sample_format {
        SampleFormat::I16 => {
            let writer = Arc::clone(writer);
            let power_db_bits = Arc::clone(power_db_bits);
            device
                .build_input_stream(
                    &stream_config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        let mono = CpalCapture::mix_to_mono(data, channels);
                        CpalCapture::consume_buffer(&mono, &writer, &power_db_bits);
                    },
                    err_fn,
                    None,
                )
                .map_err(|e| CaptureError::DeviceUnavailable(e.to_string()))?
        }

        SampleFormat::F32 => {
            let writer = Arc::clone(writer);
            let power_db_bits = Arc::clone(power_db_bits);
            device
                .build_input_stream(
                    &stream_config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        let i16_data: Vec<i16> = data
                            .iter()
                            .map(|&s| (s.clamp(-1.0, 1.0) * 32767.0) as i16)
                            .collect();
                        let mono = CpalCapture::mix_to_mono(&i16_data, channels);
                        CpalCapture::consume_buffer(&mono, &writer, &power_db_bits);
                    },
                    err_fn,
                    None,
                )
                .map_err(|e| CaptureError::DeviceUnavailable(e.to_string()))?
        }

        other => {
            return Err(CaptureError::DeviceUnavailable(format!(
                "unsupported sample format: {:?}",
                other
            )))
        }
    };

    Ok(stream)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mix_to_mono_single_channel() {
        let mono = vec![100i16, 200, 300];
        let result = CpalCapture::mix_to_mono(&mono, 1);
        assert_eq!(result, mono);
    }

    #[test]
    fn mix_to_mono_two_channels() {
        let stereo = vec![100i16, 200, 300, 400];
        let result = CpalCapture::mix_to_mono(&stereo, 2);
        assert_eq!(result, vec![150, 350]); // Average of each pair
    }

    #[test]
    fn rms_db_of_silence_is_floor() {
        assert_eq!(CpalCapture::rms_db(&[0i16; 128]), SILENCE_DB);
        assert_eq!(CpalCapture::rms_db(&[]), SILENCE_DB);
    }

    #[test]
    fn rms_db_of_full_scale_is_near_zero() {
        let full = vec![i16::MAX; 128];
        let db = CpalCapture::rms_db(&full);
        assert!(db > -0.1 && db <= 0.0);
    }

    #[test]
    fn rms_db_of_half_scale() {
        let half = vec![i16::MAX / 2; 128];
        let db = CpalCapture::rms_db(&half);
        // Half amplitude is about -6 dB
        assert!((db + 6.02).abs() < 0.1);
    }

    #[test]
    fn capture_path_is_fixed() {
        let capture = CpalCapture::new("/var/tmp/voice");
        assert_eq!(
            capture.capture_path(),
            PathBuf::from("/var/tmp/voice/recording.wav")
        );
    }

    #[test]
    fn power_is_silence_while_idle() {
        let capture = CpalCapture::new("/var/tmp/voice");
        assert_eq!(capture.power_db(), SILENCE_DB);
    }

    #[tokio::test]
    async fn stop_while_idle_returns_immediately() {
        let capture = CpalCapture::new("/var/tmp/voice");
        capture.stop().await;
        assert!(capture.take_thread().is_none());
    }

    #[tokio::test]
    #[ignore = "requires an audio input device"]
    async fn capture_file_is_finalized_when_stop_returns() {
        let dir = tempfile::tempdir().unwrap();
        let capture = CpalCapture::new(dir.path());

        capture.start().await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(300)).await;
        capture.stop().await;

        // Header must be complete as soon as stop returns
        let reader = hound::WavReader::open(capture.capture_path()).unwrap();
        assert_eq!(reader.spec().channels, 1);
        assert!(reader.duration() > 0);
    }
}
