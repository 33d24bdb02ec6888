//! Playback integration tests
//!
//! The real-playback test needs an output device and is ignored by default.
//! Run with: cargo test --test playback_tests -- --ignored

use voice_loop::application::ports::{AudioPlayer, PlaybackError};
use voice_loop::domain::audio::{AudioMimeType, AudioPayload};
use voice_loop::infrastructure::RodioPlayer;

/// Build a short valid mono WAV clip
fn tiny_wav_clip() -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 8000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut buffer = std::io::Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut buffer, spec).unwrap();
        for n in 0..800 {
            let sample = ((n as f32 * 0.1).sin() * 8000.0) as i16;
            writer.write_sample(sample).unwrap();
        }
        writer.finalize().unwrap();
    }
    buffer.into_inner()
}

#[tokio::test]
async fn garbage_bytes_fail_to_decode_and_temp_file_is_deleted() {
    let dir = tempfile::tempdir().unwrap();
    let player = RodioPlayer::with_temp_dir(dir.path(), 1.0);

    let payload = AudioPayload::new(b"definitely not audio".to_vec(), AudioMimeType::Wav);
    let err = player.play(payload).await.unwrap_err();

    assert!(matches!(err, PlaybackError::DecodeFailed(_)));
    assert!(
        !player.temp_path().exists(),
        "Temp file should be deleted after a failed cycle"
    );
}

#[tokio::test]
async fn unwritable_temp_dir_fails_init_without_spawning_playback() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("no-such-subdir");
    let player = RodioPlayer::with_temp_dir(missing, 1.0);

    let payload = AudioPayload::new(tiny_wav_clip(), AudioMimeType::Wav);
    let err = player.play(payload).await.unwrap_err();

    assert!(matches!(err, PlaybackError::InitFailed(_)));
}

#[tokio::test]
#[ignore = "requires an audio output device"]
async fn valid_clip_plays_to_completion_and_temp_file_is_deleted() {
    let dir = tempfile::tempdir().unwrap();
    let player = RodioPlayer::with_temp_dir(dir.path(), 0.1);

    let payload = AudioPayload::new(tiny_wav_clip(), AudioMimeType::Wav);
    let handle = player.play(payload).await.expect("Playback should start");

    handle.finished().await;
    assert!(
        !player.temp_path().exists(),
        "Temp file should be deleted after playback"
    );
}
