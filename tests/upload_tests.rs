//! Uploader integration tests against a mock HTTP server

use std::time::Duration;

use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use voice_loop::application::ports::{UploadError, Uploader};
use voice_loop::domain::audio::AudioMimeType;
use voice_loop::infrastructure::HttpUploader;

fn write_clip(dir: &tempfile::TempDir, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join("recording.wav");
    std::fs::write(&path, bytes).expect("Failed to write clip");
    path
}

#[tokio::test]
async fn upload_returns_raw_audio_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/speak"))
        .and(header_exists("content-type"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "audio/wav")
                .set_body_bytes(b"reply audio".to_vec()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let clip = write_clip(&dir, b"clip bytes");

    let uploader =
        HttpUploader::new(format!("{}/speak", server.uri()), Duration::from_secs(5)).unwrap();
    let reply = uploader.upload(&clip).await.expect("Upload should succeed");

    assert_eq!(reply.audio.data(), b"reply audio");
    assert_eq!(reply.audio.mime_type(), AudioMimeType::Wav);
    assert!(reply.transcript.is_none());
    assert!(reply.response_text.is_none());
}

#[tokio::test]
async fn upload_body_is_multipart_with_named_file_part() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "audio/wav")
                .set_body_bytes(vec![0u8; 4]),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let clip = write_clip(&dir, b"payload-under-test");

    let uploader = HttpUploader::new(server.uri(), Duration::from_secs(5)).unwrap();
    uploader.upload(&clip).await.expect("Upload should succeed");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let request = &requests[0];
    let content_type = request
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .expect("Content type header missing");
    assert!(content_type.starts_with("multipart/form-data; boundary=Boundary-"));

    let body = String::from_utf8_lossy(&request.body);
    assert!(body.contains("Content-Disposition: form-data; name=\"file\"; filename=\"recording.wav\""));
    assert!(body.contains("Content-Type: audio/wav"));
    assert!(body.contains("payload-under-test"));
}

#[tokio::test]
async fn upload_decodes_json_envelope_reply() {
    use base64::Engine;
    let audio = base64::engine::general_purpose::STANDARD.encode(b"spoken reply");
    let envelope = serde_json::json!({
        "transcription": "hello there",
        "response_text": "hi! how can I help?",
        "audio_base64": audio,
    });

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&envelope))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let clip = write_clip(&dir, b"clip");

    let uploader = HttpUploader::new(server.uri(), Duration::from_secs(5)).unwrap();
    let reply = uploader.upload(&clip).await.expect("Upload should succeed");

    assert_eq!(reply.audio.data(), b"spoken reply");
    assert_eq!(reply.transcript.as_deref(), Some("hello there"));
    assert_eq!(reply.response_text.as_deref(), Some("hi! how can I help?"));
}

#[tokio::test]
async fn empty_reply_body_is_empty_response_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "audio/wav")
                .set_body_bytes(Vec::new()),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let clip = write_clip(&dir, b"clip");

    let uploader = HttpUploader::new(server.uri(), Duration::from_secs(5)).unwrap();
    let err = uploader.upload(&clip).await.unwrap_err();

    assert!(matches!(err, UploadError::EmptyResponse));
}

#[tokio::test]
async fn server_error_status_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model overloaded"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let clip = write_clip(&dir, b"clip");

    let uploader = HttpUploader::new(server.uri(), Duration::from_secs(5)).unwrap();
    let err = uploader.upload(&clip).await.unwrap_err();

    match err {
        UploadError::Transport(detail) => {
            assert!(detail.contains("500"), "Expected status in error: {}", detail);
            assert!(detail.contains("model overloaded"));
        }
        other => panic!("Expected transport error, got: {:?}", other),
    }
}

#[tokio::test]
async fn unreachable_endpoint_is_transport_error() {
    let dir = tempfile::tempdir().unwrap();
    let clip = write_clip(&dir, b"clip");

    // Reserved port with nothing listening
    let uploader = HttpUploader::new("http://127.0.0.1:1/speak", Duration::from_secs(2)).unwrap();
    let err = uploader.upload(&clip).await.unwrap_err();

    assert!(matches!(err, UploadError::Transport(_)));
}

#[tokio::test]
async fn missing_clip_fails_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 4]))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist.wav");

    let uploader = HttpUploader::new(server.uri(), Duration::from_secs(5)).unwrap();
    let err = uploader.upload(&missing).await.unwrap_err();

    assert!(matches!(err, UploadError::FileUnreadable(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}
