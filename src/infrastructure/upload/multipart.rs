//! Multipart/form-data body encoder
//!
//! Builds the one-part upload body by hand so the wire format stays under
//! our control: a single part named `file` with a filename and content
//! type, CRLF framing, and a closing boundary.

use crate::domain::audio::AudioMimeType;

/// Form field name for the uploaded clip
const FIELD_NAME: &str = "file";

/// Encoded multipart/form-data body with its boundary token.
///
/// The boundary is derived from a v4 UUID and regenerated until it does not
/// occur anywhere in the payload bytes, so decoding by boundary always
/// recovers the payload exactly.
pub struct MultipartBody {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartBody {
    /// Encode `payload` as a single-part form-data body
    pub fn new(filename: &str, mime_type: AudioMimeType, payload: &[u8]) -> Self {
        let boundary = Self::unique_boundary(payload);

        let header = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"{FIELD_NAME}\"; filename=\"{filename}\"\r\n\
             Content-Type: {mime}\r\n\r\n",
            boundary = boundary,
            filename = filename,
            mime = mime_type.as_str(),
        );
        let footer = format!("\r\n--{}--\r\n", boundary);

        let mut body = Vec::with_capacity(header.len() + payload.len() + footer.len());
        body.extend_from_slice(header.as_bytes());
        body.extend_from_slice(payload);
        body.extend_from_slice(footer.as_bytes());

        Self { boundary, body }
    }

    /// Generate a boundary token not present in the payload
    fn unique_boundary(payload: &[u8]) -> String {
        loop {
            let candidate = format!("Boundary-{}", uuid::Uuid::new_v4());
            if !contains(payload, candidate.as_bytes()) {
                return candidate;
            }
        }
    }

    /// The boundary token
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Value for the Content-Type request header
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Consume into the encoded body bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.body
    }

    /// Size of the encoded body
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Whether the body is empty (never true for a well-formed part)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Byte-slice subsequence search
fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack.windows(needle.len()).any(|w| w == needle)
}
