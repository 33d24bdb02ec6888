//! Upload adapters

pub mod http;
pub mod multipart;

pub use http::HttpUploader;
pub use multipart::MultipartBody;
