//! Per-file upload: digest-authenticated exchange, retry policy and outcomes

pub mod digest;
mod outcome;
pub mod uploader;

pub use digest::{DigestClient, ExchangeError};
pub use outcome::{UploadError, UploadOutcome};
pub use uploader::Uploader;
