use std::io;
use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

use super::digest::ExchangeError;

/// Why a single file failed to upload
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("read error for {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error creating request for {path}: {source}")]
    Build {
        path: PathBuf,
        #[source]
        source: reqwest::Error,
    },

    #[error("send error for {path}: {source}")]
    Transport {
        path: PathBuf,
        #[source]
        source: ExchangeError,
    },

    #[error("retry send error for {path}: {source}")]
    RetryTransport {
        path: PathBuf,
        #[source]
        source: ExchangeError,
    },

    #[error("unexpected status {status} for {path}")]
    UnexpectedStatus { path: PathBuf, status: StatusCode },
}

/// Result of one file's upload attempt
#[derive(Debug)]
pub enum UploadOutcome {
    Success,
    Skipped(String),
    Failed(UploadError),
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Success)
    }
}
