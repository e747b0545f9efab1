//! Single-file uploader with the one-shot 201 retry policy

use std::path::Path;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Request, StatusCode, Url};
use tracing::{debug, error, warn};

use super::digest::{drain, DigestClient};
use super::outcome::{UploadError, UploadOutcome};
use crate::config::Config;

/// Uploads one file per call to the graph store endpoint
#[derive(Debug, Clone)]
pub struct Uploader {
    client: DigestClient,
    endpoint: Url,
    content_type: &'static str,
    retry_delay: Duration,
    dry_run: bool,
}

impl Uploader {
    pub fn new(config: &Config) -> reqwest::Result<Self> {
        let client = DigestClient::new(config.username.clone(), config.password.clone())?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            content_type: config.content_type,
            retry_delay: config.retry_delay,
            dry_run: config.dry_run,
        })
    }

    /// Upload the file at `path`. Every failure is logged here and reported
    /// through the outcome; nothing is propagated.
    pub async fn upload(&self, path: &Path) -> UploadOutcome {
        match self.try_upload(path).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("{}", e);
                UploadOutcome::Failed(e)
            }
        }
    }

    async fn try_upload(&self, path: &Path) -> Result<UploadOutcome, UploadError> {
        let contents = tokio::fs::read(path)
            .await
            .map_err(|source| UploadError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        if self.dry_run {
            debug!("Dry run, skipping {} ({} bytes)", path.display(), contents.len());
            return Ok(UploadOutcome::Skipped("dry run".to_string()));
        }

        let request = self
            .build_request(contents)
            .map_err(|source| UploadError::Build {
                path: path.to_path_buf(),
                source,
            })?;

        let response = self
            .client
            .send(&request)
            .await
            .map_err(|source| UploadError::Transport {
                path: path.to_path_buf(),
                source,
            })?;
        let status = response.status();
        drain(response).await;

        match status {
            StatusCode::OK => {
                debug!("Uploaded {}", path.display());
                Ok(UploadOutcome::Success)
            }
            StatusCode::CREATED => {
                warn!(
                    "Received status code {} for {}, retrying in {}ms...",
                    status.as_u16(),
                    path.display(),
                    self.retry_delay.as_millis()
                );
                tokio::time::sleep(self.retry_delay).await;

                let retry = self.client.send(&request).await.map_err(|source| {
                    UploadError::RetryTransport {
                        path: path.to_path_buf(),
                        source,
                    }
                })?;
                let retry_status = retry.status();
                drain(retry).await;

                // The resend counts as uploaded whatever it answers
                if retry_status != StatusCode::OK {
                    warn!(
                        "Retry for {} returned status {}, counting it as uploaded",
                        path.display(),
                        retry_status.as_u16()
                    );
                }
                Ok(UploadOutcome::Success)
            }
            status => Err(UploadError::UnexpectedStatus {
                path: path.to_path_buf(),
                status,
            }),
        }
    }

    fn build_request(&self, contents: Vec<u8>) -> reqwest::Result<Request> {
        self.client
            .client()
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, self.content_type)
            .body(contents)
            .build()
    }
}
