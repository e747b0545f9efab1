//! Run driver: traversal, admission, spawning, draining

use std::sync::Arc;

use anyhow::Result;
use tokio::task::{JoinError, JoinSet};
use tracing::{error, info};

use super::progress::ProgressTracker;
use super::throttle::Throttle;
use crate::config::Config;
use crate::upload::{UploadOutcome, Uploader};
use crate::utils::PathSource;

/// Totals for one completed run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Files yielded by the traversal
    pub discovered: u64,
    pub uploaded: u64,
    pub skipped: u64,
    pub failed: u64,
    /// Most upload slots held at once
    pub peak_slots: usize,
}

/// Drives one upload run from traversal to the final count
pub struct Coordinator {
    config: Arc<Config>,
    uploader: Arc<Uploader>,
    throttle: Arc<Throttle>,
    progress: Arc<ProgressTracker>,
}

impl Coordinator {
    pub fn new(config: Arc<Config>) -> Result<Self> {
        Self::with_progress(config, ProgressTracker::new())
    }

    /// Coordinator that counts and reports through an existing tracker
    pub fn with_progress(config: Arc<Config>, progress: Arc<ProgressTracker>) -> Result<Self> {
        let uploader = Uploader::new(&config)?;
        Ok(Self {
            throttle: Throttle::new(config.max_concurrent),
            progress,
            uploader: Arc::new(uploader),
            config,
        })
    }

    pub fn throttle(&self) -> &Arc<Throttle> {
        &self.throttle
    }

    pub fn progress(&self) -> &Arc<ProgressTracker> {
        &self.progress
    }

    /// Upload every file under the configured root and print the final count.
    ///
    /// Per-file failures are logged by the uploader and only show up as a
    /// lower `uploaded` total.
    pub async fn run(&self) -> RunSummary {
        info!(
            "Uploading files from {:?} to {} (concurrency: {})",
            self.config.root_dir,
            self.config.endpoint,
            self.throttle.capacity()
        );

        self.progress.start_reporting(self.config.report_interval);

        let mut summary = RunSummary::default();
        let mut tasks = JoinSet::new();

        for path in PathSource::new(&self.config.root_dir) {
            summary.discovered += 1;

            // Blocks traversal while every slot is taken
            let slot = self.throttle.acquire().await;

            let uploader = Arc::clone(&self.uploader);
            let progress = Arc::clone(&self.progress);
            tasks.spawn(async move {
                let _slot = slot;
                let outcome = uploader.upload(&path).await;
                if outcome.is_success() {
                    progress.increment();
                }
                outcome
            });

            while let Some(joined) = tasks.try_join_next() {
                tally(&mut summary, joined);
            }
        }

        while let Some(joined) = tasks.join_next().await {
            tally(&mut summary, joined);
        }

        self.progress.stop().await;

        summary.uploaded = self.progress.print_final();
        summary.peak_slots = self.throttle.peak();

        info!(
            "Run complete: {} discovered, {} uploaded, {} skipped, {} failed",
            summary.discovered, summary.uploaded, summary.skipped, summary.failed
        );

        summary
    }
}

fn tally(summary: &mut RunSummary, joined: Result<UploadOutcome, JoinError>) {
    match joined {
        Ok(UploadOutcome::Success) => {}
        Ok(UploadOutcome::Skipped(_)) => summary.skipped += 1,
        Ok(UploadOutcome::Failed(_)) => summary.failed += 1,
        Err(e) => {
            error!("Upload task failed: {}", e);
            summary.failed += 1;
        }
    }
}
