//! Shared success counter with a periodic console reporter

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::warn;

/// Destination for progress lines (stdout unless replaced)
pub type ReportSink = Arc<dyn Fn(&str) + Send + Sync>;

/// Counts successful uploads and prints the running total on a timer
pub struct ProgressTracker {
    uploaded: AtomicU64,
    reports: AtomicU64,
    sink: ReportSink,
    reporter: Mutex<Option<Reporter>>,
}

struct Reporter {
    stop_tx: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl ProgressTracker {
    pub fn new() -> Arc<Self> {
        Self::with_sink(Arc::new(|line: &str| println!("{}", line)))
    }

    /// Tracker whose report and final lines go to `sink`
    pub fn with_sink(sink: ReportSink) -> Arc<Self> {
        Arc::new(Self {
            uploaded: AtomicU64::new(0),
            reports: AtomicU64::new(0),
            sink,
            reporter: Mutex::new(None),
        })
    }

    /// Record one successful upload
    pub fn increment(&self) {
        self.uploaded.fetch_add(1, Ordering::SeqCst);
    }

    /// Current number of successful uploads
    pub fn count(&self) -> u64 {
        self.uploaded.load(Ordering::SeqCst)
    }

    /// Number of periodic reports printed so far
    pub fn reports(&self) -> u64 {
        self.reports.load(Ordering::SeqCst)
    }

    /// Start printing the count every `interval`, first report one interval
    /// from now. Does nothing if a reporter is already running.
    pub fn start_reporting(self: &Arc<Self>, interval: Duration) {
        let mut slot = self.reporter_slot();
        if slot.is_some() {
            warn!("Progress reporter already running");
            return;
        }

        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let tracker = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => tracker.report(),
                }
            }
        });

        *slot = Some(Reporter { stop_tx, handle });
    }

    /// Stop the reporter and wait for it to exit. No report is printed after
    /// this returns.
    pub async fn stop(&self) {
        let reporter = self.reporter_slot().take();
        let Some(reporter) = reporter else {
            return;
        };

        // The receiver is gone only if the task already exited
        let _ = reporter.stop_tx.send(());
        if let Err(e) = reporter.handle.await {
            warn!("Progress reporter exited abnormally: {}", e);
        }
    }

    /// Count after every upload task has been joined
    pub fn final_count(&self) -> u64 {
        self.count()
    }

    /// Print the closing total line and return the count it shows
    pub fn print_final(&self) -> u64 {
        let count = self.final_count();
        (self.sink)(&format!("Final count of files uploaded: {}", count));
        count
    }

    fn report(&self) {
        (self.sink)(&format!("Files uploaded: {}", self.count()));
        self.reports.fetch_add(1, Ordering::SeqCst);
    }

    fn reporter_slot(&self) -> MutexGuard<'_, Option<Reporter>> {
        self.reporter.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl fmt::Debug for ProgressTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressTracker")
            .field("uploaded", &self.count())
            .field("reports", &self.reports())
            .finish_non_exhaustive()
    }
}
