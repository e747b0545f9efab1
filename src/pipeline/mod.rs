//! Bounded-concurrency upload pipeline
//!
//! The [`Coordinator`] walks the upload root, admits one task per file through
//! the [`Throttle`], and counts successes in a shared [`ProgressTracker`].

pub mod coordinator;
pub mod progress;
pub mod throttle;

pub use coordinator::{Coordinator, RunSummary};
pub use progress::{ProgressTracker, ReportSink};
pub use throttle::{SlotGuard, Throttle};
