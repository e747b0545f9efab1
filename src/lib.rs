//! graph-upload library - bulk upload of RDF files into a digest-protected graph store

pub mod config;
pub mod pipeline;
pub mod upload;
pub mod utils;

// Re-export commonly used types
pub use config::{Config, ConfigOptions};
pub use pipeline::{Coordinator, ProgressTracker, RunSummary, Throttle};
pub use upload::{UploadError, UploadOutcome, Uploader};
pub use utils::PathSource;
