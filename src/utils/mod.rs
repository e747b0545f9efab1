//! Utility modules

pub mod path_source;

pub use path_source::{PathSource, Paths};
