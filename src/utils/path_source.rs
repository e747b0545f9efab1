//! Lazy recursive file listing for the upload root

use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

/// Every non-directory entry under a root directory, yielded lazily in file-name order
#[derive(Debug, Clone)]
pub struct PathSource {
    root: PathBuf,
}

impl PathSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl IntoIterator for PathSource {
    type Item = PathBuf;
    type IntoIter = Paths;

    fn into_iter(self) -> Paths {
        let inner = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();
        Paths { inner }
    }
}

/// Iterator over the files of a [`PathSource`]
///
/// Entries that cannot be read are logged and skipped, so the walk
/// always runs to the end of whatever is reachable.
pub struct Paths {
    inner: walkdir::IntoIter,
}

impl Iterator for Paths {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            let entry = match self.inner.next()? {
                Ok(e) => e,
                Err(e) => {
                    warn!("Error accessing file: {}", e);
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                continue;
            }

            return Some(entry.into_path());
        }
    }
}
