//! Discovery of log files beneath configured root directories.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::path::normalize;

/// File name suffix a log file must carry to be discovered.
const LOG_SUFFIX: &str = ".txt";

/// Walks root directories looking for log files.
#[derive(Debug, Clone, Default)]
pub struct DirectoryScanner {
    follow_links: bool,
}

impl DirectoryScanner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Follow symbolic links while walking.
    #[must_use]
    pub fn follow_links(mut self, yes: bool) -> Self {
        self.follow_links = yes;
        self
    }

    /// Recursively collect every log file beneath each root, in root order.
    ///
    /// Roots that do not exist or cannot be read are skipped, as are
    /// unreadable sub-directories. A failure under one root never stops the
    /// scan of the others.
    pub fn scan<P: AsRef<Path>>(&self, roots: &[P]) -> Vec<PathBuf> {
        roots
            .iter()
            .flat_map(|root| self.scan_root(root.as_ref()))
            .collect()
    }

    fn scan_root(&self, root: &Path) -> Vec<PathBuf> {
        let mut found = Vec::new();

        for entry in WalkDir::new(root).follow_links(self.follow_links) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!(root = %root.display(), error = %e, "Skipping unreadable entry");
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                continue;
            }

            let is_log = entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.ends_with(LOG_SUFFIX));
            if is_log {
                found.push(normalize(entry.path()));
            }
        }

        found
    }
}
