//! Log record type.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::severity::{classify, SeverityLevel};

/// A classified log line ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// File the line was read from.
    pub file: PathBuf,
    /// The raw line.
    pub message: String,
    pub level: SeverityLevel,
    /// Application that owns the file.
    pub app: String,
    pub observed_at: DateTime<Utc>,
}

impl LogRecord {
    /// Build a record, classifying `message` and stamping it with the current time.
    #[must_use]
    pub fn new(file: &Path, message: String, app: String) -> Self {
        Self::observed_at(file, message, app, Utc::now())
    }

    #[must_use]
    pub fn observed_at(
        file: &Path,
        message: String,
        app: String,
        observed_at: DateTime<Utc>,
    ) -> Self {
        let level = classify(&message);
        Self {
            file: file.to_path_buf(),
            message,
            level,
            app,
            observed_at,
        }
    }
}
