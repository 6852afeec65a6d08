//! Watcher error types.

use std::path::PathBuf;

/// Errors that can occur while watching log files.
#[derive(thiserror::Error, Debug)]
pub enum WatcherError {
    /// File could not be found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied accessing file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Failed to register a path with the notification backend.
    #[error("Failed to watch {path}: {source}")]
    Register {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    /// Notify watcher error.
    #[error("File watcher error: {0}")]
    Notify(#[from] notify::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WatcherError {
    /// Classify an I/O error raised while opening `path`.
    pub(crate) fn from_open(path: PathBuf, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            _ => Self::Io(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = WatcherError::NotFound(PathBuf::from("/tmp/app/log.txt"));
        assert_eq!(err.to_string(), "File not found: /tmp/app/log.txt");
    }

    #[test]
    fn test_permission_denied_display() {
        let err = WatcherError::PermissionDenied(PathBuf::from("/root/secret.txt"));
        assert_eq!(err.to_string(), "Permission denied: /root/secret.txt");
    }

    #[test]
    fn test_register_display() {
        let err = WatcherError::Register {
            path: PathBuf::from("/logs/pdv/log.txt"),
            source: notify::Error::generic("limit reached"),
        };
        let text = err.to_string();
        assert!(text.contains("Failed to watch /logs/pdv/log.txt"));
        assert!(text.contains("limit reached"));
    }

    #[test]
    fn test_from_open_maps_kinds() {
        let path = PathBuf::from("/tmp/x.txt");
        let not_found = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(matches!(
            WatcherError::from_open(path.clone(), not_found),
            WatcherError::NotFound(_)
        ));

        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "no");
        assert!(matches!(
            WatcherError::from_open(path.clone(), denied),
            WatcherError::PermissionDenied(_)
        ));

        let other = std::io::Error::other("boom");
        assert!(matches!(
            WatcherError::from_open(path, other),
            WatcherError::Io(_)
        ));
    }

    #[test]
    fn test_from_notify_error() {
        let notify_err = notify::Error::generic("test error");
        let watcher_err: WatcherError = notify_err.into();
        assert!(matches!(watcher_err, WatcherError::Notify(_)));
        assert!(watcher_err.to_string().contains("File watcher error"));
    }
}
