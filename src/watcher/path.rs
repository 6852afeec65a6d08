//! Canonical path handling for monitored log files.

use std::path::{Path, PathBuf};

/// Extension every monitored file carries.
pub const LOG_EXTENSION: &str = "txt";

/// Application name used when a path has no parent directory component.
pub const UNKNOWN_APPLICATION: &str = "Desconhecido";

/// Map a path to its canonical monitored form.
///
/// Paths already ending in `.txt` are returned unchanged. Any other path has
/// its last extension replaced by `.txt` (or gains one if it has none).
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use logship::watcher::normalize;
///
/// assert_eq!(normalize(Path::new("pdv/log.txt")), Path::new("pdv/log.txt"));
/// assert_eq!(normalize(Path::new("pdv/log.old")), Path::new("pdv/log.txt"));
/// assert_eq!(normalize(Path::new("pdv/log")), Path::new("pdv/log.txt"));
/// ```
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    if is_log_path(path) {
        return path.to_path_buf();
    }
    path.with_extension(LOG_EXTENSION)
}

/// Whether the path's extension is exactly `txt`.
#[must_use]
pub fn is_log_path(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == LOG_EXTENSION)
}

/// Resolve a path to the absolute form the notification backend reports.
///
/// Symbolic links are resolved when the path exists; otherwise the path is
/// only made absolute against the current directory.
#[must_use]
pub fn absolutize(path: &Path) -> PathBuf {
    std::fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Resolve the application that owns a log file.
///
/// This is the name of the directory containing the file, e.g. `pdv` for
/// `C:/logs/pdv/log.txt`. Paths with fewer than two segments resolve to
/// [`UNKNOWN_APPLICATION`].
#[must_use]
pub fn application_name(path: &Path) -> String {
    path.parent()
        .and_then(Path::file_name)
        .map_or_else(
            || UNKNOWN_APPLICATION.to_string(),
            |name| name.to_string_lossy().into_owned(),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_txt_path_is_unchanged() {
        for p in ["log.txt", "/var/app/log.txt", "a.b.txt", "logs/.txt.txt"] {
            assert_eq!(normalize(Path::new(p)), PathBuf::from(p));
        }
    }

    #[test]
    fn test_other_extension_is_replaced() {
        let out = normalize(Path::new("/logs/pdv/app.log"));
        assert_eq!(out, PathBuf::from("/logs/pdv/app.txt"));
        assert_eq!(out.file_stem(), Path::new("/logs/pdv/app.log").file_stem());
    }

    #[test]
    fn test_only_last_extension_is_replaced() {
        assert_eq!(
            normalize(Path::new("archive.tar.gz")),
            PathBuf::from("archive.tar.txt")
        );
    }

    #[test]
    fn test_missing_extension_is_appended() {
        assert_eq!(normalize(Path::new("pdv/output")), PathBuf::from("pdv/output.txt"));
    }

    #[test]
    fn test_extension_match_is_case_sensitive() {
        assert_eq!(normalize(Path::new("LOG.TXT")), PathBuf::from("LOG.txt"));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            "log.txt",
            "log.log",
            "log",
            "archive.tar.gz",
            ".hidden",
            "dir/file.",
            "/abs/path/LOG.TXT",
            "",
        ];
        for p in inputs {
            let once = normalize(Path::new(p));
            assert_eq!(normalize(&once), once, "not idempotent for {p:?}");
        }
    }

    #[test]
    fn test_application_name_is_parent_dir() {
        assert_eq!(application_name(Path::new("/logs/app1/log.txt")), "app1");
        assert_eq!(application_name(Path::new("app1/log.txt")), "app1");
    }

    #[test]
    fn test_absolutize_relative_path() {
        let cwd = std::env::current_dir().unwrap();
        let out = absolutize(Path::new("no-such-dir/log.txt"));
        assert!(out.is_absolute());
        assert!(out.ends_with("no-such-dir/log.txt"));
        assert!(out.starts_with(&cwd));
    }

    #[test]
    fn test_absolutize_resolves_existing_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("log.txt");
        std::fs::write(&file, "").unwrap();
        let out = absolutize(&file);
        assert_eq!(out, std::fs::canonicalize(&file).unwrap());
        assert_eq!(absolutize(&out), out);
    }

    #[test]
    fn test_application_name_fallback() {
        assert_eq!(application_name(Path::new("log.txt")), UNKNOWN_APPLICATION);
        assert_eq!(application_name(Path::new("/log.txt")), UNKNOWN_APPLICATION);
    }
}
