//! Last-lines reader for growing log files.
//!
//! Every call scans the whole file from the start; no read offset is kept
//! between calls.

use std::collections::VecDeque;
use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::error::WatcherError;

/// Return the last `n` lines of the file at `path`, joined by `\n`.
///
/// Read failures are logged and yield an empty string.
pub async fn last_lines(path: &Path, n: usize) -> String {
    match try_last_lines(path, n).await {
        Ok(lines) => lines,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read log file");
            String::new()
        }
    }
}

/// Fallible form of [`last_lines`].
///
/// # Errors
///
/// Returns an error if the file cannot be opened or an I/O error occurs
/// while reading it.
pub async fn try_last_lines(path: &Path, n: usize) -> Result<String, WatcherError> {
    let file = File::open(path)
        .await
        .map_err(|e| WatcherError::from_open(path.to_path_buf(), e))?;

    let mut reader = BufReader::new(file);
    let mut window: VecDeque<String> = VecDeque::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let bytes_read = reader.read_until(b'\n', &mut buf).await?;
        if bytes_read == 0 {
            break;
        }

        window.push_back(decode_line(&buf));
        if window.len() > n {
            window.pop_front();
        }
    }

    Ok(Vec::from(window).join("\n"))
}

/// Strip the line terminator and decode, replacing invalid UTF-8.
fn decode_line(raw: &[u8]) -> String {
    let line = raw.strip_suffix(b"\n").unwrap_or(raw);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}
