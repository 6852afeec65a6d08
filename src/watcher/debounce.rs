//! Per-file rate limiting of forwarded changes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Minimum time between two accepted changes for the same file.
pub const DEFAULT_DEBOUNCE_INTERVAL: Duration = Duration::from_secs(2);

/// Decides whether a change on a file may produce a forwarded record.
///
/// Keeps the instant of the last accepted change per canonical path. Entries
/// live as long as the gate; they are never evicted.
#[derive(Debug)]
pub struct DebounceGate {
    interval: Duration,
    ledger: HashMap<PathBuf, Instant>,
}

impl Default for DebounceGate {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_INTERVAL)
    }
}

impl DebounceGate {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            ledger: HashMap::new(),
        }
    }

    /// Accept or suppress a change observed at `now`.
    ///
    /// Acceptance records `now` as the new last-accepted instant for `path`.
    /// A suppressed change leaves the ledger untouched, so the window is
    /// always measured from the last accepted change.
    pub fn should_accept(&mut self, path: &Path, now: Instant) -> bool {
        if let Some(last) = self.ledger.get(path) {
            if now.saturating_duration_since(*last) < self.interval {
                return false;
            }
        }
        self.ledger.insert(path.to_path_buf(), now);
        true
    }

    /// Last accepted instant for `path`, if any.
    #[must_use]
    pub fn last_accepted(&self, path: &Path) -> Option<Instant> {
        self.ledger.get(path).copied()
    }
}
