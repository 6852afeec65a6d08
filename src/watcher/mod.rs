//! Watcher module for growing text log files.
//!
//! Discovers `.txt` files under configured roots, watches them for writes and
//! forwards the newest line of each changed file to a [`Sink`](crate::sink::Sink).

mod backend;
mod debounce;
mod error;
mod monitor;
mod path;
mod scanner;
mod tailer;

pub use backend::{
    event_channel, ChangeEvent, ChangeKind, EventFeed, EventStreams, NotifyBackend, WatchRegistry,
};
pub use debounce::{DebounceGate, DEFAULT_DEBOUNCE_INTERVAL};
pub use error::WatcherError;
pub use monitor::{start_monitoring, ChangeMonitor, MonitorState, MonitorStats};
pub use path::{
    absolutize, application_name, is_log_path, normalize, LOG_EXTENSION, UNKNOWN_APPLICATION,
};
pub use scanner::DirectoryScanner;
pub use tailer::{last_lines, try_last_lines};
