//! Filesystem notification backend.
//!
//! Wraps a `notify` watcher and bridges its callback into tokio channels:
//! one stream of change events and one stream of watch errors.

use std::path::{Path, PathBuf};

use notify::event::ModifyKind;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use super::error::WatcherError;

/// Kind of change reported for a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// File content was written.
    Write,
    Create,
    Remove,
    /// Metadata, rename, access and anything else.
    Other,
}

impl From<&EventKind> for ChangeKind {
    fn from(kind: &EventKind) -> Self {
        match kind {
            EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Any | ModifyKind::Other) => {
                Self::Write
            }
            EventKind::Create(_) => Self::Create,
            EventKind::Remove(_) => Self::Remove,
            _ => Self::Other,
        }
    }
}

/// A change reported for a single path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

impl ChangeEvent {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    #[must_use]
    pub fn write(path: impl Into<PathBuf>) -> Self {
        Self::new(path, ChangeKind::Write)
    }

    #[must_use]
    pub fn is_write(&self) -> bool {
        self.kind == ChangeKind::Write
    }
}

/// Receiving half of the notification streams.
#[derive(Debug)]
pub struct EventStreams {
    pub events: mpsc::UnboundedReceiver<ChangeEvent>,
    pub errors: mpsc::UnboundedReceiver<WatcherError>,
}

/// Sending half of the notification streams.
#[derive(Debug, Clone)]
pub struct EventFeed {
    pub events: mpsc::UnboundedSender<ChangeEvent>,
    pub errors: mpsc::UnboundedSender<WatcherError>,
}

impl EventFeed {
    /// Forward a raw notify result, fanning out one event per path.
    fn forward(&self, result: notify::Result<notify::Event>) {
        match result {
            Ok(event) => {
                let kind = ChangeKind::from(&event.kind);
                for path in event.paths {
                    let _ = self.events.send(ChangeEvent::new(path, kind));
                }
            }
            Err(e) => {
                let _ = self.errors.send(WatcherError::Notify(e));
            }
        }
    }
}

/// Create a connected feed/streams pair.
#[must_use]
pub fn event_channel() -> (EventFeed, EventStreams) {
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (error_tx, error_rx) = mpsc::unbounded_channel();
    (
        EventFeed {
            events: event_tx,
            errors: error_tx,
        },
        EventStreams {
            events: event_rx,
            errors: error_rx,
        },
    )
}

/// Something that individual files can be registered with for change
/// notification.
pub trait WatchRegistry: Send {
    /// Begin watching a single file.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend refuses the path.
    fn register(&mut self, path: &Path) -> Result<(), WatcherError>;

    /// Release every watch. Streams fed by this registry close once the
    /// backend has shut down.
    fn close(self: Box<Self>) {}
}

/// [`WatchRegistry`] backed by the platform's recommended `notify` watcher.
pub struct NotifyBackend {
    watcher: RecommendedWatcher,
}

impl std::fmt::Debug for NotifyBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifyBackend").finish_non_exhaustive()
    }
}

impl NotifyBackend {
    /// Create the backend and the streams it feeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform watcher cannot be created.
    pub fn new() -> Result<(Self, EventStreams), WatcherError> {
        let (feed, streams) = event_channel();
        let watcher =
            notify::recommended_watcher(move |result: notify::Result<notify::Event>| {
                feed.forward(result);
            })?;
        Ok((Self { watcher }, streams))
    }
}

impl WatchRegistry for NotifyBackend {
    fn register(&mut self, path: &Path) -> Result<(), WatcherError> {
        self.watcher
            .watch(path, RecursiveMode::NonRecursive)
            .map_err(|source| WatcherError::Register {
                path: path.to_path_buf(),
                source,
            })
    }

    fn close(self: Box<Self>) {
        tracing::debug!("Releasing file watches");
        drop(self.watcher);
    }
}
