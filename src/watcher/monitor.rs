//! Change monitor: turns file change notifications into log records.

use std::collections::HashSet;
use std::future::pending;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tokio::time::{interval_at, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::backend::{ChangeEvent, EventStreams, NotifyBackend, WatchRegistry};
use super::debounce::DebounceGate;
use super::error::WatcherError;
use super::path::{absolutize, application_name, normalize};
use super::scanner::DirectoryScanner;
use super::tailer::last_lines;
use crate::config::{ShipperConfig, WatchConfig};
use crate::record::LogRecord;
use crate::sink::Sink;

/// Lifecycle of a [`ChangeMonitor`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MonitorState {
    #[default]
    Initializing,
    Running,
    Stopped,
}

/// Counters kept while running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorStats {
    /// Files registered for notification.
    pub watched: usize,
    /// Write events received for watched files.
    pub writes: usize,
    /// Records handed to the sink.
    pub forwarded: usize,
    /// Changes dropped by the debounce gate.
    pub suppressed: usize,
    /// Records the sink failed to deliver.
    pub sink_failures: usize,
    pub watch_errors: usize,
}

/// Watches registered log files and forwards their newest line to a sink.
///
/// Events are handled one at a time on the task that calls [`run`]; the
/// watch set and the debounce ledger are owned here and need no locking.
///
/// [`run`]: ChangeMonitor::run
pub struct ChangeMonitor<S> {
    state: MonitorState,
    roots: Vec<PathBuf>,
    scanner: DirectoryScanner,
    registry: Option<Box<dyn WatchRegistry>>,
    watch_set: HashSet<PathBuf>,
    gate: DebounceGate,
    tail_lines: usize,
    rescan_interval: Option<Duration>,
    sink: S,
    stats: MonitorStats,
}

impl<S> std::fmt::Debug for ChangeMonitor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeMonitor")
            .field("state", &self.state)
            .field("roots", &self.roots)
            .field("watched", &self.watch_set.len())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl<S: Sink> ChangeMonitor<S> {
    /// Create a monitor over `roots` using default watch settings.
    ///
    /// Roots are resolved to absolute paths up front, matching the form in
    /// which change notifications report file paths.
    #[must_use]
    pub fn new(registry: Box<dyn WatchRegistry>, sink: S, roots: Vec<PathBuf>) -> Self {
        Self {
            state: MonitorState::Initializing,
            roots: roots.iter().map(PathBuf::as_path).map(absolutize).collect(),
            scanner: DirectoryScanner::new(),
            registry: Some(registry),
            watch_set: HashSet::new(),
            gate: DebounceGate::default(),
            tail_lines: 1,
            rescan_interval: None,
            sink,
            stats: MonitorStats::default(),
        }
    }

    /// Apply debounce, tail and re-scan settings.
    #[must_use]
    pub fn with_watch_config(mut self, config: &WatchConfig) -> Self {
        self.gate = DebounceGate::new(config.debounce_interval());
        self.tail_lines = config.tail_lines.max(1);
        self.rescan_interval = config.rescan_interval();
        self.scanner = DirectoryScanner::new().follow_links(config.follow_links);
        self
    }

    #[must_use]
    pub fn state(&self) -> MonitorState {
        self.state
    }

    #[must_use]
    pub fn stats(&self) -> MonitorStats {
        MonitorStats {
            watched: self.watch_set.len(),
            ..self.stats
        }
    }

    /// Canonical paths currently registered for notification.
    #[must_use]
    pub fn watch_set(&self) -> &HashSet<PathBuf> {
        &self.watch_set
    }

    #[must_use]
    pub fn is_watched(&self, path: &Path) -> bool {
        self.watched_path(path).is_some()
    }

    /// Canonical watched form of a reported path, if it is being watched.
    fn watched_path(&self, path: &Path) -> Option<PathBuf> {
        let canonical = normalize(path);
        if self.watch_set.contains(&canonical) {
            return Some(canonical);
        }
        let resolved = absolutize(&canonical);
        self.watch_set.contains(&resolved).then_some(resolved)
    }

    fn transition(&mut self, new_state: MonitorState) {
        tracing::debug!(from = ?self.state, to = ?new_state, "Monitor state transition");
        self.state = new_state;
    }

    /// Scan the roots, register every log file found and start running.
    ///
    /// Registration failures are logged and never block the transition.
    /// Returns the number of files registered.
    pub fn initialize(&mut self) -> usize {
        let added = self.register_discovered();
        tracing::info!(files = added, roots = self.roots.len(), "Initial scan complete");
        self.transition(MonitorState::Running);
        added
    }

    /// Register files under the roots that are not watched yet.
    fn register_discovered(&mut self) -> usize {
        let Some(registry) = self.registry.as_mut() else {
            return 0;
        };

        let mut added = 0;
        for path in self.scanner.scan(&self.roots) {
            if self.watch_set.contains(&path) {
                continue;
            }
            match registry.register(&path) {
                Ok(()) => {
                    tracing::info!(path = %path.display(), "Monitoring file");
                    self.watch_set.insert(path);
                    added += 1;
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to watch file");
                }
            }
        }
        added
    }

    /// Handle a single change notification observed now.
    pub async fn handle_event(&mut self, event: ChangeEvent) -> Option<LogRecord> {
        if !event.is_write() {
            tracing::trace!(path = %event.path.display(), kind = ?event.kind, "Ignoring non-write event");
            return None;
        }
        self.handle_write(&event.path, Instant::now()).await
    }

    /// Handle a write to `path` observed at `now`.
    ///
    /// Returns the record handed to the sink, if any. Sink failures are
    /// logged and do not change the return value.
    pub async fn handle_write(&mut self, path: &Path, now: Instant) -> Option<LogRecord> {
        let Some(canonical) = self.watched_path(path) else {
            tracing::debug!(path = %path.display(), "Ignoring change to unwatched file");
            return None;
        };
        self.stats.writes += 1;
        tracing::debug!(path = %canonical.display(), "File modified");

        let message = last_lines(&canonical, self.tail_lines).await;
        if message.is_empty() {
            return None;
        }

        let app = application_name(&canonical);

        if !self.gate.should_accept(&canonical, now) {
            self.stats.suppressed += 1;
            tracing::debug!(path = %canonical.display(), "Change suppressed by debounce");
            return None;
        }

        let record = LogRecord::new(&canonical, message, app);
        match self.sink.send(&record).await {
            Ok(()) => self.stats.forwarded += 1,
            Err(e) => {
                self.stats.sink_failures += 1;
                tracing::warn!(path = %canonical.display(), error = %e, "Failed to deliver record");
            }
        }
        Some(record)
    }

    fn handle_watch_error(&mut self, error: &WatcherError) {
        self.stats.watch_errors += 1;
        tracing::warn!(error = %error, "File watcher error");
    }

    /// Run until either stream closes or `shutdown` is cancelled.
    ///
    /// Performs the initial scan first if it has not been done yet. On exit
    /// the watch registry is released and the monitor is `Stopped`.
    pub async fn run(&mut self, mut streams: EventStreams, shutdown: CancellationToken) {
        if self.state == MonitorState::Initializing {
            self.initialize();
        }
        if self.state == MonitorState::Stopped {
            return;
        }

        let mut rescan = self.rescan_interval.map(|period| {
            let mut interval = interval_at(tokio::time::Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            interval
        });

        loop {
            tokio::select! {
                biased;

                () = shutdown.cancelled() => {
                    tracing::info!("Shutdown requested");
                    break;
                }

                // Polled before events: a busy event stream must not starve errors.
                error = streams.errors.recv() => match error {
                    Some(error) => self.handle_watch_error(&error),
                    None => {
                        tracing::debug!("Error stream closed");
                        break;
                    }
                },

                event = streams.events.recv() => match event {
                    Some(event) => {
                        self.handle_event(event).await;
                    }
                    None => {
                        tracing::debug!("Event stream closed");
                        break;
                    }
                },

                () = next_tick(&mut rescan) => {
                    let added = self.register_discovered();
                    if added > 0 {
                        tracing::info!(files = added, "Re-scan found new files");
                    }
                }
            }
        }

        self.stop();
    }

    /// Release the watch registry and enter the terminal state.
    pub fn stop(&mut self) {
        if let Some(registry) = self.registry.take() {
            registry.close();
        }
        self.transition(MonitorState::Stopped);
    }
}

async fn next_tick(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => pending().await,
    }
}

/// Monitor the configured directories until shutdown, delivering to `sink`.
///
/// Designed to be spawned as a background task. Under normal operation it
/// only returns once `shutdown` is cancelled or the watcher's streams close.
///
/// # Errors
///
/// Returns an error if the platform file watcher cannot be created.
pub async fn start_monitoring<S: Sink>(
    config: &ShipperConfig,
    sink: S,
    shutdown: CancellationToken,
) -> Result<MonitorStats, WatcherError> {
    let (backend, streams) = NotifyBackend::new()?;
    let mut monitor = ChangeMonitor::new(Box::new(backend), sink, config.log_dirs.clone())
        .with_watch_config(&config.watch);

    monitor.run(streams, shutdown).await;
    Ok(monitor.stats())
}
