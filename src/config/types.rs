//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use super::ConfigError;

/// Configuration for the log shipper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipperConfig {
    /// Root directories scanned for `.txt` log files, in order.
    #[serde(default = "default_log_dirs")]
    pub log_dirs: Vec<PathBuf>,
    #[serde(default)]
    pub sink: SinkConfig,
    #[serde(default)]
    pub watch: WatchConfig,
}

fn default_log_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from("C:/logs/pdv"), PathBuf::from("C:/logs/emissor")]
}

impl Default for ShipperConfig {
    fn default() -> Self {
        Self {
            log_dirs: default_log_dirs(),
            sink: SinkConfig::default(),
            watch: WatchConfig::default(),
        }
    }
}

impl ShipperConfig {
    /// Check values that deserialization alone cannot.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink URL does not parse, no log directory is
    /// configured, or `tail_lines` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_dirs.is_empty() {
            return Err(ConfigError::NoLogDirs);
        }
        if self.watch.tail_lines == 0 {
            return Err(ConfigError::InvalidTailLines);
        }
        self.sink
            .endpoint()
            .map_err(|source| ConfigError::InvalidUrl {
                url: self.sink.url.clone(),
                source,
            })?;
        Ok(())
    }
}

/// Remote sink settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    /// Loki push endpoint.
    pub url: String,
    pub connect_timeout_secs: u64,
    /// Overall request timeout.
    pub timeout_secs: u64,
    /// Retries on 5xx responses. Zero means fire-and-forget.
    pub max_retries: u32,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:3100/loki/api/v1/push".to_string(),
            connect_timeout_secs: 10,
            timeout_secs: 30,
            max_retries: 0,
        }
    }
}

impl SinkConfig {
    /// Parse the configured URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed.
    pub fn endpoint(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.url)
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// File monitoring settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Minimum time between two forwarded records for one file.
    pub debounce_ms: u64,
    /// Lines read from the end of a file per change.
    pub tail_lines: usize,
    /// Re-scan the roots for new files this often. Zero disables re-scanning.
    pub rescan_secs: u64,
    pub follow_links: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 2000,
            tail_lines: 1,
            rescan_secs: 0,
            follow_links: false,
        }
    }
}

impl WatchConfig {
    #[must_use]
    pub fn debounce_interval(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    #[must_use]
    pub fn rescan_interval(&self) -> Option<Duration> {
        (self.rescan_secs > 0).then(|| Duration::from_secs(self.rescan_secs))
    }
}
