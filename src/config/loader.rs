//! Configuration file loader.

use std::path::PathBuf;

use super::ShipperConfig;

/// Environment variable holding a comma-separated list of log directories.
pub const LOG_DIRS_ENV: &str = "LOG_DIRS";

/// Configuration loader that searches multiple locations.
#[derive(Debug)]
pub struct ConfigLoader {
    /// Search paths in order of priority.
    search_paths: Vec<PathBuf>,
    /// Whether the first search path must exist.
    required: bool,
}

impl ConfigLoader {
    /// Create a new config loader with default search paths.
    #[must_use]
    pub fn new() -> Self {
        let mut search_paths = Vec::new();

        // 1. Current directory: .logship.toml
        search_paths.push(PathBuf::from(".logship.toml"));

        // 2. User config directory: ~/.config/logship/config.toml
        if let Some(config_dir) = dirs::config_dir() {
            search_paths.push(config_dir.join("logship").join("config.toml"));
        }

        Self {
            search_paths,
            required: false,
        }
    }

    /// Create a config loader with a specific config file path.
    ///
    /// The file must exist; loading fails with [`ConfigError::ReadError`]
    /// instead of falling back to defaults.
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            search_paths: vec![path],
            required: true,
        }
    }

    /// Load configuration from the first available file, or return defaults.
    ///
    /// The `LOG_DIRS` environment variable, when set and non-empty, replaces
    /// the configured directories.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed, or if
    /// an explicit path was given and cannot be read.
    pub fn load(&self) -> Result<ShipperConfig, ConfigError> {
        let mut config = self.load_file()?;
        apply_log_dirs_override(&mut config, std::env::var(LOG_DIRS_ENV).ok().as_deref());
        Ok(config)
    }

    fn load_file(&self) -> Result<ShipperConfig, ConfigError> {
        if self.required {
            if let Some(path) = self.search_paths.first() {
                tracing::debug!(path = %path.display(), "Loading config file");
                return Self::load_from_path(path);
            }
        }

        for path in &self.search_paths {
            if path.exists() {
                tracing::debug!(path = %path.display(), "Loading config file");
                return Self::load_from_path(path);
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(ShipperConfig::default())
    }

    /// Load configuration from a specific path.
    fn load_from_path(path: &PathBuf) -> Result<ShipperConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.clone(),
            source: e,
        })
    }

    /// Get the search paths for debugging.
    #[must_use]
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Find the first config file that exists.
    #[must_use]
    pub fn find_config_file(&self) -> Option<PathBuf> {
        self.search_paths.iter().find(|p| p.exists()).cloned()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a comma-separated directory list, trimming entries and dropping
/// empty ones.
#[must_use]
pub fn parse_log_dirs(value: &str) -> Vec<PathBuf> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Replace the configured directories with those in `value`, if it lists any.
pub fn apply_log_dirs_override(config: &mut ShipperConfig, value: Option<&str>) {
    let Some(dirs) = value.map(parse_log_dirs) else {
        return;
    };
    if dirs.is_empty() {
        return;
    }
    tracing::debug!(count = dirs.len(), "Using log directories from {LOG_DIRS_ENV}");
    config.log_dirs = dirs;
}

/// Errors that can occur during configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid sink URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("No log directories configured")]
    NoLogDirs,

    #[error("tail_lines must be at least 1")]
    InvalidTailLines,
}
