//! logship - tail text log files and ship classified lines to Loki.

pub mod config;
pub mod display;
pub mod record;
pub mod sink;
pub mod watcher;
