//! Colored CLI display utilities.

use std::path::Path;

use owo_colors::OwoColorize;

use crate::record::SeverityLevel;

/// Tag shown for a severity level, e.g. `[ERROR]`.
#[must_use]
pub fn severity_tag(level: SeverityLevel) -> String {
    format!("[{}]", level.as_str().to_uppercase())
}

/// Print a file that would be monitored and the application it belongs to.
pub fn print_monitored(path: &Path, app: &str) {
    println!(
        "{} {} {}",
        "[WATCH]".cyan().bold(),
        path.display(),
        format!("app={app}").dimmed()
    );
}

/// Print the outcome of a scan.
pub fn print_scan_summary(files: usize, roots: usize) {
    println!(
        "{} {files} file(s) under {roots} root(s)",
        "[SCAN]".blue().bold()
    );
}

/// Print a message with its classified severity.
pub fn print_classified(level: SeverityLevel, message: &str) {
    let tag = severity_tag(level);
    match level {
        SeverityLevel::Error => println!("{} {message}", tag.red().bold()),
        SeverityLevel::Warning => println!("{} {message}", tag.yellow().bold()),
        SeverityLevel::Info => println!("{} {message}", tag.green().bold()),
    }
}
