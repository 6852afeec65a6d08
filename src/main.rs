//! logship - tail text log files and ship classified lines to Loki.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use logship::config::{ConfigError, ConfigLoader, ShipperConfig};
use logship::display;
use logship::record::classify;
use logship::sink::LokiSink;
use logship::watcher::{application_name, start_monitoring, DirectoryScanner};

#[derive(Parser)]
#[command(
    name = "logship",
    about = "Tail text log files and ship classified lines to Loki",
    version
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a TOML config file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch log directories and ship new lines.
    Run {
        /// Root directory to scan (repeatable). Overrides config and LOG_DIRS.
        #[arg(short, long = "dir")]
        dirs: Vec<PathBuf>,
        /// Loki push endpoint.
        #[arg(long)]
        sink_url: Option<String>,
    },
    /// List the files that would be monitored and exit.
    Scan {
        /// Root directory to scan (repeatable). Overrides config and LOG_DIRS.
        #[arg(short, long = "dir")]
        dirs: Vec<PathBuf>,
    },
    /// Print the severity assigned to a message.
    Classify {
        /// The log line to classify.
        message: String,
    },
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

fn load_config(
    path: Option<PathBuf>,
    dirs: Vec<PathBuf>,
    sink_url: Option<String>,
) -> Result<ShipperConfig, ConfigError> {
    let loader = path.map_or_else(ConfigLoader::new, ConfigLoader::with_path);
    let mut config = loader.load()?;
    if !dirs.is_empty() {
        config.log_dirs = dirs;
    }
    if let Some(url) = sink_url {
        config.sink.url = url;
    }
    config.validate()?;
    Ok(config)
}

async fn run(config: ShipperConfig) -> ExitCode {
    let sink = match LokiSink::from_config(&config.sink) {
        Ok(sink) => sink,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create sink");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        dirs = ?config.log_dirs,
        sink = %sink.endpoint(),
        "Starting log monitor"
    );

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_token.cancel();
        }
    });

    let monitor = tokio::spawn(async move { start_monitoring(&config, sink, shutdown).await });

    match monitor.await {
        Ok(Ok(stats)) => {
            tracing::info!(
                forwarded = stats.forwarded,
                suppressed = stats.suppressed,
                sink_failures = stats.sink_failures,
                "Log monitor stopped"
            );
            ExitCode::SUCCESS
        }
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Failed to start file watcher");
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!(error = %e, "Monitor task failed");
            ExitCode::FAILURE
        }
    }
}

fn scan(config: &ShipperConfig) {
    let files = DirectoryScanner::new()
        .follow_links(config.watch.follow_links)
        .scan(&config.log_dirs);
    for path in &files {
        display::print_monitored(path, &application_name(path));
    }
    display::print_scan_summary(files.len(), config.log_dirs.len());
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run { dirs, sink_url } => match load_config(cli.config, dirs, sink_url) {
            Ok(config) => run(config).await,
            Err(e) => {
                tracing::error!(error = %e, "Invalid configuration");
                ExitCode::FAILURE
            }
        },
        Commands::Scan { dirs } => match load_config(cli.config, dirs, None) {
            Ok(config) => {
                scan(&config);
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!(error = %e, "Invalid configuration");
                ExitCode::FAILURE
            }
        },
        Commands::Classify { message } => {
            display::print_classified(classify(&message), &message);
            ExitCode::SUCCESS
        }
    }
}
