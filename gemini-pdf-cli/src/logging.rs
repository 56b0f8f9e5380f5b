//! Dual-sink logging: INFO to stderr, DEBUG to an append-only file.

use std::fs::OpenOptions;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::level_filters::LevelFilter;
use tracing::Subscriber;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::error::CliError;

pub const DEFAULT_LOG_FILE: &str = "upload_pdf.log";

/// Crates whose events reach the log file at `file_level`.
const FILE_TARGETS: [&str; 3] = ["gemini_pdf", "gemini_pdf_cli", "upload_pdf"];

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub file: PathBuf,
    /// Console level unless `RUST_LOG` says otherwise.
    pub console_level: LevelFilter,
    pub file_level: LevelFilter,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_LOG_FILE),
            console_level: LevelFilter::INFO,
            file_level: LevelFilter::DEBUG,
        }
    }
}

/// Builds the subscriber without installing it.
pub fn subscriber(config: &LogConfig) -> Result<impl Subscriber + Send + Sync, CliError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)
        .map_err(|source| CliError::LogFile {
            path: config.file.clone(),
            source,
        })?;

    let console_filter = EnvFilter::builder()
        .with_default_directive(config.console_level.into())
        .from_env_lossy();
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(true)
        .with_filter(console_filter);

    let file_filter = FILE_TARGETS
        .iter()
        .fold(Targets::new().with_default(LevelFilter::WARN), |targets, target| {
            targets.with_target(*target, config.file_level)
        });
    let file_layer = fmt::layer()
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_filter(file_filter);

    Ok(tracing_subscriber::registry().with(console).with(file_layer))
}

/// Installs the global subscriber.
pub fn init(config: &LogConfig) -> Result<(), CliError> {
    subscriber(config)?.try_init()?;
    Ok(())
}
