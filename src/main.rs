//! Comment Expander
//!
//! Attaches to a Chrome tab over the DevTools Protocol and reveals every
//! collapsed or lazy-loaded comment thread on it.

use std::path::PathBuf;

use clap::Parser;
use tracing::error;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use expander_config::Config;

mod cli;
mod commands;

use cli::Cli;

/// Initialize tracing with console and file output.
///
/// Log files are written to ~/.comment-expander/logs/ with daily rotation.
fn init_tracing(log_dir: PathBuf) -> anyhow::Result<()> {
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("comment-expander")
        .filename_suffix("log")
        .max_log_files(14)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Flushes buffered lines on exit.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        // Console goes to stderr; stdout carries results.
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(true)
                .with_writer(std::io::stderr),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing(Config::home_dir().join("logs"))?;

    let cli = Cli::parse();

    commands::dispatch(cli).await.inspect_err(|e| error!("{:#}", e))
}
