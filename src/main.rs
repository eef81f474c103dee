use anyhow::{Context, Result};
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod classify;
mod cli;
mod commands;
mod config;
mod detect;
mod git;
mod lifecycle;
mod models;
mod ordering;
mod store;
mod utils;

use cli::{Cli, Commands};
use config::Config;

/// Logs go to a daily file so they never mix with command output.
fn init_logging(config: &Config) -> Result<WorkerGuard> {
    let log_dir = config.log_dir();
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory: {:?}", log_dir))?;

    let appender = tracing_appender::rolling::daily(&log_dir, "wtl.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_env("WTL_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load(cli.config)?;
    if let Some(dir) = cli.data_dir {
        config = config.with_data_dir(dir);
    }
    let _log_guard = init_logging(&config)?;

    match cli.command {
        Commands::Project(args) => commands::project::execute(args, &config).await,
        Commands::Worktree(args) => commands::worktree::execute(args, &config).await,
    }
}
