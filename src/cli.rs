use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{project, worktree};

#[derive(Parser)]
#[command(name = "wtl")]
#[command(about = "Worktree launcher - track repositories and manage their git-flow worktrees")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Store and log directory (overrides config)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage tracked projects
    Project(project::Args),

    /// Manage a project's worktrees
    Worktree(worktree::Args),
}
