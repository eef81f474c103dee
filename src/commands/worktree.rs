use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Subcommand};
use std::path::{Path, PathBuf};

use crate::classify::annotate;
use crate::commands::common::{open_catalog, open_store, resolve_path, tracked_project};
use crate::config::{BranchStart, Config};
use crate::lifecycle::{RemovalOutcome, WorktreeCommandRunner};
use crate::models::{Worktree, WorktreeEntry, WorktreeType};
use crate::ordering::Direction;
use crate::store::WorktreeBoard;

#[derive(ClapArgs)]
pub struct Args {
    #[command(subcommand)]
    pub command: WorktreeCommand,
}

#[derive(Subcommand)]
pub enum WorktreeCommand {
    /// List a project's worktrees, favorites first
    List {
        project: PathBuf,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Start a branch from the mainline and check it out in a new worktree
    Create {
        project: PathBuf,

        /// Branch kind: feature, bugfix, hotfix or release
        #[arg(short = 't', long = "type", default_value = "feature")]
        kind: WorktreeType,

        /// Issue code, e.g. PROJ-101
        issue: String,

        /// Short name, used as the final path segment
        name: String,

        /// Branch to start from (overrides config)
        #[arg(long)]
        mainline: Option<String>,

        /// Start the branch with plain `git branch` instead of git-flow
        #[arg(long)]
        plain: bool,
    },

    /// Remove a clean worktree and delete its branch
    Remove { project: PathBuf, worktree: PathBuf },

    /// Toggle a worktree's favorite flag
    Favorite { project: PathBuf, worktree: PathBuf },

    /// Move a worktree one slot within its section
    Move {
        project: PathBuf,
        worktree: PathBuf,
        direction: Direction,
    },

    /// Report whether a worktree has uncommitted changes
    Status { worktree: PathBuf },
}

fn print_entries(entries: &[WorktreeEntry]) {
    for entry in entries {
        let star = if entry.worktree.favorite { "★" } else { " " };
        let kind = entry
            .classification
            .kind
            .map(|k| k.title())
            .unwrap_or("-");
        println!(
            "{} {} {:<8} {:<12} {:<24} {}",
            star,
            entry.icon,
            kind,
            entry.classification.issue_code.as_deref().unwrap_or("-"),
            entry.classification.name,
            entry.worktree.path.display()
        );
    }
}

async fn open_board(config: &Config, project: &Path) -> Result<WorktreeBoard> {
    let catalog = open_catalog(config).await?;
    let project = tracked_project(&catalog, project)?;
    WorktreeBoard::load(project, open_store(config))
        .await
        .context("Failed to read worktrees")
}

pub async fn execute(args: Args, config: &Config) -> Result<()> {
    match args.command {
        WorktreeCommand::List { project, json } => {
            let board = open_board(config, &project).await?;

            if json {
                let all: Vec<WorktreeEntry> =
                    board.worktrees().into_iter().cloned().map(annotate).collect();
                println!("{}", serde_json::to_string_pretty(&all)?);
                return Ok(());
            }

            let (favorites, regular) = board.entries();
            if favorites.is_empty() && regular.is_empty() {
                println!("No worktrees for {}", board.project().title());
                return Ok(());
            }
            if !favorites.is_empty() {
                println!("Favorites");
                print_entries(&favorites);
                println!();
            }
            if !regular.is_empty() {
                println!("Worktrees");
                print_entries(&regular);
            }
        }
        WorktreeCommand::Create {
            project,
            kind,
            issue,
            name,
            mainline,
            plain,
        } => {
            let catalog = open_catalog(config).await?;
            let project = tracked_project(&catalog, &project)?;

            let mut config = config.clone();
            if let Some(branch) = mainline {
                config = config.with_mainline_branch(branch);
            }
            if plain {
                config = config.with_branch_start(BranchStart::Plain);
            }
            let runner = WorktreeCommandRunner::from_config(&config.git);

            let worktree = runner.create(&project, kind, &issue, &name).await?;
            println!(
                "Created {} on {}",
                worktree.path.display(),
                worktree.branch.as_deref().unwrap_or("-")
            );
        }
        WorktreeCommand::Remove { project, worktree } => {
            let board = open_board(config, &project).await?;
            let path = resolve_path(&worktree)?;
            let worktree = board
                .get(&path)
                .cloned()
                .with_context(|| format!("Not a worktree of this project: {}", path.display()))?;
            let runner = WorktreeCommandRunner::from_config(&config.git);

            match runner.remove(&worktree).await? {
                RemovalOutcome::Removed { branch: Some(branch) } => {
                    println!("Removed {} and branch {}", worktree.path.display(), branch);
                }
                RemovalOutcome::Removed { branch: None } => {
                    println!("Removed {}", worktree.path.display());
                }
                RemovalOutcome::BranchCleanupFailed { branch, error } => {
                    println!("Removed {}", worktree.path.display());
                    eprintln!("Warning: branch {} was not deleted: {}", branch, error);
                }
            }
        }
        WorktreeCommand::Favorite { project, worktree } => {
            let mut board = open_board(config, &project).await?;
            let path = resolve_path(&worktree)?;
            let favorite = board.toggle_favorite(&path).await?;
            let verb = if favorite { "Pinned" } else { "Unpinned" };
            println!("{} {}", verb, path.display());
        }
        WorktreeCommand::Move {
            project,
            worktree,
            direction,
        } => {
            let mut board = open_board(config, &project).await?;
            let path = resolve_path(&worktree)?;
            if !board.move_item(&path, direction).await? {
                println!("{} is already at the edge of its section", path.display());
            }
        }
        WorktreeCommand::Status { worktree } => {
            let path = resolve_path(&worktree)?;
            let runner = WorktreeCommandRunner::from_config(&config.git);
            let dirty = runner.has_uncommitted_changes(&path).await?;
            let entry = annotate(Worktree::new(path.clone(), PathBuf::new()));

            println!("{} {}", entry.icon, entry.classification.name);
            println!("Path:   {}", path.display());
            if let Some(issue) = &entry.classification.issue_code {
                println!("Issue:  {}", issue);
            }
            println!(
                "Status: {}",
                if dirty { "uncommitted changes" } else { "clean" }
            );
        }
    }

    Ok(())
}
