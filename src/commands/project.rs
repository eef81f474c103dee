use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Subcommand};
use futures::future::join_all;
use serde::Serialize;
use std::path::PathBuf;

use crate::commands::common::{open_catalog, resolve_path, tracked_project};
use crate::config::Config;
use crate::detect::{detect, ide_for, xcode_target};
use crate::git::current_branch;
use crate::models::{Project, ProjectType};
use crate::ordering::Direction;
use crate::utils::truncate_str;

#[derive(ClapArgs)]
pub struct Args {
    #[command(subcommand)]
    pub command: ProjectCommand,
}

#[derive(Subcommand)]
pub enum ProjectCommand {
    /// List tracked projects, favorites first
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Start tracking a git repository
    Add {
        path: PathBuf,

        /// Display label (default: directory name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Stop tracking a project
    Remove { path: PathBuf },

    /// Set the display label of a project
    Rename { path: PathBuf, name: String },

    /// Toggle a project's favorite flag
    Favorite { path: PathBuf },

    /// Move a project one slot within its section
    Move { path: PathBuf, direction: Direction },

    /// Show which IDE a project opens in
    Ide { path: PathBuf },

    /// Show the branch checked out in the primary working directory
    Branch { path: PathBuf },
}

#[derive(Debug, Serialize)]
struct ProjectRow {
    path: PathBuf,
    title: String,
    favorite: bool,
    project_type: ProjectType,
    icon: &'static str,
}

impl ProjectRow {
    fn new(project: &Project, project_type: ProjectType) -> Self {
        Self {
            path: project.path.clone(),
            title: project.title(),
            favorite: project.favorite,
            project_type,
            icon: project_type.icon(),
        }
    }
}

async fn rows(projects: Vec<&Project>) -> Vec<ProjectRow> {
    let kinds = join_all(projects.iter().map(|p| detect(&p.path))).await;
    projects
        .into_iter()
        .zip(kinds)
        .map(|(project, kind)| ProjectRow::new(project, kind))
        .collect()
}

fn print_rows(rows: &[ProjectRow]) {
    for row in rows {
        let star = if row.favorite { "★" } else { " " };
        println!(
            "{} {} {:<24} {}",
            star,
            row.icon,
            truncate_str(&row.title, 24),
            row.path.display()
        );
    }
}

pub async fn execute(args: Args, config: &Config) -> Result<()> {
    let mut catalog = open_catalog(config).await?;

    match args.command {
        ProjectCommand::List { json } => {
            if json {
                let all = rows(catalog.projects()).await;
                println!("{}", serde_json::to_string_pretty(&all)?);
                return Ok(());
            }
            if catalog.is_empty() {
                println!("No projects tracked. Add one with 'wtl project add <path>'.");
                return Ok(());
            }

            let (favorites, regular) = catalog.sections();
            let favorites = rows(favorites).await;
            let regular = rows(regular).await;
            if !favorites.is_empty() {
                println!("Favorites");
                print_rows(&favorites);
                println!();
            }
            if !regular.is_empty() {
                println!("Projects");
                print_rows(&regular);
            }
        }
        ProjectCommand::Add { path, name } => {
            let path = path
                .canonicalize()
                .with_context(|| format!("Failed to resolve project path: {}", path.display()))?;
            let project = catalog.add(&path, name).await?;
            println!("Added {} ({})", project.title(), project.path.display());
        }
        ProjectCommand::Remove { path } => {
            let project = catalog.remove(&resolve_path(&path)?).await?;
            println!("Removed {}", project.title());
        }
        ProjectCommand::Rename { path, name } => {
            let project = catalog.rename(&resolve_path(&path)?, &name).await?;
            println!("Renamed to {}", project.title());
        }
        ProjectCommand::Favorite { path } => {
            let path = resolve_path(&path)?;
            let favorite = catalog.toggle_favorite(&path).await?;
            let verb = if favorite { "Pinned" } else { "Unpinned" };
            println!("{} {}", verb, path.display());
        }
        ProjectCommand::Move { path, direction } => {
            let path = resolve_path(&path)?;
            if !catalog.move_project(&path, direction).await? {
                println!("{} is already at the edge of its section", path.display());
            }
        }
        ProjectCommand::Ide { path } => {
            let project = tracked_project(&catalog, &path)?;
            let kind = detect(&project.path).await;
            let ide = ide_for(kind);
            let target = match kind {
                ProjectType::Xcode => xcode_target(&project.path).await,
                _ => None,
            }
            .unwrap_or_else(|| project.path.clone());

            println!("{} {}", kind.icon(), ide.open_title());
            println!("Application: {}", ide.application_id);
            println!("Target:      {}", target.display());
        }
        ProjectCommand::Branch { path } => {
            let project = tracked_project(&catalog, &path)?;
            let head = current_branch(&project).await?;
            println!("{}", head.describe());
        }
    }

    Ok(())
}
