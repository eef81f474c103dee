use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::debug;

use crate::models::{Project, Worktree};

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MetadataError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// What a HEAD file points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadState {
    Branch(String),
    Detached(String),
}

impl HeadState {
    pub fn branch(&self) -> Option<&str> {
        match self {
            HeadState::Branch(name) => Some(name),
            HeadState::Detached(_) => None,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            HeadState::Branch(name) => name.clone(),
            HeadState::Detached(sha) => {
                let short: String = sha.chars().take(7).collect();
                format!("detached at {short}")
            }
        }
    }
}

/// Parses HEAD contents: `ref: refs/heads/<name>` or a bare object id.
pub fn parse_head(contents: &str) -> HeadState {
    let line = contents.trim();
    match line.strip_prefix("ref:") {
        Some(target) => {
            let target = target.trim();
            let name = target.strip_prefix("refs/heads/").unwrap_or(target);
            HeadState::Branch(name.to_string())
        }
        None => HeadState::Detached(line.to_string()),
    }
}

/// Resolves a registry `gitdir` record to the worktree's working directory.
///
/// Line endings are stripped and one trailing `.git` component is removed.
pub fn resolve_gitdir(contents: &str) -> PathBuf {
    let trimmed = contents.trim_end_matches(['\r', '\n']);
    let path = Path::new(trimmed);
    match (path.file_name(), path.parent()) {
        (Some(name), Some(parent)) if name == ".git" => parent.to_path_buf(),
        _ => path.to_path_buf(),
    }
}

pub fn registry_dir(project_path: &Path) -> PathBuf {
    project_path.join(".git").join("worktrees")
}

/// Discovers linked worktrees from `<project>/.git/worktrees/*/gitdir`.
///
/// A missing `.git` directory or registry means no worktrees. Any other read
/// failure is returned.
pub async fn list_worktrees(project: &Project) -> Result<Vec<Worktree>, MetadataError> {
    let registry = registry_dir(&project.path);

    // A `.git` file (submodule or linked checkout) has no registry of its own.
    let git_dir = project.git_dir();
    match fs::metadata(&git_dir).await {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            debug!("No git directory at {}", git_dir.display());
            return Ok(Vec::new());
        }
        Err(e) if e.kind() == ErrorKind::NotFound || under_regular_file(&git_dir).await => {
            debug!("No git directory at {}", git_dir.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(MetadataError::io(&git_dir, e)),
    }

    let mut entries = match fs::read_dir(&registry).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No worktree registry at {}", registry.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(MetadataError::io(&registry, e)),
    };

    let mut worktrees = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| MetadataError::io(&registry, e))?
    {
        let entry_path = entry.path();
        let file_type = entry
            .file_type()
            .await
            .map_err(|e| MetadataError::io(&entry_path, e))?;
        if !file_type.is_dir() {
            continue;
        }

        let worktree = read_entry(&entry_path, &project.path).await?;
        debug!(
            "Discovered worktree {} ({})",
            worktree.path.display(),
            worktree.branch.as_deref().unwrap_or("no branch")
        );
        worktrees.push(worktree);
    }

    Ok(worktrees)
}

/// True when some ancestor of `path` exists but is not a directory, so `path`
/// itself cannot exist.
async fn under_regular_file(path: &Path) -> bool {
    for ancestor in path.ancestors().skip(1) {
        if let Ok(meta) = fs::metadata(ancestor).await {
            return !meta.is_dir();
        }
    }
    false
}

async fn read_entry(entry_path: &Path, project_path: &Path) -> Result<Worktree, MetadataError> {
    let gitdir_path = entry_path.join("gitdir");
    let contents = fs::read_to_string(&gitdir_path)
        .await
        .map_err(|e| MetadataError::io(&gitdir_path, e))?;

    let mut worktree = Worktree::new(resolve_gitdir(&contents), project_path.to_path_buf());

    let head_path = entry_path.join("HEAD");
    match fs::read_to_string(&head_path).await {
        Ok(head) => {
            worktree.branch = parse_head(&head).branch().map(str::to_string);
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(MetadataError::io(&head_path, e)),
    }

    Ok(worktree)
}

/// Reads `<project>/.git/HEAD`.
pub async fn current_branch(project: &Project) -> Result<HeadState, MetadataError> {
    let head_path = project.git_dir().join("HEAD");
    let contents = fs::read_to_string(&head_path)
        .await
        .map_err(|e| MetadataError::io(&head_path, e))?;
    Ok(parse_head(&contents))
}
