use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::guard::InFlight;
use super::validate::{validate_new_worktree, ValidationErrors};
use crate::classify::{branch_from_path, classify_branch};
use crate::config::{BranchStart, GitConfig};
use crate::git::{GitError, GitRunner, ProcessGit};
use crate::models::{Project, Worktree, WorktreeType};
use crate::utils::normalize_path;

fn path_to_str(path: &Path) -> Result<&str, WorktreeError> {
    path.to_str()
        .ok_or_else(|| WorktreeError::NonUtf8Path(path.to_path_buf()))
}

#[derive(Debug, Error)]
pub enum WorktreeError {
    #[error("Invalid worktree request: {0}")]
    Validation(ValidationErrors),

    #[error("Worktree has uncommitted changes: {}", .0.display())]
    UncommittedChanges(PathBuf),

    #[error("Another operation is already running for {}", .0.display())]
    Busy(PathBuf),

    #[error("Path contains non-UTF8 characters: {}", .0.display())]
    NonUtf8Path(PathBuf),

    #[error(transparent)]
    Git(#[from] GitError),
}

/// Result of a removal whose worktree deregistration succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalOutcome {
    /// Worktree and branch are gone. `branch` is None when no branch could be derived.
    Removed { branch: Option<String> },
    /// Worktree is gone but its branch could not be deleted.
    BranchCleanupFailed { branch: String, error: String },
}

/// Runs the git pipelines that create and remove worktrees.
///
/// Steps run strictly in order and stop at the first failure; steps already
/// completed are not rolled back.
pub struct WorktreeCommandRunner<G: GitRunner = ProcessGit> {
    git: G,
    mainline_branch: String,
    branch_start: BranchStart,
    in_flight: InFlight,
}

impl WorktreeCommandRunner<ProcessGit> {
    pub fn from_config(config: &GitConfig) -> Self {
        Self::new(
            ProcessGit::from_config(config),
            config.mainline_branch.clone(),
            config.branch_start,
        )
    }
}

impl<G: GitRunner> WorktreeCommandRunner<G> {
    pub fn new(git: G, mainline_branch: String, branch_start: BranchStart) -> Self {
        Self {
            git,
            mainline_branch,
            branch_start,
            in_flight: InFlight::new(),
        }
    }

    pub fn branch_name(kind: WorktreeType, issue_code: &str, name: &str) -> String {
        format!("{}/{}/{}", kind, issue_code, name)
    }

    /// `<project>/../<type>/<issue>/<name>`, resolved lexically.
    pub fn worktree_path(project_path: &Path, kind: WorktreeType, issue_code: &str, name: &str) -> PathBuf {
        normalize_path(
            &project_path
                .join("..")
                .join(kind.as_str())
                .join(issue_code)
                .join(name),
        )
    }

    pub async fn create(
        &self,
        project: &Project,
        kind: WorktreeType,
        issue_code: &str,
        name: &str,
    ) -> Result<Worktree, WorktreeError> {
        validate_new_worktree(issue_code, name).map_err(WorktreeError::Validation)?;

        let branch = Self::branch_name(kind, issue_code, name);
        let wt_path = Self::worktree_path(&project.path, kind, issue_code, name);
        let wt_path_str = path_to_str(&wt_path)?;

        let _guard = self
            .in_flight
            .try_acquire(&wt_path)
            .ok_or_else(|| WorktreeError::Busy(wt_path.clone()))?;

        info!("Starting branch {} from {}", branch, self.mainline_branch);
        match self.branch_start {
            BranchStart::GitFlow => {
                let flow_name = format!("{}/{}", issue_code, name);
                self.git
                    .run(
                        &project.path,
                        &["flow", kind.as_str(), "start", &flow_name, &self.mainline_branch],
                    )
                    .await?;
            }
            BranchStart::Plain => {
                self.git
                    .run(&project.path, &["branch", &branch, &self.mainline_branch])
                    .await?;
            }
        }

        self.git
            .run(&project.path, &["checkout", &self.mainline_branch])
            .await?;

        info!("Adding worktree {} on {}", wt_path.display(), branch);
        let added = self
            .git
            .run(&project.path, &["worktree", "add", wt_path_str, &branch])
            .await?;
        debug!("git worktree add: {}", added.stderr.trim());

        Ok(Worktree::new(wt_path, project.path.clone()).with_branch(branch))
    }

    /// True iff `git status --porcelain` in `path` prints any non-empty line.
    pub async fn has_uncommitted_changes(&self, path: &Path) -> Result<bool, WorktreeError> {
        let output = self.git.run(path, &["status", "--porcelain"]).await?;
        Ok(output.stdout.lines().any(|line| !line.is_empty()))
    }

    pub async fn remove(&self, worktree: &Worktree) -> Result<RemovalOutcome, WorktreeError> {
        let wt_path_str = path_to_str(&worktree.path)?;

        let _guard = self
            .in_flight
            .try_acquire(&worktree.path)
            .ok_or_else(|| WorktreeError::Busy(worktree.path.clone()))?;

        if self.has_uncommitted_changes(&worktree.path).await? {
            info!(
                "Not removing {}: uncommitted changes",
                worktree.path.display()
            );
            return Err(WorktreeError::UncommittedChanges(worktree.path.clone()));
        }

        info!("Removing worktree {}", worktree.path.display());
        self.git
            .run(&worktree.project_path, &["worktree", "remove", wt_path_str])
            .await?;

        // Only a branch following <type>/<issue>/<name> is ours to force-delete.
        let branch = worktree
            .branch
            .clone()
            .filter(|b| classify_branch(b).is_some())
            .or_else(|| branch_from_path(&worktree.path));
        let Some(branch) = branch else {
            return Ok(RemovalOutcome::Removed { branch: None });
        };

        match self
            .git
            .run(&worktree.project_path, &["branch", "-D", &branch])
            .await
        {
            Ok(_) => Ok(RemovalOutcome::Removed {
                branch: Some(branch),
            }),
            Err(e) => {
                warn!("Worktree removed but branch {} was not deleted: {}", branch, e);
                Ok(RemovalOutcome::BranchCleanupFailed {
                    branch,
                    error: e.to_string(),
                })
            }
        }
    }
}
