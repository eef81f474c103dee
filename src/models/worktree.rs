use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::WorktreeType;
use crate::ordering::Favoritable;

/// A linked working directory discovered from the project's worktree registry.
///
/// `project_path` is a lookup key back to the owning [`super::Project`]; the
/// project holds no worktree collection of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worktree {
    pub path: PathBuf,
    pub project_path: PathBuf,
    /// Branch recorded in the registry entry's HEAD, when it points at one.
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub favorite: bool,
}

impl Worktree {
    pub fn new(path: PathBuf, project_path: PathBuf) -> Self {
        Self {
            path,
            project_path,
            branch: None,
            favorite: false,
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }
}

impl Favoritable for Worktree {
    fn key(&self) -> &Path {
        &self.path
    }

    fn is_favorite(&self) -> bool {
        self.favorite
    }

    fn set_favorite(&mut self, favorite: bool) {
        self.favorite = favorite;
    }
}

/// Semantic attributes recovered from a worktree's branch or path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Classification {
    pub kind: Option<WorktreeType>,
    pub issue_code: Option<String>,
    pub name: String,
}

/// A worktree ready for display: the record plus its classification.
#[derive(Debug, Clone, Serialize)]
pub struct WorktreeEntry {
    #[serde(flatten)]
    pub worktree: Worktree,
    #[serde(flatten)]
    pub classification: Classification,
    pub icon: &'static str,
}
