pub mod metadata;
mod runner;

pub use metadata::{current_branch, list_worktrees, MetadataError};
#[cfg(test)]
pub use runner::mock_git;
pub use runner::{GitError, GitRunner, ProcessGit};
