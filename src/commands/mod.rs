pub mod common;
pub mod project;
pub mod worktree;
