mod project;
mod project_type;
mod worktree;
mod worktree_type;

pub use project::Project;
pub use project_type::{Ide, ProjectType};
pub use worktree::{Classification, Worktree, WorktreeEntry};
pub use worktree_type::WorktreeType;
