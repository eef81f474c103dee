mod loader;

pub use loader::{BranchStart, Config, GitConfig, DEFAULT_OUTPUT_LIMIT};
