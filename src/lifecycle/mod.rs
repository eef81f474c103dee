mod guard;
mod runner;
mod validate;

pub use runner::{RemovalOutcome, WorktreeCommandRunner};
