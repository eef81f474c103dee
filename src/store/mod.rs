mod board;
mod catalog;
mod kv;

pub use board::WorktreeBoard;
pub use catalog::ProjectCatalog;
#[cfg(test)]
pub use kv::memory::MemoryStore;
pub use kv::{FileStore, KeyValueStore};
