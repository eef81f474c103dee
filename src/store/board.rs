use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use super::kv::{load, save, KeyValueStore};
use crate::classify::annotate;
use crate::git::{list_worktrees, MetadataError};
use crate::models::{Project, Worktree, WorktreeEntry};
use crate::ordering::{Direction, OrderedFavoriteList};
use crate::utils::compute_path_hash;

pub fn favorites_key(project_path: &Path) -> String {
    format!("worktree-favorites-{}", compute_path_hash(project_path))
}

pub fn order_key(project_path: &Path) -> String {
    format!("worktree-order-{}", compute_path_hash(project_path))
}

#[derive(Debug, Error)]
pub enum BoardError {
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error("Worktree not found: {}", .0.display())]
    UnknownWorktree(PathBuf),

    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),
}

/// Ordered, favorite-partitioned worktrees of one project.
///
/// Membership always comes from the git registry; the store only contributes
/// the favorite set and the order of each section.
pub struct WorktreeBoard {
    project: Project,
    store: Arc<dyn KeyValueStore>,
    list: OrderedFavoriteList<Worktree>,
}

impl WorktreeBoard {
    pub async fn load(project: Project, store: Arc<dyn KeyValueStore>) -> Result<Self, BoardError> {
        let mut board = Self {
            project,
            store,
            list: OrderedFavoriteList::new(),
        };
        board.refresh().await?;
        Ok(board)
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Rediscovers worktrees and rebuilds the view. The newest result replaces the old one.
    pub async fn refresh(&mut self) -> Result<(), BoardError> {
        let discovered = list_worktrees(&self.project).await?;
        let favorites: Vec<PathBuf> = load(self.store.as_ref(), &favorites_key(&self.project.path))
            .await?
            .unwrap_or_default();
        let order: Vec<PathBuf> = load(self.store.as_ref(), &order_key(&self.project.path))
            .await?
            .unwrap_or_default();

        debug!(
            "Rebuilding {} worktrees for {}",
            discovered.len(),
            self.project.path.display()
        );
        self.list = OrderedFavoriteList::rebuild(discovered, &favorites, &order);
        Ok(())
    }

    pub fn get(&self, path: &Path) -> Option<&Worktree> {
        self.list.get(path)
    }

    pub fn worktrees(&self) -> Vec<&Worktree> {
        self.list.snapshot()
    }

    /// Classified entries for display: (favorites, regular).
    pub fn entries(&self) -> (Vec<WorktreeEntry>, Vec<WorktreeEntry>) {
        let (favorites, regular) = self.list.sections();
        let annotate_all =
            |items: Vec<&Worktree>| items.into_iter().cloned().map(annotate).collect::<Vec<_>>();
        (annotate_all(favorites), annotate_all(regular))
    }

    /// Returns the new favorite flag.
    pub async fn toggle_favorite(&mut self, path: &Path) -> Result<bool, BoardError> {
        let mut next = self.list.clone();
        let favorite = next
            .toggle_favorite(path)
            .ok_or_else(|| BoardError::UnknownWorktree(path.to_path_buf()))?;
        self.commit(next).await?;
        Ok(favorite)
    }

    /// Returns whether anything moved.
    pub async fn move_item(&mut self, path: &Path, direction: Direction) -> Result<bool, BoardError> {
        if !self.list.contains(path) {
            return Err(BoardError::UnknownWorktree(path.to_path_buf()));
        }
        let mut next = self.list.clone();
        if !next.move_item(path, direction) {
            return Ok(false);
        }
        self.commit(next).await?;
        Ok(true)
    }

    async fn commit(&mut self, next: OrderedFavoriteList<Worktree>) -> Result<(), BoardError> {
        let store = self.store.as_ref();
        save(store, &favorites_key(&self.project.path), &next.favorite_keys()).await?;
        save(store, &order_key(&self.project.path), &next.regular_keys()).await?;
        self.list = next;
        Ok(())
    }
}
