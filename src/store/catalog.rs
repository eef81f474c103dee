use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use super::board::{favorites_key, order_key};
use super::kv::{load, save, KeyValueStore};
use crate::models::Project;
use crate::ordering::{Direction, OrderedFavoriteList};
use crate::utils::normalize_path;

pub const PROJECTS_KEY: &str = "projects";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Project path must be absolute: {}", .0.display())]
    RelativePath(PathBuf),

    #[error("Not a git repository (no .git entry): {}", .0.display())]
    NotARepository(PathBuf),

    #[error("Project already tracked: {}", .0.display())]
    Duplicate(PathBuf),

    #[error("Project not tracked: {}", .0.display())]
    UnknownProject(PathBuf),

    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),
}

/// The tracked project list, favorites first.
///
/// Every mutation is applied to a copy, persisted, and only then adopted, so
/// the stored list and the in-memory view never disagree.
pub struct ProjectCatalog {
    store: Arc<dyn KeyValueStore>,
    list: OrderedFavoriteList<Project>,
}

impl ProjectCatalog {
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Result<Self, CatalogError> {
        let projects: Vec<Project> = load(store.as_ref(), PROJECTS_KEY)
            .await?
            .unwrap_or_default();
        let list = OrderedFavoriteList::from_ordered(projects);
        debug!("Loaded {} projects", list.len());
        Ok(Self { store, list })
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn projects(&self) -> Vec<&Project> {
        self.list.snapshot()
    }

    pub fn sections(&self) -> (Vec<&Project>, Vec<&Project>) {
        self.list.sections()
    }

    pub fn get(&self, path: &Path) -> Option<&Project> {
        self.list.get(path)
    }

    pub fn require(&self, path: &Path) -> Result<&Project, CatalogError> {
        self.get(path)
            .ok_or_else(|| CatalogError::UnknownProject(path.to_path_buf()))
    }

    pub async fn add(&mut self, path: &Path, name: Option<String>) -> Result<Project, CatalogError> {
        if !path.is_absolute() {
            return Err(CatalogError::RelativePath(path.to_path_buf()));
        }
        let path = normalize_path(path);

        let has_git = tokio::fs::try_exists(path.join(".git")).await.unwrap_or(false);
        if !has_git {
            return Err(CatalogError::NotARepository(path));
        }
        if self.list.contains(&path) {
            return Err(CatalogError::Duplicate(path));
        }

        let mut project = Project::new(path);
        if let Some(name) = name {
            project = project.with_name(name);
        }

        let mut next = self.list.clone();
        next.insert(project.clone());
        self.commit(next).await?;

        info!("Added project {}", project.path.display());
        Ok(project)
    }

    /// Stops tracking a project and drops its stored worktree preferences.
    pub async fn remove(&mut self, path: &Path) -> Result<Project, CatalogError> {
        let mut next = self.list.clone();
        let project = next
            .remove(path)
            .ok_or_else(|| CatalogError::UnknownProject(path.to_path_buf()))?;
        self.commit(next).await?;

        self.store.remove(&favorites_key(path)).await?;
        self.store.remove(&order_key(path)).await?;

        info!("Removed project {}", path.display());
        Ok(project)
    }

    pub async fn rename(&mut self, path: &Path, name: &str) -> Result<Project, CatalogError> {
        let mut next = self.list.clone();
        let project = next
            .get_mut(path)
            .ok_or_else(|| CatalogError::UnknownProject(path.to_path_buf()))?;
        *project = project.clone().with_name(name);
        let renamed = project.clone();

        self.commit(next).await?;
        Ok(renamed)
    }

    /// Returns the new favorite flag.
    pub async fn toggle_favorite(&mut self, path: &Path) -> Result<bool, CatalogError> {
        let mut next = self.list.clone();
        let favorite = next
            .toggle_favorite(path)
            .ok_or_else(|| CatalogError::UnknownProject(path.to_path_buf()))?;
        self.commit(next).await?;
        Ok(favorite)
    }

    /// Returns whether anything moved.
    pub async fn move_project(&mut self, path: &Path, direction: Direction) -> Result<bool, CatalogError> {
        if !self.list.contains(path) {
            return Err(CatalogError::UnknownProject(path.to_path_buf()));
        }
        let mut next = self.list.clone();
        if !next.move_item(path, direction) {
            return Ok(false);
        }
        self.commit(next).await?;
        Ok(true)
    }

    async fn commit(&mut self, next: OrderedFavoriteList<Project>) -> Result<(), CatalogError> {
        save(self.store.as_ref(), PROJECTS_KEY, &next.to_vec()).await?;
        self.list = next;
        Ok(())
    }
}
