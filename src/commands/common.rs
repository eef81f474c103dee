use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Config;
use crate::models::Project;
use crate::store::{FileStore, KeyValueStore, ProjectCatalog};
use crate::utils::normalize_path;

/// The on-disk store under the configured data directory.
pub fn open_store(config: &Config) -> Arc<dyn KeyValueStore> {
    Arc::new(FileStore::new(config.store_dir()))
}

pub async fn open_catalog(config: &Config) -> Result<ProjectCatalog> {
    ProjectCatalog::load(open_store(config))
        .await
        .context("Failed to load project list")
}

/// Absolute form of a user-supplied path.
///
/// Existing paths are canonicalized; missing ones (a deleted checkout, say)
/// are resolved lexically against the current directory.
pub fn resolve_path(path: &Path) -> Result<PathBuf> {
    if let Ok(canonical) = path.canonicalize() {
        return Ok(canonical);
    }
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .context("Failed to read current directory")?
            .join(path)
    };
    Ok(normalize_path(&absolute))
}

/// Looks up a tracked project by a user-supplied path.
pub fn tracked_project(catalog: &ProjectCatalog, path: &Path) -> Result<Project> {
    let path = resolve_path(path)?;
    Ok(catalog.require(&path)?.clone())
}
