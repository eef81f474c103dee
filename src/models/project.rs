use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ordering::Favoritable;

/// A tracked local repository. `path` is the identity key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub path: PathBuf,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub favorite: bool,
}

impl Project {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            name: None,
            favorite: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.name = if name.trim().is_empty() {
            None
        } else {
            Some(name)
        };
        self
    }

    /// Display label: the user-given name, else the directory name, else the full path.
    pub fn title(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn git_dir(&self) -> PathBuf {
        self.path.join(".git")
    }
}

impl Favoritable for Project {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_prefers_given_name() {
        let project = Project::new(PathBuf::from("/src/app")).with_name("My App");
        assert_eq!(project.title(), "My App");
    }

    #[test]
    fn title_falls_back_to_directory_name() {
        let project = Project::new(PathBuf::from("/src/app"));
        assert_eq!(
            project.title(),
            "app",
            "title: unnamed project should use its directory name"
        );
    }

    #[test]
    fn blank_name_is_treated_as_unset() {
        let project = Project::new(PathBuf::from("/src/app")).with_name("   ");
        assert_eq!(project.name, None);
    }

    #[test]
    fn project_deserializes_without_optional_fields() {
        let yaml = "path: /src/app\n";
        let project: Project = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(project.path, PathBuf::from("/src/app"));
        assert!(!project.favorite);
        assert!(project.name.is_none());
    }
}
