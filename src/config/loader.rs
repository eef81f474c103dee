use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::PathBuf;

/// Per-stream capture ceiling for git subprocesses.
pub const DEFAULT_OUTPUT_LIMIT: usize = 1024 * 1024;

/// How a new branch is started from the mainline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BranchStart {
    /// `git flow <type> start <issue>/<name> <mainline>`
    #[default]
    GitFlow,
    /// `git branch <type>/<issue>/<name> <mainline>`
    Plain,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    pub binary: String,
    pub mainline_branch: String,
    pub branch_start: BranchStart,
    pub output_limit_bytes: usize,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            binary: "git".to_string(),
            mainline_branch: "develop".to_string(),
            branch_start: BranchStart::default(),
            output_limit_bytes: DEFAULT_OUTPUT_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub git: GitConfig,
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Reads YAML from `config_path`, else `default_config_path()`. A missing
    /// file yields defaults; an unreadable or malformed one is an error.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let path = config_path.unwrap_or_else(Self::default_config_path);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("Cannot read config {}", path.display()))
            }
        };
        serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))
    }

    /// `$WTL_CONFIG`, else `<config_dir>/wtl/config.yaml`.
    pub fn default_config_path() -> PathBuf {
        match std::env::var_os("WTL_CONFIG") {
            Some(path) => PathBuf::from(path),
            None => dirs::config_dir()
                .map(|dir| dir.join("wtl"))
                .unwrap_or_default()
                .join("config.yaml"),
        }
    }

    /// Store and log location: config value, then `$WTL_DATA_DIR`, then the platform data dir.
    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        if let Some(dir) = std::env::var_os("WTL_DATA_DIR") {
            return PathBuf::from(dir);
        }
        dirs::data_dir().unwrap_or_default().join("wtl")
    }

    pub fn store_dir(&self) -> PathBuf {
        self.data_dir().join("store")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir().join("logs")
    }

    pub fn with_data_dir(mut self, dir: PathBuf) -> Self {
        self.data_dir = Some(dir);
        self
    }

    pub fn with_mainline_branch(mut self, branch: impl Into<String>) -> Self {
        self.git.mainline_branch = branch.into();
        self
    }

    pub fn with_branch_start(mut self, start: BranchStart) -> Self {
        self.git.branch_start = start;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn config_default_uses_git_flow_from_develop() {
        let config = Config::default();
        assert_eq!(config.git.binary, "git");
        assert_eq!(config.git.mainline_branch, "develop");
        assert_eq!(config.git.branch_start, BranchStart::GitFlow);
        assert_eq!(config.git.output_limit_bytes, 1024 * 1024);
    }

    #[test]
    fn config_loads_from_yaml_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let yaml = r#"
git:
  binary: "/usr/local/bin/git"
  mainline_branch: "main"
  branch_start: plain
  output_limit_bytes: 4096
data_dir: "/tmp/wtl-data"
"#;
        std::fs::write(&config_path, yaml).unwrap();

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.git.binary, "/usr/local/bin/git");
        assert_eq!(config.git.mainline_branch, "main");
        assert_eq!(config.git.branch_start, BranchStart::Plain);
        assert_eq!(config.git.output_limit_bytes, 4096);
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/wtl-data"));
    }

    #[test]
    fn config_load_returns_default_when_file_missing() {
        let config = Config::load(Some(PathBuf::from("/nonexistent/config.yaml"))).unwrap();
        assert_eq!(config.git.mainline_branch, "develop");
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn config_load_fills_missing_sections_with_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        std::fs::write(&config_path, "data_dir: /tmp/x\n").unwrap();

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(
            config.git.mainline_branch, "develop",
            "load: absent git section should fall back to defaults"
        );
    }

    #[test]
    fn config_rejects_malformed_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        std::fs::write(&config_path, "git: [unclosed").unwrap();

        assert!(Config::load(Some(config_path)).is_err());
    }

    #[test]
    fn config_derived_dirs_live_under_data_dir() {
        let config = Config::default().with_data_dir(PathBuf::from("/tmp/wtl"));
        assert_eq!(config.store_dir(), PathBuf::from("/tmp/wtl/store"));
        assert_eq!(config.log_dir(), PathBuf::from("/tmp/wtl/logs"));
    }

    #[test]
    fn config_builders_override_git_settings() {
        let config = Config::default()
            .with_mainline_branch("main")
            .with_branch_start(BranchStart::Plain);
        assert_eq!(config.git.mainline_branch, "main");
        assert_eq!(config.git.branch_start, BranchStart::Plain);
    }
}
