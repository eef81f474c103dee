use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// git-flow branch kind. Doubles as the branch prefix and the directory
/// segment a worktree lives under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorktreeType {
    #[default]
    Feature,
    Bugfix,
    Hotfix,
    Release,
}

impl WorktreeType {
    pub fn all() -> [WorktreeType; 4] {
        [
            WorktreeType::Feature,
            WorktreeType::Bugfix,
            WorktreeType::Hotfix,
            WorktreeType::Release,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WorktreeType::Feature => "feature",
            WorktreeType::Bugfix => "bugfix",
            WorktreeType::Hotfix => "hotfix",
            WorktreeType::Release => "release",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            WorktreeType::Feature => "Feature",
            WorktreeType::Bugfix => "Bugfix",
            WorktreeType::Hotfix => "Hotfix",
            WorktreeType::Release => "Release",
        }
    }

    /// Exact, case-sensitive match against a path or branch segment.
    pub fn from_segment(segment: &str) -> Option<WorktreeType> {
        Self::all().into_iter().find(|t| t.as_str() == segment)
    }
}

impl std::fmt::Display for WorktreeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WorktreeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_segment(&s.to_ascii_lowercase())
            .ok_or_else(|| format!("unknown worktree type: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worktree_type_default_is_feature() {
        assert_eq!(WorktreeType::default(), WorktreeType::Feature);
    }

    #[test]
    fn from_segment_matches_exact_lowercase_only() {
        assert_eq!(
            WorktreeType::from_segment("hotfix"),
            Some(WorktreeType::Hotfix)
        );
        assert_eq!(
            WorktreeType::from_segment("Hotfix"),
            None,
            "from_segment: path segments are matched case-sensitively"
        );
        assert_eq!(WorktreeType::from_segment("PROJ-101"), None);
    }

    #[test]
    fn from_str_is_case_insensitive() {
        assert_eq!("Release".parse::<WorktreeType>(), Ok(WorktreeType::Release));
        assert!("chore".parse::<WorktreeType>().is_err());
    }

    #[test]
    fn worktree_type_serializes_to_yaml() {
        let yaml = serde_yaml::to_string(&WorktreeType::Bugfix).unwrap();
        assert_eq!(yaml.trim(), "bugfix");
    }
}
