//! Recovers type, issue code and display name for a worktree.
//!
//! The recorded branch (`<type>/<issue>/<name>`) is the canonical source. The
//! directory layout `<root>/<type>/<issue>/<name>` is the fallback when the
//! worktree has no branch or the branch does not follow the convention.

use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

use crate::models::{Classification, Worktree, WorktreeEntry, WorktreeType};
use crate::utils::{path_segments, segment_from_end};

const FALLBACK_ICON: &str = "📂";

fn issue_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[A-Z]+-[0-9]+").expect("static issue pattern"))
}

/// Type from the segment three or four positions up from the leaf.
pub fn classify_type(path: &Path) -> Option<WorktreeType> {
    let segments = path_segments(path);
    [3, 4]
        .into_iter()
        .filter_map(|n| segment_from_end(&segments, n))
        .find_map(WorktreeType::from_segment)
}

/// The worktree's leaf directory name.
pub fn display_name(path: &Path) -> String {
    let segments = path_segments(path);
    segment_from_end(&segments, 1)
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

/// Issue code found in the parent directory name.
pub fn issue_code(path: &Path) -> Option<String> {
    let segments = path_segments(path);
    segment_from_end(&segments, 2).and_then(extract_issue_code)
}

pub fn extract_issue_code(segment: &str) -> Option<String> {
    issue_pattern()
        .find(segment)
        .map(|m| m.as_str().to_string())
}

pub fn icon_for(kind: Option<WorktreeType>) -> &'static str {
    match kind {
        Some(WorktreeType::Feature) => "🔧",
        Some(WorktreeType::Bugfix) => "🐞",
        Some(WorktreeType::Hotfix) => "🔥",
        Some(WorktreeType::Release) => "🚀",
        None => FALLBACK_ICON,
    }
}

pub fn classify_path(path: &Path) -> Classification {
    Classification {
        kind: classify_type(path),
        issue_code: issue_code(path),
        name: display_name(path),
    }
}

/// Parses `<type>/<issue>/<name>`; the name may itself contain slashes.
pub fn classify_branch(branch: &str) -> Option<Classification> {
    let mut parts = branch.splitn(3, '/');
    let kind = WorktreeType::from_segment(parts.next()?)?;
    let issue = parts.next()?;
    let name = parts.next()?;
    if issue.is_empty() || name.is_empty() {
        return None;
    }
    Some(Classification {
        kind: Some(kind),
        issue_code: extract_issue_code(issue),
        name: name.to_string(),
    })
}

pub fn classify(worktree: &Worktree) -> Classification {
    worktree
        .branch
        .as_deref()
        .and_then(classify_branch)
        .unwrap_or_else(|| classify_path(&worktree.path))
}

pub fn annotate(worktree: Worktree) -> WorktreeEntry {
    let classification = classify(&worktree);
    let icon = icon_for(classification.kind);
    WorktreeEntry {
        worktree,
        classification,
        icon,
    }
}

/// Branch name from the trailing `<type>/<issue>/<name>` segments of a worktree path.
pub fn branch_from_path(path: &Path) -> Option<String> {
    let segments = path_segments(path);
    if segments.len() < 3 {
        return None;
    }
    Some(segments[segments.len() - 3..].join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::path::PathBuf;

    #[test]
    fn classify_type_reads_third_segment_from_end() {
        let path = Path::new("/src/feature/PROJ-101/add-button");
        assert_eq!(classify_type(path), Some(WorktreeType::Feature));
    }

    #[test]
    fn classify_type_accepts_intermediate_container() {
        let path = Path::new("/src/hotfix/PROJ-9/crash/app");
        assert_eq!(
            classify_type(path),
            Some(WorktreeType::Hotfix),
            "classify_type: type one level further up should also match"
        );
    }

    #[test]
    fn classify_type_ignores_trailing_separator() {
        let path = Path::new("/src/release/REL-2/v2/");
        assert_eq!(classify_type(path), Some(WorktreeType::Release));
    }

    #[test]
    fn classify_type_none_for_unconventional_paths() {
        assert_eq!(classify_type(Path::new("/src/app")), None);
        assert_eq!(classify_type(Path::new("/")), None);
        assert_eq!(classify_type(Path::new("")), None);
    }

    #[test]
    fn display_name_is_leaf_segment() {
        assert_eq!(
            display_name(Path::new("/src/feature/PROJ-101/add-button")),
            "add-button"
        );
    }

    #[test]
    fn issue_code_extracts_from_parent_segment() {
        assert_eq!(
            issue_code(Path::new("/src/feature/PROJ-101/add-button")),
            Some("PROJ-101".to_string())
        );
    }

    #[test]
    fn issue_code_none_when_segment_does_not_match() {
        assert_eq!(
            issue_code(Path::new("/src/feature/notanissue/add-button")),
            None,
            "issue_code: segments without LETTERS-DIGITS should yield none"
        );
    }

    #[test]
    fn extract_issue_code_finds_code_inside_segment() {
        assert_eq!(
            extract_issue_code("PROJ-101"),
            Some("PROJ-101".to_string())
        );
        assert_eq!(
            extract_issue_code("wip-ABC-42-old"),
            Some("ABC-42".to_string())
        );
        assert_eq!(extract_issue_code("notanissue"), None);
        assert_eq!(extract_issue_code("proj-101"), None);
    }

    #[test]
    fn icon_for_covers_every_type_and_fallback() {
        let icons: Vec<_> = WorktreeType::all()
            .into_iter()
            .map(|t| icon_for(Some(t)))
            .collect();
        assert_eq!(icons, vec!["🔧", "🐞", "🔥", "🚀"]);
        assert_eq!(icon_for(None), "📂");
    }

    #[test]
    fn classify_branch_parses_convention() {
        let c = classify_branch("bugfix/PROJ-5/null-check/part-2").unwrap();
        assert_eq!(c.kind, Some(WorktreeType::Bugfix));
        assert_eq!(c.issue_code.as_deref(), Some("PROJ-5"));
        assert_eq!(c.name, "null-check/part-2");
    }

    #[test]
    fn classify_branch_rejects_other_shapes() {
        assert!(classify_branch("main").is_none());
        assert!(classify_branch("feature/only-two").is_none());
        assert!(classify_branch("chore/PROJ-1/x").is_none());
        assert!(classify_branch("feature//x").is_none());
    }

    #[test]
    fn classify_prefers_branch_over_path() {
        let worktree = Worktree::new(
            PathBuf::from("/src/wt/moved-here"),
            PathBuf::from("/src/app"),
        )
        .with_branch("release/REL-3/v3");

        let c = classify(&worktree);
        assert_eq!(
            c.kind,
            Some(WorktreeType::Release),
            "classify: branch name should win over path layout"
        );
        assert_eq!(c.name, "v3");
    }

    #[test]
    fn classify_falls_back_to_path_without_branch() {
        let worktree = Worktree::new(
            PathBuf::from("/src/feature/PROJ-101/add-button"),
            PathBuf::from("/src/app"),
        );

        let entry = annotate(worktree);
        assert_eq!(entry.classification.kind, Some(WorktreeType::Feature));
        assert_eq!(entry.classification.issue_code.as_deref(), Some("PROJ-101"));
        assert_eq!(entry.classification.name, "add-button");
        assert_eq!(entry.icon, "🔧");
    }

    #[test]
    fn classify_falls_back_to_path_for_unconventional_branch() {
        let worktree = Worktree::new(
            PathBuf::from("/src/hotfix/OPS-1/disk"),
            PathBuf::from("/src/app"),
        )
        .with_branch("tmp");

        assert_eq!(classify(&worktree).kind, Some(WorktreeType::Hotfix));
    }

    #[test]
    fn branch_from_path_joins_last_three_segments() {
        assert_eq!(
            branch_from_path(Path::new("/src/feature/PROJ-101/add-button")),
            Some("feature/PROJ-101/add-button".to_string())
        );
        assert_eq!(branch_from_path(Path::new("/a/b")), None);
    }

    proptest! {
        #[test]
        fn classification_is_total(path in "\\PC{0,80}") {
            let path = Path::new(&path);
            let _ = classify_type(path);
            let _ = display_name(path);
            let _ = issue_code(path);
            let _ = icon_for(classify_type(path));
        }

        #[test]
        fn issue_code_round_trips(
            prefix in "(/[a-z0-9]{1,8}){0,3}",
            kind in prop::sample::select(vec!["feature", "bugfix", "hotfix", "release"]),
            letters in "[A-Z]{1,6}",
            digits in "[0-9]{1,6}",
            name in "[a-z][a-z0-9-]{0,16}",
        ) {
            let code = format!("{letters}-{digits}");
            let path = format!("{prefix}/{kind}/{code}/{name}");
            prop_assert_eq!(issue_code(Path::new(&path)), Some(code));
            prop_assert_eq!(
                classify_type(Path::new(&path)).map(|t| t.as_str()),
                Some(kind)
            );
        }

        #[test]
        fn classification_is_idempotent(path in "(/[a-zA-Z0-9-]{1,10}){0,6}") {
            let path = Path::new(&path);
            prop_assert_eq!(classify_path(path), classify_path(path));
        }
    }
}
