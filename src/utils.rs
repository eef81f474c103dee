use sha2::{Digest, Sha256};
use std::path::{Component, Path, PathBuf};

/// Shortens `s` to at most `max_chars` characters for table columns, marking
/// the cut with an ellipsis. Counts chars, not bytes.
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    let mut chars = s.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_none() {
        return head;
    }
    let keep = max_chars.saturating_sub(1);
    let mut cut: String = head.chars().take(keep).collect();
    cut.push('…');
    cut
}

/// Eight hex chars of SHA-256 over the raw path bytes. Keys per-project
/// storage; the path is hashed as given so a deleted checkout keeps its key.
pub fn compute_path_hash(path: &Path) -> String {
    let digest = Sha256::digest(path.as_os_str().as_encoded_bytes());
    hex::encode(&digest[..4])
}

/// Lexically resolves `.` and `..` components without touching the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Normal path segments, in order. Trailing separators and `.` are ignored.
pub fn path_segments(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

/// Segment `n` positions from the end (1 = last).
pub fn segment_from_end(segments: &[String], n: usize) -> Option<&str> {
    if n == 0 || n > segments.len() {
        return None;
    }
    segments.get(segments.len() - n).map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_str_leaves_fitting_text_alone() {
        assert_eq!(truncate_str("app", 3), "app");
        assert_eq!(truncate_str("", 0), "");
    }

    #[test]
    fn truncate_str_marks_the_cut() {
        assert_eq!(
            truncate_str("worktree-launcher", 8),
            "worktre…",
            "truncate_str: result should be max_chars long including the ellipsis"
        );
        assert_eq!(truncate_str("ab", 0), "…");
    }

    #[test]
    fn truncate_str_counts_chars_not_bytes() {
        assert_eq!(truncate_str("日本語のプロジェクト", 4), "日本語…");
        assert_eq!(truncate_str("日本語", 3), "日本語");
    }

    #[test]
    fn path_hash_is_stable_and_short() {
        let a = compute_path_hash(Path::new("/src/app"));
        assert_eq!(a, compute_path_hash(Path::new("/src/app")));
        assert_eq!(a.len(), 8);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, compute_path_hash(Path::new("/src/app2")));
    }

    #[test]
    fn normalize_path_resolves_parent_segments() {
        let path = Path::new("/src/app/../feature/PROJ-101/add-button");
        assert_eq!(
            normalize_path(path),
            PathBuf::from("/src/feature/PROJ-101/add-button"),
            "normalize_path: '..' should drop the previous segment"
        );
    }

    #[test]
    fn normalize_path_keeps_root() {
        assert_eq!(normalize_path(Path::new("/../a")), PathBuf::from("/a"));
    }

    #[test]
    fn normalize_path_drops_current_dir() {
        assert_eq!(
            normalize_path(Path::new("/a/./b/")),
            PathBuf::from("/a/b")
        );
    }

    #[test]
    fn path_segments_ignores_trailing_separator() {
        let segments = path_segments(Path::new("/src/feature/PROJ-1/x/"));
        assert_eq!(segments, vec!["src", "feature", "PROJ-1", "x"]);
        assert_eq!(segment_from_end(&segments, 1), Some("x"));
        assert_eq!(segment_from_end(&segments, 4), Some("src"));
        assert_eq!(segment_from_end(&segments, 5), None);
        assert_eq!(segment_from_end(&segments, 0), None);
    }
}
