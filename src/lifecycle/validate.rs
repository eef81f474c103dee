use regex::Regex;
use std::sync::OnceLock;

fn issue_code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Z]+-[0-9]+$").expect("static issue code pattern"))
}

/// Per-field messages for the new-worktree form. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    pub name: Option<String>,
    pub issue_code: Option<String>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.issue_code.is_none()
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<&str> = [self.issue_code.as_deref(), self.name.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        write!(f, "{}", messages.join("; "))
    }
}

pub fn validate_new_worktree(issue_code: &str, name: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if name.is_empty() {
        errors.name = Some("Name is required".to_string());
    } else if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        errors.name = Some("Name must be a single path segment".to_string());
    }

    if issue_code.is_empty() {
        errors.issue_code = Some("Issue code is required".to_string());
    } else if !issue_code_pattern().is_match(issue_code) {
        errors.issue_code = Some("Issue code must be in format PROJ-101".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
