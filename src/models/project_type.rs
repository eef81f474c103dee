use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    Xcode,
    Android,
    Php,
    #[default]
    Other,
}

impl ProjectType {
    pub fn icon(&self) -> &'static str {
        match self {
            ProjectType::Xcode => "📱",
            ProjectType::Android => "🤖",
            ProjectType::Php => "🐘",
            ProjectType::Other => "💻",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Ide {
    pub display_name: &'static str,
    pub application_id: &'static str,
}

impl Ide {
    pub fn open_title(&self) -> String {
        format!("Open in {}", self.display_name)
    }
}
