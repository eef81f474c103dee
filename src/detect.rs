//! Best-effort project type detection for IDE selection.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use crate::models::{Ide, ProjectType};

const ANDROID_MARKERS: [&str; 5] = [
    "build.gradle",
    "build.gradle.kts",
    "settings.gradle",
    "settings.gradle.kts",
    "AndroidManifest.xml",
];

async fn exists(path: &Path) -> bool {
    fs::try_exists(path).await.unwrap_or(false)
}

async fn is_dir(path: &Path) -> bool {
    fs::metadata(path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
}

async fn list_names(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut names = Vec::new();
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

/// Classifies the project at `path`. Checks run Xcode, Android, PHP in that
/// order; an unreadable directory degrades to [`ProjectType::Other`].
pub async fn detect(path: &Path) -> ProjectType {
    let names = match list_names(path).await {
        Ok(names) => names,
        Err(e) => {
            warn!("Project type detection skipped for {}: {}", path.display(), e);
            return ProjectType::Other;
        }
    };
    let has_suffix = |suffix: &str| names.iter().any(|n| n.ends_with(suffix));

    let kind = if has_suffix(".xcworkspace")
        || has_suffix(".xcodeproj")
        || exists(&path.join("Package.swift")).await
    {
        ProjectType::Xcode
    } else if is_android(path).await {
        ProjectType::Android
    } else if exists(&path.join("composer.json")).await || has_suffix(".php") {
        ProjectType::Php
    } else {
        ProjectType::Other
    };

    debug!("Detected {:?} project at {}", kind, path.display());
    kind
}

async fn is_android(path: &Path) -> bool {
    for marker in ANDROID_MARKERS {
        if exists(&path.join(marker)).await {
            return true;
        }
    }
    is_dir(&path.join("app")).await
}

pub fn ide_for(kind: ProjectType) -> Ide {
    match kind {
        ProjectType::Xcode => Ide {
            display_name: "Xcode",
            application_id: "com.apple.dt.Xcode",
        },
        ProjectType::Android => Ide {
            display_name: "Android Studio",
            application_id: "com.google.android.studio",
        },
        ProjectType::Php => Ide {
            display_name: "PhpStorm",
            application_id: "com.jetbrains.PhpStorm",
        },
        ProjectType::Other => Ide {
            display_name: "Visual Studio Code",
            application_id: "com.microsoft.VSCode",
        },
    }
}

/// What Xcode should open: `Package.swift`, else a workspace, else a project.
pub async fn xcode_target(path: &Path) -> Option<PathBuf> {
    let package = path.join("Package.swift");
    if exists(&package).await {
        return Some(package);
    }

    let names = list_names(path).await.ok()?;
    [".xcworkspace", ".xcodeproj"].iter().find_map(|suffix| {
        names
            .iter()
            .find(|n| n.ends_with(suffix))
            .map(|n| path.join(n))
    })
}
