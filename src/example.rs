use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example {
    /// Path relative to the examples root, such as `get-started/blink`.
    pub label: String,
    pub path: PathBuf,
}

impl Example {
    pub fn name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.label)
    }
}

/// Lists the example projects below `root`, optionally only those under the
/// `group` subdirectory. A directory counts as a project when its
/// `CMakeLists.txt` declares `project(`; its subdirectories are not searched.
pub fn discover(root: &Path, group: Option<&str>) -> Vec<Example> {
    let base = match group {
        Some(group) => root.join(group),
        None => root.to_path_buf(),
    };
    let mut examples = Vec::new();
    let mut walker = WalkDir::new(&base).sort_by_file_name().into_iter();
    while let Some(entry) = walker.next() {
        let Ok(entry) = entry else {
            continue;
        };
        if !entry.file_type().is_dir() {
            continue;
        }
        if entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.') {
            walker.skip_current_dir();
            continue;
        }
        if !is_project(entry.path()) {
            continue;
        }
        let label = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .to_string_lossy()
            .into_owned();
        examples.push(Example {
            label,
            path: entry.path().to_path_buf(),
        });
        walker.skip_current_dir();
    }
    tracing::debug!("found {} examples below {}", examples.len(), base.display());
    examples
}

fn is_project(dir: &Path) -> bool {
    fs::read_to_string(dir.join("CMakeLists.txt"))
        .map(|text| text.contains("project("))
        .unwrap_or(false)
}
