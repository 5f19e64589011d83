use std::env;
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

/// Renders `path` for the user: absolute, normalized, with a leading
/// `/home/<user>/` shortened to `~/`.
pub fn present(path: impl AsRef<Path>) -> String {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| Regex::new(r"^/home/[a-zA-Z0-9_.-]*/").unwrap());
    let resolved = resolve(path);
    let resolved = resolved.to_string_lossy();
    pattern.replace(&resolved, "~/").into_owned()
}

fn resolve(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("/"))
            .join(path)
    };
    let mut resolved = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other),
        }
    }
    resolved
}
