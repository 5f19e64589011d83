use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("this cli app is currently only compatible with Linux. Your OS: {os}")]
    PlatformUnsupported { os: &'static str },
    #[error("error while checking access of {}", .path.display())]
    DirectoryAccess { path: PathBuf, source: io::Error },
    #[error("error while trying to delete {}", .path.display())]
    Delete { path: PathBuf, source: io::Error },
    #[error("error while trying to create {}", .path.display())]
    Create { path: PathBuf, source: io::Error },
    #[error("failed to copy {} into {}", .src.display(), .dst.display())]
    Copy {
        src: PathBuf,
        dst: PathBuf,
        source: io::Error,
    },
    #[error("failed to clone '{url}': {reason}")]
    Fetch { url: String, reason: String },
    #[error("failed to read {}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write {}", .path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to parse {}", .path.display())]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{} has no first entry in 'configurations'", .path.display())]
    MissingConfiguration { path: PathBuf },
    #[error("invalid name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: &'static str },
    #[error(transparent)]
    Prompt(#[from] dialoguer::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Recursively copies `src` into `dst`, creating `dst` and its parents first.
pub(crate) fn copy_dir_all(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> Result<()> {
    let (src, dst) = (src.as_ref(), dst.as_ref());
    let wrap = |source| Error::Copy {
        src: src.to_path_buf(),
        dst: dst.to_path_buf(),
        source,
    };
    fs::create_dir_all(dst).map_err(wrap)?;
    for entry in fs::read_dir(src).map_err(wrap)? {
        let entry = entry.map_err(wrap)?;
        let to = dst.join(entry.file_name());
        if entry.file_type().map_err(wrap)?.is_dir() {
            copy_dir_all(entry.path(), to)?;
        } else {
            fs::copy(entry.path(), to).map_err(wrap)?;
        }
    }
    Ok(())
}

/// Writes `contents` next to `path` first and renames it into place, so a
/// failed write never leaves a truncated file behind. A symlinked `path` is
/// followed, and the permissions of an existing file are kept.
pub(crate) fn write_replace(path: impl AsRef<Path>, contents: &str) -> Result<()> {
    let path = path.as_ref();
    let wrap = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };
    let (target, permissions) = match fs::canonicalize(path) {
        Ok(target) => {
            let permissions = fs::metadata(&target).map_err(wrap)?.permissions();
            (target, Some(permissions))
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => (path.to_path_buf(), None),
        Err(err) => return Err(wrap(err)),
    };
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(wrap)?;
    io::Write::write_all(&mut file, contents.as_bytes()).map_err(wrap)?;
    if let Some(permissions) = permissions {
        file.as_file().set_permissions(permissions).map_err(wrap)?;
    }
    file.persist(&target).map_err(|err| wrap(err.error))?;
    Ok(())
}

pub(crate) fn read_to_string(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })
}
