use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use console::style;

use crate::present::present;
use crate::progress::Reporter;
use crate::prompt::Prompter;
use crate::utils::{Error, Result};

/// Where the lifecycle left the target directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Did not exist and was created.
    Created,
    /// Existed, was deleted and created again.
    Recreated,
    /// Existed and the user chose to keep it.
    Reused,
    /// A delete or create step failed and was reported.
    Indeterminate,
}

#[derive(Debug)]
pub struct Target {
    pub path: PathBuf,
    pub existed: bool,
    pub state: State,
}

impl Target {
    /// True when this run created the directory and it is empty.
    pub fn is_fresh(&self) -> bool {
        matches!(self.state, State::Created | State::Recreated)
    }
}

/// Brings `dir` into a state a template can be placed into.
///
/// An existing directory is only deleted after the user confirms. Errors
/// other than "not found" while checking the directory are returned as
/// [`Error::DirectoryAccess`] regardless of the reporter's policy.
pub fn prepare(dir: &Path, prompter: &mut dyn Prompter, reporter: &Reporter) -> Result<Target> {
    let existed = exists(dir)?;
    tracing::debug!("{} exists: {existed}", dir.display());

    let mut should_create = !existed;
    if existed {
        let question = format!(
            "Directory {} already exists. Delete directory and create a new project?",
            present(dir)
        );
        let delete = prompter.confirm(&style(question).red().bright().to_string(), true)?;
        if !delete {
            return Ok(Target {
                path: dir.to_path_buf(),
                existed,
                state: State::Reused,
            });
        }
        let deleted = reporter.run(
            format!("Deleting {}", present(dir)),
            || {
                fs::remove_dir_all(dir).map_err(|source| Error::Delete {
                    path: dir.to_path_buf(),
                    source,
                })
            },
            Some(&format!("Deleted {}", present(dir))),
        )?;
        should_create = deleted.is_some();
    }

    let mut state = State::Indeterminate;
    if should_create {
        let created = reporter.run(
            format!("Creating {}", present(dir)),
            || {
                fs::create_dir(dir).map_err(|source| Error::Create {
                    path: dir.to_path_buf(),
                    source,
                })
            },
            Some(&format!("Created {}", present(dir))),
        )?;
        if created.is_some() {
            state = if existed {
                State::Recreated
            } else {
                State::Created
            };
        }
    }

    Ok(Target {
        path: dir.to_path_buf(),
        existed,
        state,
    })
}

fn exists(dir: &Path) -> Result<bool> {
    match fs::metadata(dir) {
        Ok(_) => Ok(true),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
        Err(source) => Err(Error::DirectoryAccess {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

/// Removes template-only artifacts such as `.git` and `sdkconfig` from
/// `dir`. Entries that are already gone are skipped.
pub fn clean(dir: &Path, entries: &[String]) -> Result<()> {
    for entry in entries {
        let path = dir.join(entry);
        let removed = match fs::symlink_metadata(&path) {
            Ok(meta) if meta.is_dir() => fs::remove_dir_all(&path),
            Ok(_) => fs::remove_file(&path),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!("{} already absent", path.display());
                continue;
            }
            Err(err) => Err(err),
        };
        removed.map_err(|source| Error::Delete { path, source })?;
    }
    Ok(())
}
