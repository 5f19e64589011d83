use std::path::{is_separator, Path, PathBuf};

use console::style;

use crate::prompt::Prompter;
use crate::utils::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    pub description: String,
}

impl Project {
    pub fn new(name: &str, description: &str) -> Result<Self> {
        validate_name(name).map_err(|reason| Error::InvalidProjectName {
            name: name.to_string(),
            reason,
        })?;
        Ok(Self {
            name: name.trim().to_string(),
            description: description.to_string(),
        })
    }

    pub fn ask(prompter: &mut dyn Prompter) -> Result<Self> {
        let name = prompter.input(
            &style("Name of the project (dir name):").cyan().bright().to_string(),
            &|input| validate_name(input).map_err(str::to_string),
        )?;
        let description = prompter.input(
            &style("Short description:").cyan().bright().to_string(),
            &|_| Ok(()),
        )?;
        Self::new(&name, &description)
    }

    pub fn dir(&self, root: &Path) -> PathBuf {
        root.join(&self.name)
    }
}

/// Accepts names that are non-empty after trimming and stay a single path
/// component.
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    let name = name.trim();
    if name.is_empty() {
        return Err("name must not be empty");
    }
    if name.chars().any(is_separator) {
        return Err("name must not contain a path separator");
    }
    if name == "." || name == ".." {
        return Err("name must not refer to an existing directory");
    }
    Ok(())
}
