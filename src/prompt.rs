use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use dialoguer::theme::SimpleTheme;
use dialoguer::{Confirm, Input, Select};

use crate::utils::Result;

/// The interactive questions the workflows ask.
pub trait Prompter {
    fn select(&mut self, prompt: &str, items: &[String]) -> Result<usize>;

    fn input(&mut self, prompt: &str, validate: &dyn Fn(&str) -> Result<(), String>)
        -> Result<String>;

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool>;

    /// Lets the user walk the tree below `base` and pick one directory.
    fn directory(&mut self, prompt: &str, base: &Path) -> Result<PathBuf> {
        const CHOOSE: &str = "[use this directory]";
        const UP: &str = "..";

        let mut current = base.to_path_buf();
        loop {
            let mut items = vec![String::from(CHOOSE), String::from(UP)];
            items.extend(subdirectories(&current));
            let header = format!("{prompt} ({})", current.display());
            let choice = self.select(&header, &items)?;
            match items[choice].as_str() {
                CHOOSE => return Ok(current),
                UP => {
                    if current.as_os_str().is_empty() || current == Path::new(".") {
                        current = PathBuf::from("..");
                    } else {
                        current.push("..");
                    }
                }
                name => current.push(name),
            }
        }
    }
}

fn subdirectories(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| !name.starts_with('.'))
        .collect::<Vec<String>>();
    names.sort();
    names
}

static THEME: OnceLock<SimpleTheme> = OnceLock::new();

/// Prompts on the controlling terminal.
#[derive(Default)]
pub struct Terminal;

impl Prompter for Terminal {
    fn select(&mut self, prompt: &str, items: &[String]) -> Result<usize> {
        let theme = THEME.get_or_init(|| SimpleTheme);
        Ok(Select::with_theme(theme)
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact()?)
    }

    fn input(
        &mut self,
        prompt: &str,
        validate: &dyn Fn(&str) -> Result<(), String>,
    ) -> Result<String> {
        let theme = THEME.get_or_init(|| SimpleTheme);
        Ok(Input::<String>::with_theme(theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .validate_with(|input: &String| validate(input.as_str()))
            .interact_text()?)
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
        let theme = THEME.get_or_init(|| SimpleTheme);
        Ok(Confirm::with_theme(theme)
            .with_prompt(prompt)
            .default(default)
            .interact()?)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use tempfile::TempDir;

    use super::*;

    struct Picks(VecDeque<&'static str>);

    impl Prompter for Picks {
        fn select(&mut self, _: &str, items: &[String]) -> Result<usize> {
            let pick = self.0.pop_front().unwrap();
            Ok(items.iter().position(|item| item == pick).unwrap())
        }

        fn input(&mut self, _: &str, _: &dyn Fn(&str) -> Result<(), String>) -> Result<String> {
            unreachable!()
        }

        fn confirm(&mut self, _: &str, _: bool) -> Result<bool> {
            unreachable!()
        }
    }

    #[test]
    fn directory_walks_down_and_up() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("blink/main")).unwrap();
        fs::create_dir_all(tmp.path().join("hello")).unwrap();
        fs::create_dir_all(tmp.path().join(".git")).unwrap();

        let mut picks = Picks(VecDeque::from(["blink", "main", "..", "[use this directory]"]));
        let dir = picks.directory("Choose", tmp.path()).unwrap();

        assert_eq!(dir, tmp.path().join("blink/main/.."));
        assert_eq!(
            fs::canonicalize(dir).unwrap(),
            fs::canonicalize(tmp.path().join("blink")).unwrap()
        );
    }

    #[test]
    fn subdirectories_skip_hidden_and_files() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("zeta")).unwrap();
        fs::create_dir_all(tmp.path().join("alpha")).unwrap();
        fs::create_dir_all(tmp.path().join(".vscode")).unwrap();
        fs::write(tmp.path().join("CMakeLists.txt"), "").unwrap();

        assert_eq!(subdirectories(tmp.path()), vec!["alpha", "zeta"]);
    }
}
