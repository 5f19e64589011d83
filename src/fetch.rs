use std::fmt::Display;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::OnceLock;

use regex::Regex;

use crate::utils::{Error, Result};

/// Retrieves a template tree into a directory.
pub trait Fetch {
    fn fetch(&self, source: &str, dst: &Path) -> Result<()>;
}

/// A template location: either `<host>:<owner>/<repo>` or anything git
/// itself accepts as a remote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    Shorthand {
        domain: &'static str,
        owner: String,
        repo: String,
    },
    Url(String),
}

impl Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Shorthand {
                domain,
                owner,
                repo,
            } => write!(f, "https://{domain}/{owner}/{repo}"),
            Self::Url(url) => f.write_str(url),
        }
    }
}

impl From<&str> for Source {
    fn from(s: &str) -> Self {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        let pattern = PATTERN.get_or_init(|| {
            Regex::new(r"^(github|gitlab|bitbucket):([a-zA-Z0-9._-]+)/([a-zA-Z0-9._-]+)$").unwrap()
        });
        let Some(captures) = pattern.captures(s) else {
            return Self::Url(s.to_string());
        };
        let (_, [host, owner, repo]) = captures.extract();
        let domain = match host {
            "github" => "github.com",
            "gitlab" => "gitlab.com",
            "bitbucket" => "bitbucket.org",
            _ => return Self::Url(s.to_string()),
        };
        Self::Shorthand {
            domain,
            owner: owner.to_string(),
            repo: repo.to_string(),
        }
    }
}

/// Clones through the `git` executable found on `PATH`.
#[derive(Default)]
pub struct Git;

impl Fetch for Git {
    fn fetch(&self, source: &str, dst: &Path) -> Result<()> {
        let url = Source::from(source).to_string();
        let fail = |reason: String| Error::Fetch {
            url: url.clone(),
            reason,
        };

        if !check_git_installed() {
            return Err(fail(String::from("git is not installed")));
        }

        tracing::debug!("git clone {url} {}", dst.display());
        let output = Command::new("git")
            .arg("clone")
            .arg("--quiet")
            .arg(&url)
            .arg(dst)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|err| fail(format!("failed to execute git clone command: {err}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let reason = if stderr.is_empty() {
                format!("git exited with {}", output.status)
            } else {
                stderr
            };
            return Err(fail(reason));
        }

        Ok(())
    }
}

fn check_git_installed() -> bool {
    Command::new("git")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_shorthand_sources() {
        let source = Source::from("github:SinanAkkoyun/esp-idf-cpp-example");
        assert_eq!(
            source,
            Source::Shorthand {
                domain: "github.com",
                owner: String::from("SinanAkkoyun"),
                repo: String::from("esp-idf-cpp-example"),
            }
        );
        assert_eq!(
            source.to_string(),
            "https://github.com/SinanAkkoyun/esp-idf-cpp-example"
        );
        assert_eq!(
            Source::from("gitlab:me/tpl").to_string(),
            "https://gitlab.com/me/tpl"
        );
        assert_eq!(
            Source::from("bitbucket:me/tpl").to_string(),
            "https://bitbucket.org/me/tpl"
        );
    }

    #[test]
    fn passes_urls_through() {
        let url = "https://github.com/SinanAkkoyun/esp-idf-cpp-example";
        assert_eq!(Source::from(url), Source::Url(url.to_string()));
        assert_eq!(
            Source::from("sourcehut:me/tpl"),
            Source::Url(String::from("sourcehut:me/tpl"))
        );
    }
}
