use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};

const FILE_NAME: &str = ".esp-idf-cxx.config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Git URL or `github:<owner>/<repo>` shorthand of the project template.
    pub template: String,
    /// Template-only entries removed after cloning.
    pub cleanup: Vec<String>,
    /// Keep going after a reported step fails.
    pub continue_on_failure: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            template: String::from("https://github.com/SinanAkkoyun/esp-idf-cpp-example"),
            cleanup: [".git", "sdkconfig", "sdkconfig.old"]
                .map(String::from)
                .to_vec(),
            continue_on_failure: true,
        }
    }
}

impl Config {
    /// Loads `~/.esp-idf-cxx.config.toml`, writing the defaults there first
    /// if it does not exist yet.
    pub fn init() -> Result<Self> {
        let home = home::home_dir().context("failed to locate user home directory")?;
        Self::init_at(home.join(FILE_NAME))
    }

    pub fn init_at(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = if !path.exists() {
            let config = Self::default();
            let contents = toml::to_string_pretty(&config)?;
            fs::write(path, contents)
                .context(format!("failed to write config file: {}", path.display()))?;
            config
        } else {
            let contents = fs::read_to_string(path)
                .context(format!("failed to read config file: {}", path.display()))?;
            toml::from_str(&contents)
                .context(format!("failed to parse config file: {}", path.display()))?
        };
        tracing::debug!(?config, "loaded {}", path.display());
        Ok(config)
    }
}
