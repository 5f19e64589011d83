pub mod component;
pub mod config;
pub mod example;
pub mod fetch;
pub mod interrupt;
pub mod lifecycle;
pub mod menu;
pub mod patch;
pub mod present;
pub mod progress;
pub mod project;
pub mod prompt;
pub mod utils;
pub mod workflow;

#[cfg(test)]
mod testing;

pub use utils::{Error, Result};

/// Fails on every host except Linux.
pub fn check_platform() -> Result<()> {
    if std::env::consts::OS != "linux" {
        return Err(Error::PlatformUnsupported {
            os: std::env::consts::OS,
        });
    }
    Ok(())
}
