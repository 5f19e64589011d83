use std::fmt::Display;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::utils::Result;

/// What happens to the enclosing workflow when a reported step fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Print the failure and hand `None` back to the caller.
    Continue,
    /// Print the failure and return it to the caller.
    Abort,
}

impl Policy {
    pub fn from_continue_flag(continue_on_failure: bool) -> Self {
        if continue_on_failure {
            Self::Continue
        } else {
            Self::Abort
        }
    }
}

pub struct Reporter {
    policy: Policy,
    visible: bool,
}

impl Reporter {
    pub fn new(policy: Policy) -> Self {
        Self {
            policy,
            visible: true,
        }
    }

    /// A reporter that never draws, for non-interactive callers.
    pub fn hidden(policy: Policy) -> Self {
        Self {
            policy,
            visible: false,
        }
    }

    pub fn run<T>(
        &self,
        label: impl Into<String>,
        operation: impl FnOnce() -> Result<T>,
        success: Option<&str>,
    ) -> Result<Option<T>> {
        let label = label.into();
        let spinner = self.spinner(&label);
        tracing::debug!("started: {label}");
        match operation() {
            Ok(value) => {
                let text = success.map(str::to_string).unwrap_or(label);
                spinner.finish_with_message(format!("{} {}", style("✔").green(), text));
                tracing::info!("{text}");
                Ok(Some(value))
            }
            Err(err) => {
                spinner.finish_with_message(format!("{} {}", style("✖").red(), label));
                self.fail(&err);
                match self.policy {
                    Policy::Continue => Ok(None),
                    Policy::Abort => Err(err),
                }
            }
        }
    }

    fn spinner(&self, label: &str) -> ProgressBar {
        if !self.visible {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new_spinner();
        if let Ok(template) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            pb.set_style(template.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
        }
        pb.set_message(label.to_string());
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    }

    fn fail(&self, err: &crate::utils::Error) {
        tracing::error!("{}", chain(err));
        if self.visible {
            println!("{}", style(chain(err)).red().bright());
        }
    }
}

/// Joins an error and its sources into one line.
pub fn chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

pub fn done(message: impl Display, path: impl Display) {
    println!(
        "{} {}",
        style(message).green().bright(),
        style(path).dim()
    );
}

pub fn warn(message: impl Display) {
    tracing::warn!("{message}");
    println!("{}", style(message).yellow());
}
