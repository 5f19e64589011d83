use std::path::{Path, PathBuf};

use anyhow::Result;
use console::style;

use crate::component::{self, Kind};
use crate::config::Config;
use crate::example;
use crate::fetch::Fetch;
use crate::interrupt::Scaffolding;
use crate::lifecycle::{self, State, Target};
use crate::menu::{Context, Flow, Menu, Node};
use crate::patch;
use crate::present::present;
use crate::progress::{self, Policy, Reporter};
use crate::project::{self, Project};
use crate::prompt::Prompter;
use crate::utils;

/// Everything a menu handler works with.
pub struct Session {
    pub prompter: Box<dyn Prompter>,
    pub fetcher: Box<dyn Fetch>,
    pub reporter: Reporter,
    pub config: Config,
    /// Directory new projects are created in and components are added to.
    pub root: PathBuf,
    /// ESP-IDF installation to browse examples from.
    pub idf_path: Option<PathBuf>,
}

impl Session {
    pub fn new(
        prompter: Box<dyn Prompter>,
        fetcher: Box<dyn Fetch>,
        config: Config,
        root: PathBuf,
    ) -> Self {
        let reporter = Reporter::new(Policy::from_continue_flag(config.continue_on_failure));
        Self {
            prompter,
            fetcher,
            reporter,
            config,
            root,
            idf_path: None,
        }
    }
}

impl Context for Session {
    fn prompter(&mut self) -> &mut dyn Prompter {
        self.prompter.as_mut()
    }
}

pub fn menu() -> Menu<Session> {
    Menu::new(
        style("How may I help you?").cyan().bright().to_string(),
        vec![
            Node::action("Create a new C++ project", create_project),
            Node::submenu(
                "Create a new C++ component",
                vec![
                    Node::action("Component with source file", |s: &mut Session| {
                        create_component(s, Kind::Source)
                    }),
                    Node::action("Header-only component", |s: &mut Session| {
                        create_component(s, Kind::HeaderOnly)
                    }),
                ],
            ),
            Node::submenu(
                "Select example and convert to C++",
                vec![
                    Node::action("Get-started examples", |s: &mut Session| {
                        convert_example(s, Some("get-started"))
                    }),
                    Node::action("All examples", |s: &mut Session| convert_example(s, None)),
                ],
            ),
            Node::action("Convert existing C project to C++", convert_project),
            Node::action(style("exit").dim().to_string(), |_: &mut Session| {
                Ok(Flow::Exit)
            }),
        ],
    )
}

pub fn create_project(s: &mut Session) -> Result<Flow> {
    let project = Project::ask(s.prompter.as_mut())?;
    tracing::debug!(?project, "creating project");
    let dir = project.dir(&s.root);

    let target = lifecycle::prepare(&dir, s.prompter.as_mut(), &s.reporter)?;
    let Some(guard) = admit(&target) else {
        return Ok(Flow::Done);
    };

    let template = &s.config.template;
    s.reporter.run(
        "Cloning CXX example project",
        || s.fetcher.fetch(template, &dir),
        Some("Cloned CXX example project"),
    )?;
    s.reporter.run(
        format!("Preparing {}", present(&dir)),
        || lifecycle::clean(&dir, &s.config.cleanup),
        Some("Preparation done"),
    )?;

    if let Some(guard) = guard {
        guard.commit();
    }
    progress::done("Done! Your project is now configured!", present(&dir));
    Ok(Flow::Done)
}

pub fn create_component(s: &mut Session, kind: Kind) -> Result<Flow> {
    let name = s.prompter.input(
        &style("Name of the component:").cyan().bright().to_string(),
        &|input| project::validate_name(input).map_err(str::to_string),
    )?;
    let name = name.trim();
    let dir = s.root.join("components").join(name);

    let created = s.reporter.run(
        format!("Creating component {}", present(&dir)),
        || component::scaffold(&s.root, name, kind),
        Some(&format!("Created component {name}")),
    )?;
    if let Some(dir) = created {
        progress::done("Done! Your component is ready:", present(dir));
    }
    Ok(Flow::Done)
}

pub fn convert_example(s: &mut Session, group: Option<&str>) -> Result<Flow> {
    let Some(idf_path) = s.idf_path.clone() else {
        progress::warn("IDF_PATH is not set, source your ESP-IDF export script first");
        return Ok(Flow::Done);
    };
    let examples = example::discover(&idf_path.join("examples"), group);
    if examples.is_empty() {
        progress::warn(format!(
            "No examples found below {}",
            present(idf_path.join("examples"))
        ));
        return Ok(Flow::Done);
    }

    let labels = examples
        .iter()
        .map(|example| example.label.clone())
        .collect::<Vec<String>>();
    let choice = s.prompter.select(
        &style("Choose an example").cyan().bright().to_string(),
        &labels,
    )?;
    let example = &examples[choice];
    let dir = s.root.join(example.name());

    let target = lifecycle::prepare(&dir, s.prompter.as_mut(), &s.reporter)?;
    let Some(guard) = admit(&target) else {
        return Ok(Flow::Done);
    };
    let copied = s.reporter.run(
        format!("Copying {}", example.label),
        || utils::copy_dir_all(&example.path, &dir),
        Some(&format!("Copied {}", example.label)),
    )?;
    if let Some(guard) = guard {
        guard.commit();
    }
    if copied.is_none() {
        return Ok(Flow::Done);
    }

    make_cxx_ready(s, &dir)
}

pub fn convert_project(s: &mut Session) -> Result<Flow> {
    let dir = s.prompter.directory(
        &style("Choose your existing project").cyan().bright().to_string(),
        &s.root,
    )?;
    make_cxx_ready(s, &dir)
}

fn make_cxx_ready(s: &mut Session, dir: &Path) -> Result<Flow> {
    let question = format!("Do you wanna make {} C++ ready?", present(dir));
    if !s
        .prompter
        .confirm(&style(question).green().bright().to_string(), true)?
    {
        return Ok(Flow::Done);
    }
    let patched = patch::make_cxx_ready(dir, &s.reporter)?;
    if patched.len() == 3 {
        progress::done("Done! Your project is now C++ ready!", present(dir));
    }
    Ok(Flow::Done)
}

/// Decides whether a prepared target can receive a template. A kept
/// directory is refused; a directory this run created gets a guard.
fn admit(target: &Target) -> Option<Option<Scaffolding>> {
    match target.state {
        State::Reused => {
            progress::warn(format!(
                "Keeping {}, not placing a template into an existing directory",
                present(&target.path)
            ));
            None
        }
        State::Created | State::Recreated => Some(Some(Scaffolding::begin(&target.path))),
        State::Indeterminate => Some(None),
    }
}
