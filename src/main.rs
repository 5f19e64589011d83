use std::env;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::{ArgAction, Parser};
use console::style;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use esp_idf_cxx::config::Config;
use esp_idf_cxx::fetch::Git;
use esp_idf_cxx::menu::Flow;
use esp_idf_cxx::prompt::Terminal;
use esp_idf_cxx::workflow::{self, Session};
use esp_idf_cxx::{check_platform, interrupt};

#[derive(Parser)]
#[command(version)]
#[command(disable_help_flag = true)]
#[command(disable_version_flag = true)]
#[command(about = "Create or convert ESP-IDF projects for C++")]
struct Cli {
    #[arg(
        short = 'n',
        long = "name",
        value_name = "project_name",
        help = "Name of the project."
    )]
    name: Option<String>,

    #[arg(
        short = 'h',
        long = "help",
        help = "Print this help message.",
        action = ArgAction::Help,
    )]
    help: Option<bool>,

    #[arg(
        short = 'V',
        long = "version",
        help = "Print version information.",
        action = ArgAction::Version,
    )]
    version: Option<bool>,
}

pub(crate) struct App {
    cli: Cli,
    config: Config,
}

impl App {
    fn init() -> Result<Self> {
        let cli = Cli::parse();
        check_platform()?;
        interrupt::install().context("failed to install interrupt handler")?;
        let config = Config::init().context("failed to initialize config")?;
        Ok(Self { cli, config })
    }

    fn run(self) -> Result<()> {
        // Accepted for compatibility, the interactive flow asks for the name.
        if let Some(name) = &self.cli.name {
            println!("{name}");
        }

        println!(
            "{}{}{} {}",
            style("esp-idf:").green(),
            style("~").blue(),
            style("#").white(),
            style("initializing C++ project...").green().bright()
        );
        println!();

        let root = env::current_dir().context("failed to locate current directory")?;
        let mut session = Session::new(Box::new(Terminal), Box::new(Git), self.config, root);
        session.idf_path = env::var_os("IDF_PATH").map(Into::into);

        match workflow::menu().run(&mut session)? {
            Flow::Done => tracing::debug!("workflow finished"),
            Flow::Exit => tracing::debug!("exit selected"),
        }
        Ok(())
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("ESP_IDF_CXX_LOG").unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    match App::init().and_then(App::run) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _ = console::Term::stderr().show_cursor();
            if interrupt::is_interrupted(&err) {
                eprintln!();
                return ExitCode::from(interrupt::INTERRUPTED as u8);
            }
            eprintln!("{}", style(format!("{err:#}")).red());
            ExitCode::FAILURE
        }
    }
}
