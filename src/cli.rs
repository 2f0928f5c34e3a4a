//! Command-line interface and the interactive application loop.

use std::path::{Path, PathBuf};

mod admin;
mod auth;
mod employee;
mod hr;
mod performance;
mod report;
mod terminal;

use clap::ArgAction;
use dialoguer::{Select, theme::ColorfulTheme};
use kadry::{ProjectStore, SystemConfig, UserStore};

/// Menu-driven HR management console over pipe-delimited text files.
#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// The directory holding the data files
    #[arg(short, long, default_value = ".")]
    data_dir: PathBuf,
}

impl Cli {
    /// Run the console until the operator exits.
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        App::open(&self.data_dir).run()
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

/// The three stores plus the top-level menu loop.
pub struct App {
    pub(crate) users: UserStore,
    pub(crate) projects: ProjectStore,
    pub(crate) config: SystemConfig,
    pub(crate) data_dir: PathBuf,
}

impl App {
    fn open(data_dir: &Path) -> Self {
        Self {
            users: UserStore::open(data_dir),
            projects: ProjectStore::open(data_dir),
            config: SystemConfig::open(data_dir),
            data_dir: data_dir.to_path_buf(),
        }
    }

    fn run(&mut self) -> anyhow::Result<()> {
        println!("====== HR management console ======");
        loop {
            let choice = Select::with_theme(&ColorfulTheme::default())
                .with_prompt("Main menu")
                .items(&["Sign in", "Register", "Exit"])
                .default(0)
                .interact()?;

            match choice {
                0 => auth::login(self)?,
                1 => auth::register(self)?,
                _ => {
                    println!("Goodbye.");
                    return Ok(());
                }
            }
        }
    }
}

/// Offer `items` plus a trailing "Cancel" entry; `None` means cancelled.
pub(crate) fn choose(prompt: &str, items: &[String]) -> anyhow::Result<Option<usize>> {
    let mut entries: Vec<String> = items.to_vec();
    entries.push("Cancel".to_string());

    let picked = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(&entries)
        .default(0)
        .interact()?;

    Ok((picked < items.len()).then_some(picked))
}
