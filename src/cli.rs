use std::path::{Path, PathBuf};

mod expand;
mod hospital;
mod init;
mod status;
mod terminal;

use clap::ArgAction;
use shot::{Loaded, Settings};

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path to the settings file
    #[arg(short, long, default_value = shot::storage::FILE_NAME, global = true)]
    settings: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::Status(status::Command::default()))
            .run(&self.settings)
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

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Show the user, selected hospital and room coverage (default)
    Status(status::Command),

    /// Create a settings file for a user
    Init(init::Command),

    /// Expand a room list such as "101-110, A1-A20" without saving it
    Expand(expand::Command),

    /// Manage hospitals, buildings, departments and rooms
    Hospital(hospital::Command),
}

impl Command {
    fn run(self, settings: &Path) -> anyhow::Result<()> {
        match self {
            Self::Status(command) => command.run(settings)?,
            Self::Init(command) => command.run(settings)?,
            Self::Expand(command) => command.run()?,
            Self::Hospital(command) => command.run(settings)?,
        }
        Ok(())
    }
}

/// Load settings, failing if no user has been configured yet.
fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    match Settings::read(path)? {
        Loaded::Configured(settings) => Ok(settings),
        Loaded::Unconfigured => anyhow::bail!(
            "No user configured in {}. Run 'shot init --user <USER>' first",
            path.display()
        ),
    }
}
