use std::path::Path;

use shot::{Preferences, Settings};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// The user name recorded on hospitals you create or edit
    #[arg(long)]
    user: String,

    /// Interface language
    #[arg(long, default_value = shot::domain::DEFAULT_LANGUAGE)]
    language: String,

    /// How patients are uniquely identified
    #[arg(long, default_value = shot::domain::DEFAULT_UNIQUE)]
    unique: String,

    /// Replace an existing settings file
    #[arg(long)]
    force: bool,
}

impl Command {
    #[instrument]
    pub fn run(self, path: &Path) -> anyhow::Result<()> {
        if self.user.trim().is_empty() {
            anyhow::bail!("User name must not be empty");
        }
        if !self.force && Settings::read(path)?.is_configured() {
            anyhow::bail!(
                "Settings already exist at {} (use --force to replace them)",
                path.display()
            );
        }

        let mut preferences = Preferences::new(self.user.trim());
        preferences.language = self.language;
        preferences.unique = self.unique;

        Settings::new(preferences).write(path)?;

        println!(
            "{}",
            format!("✅ Created settings in {}", path.display()).success()
        );
        println!();
        println!("Next steps:");
        println!("  shot hospital create \"MadeUp Hospital\" --full \"MadeUp University Hospital\"");
        println!("  shot hospital add-rooms \"101-110, A1-A20\" --building Main --department ICU");

        Ok(())
    }
}
