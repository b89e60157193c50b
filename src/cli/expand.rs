use shot::expand;
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// Comma-separated rooms and ranges, e.g. "101-110, A1-A20, Lab"
    rooms: String,

    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Command {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self) -> anyhow::Result<()> {
        let expansion = expand(&self.rooms);

        match self.output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&expansion)?),
            OutputFormat::Table => {
                for room in &expansion.rooms {
                    println!("{room}");
                }
                if !expansion.skipped.is_empty() {
                    eprintln!(
                        "{}",
                        format!("⚠️  Skipped: {}", expansion.skipped.join(", ")).warning()
                    );
                }
                eprintln!("{}", format!("{} room(s)", expansion.rooms.len()).dim());
            }
        }

        Ok(())
    }
}
