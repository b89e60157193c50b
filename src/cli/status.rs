use std::path::Path;

use clap::Parser;
use shot::{Hospital, Loaded, Settings};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser, Default)]
#[command(about = "Show the user, selected hospital and room coverage")]
pub struct Command {
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
    pub fn run(self, path: &Path) -> anyhow::Result<()> {
        let Loaded::Configured(settings) = Settings::read(path)? else {
            println!(
                "Not configured yet. Create settings with 'shot init --user <USER>'."
            );
            return Ok(());
        };

        match self.output {
            OutputFormat::Json => Self::output_json(&settings)?,
            OutputFormat::Table => Self::output_table(&settings),
        }
        Ok(())
    }

    fn output_json(settings: &Settings) -> anyhow::Result<()> {
        use serde_json::json;

        let hospital = settings.active_hospital().map(|hospital| {
            json!({
                "id": hospital.id(),
                "info": hospital.info,
                "buildings": hospital.buildings().len(),
                "departments": hospital.departments().len(),
                "rooms": {
                    "total": hospital.room_count(),
                    "in_buildings": hospital.rooms_in_buildings(),
                    "in_departments": hospital.rooms_in_departments(),
                    "flagged": hospital.flagged_rooms().count(),
                },
                "coverage": hospital.coverage(),
            })
        });

        let output = json!({
            "preferences": settings.preferences,
            "hospitals": settings.hospitals.len(),
            "hospital": hospital,
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn output_table(settings: &Settings) {
        let preferences = &settings.preferences;
        println!("User:      {}", preferences.user);
        println!("Language:  {}", preferences.language);
        println!("Unique ID: {}", preferences.unique);
        println!("Hospitals: {}", settings.hospitals.len());

        match settings.active_hospital() {
            Some(hospital) => Self::output_hospital(hospital),
            None => println!(
                "{}",
                "No hospital selected. Create one with 'shot hospital create'.".warning()
            ),
        }

        if !preferences.recent.is_empty() {
            println!();
            println!("{}", "Recent files:".info());
            for path in &preferences.recent {
                println!("  {}", path.display());
            }
        }
    }

    fn output_hospital(hospital: &Hospital) {
        let coverage = hospital.coverage();
        let info = &hospital.info;

        println!();
        println!("{}", hospital.summary_line().info());
        println!("  Full name:  {}", info.full);
        println!(
            "  Created:    {} by {}",
            info.created.split('T').next().unwrap_or_default(),
            info.created_by
        );
        println!(
            "  Updated:    {} by {}",
            info.updated.split('T').next().unwrap_or_default(),
            info.updated_by
        );
        println!(
            "  Buildings:  {} ({} rooms, {} coverage)",
            hospital.buildings().len(),
            hospital.rooms_in_buildings(),
            coverage.buildings
        );
        println!(
            "  Departments: {} ({} rooms, {} coverage)",
            hospital.departments().len(),
            hospital.rooms_in_departments(),
            coverage.departments
        );
        println!(
            "  Flagged:    {} rooms ({})",
            hospital.flagged_rooms().count(),
            hospital.flagged_share()
        );
    }
}
