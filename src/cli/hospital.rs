use std::path::Path;

use shot::{
    GroupKind, Hospital, Settings,
    domain::{is_storable_name, is_valid_hospital_id},
    expand,
};
use tracing::instrument;

use super::{load_settings, terminal::Colorize};

/// The most skipped rooms listed by name; beyond this only the count is shown.
const MAX_LISTED_SKIPPED: usize = 20;

const NAME_RULES: &str =
    "names must not contain '[', ']', '=', ':' or line breaks, or start with '#' or ';'";

#[derive(Debug, clap::Parser)]
pub struct Command {
    #[command(subcommand)]
    command: HospitalCommand,
}

#[derive(Debug, clap::Parser)]
enum HospitalCommand {
    /// Create a new hospital
    Create {
        /// Short name, used to identify the hospital
        name: String,

        /// Full, administrative or legal name (defaults to the short name)
        #[arg(long)]
        full: Option<String>,
    },

    /// Select the hospital other commands act on
    Select {
        /// The hospital name
        name: String,
    },

    /// List all hospitals
    List,

    /// Add an empty building to the selected hospital
    AddBuilding {
        /// The building name
        name: String,
    },

    /// Add an empty department to the selected hospital
    AddDepartment {
        /// The department name
        name: String,
    },

    /// Add rooms to the selected hospital
    ///
    /// Rooms are a comma-separated list of room numbers and ranges, for
    /// example "101-110, A1-A20, HS10B100-HS10B399, Lab".
    AddRooms {
        /// The rooms to add
        rooms: String,

        /// The building the rooms belong to
        #[arg(long, short)]
        building: Option<String>,

        /// The department the rooms belong to
        #[arg(long, short)]
        department: Option<String>,

        /// The hospital to add rooms to (defaults to the selected hospital)
        #[arg(long)]
        hospital: Option<String>,
    },
}

impl Command {
    #[instrument]
    pub fn run(self, path: &Path) -> anyhow::Result<()> {
        let mut settings = load_settings(path)?;

        match self.command {
            HospitalCommand::Create { name, full } => create(&mut settings, &name, full)?,
            HospitalCommand::Select { name } => {
                if !settings.select_hospital(&name) {
                    anyhow::bail!("Hospital '{name}' not found");
                }
                println!("{}", format!("✅ Selected {name}").success());
            }
            HospitalCommand::List => {
                list(&settings);
                return Ok(());
            }
            HospitalCommand::AddBuilding { name } => {
                add_group(&mut settings, GroupKind::Building, &name)?;
            }
            HospitalCommand::AddDepartment { name } => {
                add_group(&mut settings, GroupKind::Department, &name)?;
            }
            HospitalCommand::AddRooms {
                rooms,
                building,
                department,
                hospital,
            } => add_rooms(
                &mut settings,
                hospital.as_deref(),
                building.as_deref(),
                department.as_deref(),
                &rooms,
            )?,
        }

        settings.write(path)?;
        Ok(())
    }
}

fn create(settings: &mut Settings, name: &str, full: Option<String>) -> anyhow::Result<()> {
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("Hospital name must not be empty");
    }
    if !is_valid_hospital_id(name) {
        anyhow::bail!(
            "Hospital name '{name}' cannot be used: {NAME_RULES}, and OPTIONS and RECENT are reserved"
        );
    }
    if settings.hospitals.contains(name) {
        anyhow::bail!("Hospital '{name}' already exists");
    }

    let full = full.unwrap_or_else(|| name.to_string());
    let hospital = Hospital::create(
        name,
        &full,
        &settings.preferences.user,
        env!("CARGO_PKG_VERSION"),
    )
    .ok_or_else(|| anyhow::anyhow!("The full name must not contain line breaks"))?;
    settings.hospitals.insert(hospital);

    // The first hospital a user creates becomes the selected one.
    if settings.active_hospital().is_none() {
        settings.select_hospital(name);
    }

    println!("{}", format!("✅ Created hospital {name}").success());
    Ok(())
}

fn list(settings: &Settings) {
    if settings.hospitals.is_empty() {
        println!("No hospitals yet. Create one with 'shot hospital create'.");
        return;
    }
    let selected = settings.preferences.hospital.as_deref();
    for hospital in settings.hospitals.iter() {
        let marker = if Some(hospital.id()) == selected { "*" } else { " " };
        println!("{marker} {}  {}", hospital.id(), hospital.info.full.dim());
    }
}

fn selected_hospital<'a>(
    settings: &'a mut Settings,
    id: Option<&str>,
) -> anyhow::Result<&'a mut Hospital> {
    let id = match id {
        Some(id) => id.to_string(),
        None => settings.preferences.hospital.clone().ok_or_else(|| {
            anyhow::anyhow!("No hospital selected. Use 'shot hospital select <NAME>' first")
        })?,
    };
    settings
        .hospitals
        .get_mut(&id)
        .ok_or_else(|| anyhow::anyhow!("Hospital '{id}' not found"))
}

fn add_group(settings: &mut Settings, kind: GroupKind, name: &str) -> anyhow::Result<()> {
    if !name.trim().is_empty() && !is_storable_name(name) {
        anyhow::bail!("The {kind} name '{name}' cannot be used: {NAME_RULES}");
    }
    let user = settings.preferences.user.clone();
    let hospital = selected_hospital(settings, None)?;

    if hospital.add_group(kind, name) {
        hospital.info.touch(&user);
        println!("{}", format!("✅ Added {kind} {name}").success());
    } else {
        println!(
            "{}",
            format!("ℹ️  Not added: {kind} '{name}' already exists or is empty").dim()
        );
    }
    Ok(())
}

fn add_rooms(
    settings: &mut Settings,
    hospital: Option<&str>,
    building: Option<&str>,
    department: Option<&str>,
    rooms: &str,
) -> anyhow::Result<()> {
    for (kind, name) in [
        (GroupKind::Building, building),
        (GroupKind::Department, department),
    ] {
        if let Some(name) = name.filter(|name| !name.trim().is_empty() && !is_storable_name(name)) {
            anyhow::bail!("The {kind} name '{name}' cannot be used: {NAME_RULES}");
        }
    }
    let user = settings.preferences.user.clone();
    let hospital = selected_hospital(settings, hospital)?;

    let expansion = expand(rooms);
    if expansion.is_empty() {
        anyhow::bail!("No rooms found in '{rooms}'");
    }

    let added = hospital.register_rooms(
        building,
        department,
        expansion.rooms.iter().map(String::as_str),
    );
    hospital.info.touch(&user);

    println!(
        "{}",
        format!("✅ Added {} room(s) to {}", added.len(), hospital.id()).success()
    );

    let skipped = &expansion.skipped;
    if skipped.len() > MAX_LISTED_SKIPPED {
        eprintln!(
            "{}",
            format!("⚠️  Could not add {} rooms", skipped.len()).warning()
        );
    } else if !skipped.is_empty() {
        eprintln!(
            "{}",
            format!(
                "⚠️  Could not add {} room(s): {}",
                skipped.len(),
                skipped.join(", ")
            )
            .warning()
        );
    }

    Ok(())
}
