//! The `settings.ini` file.
//!
//! The settings file holds user preferences, recently opened files, and every
//! hospital known to the user. Each hospital spans three sections:
//!
//! ```ini
//! [MadeUp Hospital]
//! name = MadeUp Hospital
//! fullname = MadeUp University Hospital
//! created = 2020-05-28T10:00:00.000000
//! created-by = alice
//! updated = 2020-05-29T09:30:00.000000
//! updated-by = bob
//! version = 0.1.0
//! buildings = MadeUpBlds
//! departments = MadeUpDeps
//!
//! [MadeUpBlds]
//! Main building = 23, 200, 304, 400-600
//!
//! [MadeUpDeps]
//! Maternity = 400-450
//! ```
//!
//! The building and department section names are derived from the first
//! word of the hospital name. If that name is already taken, the length of
//! the hospital name is appended.

use std::{
    collections::HashSet,
    fs, io,
    path::{Path, PathBuf},
};

use ini::{EscapePolicy, Ini, Properties, WriteOption};

use super::ranges::{compress, expand_integers};
use crate::domain::{
    DEFAULT_LANGUAGE, DEFAULT_UNIQUE, GroupKind, Hospital, HospitalInfo, Hospitals, Preferences,
    SectionNames, is_storable_name, is_valid_hospital_id,
};

/// Default file name of the settings file, relative to the working directory.
pub const FILE_NAME: &str = "settings.ini";

const OPTIONS: &str = "OPTIONS";
const RECENT: &str = "RECENT";
const BUILDINGS: &str = "buildings";
const DEPARTMENTS: &str = "departments";

/// Errors raised while reading or writing the settings file.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The file exists but could not be read.
    #[error("failed to read settings file {}: {source}", path.display())]
    Read {
        /// The settings file.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },

    /// The file could not be written.
    #[error("failed to write settings file {}: {source}", path.display())]
    Write {
        /// The settings file.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },

    /// The file is not valid INI.
    #[error("failed to parse settings file: {0}")]
    Parse(#[from] ini::ParseError),

    /// A hospital section lacks one of its mandatory fields.
    #[error("hospital section [{section}] is missing the '{field}' field")]
    MissingField {
        /// The hospital section.
        section: String,
        /// The missing key.
        field: &'static str,
    },
}

/// The outcome of reading a settings file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loaded {
    /// No usable settings: the file is missing, has no `[OPTIONS]` section,
    /// or does not name a user.
    Unconfigured,

    /// The user is known. There may still be no hospitals.
    Configured(Settings),
}

impl Loaded {
    /// Returns `true` if the user is known.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        matches!(self, Self::Configured(_))
    }

    /// Returns the settings, if configured.
    #[must_use]
    pub fn into_settings(self) -> Option<Settings> {
        match self {
            Self::Unconfigured => None,
            Self::Configured(settings) => Some(settings),
        }
    }
}

/// Preferences and hospitals: everything persisted in the settings file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// User preferences.
    pub preferences: Preferences,

    /// All known hospitals.
    pub hospitals: Hospitals,

    hospital_from_settings: bool,
}

impl Settings {
    /// Creates settings with no hospitals.
    #[must_use]
    pub fn new(preferences: Preferences) -> Self {
        Self {
            preferences,
            hospitals: Hospitals::default(),
            hospital_from_settings: false,
        }
    }

    /// Returns `true` if the selected hospital was taken from the settings
    /// file when it was read.
    #[must_use]
    pub const fn hospital_from_settings(&self) -> bool {
        self.hospital_from_settings
    }

    /// The selected hospital, if it is known.
    #[must_use]
    pub fn active_hospital(&self) -> Option<&Hospital> {
        self.hospitals.get(self.preferences.hospital.as_deref()?)
    }

    /// Selects the hospital `id`.
    ///
    /// Returns `false` if there is no such hospital.
    pub fn select_hospital(&mut self, id: &str) -> bool {
        if self.hospitals.contains(id) {
            self.preferences.hospital = Some(id.to_string());
            true
        } else {
            false
        }
    }

    /// Reads settings from `path`.
    ///
    /// A missing file is not an error; it yields [`Loaded::Unconfigured`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a hospital
    /// section lacks a mandatory field.
    pub fn read(path: &Path) -> Result<Loaded, Error> {
        if !path.exists() {
            tracing::debug!("no settings file at {}", path.display());
            return Ok(Loaded::Unconfigured);
        }
        let content = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ini_str(&content)
    }

    /// Parses settings from INI text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid INI or if a hospital section
    /// lacks a mandatory field.
    pub fn from_ini_str(content: &str) -> Result<Loaded, Error> {
        let ini = Ini::load_from_str_noescape(content)?;

        let Some(options) = ini.section(Some(OPTIONS)) else {
            tracing::debug!("settings have no [{OPTIONS}] section");
            return Ok(Loaded::Unconfigured);
        };
        let Some(user) = options.get("user").filter(|user| !user.trim().is_empty()) else {
            tracing::debug!("settings do not name a user");
            return Ok(Loaded::Unconfigured);
        };

        let mut preferences = Preferences::new(user);
        preferences.language = options
            .get("language")
            .unwrap_or(DEFAULT_LANGUAGE)
            .to_string();
        preferences.unique = options.get("unique").unwrap_or(DEFAULT_UNIQUE).to_string();
        preferences.hospital = options
            .get("hospital")
            .filter(|hospital| !hospital.is_empty())
            .map(ToString::to_string);

        if let Some(recent) = ini.section(Some(RECENT)) {
            preferences.recent = recent.iter().map(|(_, path)| PathBuf::from(path)).collect();
        }

        let mut hospitals = Hospitals::default();
        for (section, properties) in ini.iter() {
            let Some(section) = section else { continue };
            if section == OPTIONS || section == RECENT {
                continue;
            }
            if let Some(hospital) = read_hospital(&ini, section, properties)? {
                hospitals.insert(hospital);
            }
        }
        tracing::debug!("read {} hospital(s) from settings", hospitals.len());

        let hospital_from_settings = if preferences.hospital.is_some() {
            true
        } else if let Some(first) = hospitals.first() {
            preferences.hospital = Some(first.id().to_string());
            true
        } else {
            false
        };

        Ok(Loaded::Configured(Self {
            preferences,
            hospitals,
            hospital_from_settings,
        }))
    }

    /// Renders the settings as INI text.
    ///
    /// # Errors
    ///
    /// Returns an error if the INI writer fails.
    pub fn to_ini_string(&self) -> io::Result<String> {
        let mut buffer = Vec::new();
        self.to_ini().write_to_opt(&mut buffer, write_option())?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Writes the settings to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write(&self, path: &Path) -> Result<(), Error> {
        self.to_ini()
            .write_to_file_opt(path, write_option())
            .map_err(|source| Error::Write {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::debug!("wrote settings to {}", path.display());
        Ok(())
    }

    fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();

        let preferences = &self.preferences;
        ini.with_section(Some(OPTIONS))
            .set("user", preferences.user.as_str())
            .set("language", preferences.language.as_str())
            .set("unique", preferences.unique.as_str());
        if let Some(hospital) = &preferences.hospital {
            ini.with_section(Some(OPTIONS)).set("hospital", hospital.as_str());
        }

        let mut recent = Properties::new();
        for (i, path) in preferences.recent_to_store().enumerate() {
            recent.insert((i + 1).to_string(), path.display().to_string());
        }
        ini.entry(Some(RECENT.to_string())).or_insert(recent);

        let hospitals: Vec<&Hospital> = self
            .hospitals
            .iter()
            .filter(|hospital| {
                let valid = is_valid_hospital_id(hospital.id());
                if !valid {
                    tracing::warn!(
                        "not writing hospital '{}': the name cannot be stored",
                        hospital.id()
                    );
                }
                valid
            })
            .collect();

        let mut taken: HashSet<String> = [OPTIONS, RECENT]
            .into_iter()
            .map(ToString::to_string)
            .chain(hospitals.iter().map(|h| h.id().to_string()))
            .collect();

        for hospital in hospitals {
            write_hospital(&mut ini, hospital, &mut taken);
        }

        ini
    }
}

fn write_option() -> WriteOption {
    WriteOption {
        escape_policy: EscapePolicy::Nothing,
        ..WriteOption::default()
    }
}

/// Reads the hospital in `section`, if the section describes one.
///
/// A section is a hospital if it points at a buildings section and a
/// departments section that both exist. Anything else is ignored.
fn read_hospital(
    ini: &Ini,
    section: &str,
    properties: &Properties,
) -> Result<Option<Hospital>, Error> {
    let (Some(buildings), Some(departments)) =
        (properties.get(BUILDINGS), properties.get(DEPARTMENTS))
    else {
        return Ok(None);
    };
    let (Some(building_rooms), Some(department_rooms)) =
        (ini.section(Some(buildings)), ini.section(Some(departments)))
    else {
        tracing::debug!("ignoring section [{section}]: linked sections are missing");
        return Ok(None);
    };

    let missing = |field: &'static str| Error::MissingField {
        section: section.to_string(),
        field,
    };
    let field = |key: &'static str| {
        properties
            .get(key)
            .map(ToString::to_string)
            .ok_or_else(|| missing(key))
    };
    // Older files store the full name under "full".
    let full = properties
        .get("fullname")
        .or_else(|| properties.get("full"))
        .map(ToString::to_string)
        .ok_or_else(|| missing("fullname"))?;

    let info = HospitalInfo {
        name: field("name")?,
        full,
        created: field("created")?,
        created_by: field("created-by")?,
        updated: field("updated")?,
        updated_by: field("updated-by")?,
        version: field("version")?,
    };

    let mut hospital = Hospital::new(section, info);
    for (kind, rooms) in [
        (GroupKind::Building, building_rooms),
        (GroupKind::Department, department_rooms),
    ] {
        for (name, value) in rooms.iter() {
            hospital.add_group(kind, name);
            for token in expand_integers(value) {
                match kind {
                    GroupKind::Building => hospital.register_room(Some(name), None, &token),
                    GroupKind::Department => hospital.register_room(None, Some(name), &token),
                };
            }
        }
    }
    hospital.set_sections(SectionNames {
        buildings: buildings.to_string(),
        departments: departments.to_string(),
    });

    Ok(Some(hospital))
}

fn write_hospital(ini: &mut Ini, hospital: &Hospital, taken: &mut HashSet<String>) {
    let info = &hospital.info;
    let stored = hospital.sections();

    let buildings = section_name(hospital, "Blds", stored.map(|s| s.buildings.as_str()), taken);
    let departments = section_name(
        hospital,
        "Deps",
        stored.map(|s| s.departments.as_str()),
        taken,
    );

    ini.with_section(Some(hospital.id()))
        .set("name", info.name.as_str())
        .set("fullname", info.full.as_str())
        .set("created", info.created.as_str())
        .set("created-by", info.created_by.as_str())
        .set("updated", info.updated.as_str())
        .set("updated-by", info.updated_by.as_str())
        .set("version", info.version.as_str())
        .set(BUILDINGS, buildings.as_str())
        .set(DEPARTMENTS, departments.as_str());

    for (kind, section) in [
        (GroupKind::Building, buildings),
        (GroupKind::Department, departments),
    ] {
        let mut properties = Properties::new();
        for name in hospital.group(kind).names() {
            if !is_storable_name(name) {
                tracing::warn!("not writing {kind} '{name}': the name cannot be stored");
                continue;
            }
            properties.insert(name, compress(hospital.group_tokens(kind, name)));
        }
        ini.entry(Some(section)).or_insert(properties);
    }
}

/// Picks the section name for a hospital's buildings or departments.
///
/// A name stored in the hospital is kept when it is still free. Otherwise the
/// standard name `<first word>Blds` is used, falling back to the standard name
/// followed by the length of the hospital name.
fn section_name(
    hospital: &Hospital,
    suffix: &str,
    stored: Option<&str>,
    taken: &mut HashSet<String>,
) -> String {
    let base = if is_storable_name(&hospital.info.name) {
        hospital.info.name.as_str()
    } else {
        hospital.id()
    };
    let first_word = base.split_whitespace().next().unwrap_or(base);
    let standard = format!("{first_word}{suffix}");
    let alternative = format!("{standard}{}", base.chars().count());

    let stored = stored.filter(|name| is_storable_name(name));
    if let Some(stored) = stored.filter(|name| *name != standard && *name != alternative) {
        tracing::warn!(
            "using non-standard section name '{stored}' for hospital '{}'",
            hospital.id()
        );
    }

    let preferred = stored
        .into_iter()
        .map(ToString::to_string)
        .chain([standard, alternative.clone()])
        .find(|name| !taken.contains(name));

    let name = preferred.unwrap_or_else(|| {
        let mut n = 2;
        loop {
            let name = format!("{alternative}_{n}");
            if !taken.contains(&name) {
                break name;
            }
            n += 1;
        }
    });
    taken.insert(name.clone());
    name
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use test_case::test_case;

    use super::*;
    use crate::domain::RoomStatus;

    const HOSPITAL: &str = "\
[OPTIONS]
user = alice
language = Norwegian
unique = free-text
hospital = MadeUp Hospital

[RECENT]
1 = /data/outbreak-2.csv
2 = /data/outbreak-1.csv

[MadeUp Hospital]
name = MadeUp Hospital
fullname = MadeUp University Hospital
created = 2020-05-28T10:00:00
created-by = alice
updated = 2020-05-29T09:30:00
updated-by = bob
version = 0.01 alpha
buildings = MadeUpBlds
departments = MadeUpDeps

[MadeUpBlds]
Main = 101-103, 200
Annex = 5

[MadeUpDeps]
Maternity = 101-102
";

    fn configured(content: &str) -> Settings {
        Settings::from_ini_str(content)
            .unwrap()
            .into_settings()
            .expect("settings should be configured")
    }

    #[test]
    fn user_only_is_configured_without_hospitals() {
        let settings = configured("[OPTIONS]\nuser = alice\n");

        assert_eq!(settings.preferences.user, "alice");
        assert_eq!(settings.preferences.language, "English");
        assert_eq!(settings.preferences.unique, "FNR");
        assert_eq!(settings.preferences.hospital, None);
        assert!(settings.hospitals.is_empty());
        assert!(!settings.hospital_from_settings());
        assert!(settings.active_hospital().is_none());
    }

    #[test]
    fn missing_options_is_unconfigured() {
        let loaded = Settings::from_ini_str("[RECENT]\n1 = a.csv\n").unwrap();
        assert!(!loaded.is_configured());
    }

    #[test]
    fn missing_user_is_unconfigured() {
        let loaded = Settings::from_ini_str("[OPTIONS]\nlanguage = English\n").unwrap();
        assert!(!loaded.is_configured());
    }

    #[test]
    fn empty_user_is_unconfigured() {
        let loaded = Settings::from_ini_str("[OPTIONS]\nuser =\n").unwrap();
        assert_eq!(loaded, Loaded::Unconfigured);
    }

    #[test]
    fn missing_file_is_unconfigured() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Settings::read(&dir.path().join(FILE_NAME)).unwrap();
        assert_eq!(loaded, Loaded::Unconfigured);
    }

    #[test]
    fn reads_preferences_and_recent_files_in_order() {
        let settings = configured(HOSPITAL);
        let preferences = &settings.preferences;

        assert_eq!(preferences.language, "Norwegian");
        assert_eq!(preferences.unique, "free-text");
        assert_eq!(preferences.hospital.as_deref(), Some("MadeUp Hospital"));
        assert_eq!(
            preferences.recent,
            [
                PathBuf::from("/data/outbreak-2.csv"),
                PathBuf::from("/data/outbreak-1.csv")
            ]
        );
    }

    #[test]
    fn reads_hospital() {
        let settings = configured(HOSPITAL);
        let hospital = settings.active_hospital().unwrap();

        assert_eq!(hospital.info.full, "MadeUp University Hospital");
        assert_eq!(hospital.info.created_by, "alice");
        assert_eq!(hospital.info.updated_by, "bob");
        assert_eq!(hospital.info.version, "0.01 alpha");

        assert_eq!(hospital.buildings().names().collect::<Vec<_>>(), ["Main", "Annex"]);
        assert_eq!(
            hospital.group_tokens(GroupKind::Building, "Main"),
            ["101", "102", "103", "200"]
        );
        assert_eq!(hospital.rooms_in_buildings(), 5);
        assert_eq!(hospital.rooms_in_departments(), 2);
        // Building and department registrations are keyed separately.
        assert_eq!(hospital.room_count(), 7);

        let sections = hospital.sections().unwrap();
        assert_eq!(sections.buildings, "MadeUpBlds");
        assert_eq!(sections.departments, "MadeUpDeps");
    }

    #[test]
    fn first_hospital_is_selected_by_default() {
        let content = HOSPITAL.replace("hospital = MadeUp Hospital\n", "");
        let settings = configured(&content);

        assert_eq!(settings.preferences.hospital.as_deref(), Some("MadeUp Hospital"));
        assert!(settings.hospital_from_settings());
    }

    #[test]
    fn hospital_with_dangling_section_is_ignored() {
        let content = HOSPITAL.replace("departments = MadeUpDeps", "departments = NoSuchDeps");
        let settings = configured(&content);

        assert!(settings.hospitals.is_empty());
    }

    #[test]
    fn section_without_links_is_ignored() {
        let settings = configured("[OPTIONS]\nuser = alice\n\n[Notes]\nname = scratch\n");
        assert!(settings.hospitals.is_empty());
    }

    #[test]
    fn missing_info_field_is_an_error() {
        let content = HOSPITAL.replace("created-by = alice\n", "");
        let error = Settings::from_ini_str(&content).unwrap_err();

        assert!(matches!(
            error,
            Error::MissingField { ref section, field: "created-by" } if section == "MadeUp Hospital"
        ));
        assert_eq!(
            error.to_string(),
            "hospital section [MadeUp Hospital] is missing the 'created-by' field"
        );
    }

    #[test]
    fn legacy_full_key_is_accepted() {
        let content = HOSPITAL.replace("fullname =", "full =");
        let settings = configured(&content);
        assert_eq!(
            settings.active_hospital().unwrap().info.full,
            "MadeUp University Hospital"
        );
    }

    #[test]
    fn garbage_room_values_are_skipped() {
        let content = HOSPITAL.replace("Annex = 5", "Annex = 5, A1-A3, 7-x, Lab");
        let settings = configured(&content);
        let hospital = settings.active_hospital().unwrap();

        assert_eq!(hospital.group_tokens(GroupKind::Building, "Annex"), ["5"]);
    }

    #[test]
    fn write_then_read_round_trips() {
        let mut preferences = Preferences::new("alice");
        preferences.language = "Norwegian".to_string();
        preferences.push_recent(Path::new("/data/old.csv"));
        preferences.push_recent(Path::new("/data/new.csv"));

        let mut settings = Settings::new(preferences);
        let mut hospital = Hospital::create(
            "MadeUp sykehus",
            "MadeUp universitetssykehus",
            "alice",
            "0.1.0",
        )
        .unwrap();
        hospital.register_rooms(Some("Main"), Some("ICU"), ["101", "102", "103", "110"]);
        hospital.register_room(Some("Annex"), None, "7");
        hospital.add_group(GroupKind::Department, "Radiology");
        settings.hospitals.insert(hospital.clone());
        assert!(settings.select_hospital("MadeUp sykehus"));

        let text = settings.to_ini_string().unwrap();
        assert!(text.contains("buildings=MadeUpBlds"), "{text}");
        assert!(text.contains("Main=101-103, 110"), "{text}");
        assert!(text.contains("[MadeUpDeps]"), "{text}");

        let read = configured(&text);
        assert_eq!(read.preferences.language, "Norwegian");
        assert_eq!(
            read.preferences.recent,
            [PathBuf::from("/data/new.csv"), PathBuf::from("/data/old.csv")]
        );

        let loaded = read.active_hospital().unwrap();
        assert_eq!(loaded.info, hospital.info);
        assert_eq!(
            loaded.group_tokens(GroupKind::Building, "Main"),
            ["101", "102", "103", "110"]
        );
        assert_eq!(loaded.group_tokens(GroupKind::Building, "Annex"), ["7"]);
        assert_eq!(
            loaded.group_tokens(GroupKind::Department, "ICU"),
            ["101", "102", "103", "110"]
        );
        assert!(loaded.departments().contains("Radiology"));
    }

    #[test]
    fn room_status_is_not_stored() {
        let mut settings = Settings::new(Preferences::new("alice"));
        let mut hospital = Hospital::create("Test", "Test", "alice", "0.1.0").unwrap();
        let key = hospital.register_room(Some("Main"), None, "1").unwrap();
        hospital.set_room_status(&key, Some(RoomStatus::Contaminated));
        settings.hospitals.insert(hospital);

        let read = configured(&settings.to_ini_string().unwrap());
        let loaded = read.hospitals.get("Test").unwrap();
        assert_eq!(loaded.room(&key).unwrap().status, None);
    }

    #[test]
    fn alphanumeric_rooms_do_not_survive_a_round_trip() {
        let mut settings = Settings::new(Preferences::new("alice"));
        let mut hospital = Hospital::create("Test", "Test", "alice", "0.1.0").unwrap();
        hospital.register_rooms(Some("Main"), None, ["1", "A01", "A02"]);
        settings.hospitals.insert(hospital);

        let text = settings.to_ini_string().unwrap();
        assert!(text.contains("Main=1, A01, A02"), "{text}");

        let read = configured(&text);
        let loaded = read.hospitals.get("Test").unwrap();
        assert_eq!(loaded.group_tokens(GroupKind::Building, "Main"), ["1"]);
    }

    #[test]
    fn recent_files_are_capped_on_write() {
        let mut preferences = Preferences::new("alice");
        preferences.recent = (1..=8).map(|i| PathBuf::from(format!("{i}.csv"))).collect();
        let text = Settings::new(preferences).to_ini_string().unwrap();

        let read = configured(&text);
        assert_eq!(read.preferences.recent.len(), 5);
        assert!(text.contains("5=5.csv"));
        assert!(!text.contains("6=6.csv"));
    }

    #[test]
    fn colliding_section_names_get_length_suffix() {
        let mut settings = Settings::new(Preferences::new("alice"));
        settings
            .hospitals
            .insert(Hospital::create("MadeUp North", "North", "alice", "0.1.0").unwrap());
        settings
            .hospitals
            .insert(Hospital::create("MadeUp South Hospital", "South", "alice", "0.1.0").unwrap());

        let text = settings.to_ini_string().unwrap();
        assert!(text.contains("[MadeUpBlds]"), "{text}");
        assert!(text.contains("[MadeUpBlds21]"), "{text}");
        assert!(text.contains("[MadeUpDeps21]"), "{text}");

        let read = configured(&text);
        assert_eq!(read.hospitals.len(), 2);
        let south = read.hospitals.get("MadeUp South Hospital").unwrap();
        assert_eq!(south.sections().unwrap().buildings, "MadeUpBlds21");
    }

    #[test]
    fn stored_section_names_are_kept() {
        let settings = configured(HOSPITAL);
        let text = settings.to_ini_string().unwrap();

        assert!(text.contains("buildings=MadeUpBlds"));
        assert!(text.contains("departments=MadeUpDeps"));
        assert_eq!(configured(&text), settings);
    }

    #[test]
    fn read_and_write_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(HOSPITAL.as_bytes()).unwrap();

        let settings = Settings::read(file.path()).unwrap().into_settings().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        settings.write(&path).unwrap();

        let again = Settings::read(&path).unwrap().into_settings().unwrap();
        assert_eq!(again, settings);
    }

    #[test]
    fn reserved_ids_are_the_preference_sections() {
        assert_eq!(crate::domain::RESERVED_IDS, [OPTIONS, RECENT]);
    }

    #[test]
    fn punctuated_names_round_trip() {
        let mut settings = Settings::new(Preferences::new("alice"));
        let mut hospital =
            Hospital::create("St. Olav (HF)", "St. Olavs hospital HF", "alice", "0.1.0").unwrap();
        hospital.register_rooms(Some("Bygg 2; Øst"), None, ["1", "2"]);
        hospital.register_rooms(None, Some("Room #1"), ["3"]);
        settings.hospitals.insert(hospital);

        let read = configured(&settings.to_ini_string().unwrap());
        let loaded = read.hospitals.get("St. Olav (HF)").unwrap();
        assert_eq!(
            loaded.group_tokens(GroupKind::Building, "Bygg 2; Øst"),
            ["1", "2"]
        );
        assert_eq!(loaded.group_tokens(GroupKind::Department, "Room #1"), ["3"]);
    }

    #[test]
    fn bracketed_hospital_name_is_refused() {
        let mut settings = Settings::new(Preferences::new("alice"));
        assert!(
            Hospital::create("St. Olav [HF]", "St. Olavs hospital HF", "alice", "0.1.0").is_none()
        );

        // A hospital built around the check is left out of the file.
        settings.hospitals.insert(Hospital::new(
            "St. Olav [HF]",
            HospitalInfo {
                name: "St. Olav [HF]".to_string(),
                ..HospitalInfo::default()
            },
        ));
        settings
            .hospitals
            .insert(Hospital::create("MadeUp", "MadeUp", "alice", "0.1.0").unwrap());

        let text = settings.to_ini_string().unwrap();
        assert!(!text.contains("[HF]"), "{text}");

        let read = configured(&text);
        assert_eq!(read.hospitals.len(), 1);
        assert!(read.hospitals.contains("MadeUp"));
    }

    #[test_case("Block A: East"; "colon")]
    #[test_case("Wing=2"; "equals")]
    #[test_case("#1 Main"; "hash comment")]
    #[test_case(";Old"; "semicolon comment")]
    #[test_case("[Annex]"; "section header")]
    fn unstorable_group_names_never_reach_the_file(name: &str) {
        let mut settings = Settings::new(Preferences::new("alice"));
        let mut hospital = Hospital::create("MadeUp", "MadeUp", "alice", "0.1.0").unwrap();
        assert!(!hospital.add_group(GroupKind::Building, name));
        assert_eq!(hospital.register_room(Some(name), None, "9"), None);
        assert_eq!(hospital.register_room(None, Some(name), "9"), None);
        hospital.register_rooms(Some("Main"), Some("ICU"), ["1", "2"]);
        settings.hospitals.insert(hospital);

        let read = configured(&settings.to_ini_string().unwrap());
        let loaded = read.hospitals.get("MadeUp").unwrap();
        assert_eq!(loaded.buildings().names().collect::<Vec<_>>(), ["Main"]);
        assert_eq!(loaded.departments().names().collect::<Vec<_>>(), ["ICU"]);
        assert_eq!(loaded.group_tokens(GroupKind::Building, "Main"), ["1", "2"]);
    }

    #[test]
    fn reserved_hospital_ids_are_not_written() {
        let mut settings = Settings::new(Preferences::new("alice"));
        assert!(Hospital::create("OPTIONS", "Options", "alice", "0.1.0").is_none());

        let mut options = Hospital::new("OPTIONS", HospitalInfo::default());
        options.register_room(Some("Main"), None, "1");
        settings.hospitals.insert(options);

        let text = settings.to_ini_string().unwrap();
        let read = configured(&text);
        assert_eq!(read.preferences.user, "alice");
        assert!(read.hospitals.is_empty());
        assert!(!text.contains("buildings="), "{text}");
    }

    #[test]
    fn unstorable_display_name_falls_back_to_id_for_sections() {
        let mut settings = Settings::new(Preferences::new("alice"));
        let mut hospital = Hospital::new(
            "MadeUp",
            HospitalInfo {
                name: "[Old] MadeUp".to_string(),
                full: "MadeUp".to_string(),
                ..HospitalInfo::default()
            },
        );
        hospital.register_room(Some("Main"), None, "1");
        settings.hospitals.insert(hospital);

        let text = settings.to_ini_string().unwrap();
        assert!(text.contains("[MadeUpBlds]"), "{text}");

        let read = configured(&text);
        let loaded = read.hospitals.get("MadeUp").unwrap();
        assert_eq!(loaded.info.name, "[Old] MadeUp");
        assert_eq!(loaded.group_tokens(GroupKind::Building, "Main"), ["1"]);
    }

    #[test]
    fn written_file_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);

        let mut settings = Settings::new(Preferences::new("alice"));
        settings
            .hospitals
            .insert(Hospital::create("MadeUp", "MadeUp", "alice", "0.1.0").unwrap());
        settings.write(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, settings.to_ini_string().unwrap());
        assert!(Settings::read(&path).unwrap().is_configured());
    }

    #[test]
    fn write_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join(FILE_NAME);

        let error = Settings::new(Preferences::new("alice"))
            .write(&path)
            .unwrap_err();
        assert!(matches!(error, Error::Write { .. }));
    }
}
