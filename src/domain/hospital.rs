//! Hospitals, their buildings and departments, and the rooms within them.

use std::{collections::BTreeSet, fmt};

use indexmap::IndexMap;
use serde::Serialize;

/// Which of a hospital's two room groupings is meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GroupKind {
    /// A physical building.
    Building,
    /// A logical department.
    Department,
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Building => f.write_str("building"),
            Self::Department => f.write_str("department"),
        }
    }
}

/// The unique identifier of a room within a hospital.
///
/// Many buildings share room numbers (every first floor has a room 101), so
/// the key combines the hospital, the owning building (or, failing that,
/// department) and the room token: `"MadeUp Hospital_Main building_115"`.
/// A room registered without any grouping is keyed by its token alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RoomKey(String);

impl RoomKey {
    /// Builds the composite key for a room.
    #[must_use]
    pub fn new(
        hospital: &str,
        building: Option<&str>,
        department: Option<&str>,
        token: &str,
    ) -> Self {
        match building.or(department) {
            Some(group) => Self(format!("{hospital}_{group}_{token}")),
            None => Self(token.to_string()),
        }
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Infection-control status of a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RoomStatus {
    /// Confirmed contaminated.
    Contaminated,
    /// Exposed, awaiting results.
    AtRisk,
    /// Empty.
    Empty,
    /// Not in use.
    NotInUse,
    /// Any other status, as entered by the user.
    Custom(String),
}

impl From<&str> for RoomStatus {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "contaminated" => Self::Contaminated,
            "at risk" => Self::AtRisk,
            "empty" => Self::Empty,
            "not in use" => Self::NotInUse,
            _ => Self::Custom(s.trim().to_string()),
        }
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contaminated => f.write_str("contaminated"),
            Self::AtRisk => f.write_str("at risk"),
            Self::Empty => f.write_str("empty"),
            Self::NotInUse => f.write_str("not in use"),
            Self::Custom(status) => f.write_str(status),
        }
    }
}

/// A single room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Room {
    /// The room identifier as entered, e.g. `"115"` or `"A04"`.
    pub token: String,

    /// Current status; `None` means nothing to report.
    pub status: Option<RoomStatus>,

    /// The building the room was registered under.
    pub bld: Option<String>,

    /// The department the room was registered under.
    pub dep: Option<String>,
}

/// Administrative information about a hospital.
///
/// These are the seven fields stored in the hospital's settings section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HospitalInfo {
    /// Short name, also used as the hospital identifier.
    pub name: String,
    /// Full, administrative or legal name.
    pub full: String,
    /// Creation timestamp (ISO 8601).
    pub created: String,
    /// User who created the hospital.
    pub created_by: String,
    /// Last update timestamp (ISO 8601).
    pub updated: String,
    /// User who last updated the hospital.
    pub updated_by: String,
    /// Version of the program that created the hospital.
    pub version: String,
}

impl HospitalInfo {
    /// Records an edit by `user` at the current local time.
    pub fn touch(&mut self, user: &str) {
        self.updated = timestamp();
        self.updated_by = user.to_string();
    }
}

fn timestamp() -> String {
    chrono::Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

/// Hospital ids reserved for the preference sections of the settings file.
pub const RESERVED_IDS: [&str; 2] = ["OPTIONS", "RECENT"];

/// Returns `true` if `name` can be stored in the settings file as a section
/// or key and read back unchanged.
///
/// Such names are not blank, contain no `[`, `]`, `=`, `:` or control
/// characters, and do not start with a comment marker (`#` or `;`).
#[must_use]
pub fn is_storable_name(name: &str) -> bool {
    let name = name.trim();
    !name.is_empty()
        && !name.starts_with(['#', ';'])
        && !name
            .chars()
            .any(|c| matches!(c, '[' | ']' | '=' | ':') || c.is_control())
}

/// Returns `true` if `id` can identify a hospital in the settings file.
#[must_use]
pub fn is_valid_hospital_id(id: &str) -> bool {
    is_storable_name(id) && !RESERVED_IDS.contains(&id.trim())
}

/// Named room groups: either all buildings or all departments of a hospital.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Group {
    members: IndexMap<String, BTreeSet<RoomKey>>,
}

impl Group {
    /// Adds an empty group called `name`.
    ///
    /// Returns `false` if the name is already present or cannot be stored
    /// (see [`is_storable_name`]).
    pub fn add(&mut self, name: &str) -> bool {
        let name = name.trim();
        if !is_storable_name(name) || self.members.contains_key(name) {
            return false;
        }
        self.members.insert(name.to_string(), BTreeSet::new());
        true
    }

    /// Returns the rooms of the group called `name`, creating it if absent.
    ///
    /// Returns `None` if the name cannot be stored.
    pub fn get_or_create(&mut self, name: &str) -> Option<&mut BTreeSet<RoomKey>> {
        let name = name.trim();
        if !is_storable_name(name) {
            return None;
        }
        Some(self.members.entry(name.to_string()).or_default())
    }

    /// Returns the rooms of the group called `name`.
    #[must_use]
    pub fn rooms(&self, name: &str) -> Option<&BTreeSet<RoomKey>> {
        self.members.get(name)
    }

    /// Returns `true` if a group called `name` exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    /// The group names, in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }

    /// The number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if there are no groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The number of room memberships across all groups.
    #[must_use]
    pub fn room_count(&self) -> usize {
        self.members.values().map(BTreeSet::len).sum()
    }
}

/// Names of the settings sections holding a hospital's buildings and
/// departments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionNames {
    /// Section listing buildings.
    pub buildings: String,
    /// Section listing departments.
    pub departments: String,
}

/// Share of rooms that belong to a building and to a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Coverage {
    /// Rooms in buildings over total rooms, e.g. `"87.5%"`.
    pub buildings: String,
    /// Rooms in departments over total rooms.
    pub departments: String,
}

/// A hospital and everything registered under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hospital {
    id: String,

    /// Administrative information.
    pub info: HospitalInfo,

    buildings: Group,
    departments: Group,
    rooms: IndexMap<RoomKey, Room>,
    sections: Option<SectionNames>,
}

impl Hospital {
    /// Creates an empty hospital from existing information.
    #[must_use]
    pub fn new(id: impl Into<String>, info: HospitalInfo) -> Self {
        Self {
            id: id.into(),
            info,
            buildings: Group::default(),
            departments: Group::default(),
            rooms: IndexMap::new(),
            sections: None,
        }
    }

    /// Creates a new hospital on behalf of `user`.
    ///
    /// Creation and update are both stamped with the current local time.
    ///
    /// Returns `None` if `name` is not a valid hospital id (see
    /// [`is_valid_hospital_id`]) or any field contains a line break or other
    /// control character.
    #[must_use]
    pub fn create(name: &str, full: &str, user: &str, version: &str) -> Option<Self> {
        let name = name.trim();
        if !is_valid_hospital_id(name)
            || [full, user, version]
                .iter()
                .any(|field| field.chars().any(char::is_control))
        {
            return None;
        }
        let now = timestamp();
        let info = HospitalInfo {
            name: name.to_string(),
            full: full.to_string(),
            created: now.clone(),
            created_by: user.to_string(),
            updated: now,
            updated_by: user.to_string(),
            version: version.to_string(),
        };
        Some(Self::new(name, info))
    }

    /// The identifier of the hospital (its settings section name).
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// All buildings.
    #[must_use]
    pub const fn buildings(&self) -> &Group {
        &self.buildings
    }

    /// All departments.
    #[must_use]
    pub const fn departments(&self) -> &Group {
        &self.departments
    }

    /// The buildings or departments, by kind.
    #[must_use]
    pub const fn group(&self, kind: GroupKind) -> &Group {
        match kind {
            GroupKind::Building => &self.buildings,
            GroupKind::Department => &self.departments,
        }
    }

    /// The settings sections this hospital was loaded from, if any.
    #[must_use]
    pub const fn sections(&self) -> Option<&SectionNames> {
        self.sections.as_ref()
    }

    /// Records the settings sections holding buildings and departments.
    pub fn set_sections(&mut self, sections: SectionNames) {
        self.sections = Some(sections);
    }

    /// Adds an empty building or department.
    ///
    /// Returns `false` (and changes nothing) if the name already exists for
    /// that kind or cannot be stored.
    pub fn add_group(&mut self, kind: GroupKind, name: &str) -> bool {
        match kind {
            GroupKind::Building => self.buildings.add(name),
            GroupKind::Department => self.departments.add(name),
        }
    }

    /// Registers a room under an optional building and department.
    ///
    /// Named groups are created if they do not exist yet and the room key is
    /// added to each of them. The room itself is only created if its key is
    /// new; registering an existing key leaves that room untouched.
    ///
    /// Returns `None`, registering nothing, if the token is empty or holds a
    /// comma or control character, or if a group name cannot be stored.
    pub fn register_room(
        &mut self,
        building: Option<&str>,
        department: Option<&str>,
        token: &str,
    ) -> Option<RoomKey> {
        let token = token.trim();
        if token.is_empty() || token.chars().any(|c| c == ',' || c.is_control()) {
            return None;
        }
        let building = building.map(str::trim).filter(|s| !s.is_empty());
        let department = department.map(str::trim).filter(|s| !s.is_empty());
        if building.into_iter().chain(department).any(|name| !is_storable_name(name)) {
            return None;
        }

        let key = RoomKey::new(&self.id, building, department, token);

        if let Some(rooms) = building.and_then(|name| self.buildings.get_or_create(name)) {
            rooms.insert(key.clone());
        }
        if let Some(rooms) = department.and_then(|name| self.departments.get_or_create(name)) {
            rooms.insert(key.clone());
        }

        self.rooms.entry(key.clone()).or_insert_with(|| Room {
            token: token.to_string(),
            status: None,
            bld: building.map(ToString::to_string),
            dep: department.map(ToString::to_string),
        });

        Some(key)
    }

    /// Registers several rooms under the same building and department.
    ///
    /// Returns the keys of the registered rooms.
    pub fn register_rooms<'a, I>(
        &mut self,
        building: Option<&str>,
        department: Option<&str>,
        tokens: I,
    ) -> Vec<RoomKey>
    where
        I: IntoIterator<Item = &'a str>,
    {
        tokens
            .into_iter()
            .filter_map(|token| self.register_room(building, department, token))
            .collect()
    }

    /// Looks up a room by key.
    #[must_use]
    pub fn room(&self, key: &RoomKey) -> Option<&Room> {
        self.rooms.get(key)
    }

    /// Iterates over all rooms in registration order.
    pub fn rooms(&self) -> impl Iterator<Item = (&RoomKey, &Room)> {
        self.rooms.iter()
    }

    /// Sets or clears the status of a room.
    ///
    /// Returns `false` if there is no such room.
    pub fn set_room_status(&mut self, key: &RoomKey, status: Option<RoomStatus>) -> bool {
        self.rooms.get_mut(key).is_some_and(|room| {
            room.status = status;
            true
        })
    }

    /// The room tokens of a building or department, for writing to settings.
    #[must_use]
    pub fn group_tokens(&self, kind: GroupKind, name: &str) -> Vec<&str> {
        self.group(kind)
            .rooms(name)
            .into_iter()
            .flatten()
            .filter_map(|key| self.rooms.get(key))
            .map(|room| room.token.as_str())
            .collect()
    }

    /// Total number of rooms.
    #[must_use]
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Number of room memberships across all buildings.
    #[must_use]
    pub fn rooms_in_buildings(&self) -> usize {
        self.buildings.room_count()
    }

    /// Number of room memberships across all departments.
    #[must_use]
    pub fn rooms_in_departments(&self) -> usize {
        self.departments.room_count()
    }

    /// How many rooms belong to a building and to a department.
    #[must_use]
    pub fn coverage(&self) -> Coverage {
        let total = self.room_count();
        Coverage {
            buildings: percentage(self.rooms_in_buildings(), total),
            departments: percentage(self.rooms_in_departments(), total),
        }
    }

    /// Rooms that currently have a status.
    pub fn flagged_rooms(&self) -> impl Iterator<Item = (&RoomKey, &Room)> {
        self.rooms.iter().filter(|(_, room)| room.status.is_some())
    }

    /// Share of rooms that currently have a status, e.g. `"12.5%"`.
    #[must_use]
    pub fn flagged_share(&self) -> String {
        percentage(self.flagged_rooms().count(), self.room_count())
    }

    /// A one-line overview, e.g. `"MadeUp: 2 buildings, 1 department, 40 rooms"`.
    #[must_use]
    pub fn summary_line(&self) -> String {
        let rooms = self.room_count();
        if rooms == 0 {
            return "No rooms".to_string();
        }
        let buildings = self.buildings.len();
        let departments = self.departments.len();
        if buildings == 0 || departments == 0 {
            return "No rooms (rooms require a building and a department)".to_string();
        }
        format!(
            "{}: {buildings} {}, {departments} {}, {rooms} {}",
            self.id,
            plural(buildings, "building", "buildings"),
            plural(departments, "department", "departments"),
            plural(rooms, "room", "rooms"),
        )
    }
}

const fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}

#[allow(clippy::cast_precision_loss)]
fn percentage(part: usize, total: usize) -> String {
    if total == 0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", part as f64 / total as f64 * 100.0)
}

/// All known hospitals, in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hospitals {
    hospitals: IndexMap<String, Hospital>,
}

impl Hospitals {
    /// Adds a hospital, replacing any hospital with the same id.
    pub fn insert(&mut self, hospital: Hospital) {
        self.hospitals.insert(hospital.id.clone(), hospital);
    }

    /// Looks up a hospital by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Hospital> {
        self.hospitals.get(id)
    }

    /// Looks up a hospital by id, mutably.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Hospital> {
        self.hospitals.get_mut(id)
    }

    /// Returns the hospital with `id`, creating an empty one if absent.
    ///
    /// Returns `None` if `id` is not a valid hospital id.
    pub fn get_or_create(&mut self, id: &str) -> Option<&mut Hospital> {
        let id = id.trim();
        if !is_valid_hospital_id(id) {
            return None;
        }
        Some(
            self.hospitals
                .entry(id.to_string())
                .or_insert_with(|| Hospital::new(id, HospitalInfo::default())),
        )
    }

    /// Registers a room in the hospital `id`.
    ///
    /// Returns `None` if there is no such hospital or the token is empty.
    pub fn register_room(
        &mut self,
        id: &str,
        building: Option<&str>,
        department: Option<&str>,
        token: &str,
    ) -> Option<RoomKey> {
        self.hospitals
            .get_mut(id)?
            .register_room(building, department, token)
    }

    /// The first hospital added.
    #[must_use]
    pub fn first(&self) -> Option<&Hospital> {
        self.hospitals.first().map(|(_, hospital)| hospital)
    }

    /// Returns `true` if a hospital with `id` exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.hospitals.contains_key(id)
    }

    /// Iterates over hospitals in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Hospital> {
        self.hospitals.values()
    }

    /// The number of hospitals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hospitals.len()
    }

    /// Returns `true` if there are no hospitals.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hospitals.is_empty()
    }
}
