//! Simple Hospital Outbreak Tracker
//!
//! Hospitals, their buildings, departments and rooms, parsed from the room
//! lists users type and persisted in a `settings.ini` file.

pub mod domain;
pub use domain::{
    Expansion, GroupKind, Hospital, HospitalInfo, Hospitals, Preferences, Room, RoomKey,
    RoomStatus, expand,
};

/// Settings file storage.
pub mod storage;
pub use storage::{Loaded, Settings};
