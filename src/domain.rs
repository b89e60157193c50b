//! Domain models for hospital outbreak tracking.
//!
//! This module contains the hospital hierarchy (hospitals, buildings,
//! departments and rooms), the room list parser, and user preferences.

/// Hospitals, buildings, departments and rooms.
pub mod hospital;
pub use hospital::{
    Coverage, Group, GroupKind, Hospital, HospitalInfo, Hospitals, RESERVED_IDS, Room, RoomKey,
    RoomStatus, SectionNames, is_storable_name, is_valid_hospital_id,
};

mod preferences;
pub use preferences::{DEFAULT_LANGUAGE, DEFAULT_UNIQUE, Preferences};

/// Room list parsing.
pub mod range;
pub use range::{Expansion, expand};
