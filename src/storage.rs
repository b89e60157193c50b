//! Persistence of preferences and hospitals in the settings file.

/// Compression of room lists into human-readable ranges.
pub mod ranges;

/// Reading and writing `settings.ini`.
pub mod settings;
pub use settings::{Error, FILE_NAME, Loaded, Settings};
