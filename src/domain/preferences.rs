//! Per-user preferences kept in the settings file.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// Language used when the settings do not name one.
pub const DEFAULT_LANGUAGE: &str = "English";

/// Patient identifier method used when the settings do not name one.
///
/// FNR is the Norwegian national identity number.
pub const DEFAULT_UNIQUE: &str = "FNR";

const fn default_max_recent() -> usize {
    5
}

/// Per-user preferences stored in the `[OPTIONS]` and `[RECENT]` sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preferences {
    /// The user name recorded on created and updated hospitals.
    pub user: String,

    /// Interface language.
    pub language: String,

    /// How patients are uniquely identified (e.g. `FNR`).
    pub unique: String,

    /// The selected hospital, by id.
    pub hospital: Option<String>,

    /// Recently opened outbreak files, most recent first.
    pub recent: Vec<PathBuf>,

    /// The maximum number of recent files to keep.
    ///
    /// This is not stored in the settings file.
    #[serde(skip)]
    pub max_recent: usize,
}

impl Preferences {
    /// Creates preferences for `user` with default values for everything else.
    #[must_use]
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            language: DEFAULT_LANGUAGE.to_string(),
            unique: DEFAULT_UNIQUE.to_string(),
            hospital: None,
            recent: Vec::new(),
            max_recent: default_max_recent(),
        }
    }

    /// Records `path` as the most recently opened file.
    ///
    /// An existing entry for the same path is moved to the front, and the list
    /// is truncated to [`Self::max_recent`] entries.
    pub fn push_recent(&mut self, path: &Path) {
        self.recent.retain(|p| p != path);
        self.recent.insert(0, path.to_path_buf());
        self.recent.truncate(self.max_recent);
    }

    /// The recent files that should be written, capped at
    /// [`Self::max_recent`].
    pub fn recent_to_store(&self) -> impl Iterator<Item = &Path> {
        self.recent
            .iter()
            .take(self.max_recent)
            .map(PathBuf::as_path)
    }
}
