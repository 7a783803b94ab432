use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Options the host can set. Unknown keys are ignored and missing keys take
/// their defaults, so a partial settings file is always valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub ignorecase: bool,
    /// Only consulted when `ignorecase` is on: an uppercase character in the
    /// pattern makes the search case sensitive.
    pub smartcase: bool,
    pub highlight_yank: bool,
    pub highlight_yank_duration_ms: u64,
    pub leader_key: char,
    /// Enables the two-character search family (`s`/`S`, `z`/`Z` after an
    /// operator).
    pub use_sneak: bool,
    pub indent_width: usize,
    pub jump_list_capacity: usize,
    /// Where global (uppercase) marks are persisted. `None` keeps them in
    /// memory only.
    pub global_marks_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignorecase: false,
            smartcase: false,
            highlight_yank: true,
            highlight_yank_duration_ms: 200,
            leader_key: '\\',
            use_sneak: false,
            indent_width: 4,
            jump_list_capacity: 100,
            global_marks_file: None,
        }
    }
}

impl Config {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load settings from `path`, falling back to the defaults when the file
    /// is missing or malformed.
    pub fn load(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                log::debug!("no settings at {}: {err}", path.display());
                return Self::default();
            }
        };
        Self::from_json(&text).unwrap_or_else(|err| {
            log::warn!("ignoring settings at {}: {err}", path.display());
            Self::default()
        })
    }

    pub fn case_sensitive(&self, pattern: &str) -> bool {
        !self.ignorecase || (self.smartcase && pattern.chars().any(char::is_uppercase))
    }
}
