//! Effective settings for a document

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::config::{CONFIG_SECTION, DEFAULT_MAX_NUMBER_OF_PROBLEMS};
use crate::settings::error::SettingsError;

/// Settings that drive validation of one document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Upper bound on diagnostics published per validation pass
    pub max_number_of_problems: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_number_of_problems: DEFAULT_MAX_NUMBER_OF_PROBLEMS,
        }
    }
}

impl Settings {
    pub fn with_max_number_of_problems(max_number_of_problems: usize) -> Self {
        Self {
            max_number_of_problems,
        }
    }

    /// Parses a settings section as returned by the editor.
    ///
    /// `null` means the section is not configured and yields the defaults.
    pub fn from_value(value: Value) -> Result<Self, SettingsError> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value).map_err(|e| SettingsError::Invalid(e.to_string()))
    }

    /// Extracts global settings from a pushed `workspace/didChangeConfiguration`
    /// payload. A missing or malformed section falls back to the defaults.
    pub fn from_change_notification(settings: &Value) -> Self {
        let Some(section) = settings.get(CONFIG_SECTION) else {
            return Self::default();
        };

        Self::from_value(section.clone()).unwrap_or_else(|e| {
            warn!("Ignoring malformed {} settings: {}", CONFIG_SECTION, e);
            Self::default()
        })
    }
}
