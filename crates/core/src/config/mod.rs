use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{component::PIANO_ROLL_TAG, Result, TimelineGrid};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    /// Grid new timelines and registered components start with.
    pub grid: TimelineGrid,
    /// Tag the piano roll is registered under.
    pub tag_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            grid: TimelineGrid::default(),
            tag_name: PIANO_ROLL_TAG.to_string(),
        }
    }
}

impl AppConfig {
    /// Loads a JSON config file. Keys that are missing fall back to defaults.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_json(&raw)?;
        tracing::info!(path = %path.display(), tag = %config.tag_name, "loaded config");
        Ok(config)
    }

    pub fn from_json(input: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(input)?;
        config.grid.validate()?;
        crate::registry::validate_tag_name(&config.tag_name)?;
        Ok(config)
    }
}
