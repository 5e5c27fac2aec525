//! # Settings Module
//!
//! ## Purpose
//! Holds the tunable thresholds of the reaction finder and persists them as JSON.
//!
//! ## Thresholds
//! | Key | Default | Meaning |
//! |-----|---------|---------|
//! | `max_targets` | 5 | a paragraph expanding to this many targets (or more) is considered too ambiguous and yields no reactions |
//! | `min_reacting_formulas` | 2 | a redox agent found only among the reacting precursors is accepted when at least this many distinct reacting formulas exist |
//!
//! ## Configuration Format
//! ```json
//! {
//!   "max_targets": 5,
//!   "min_reacting_formulas": 2
//! }
//! ```
//! Missing keys fall back to their defaults.
//!
//! ## Usage Pattern
//! ```rust
//! use SynthRecipe::settings::FinderSettings;
//!
//! let settings = FinderSettings::with_config_file("no_such_config.json");
//! assert_eq!(settings, FinderSettings::default());
//! ```

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// file looked up by [`FinderSettings::new`]
pub const DEFAULT_CONFIG_FILE: &str = "finder_config.json";

/// Thresholds of the reaction finder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderSettings {
    /// targets (after variable expansion) at which a recipe is given up
    pub max_targets: usize,
    /// distinct reacting formulas needed to accept an agent found among reacting precursors
    pub min_reacting_formulas: usize,
}

impl Default for FinderSettings {
    fn default() -> Self {
        Self {
            max_targets: 5,
            min_reacting_formulas: 2,
        }
    }
}

impl FinderSettings {
    /// Loads settings from "finder_config.json" in the current directory,
    /// defaults if the file doesn't exist or is invalid
    pub fn new() -> Self {
        Self::with_config_file(DEFAULT_CONFIG_FILE)
    }

    /// Loads settings from a custom configuration file, defaults if the file doesn't exist or is invalid
    pub fn with_config_file(config_file: &str) -> Self {
        match Self::load_config(config_file) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(
                    "Failed to read settings from '{}': {}. Using defaults",
                    config_file, e
                );
                Self::default()
            }
        }
    }

    /// # Returns
    /// * `Ok(FinderSettings)` - Loaded settings, or defaults if the file doesn't exist
    /// * `Err(Box<dyn std::error::Error>)` - On I/O or JSON errors
    pub fn load_config(config_file: &str) -> Result<Self, Box<dyn std::error::Error>> {
        if Path::new(config_file).exists() {
            let content = fs::read_to_string(config_file)?;
            let settings: FinderSettings = serde_json::from_str(&content)?;
            info!("Loaded finder settings from '{}'", config_file);
            Ok(settings)
        } else {
            Ok(Self::default())
        }
    }

    /// Serializes the settings to a JSON file
    pub fn save_config(&self, config_file: &str) -> Result<(), Box<dyn std::error::Error>> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_file, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let settings = FinderSettings::default();
        assert_eq!(settings.max_targets, 5);
        assert_eq!(settings.min_reacting_formulas, 2);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = FinderSettings::with_config_file("definitely_missing_finder_config.json");
        assert_eq!(settings, FinderSettings::default());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let mut temp_config = NamedTempFile::new().unwrap();
        temp_config.write_all(br#"{"max_targets": 3}"#).unwrap();
        let settings = FinderSettings::with_config_file(temp_config.path().to_str().unwrap());
        assert_eq!(settings.max_targets, 3);
        assert_eq!(settings.min_reacting_formulas, 2);
    }

    #[test]
    fn test_invalid_config_gives_defaults() {
        let mut temp_config = NamedTempFile::new().unwrap();
        temp_config.write_all(b"{ not json").unwrap();
        let path = temp_config.path().to_str().unwrap();
        assert!(FinderSettings::load_config(path).is_err());
        assert_eq!(FinderSettings::with_config_file(path), FinderSettings::default());
    }

    #[test]
    fn test_save_and_reload() {
        let temp_config = NamedTempFile::new().unwrap();
        let path = temp_config.path().to_str().unwrap();
        let settings = FinderSettings {
            max_targets: 8,
            min_reacting_formulas: 3,
        };
        settings.save_config(path).unwrap();
        assert_eq!(FinderSettings::load_config(path).unwrap(), settings);
    }
}
