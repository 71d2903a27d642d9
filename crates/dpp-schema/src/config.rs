//! Per-schema mapping files
//!
//! Reading a mapping file never fails: a missing file, an unreadable or
//! malformed one, and one whose top level is not a mapping all yield an
//! empty configuration.

use dpp_mapping::MapperConfig;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Conventional file name for a canonical schema name
/// (`ISA-95` -> `isa95_mapping.yml`).
#[must_use]
pub fn config_file_name(canonical_name: &str) -> String {
    format!("{}_mapping.yml", canonical_name.to_lowercase().replace('-', ""))
}

/// Read a mapping file, degrading to an empty configuration on any problem.
#[must_use]
pub fn read_mapper_config(path: &Path) -> MapperConfig {
    if !path.exists() {
        debug!("No config found at {}, using empty config", path.display());
        return MapperConfig::empty();
    }

    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            warn!("Failed to read config from {}: {}", path.display(), e);
            return MapperConfig::empty();
        }
    };

    if text.trim().is_empty() {
        debug!("Config at {} is empty", path.display());
        return MapperConfig::empty();
    }

    match serde_yaml::from_str::<Value>(&text) {
        Ok(Value::Null) => MapperConfig::empty(),
        Ok(value @ Value::Object(_)) => {
            info!("Loaded config from {}", path.display());
            MapperConfig::new(value)
        }
        Ok(_) => {
            warn!(
                "Failed to load config from {}: top level is not a mapping",
                path.display()
            );
            MapperConfig::empty()
        }
        Err(e) => {
            warn!("Failed to load config from {}: {}", path.display(), e);
            MapperConfig::empty()
        }
    }
}
