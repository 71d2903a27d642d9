//! Mapper configuration
//!
//! The per-schema configuration is an arbitrary structured document, read
//! verbatim from the schema's mapping file. Mappers mostly consult its
//! `domain_mappings` table, produced offline by the classifier:
//!
//! ```yaml
//! domain_mappings:
//!   Actuator:
//!     domain_class: Actuator
//!     isa95_type_ids: [EquipmentClassType, EquipmentType]
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured configuration handed to a mapper at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapperConfig(Value);

impl Default for MapperConfig {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Value> for MapperConfig {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

impl MapperConfig {
    /// Wrap a value; `null` becomes an empty configuration.
    #[must_use]
    pub fn new(value: Value) -> Self {
        match value {
            Value::Null => Self::empty(),
            other => Self(other),
        }
    }

    /// Empty configuration
    #[must_use]
    pub fn empty() -> Self {
        Self(Value::Object(serde_json::Map::new()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Value::Object(map) => map.is_empty(),
            _ => false,
        }
    }

    /// Top-level value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The `domain_mappings` table, if present and a mapping.
    #[must_use]
    pub fn domain_mappings(&self) -> Option<&serde_json::Map<String, Value>> {
        self.get("domain_mappings").and_then(Value::as_object)
    }

    /// String identifiers listed under `domain_mappings.<part_type>.<key>`.
    /// Non-string entries are ignored; a missing table yields an empty list.
    #[must_use]
    pub fn domain_ids(&self, part_type: &str, key: &str) -> Vec<String> {
        self.domain_mappings()
            .and_then(|table| table.get(part_type))
            .and_then(|entry| entry.get(key))
            .and_then(Value::as_array)
            .map(|ids| {
                ids.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Underlying document.
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}
