//! Mapped document and validation result

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Schema-specific output for one layer
pub type Fragment = serde_json::Map<String, serde_json::Value>;

/// Complete output of a mapping run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappedDocument {
    /// Canonical schema name of the producing mapper
    pub schema: String,

    pub schema_version: String,

    /// Linked-data context
    #[serde(rename = "@context")]
    pub context: Fragment,

    pub identity: Fragment,
    pub structure: Fragment,
    pub lifecycle: Fragment,
    pub risk: Fragment,
    pub sustainability: Fragment,
    pub provenance: Fragment,
}

impl MappedDocument {
    /// Layer keys in document order.
    pub const LAYERS: [&'static str; 6] = [
        "identity",
        "structure",
        "lifecycle",
        "risk",
        "sustainability",
        "provenance",
    ];

    /// Fragment for a layer by key.
    #[must_use]
    pub fn layer(&self, name: &str) -> Option<&Fragment> {
        match name {
            "identity" => Some(&self.identity),
            "structure" => Some(&self.structure),
            "lifecycle" => Some(&self.lifecycle),
            "risk" => Some(&self.risk),
            "sustainability" => Some(&self.sustainability),
            "provenance" => Some(&self.provenance),
            _ => None,
        }
    }

    /// Document as a generic JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if a fragment cannot be encoded.
    pub fn to_value(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if a fragment cannot be encoded.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Serialization(e.to_string()))
    }
}

/// Outcome of [`crate::SchemaMapper::validate_mapping`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether validation passed
    pub is_valid: bool,
    /// Error messages, empty when valid
    pub errors: Vec<String>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::valid()
    }
}

impl ValidationResult {
    /// Create a new valid result
    #[must_use]
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    /// Result with the given errors; valid only if there are none.
    #[must_use]
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// Add an error
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.is_valid = false;
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
