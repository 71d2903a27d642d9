//! Digital Product Passport aggregate

use crate::layers::{
    IdentityLayer, LifecycleLayer, ProvenanceLayer, RiskLayer, StructureLayer,
    SustainabilityLayer,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A product passport: exactly one of each layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigitalProductPassport {
    pub identity: IdentityLayer,
    pub structure: StructureLayer,
    pub lifecycle: LifecycleLayer,
    pub risk: RiskLayer,
    pub sustainability: SustainabilityLayer,
    pub provenance: ProvenanceLayer,
}

impl DigitalProductPassport {
    /// Parse a passport from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if the text is not a valid passport, including
    /// parts whose payload does not match their declared type.
    pub fn from_json_str(input: &str) -> Result<Self> {
        let passport: Self =
            serde_json::from_str(input).map_err(|e| Error::parse("json", e.to_string()))?;
        debug!("Parsed passport with {} parts", passport.structure.parts.len());
        Ok(passport)
    }

    /// Parse a passport from YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if the text is not a valid passport.
    pub fn from_yaml_str(input: &str) -> Result<Self> {
        let passport: Self =
            serde_yaml::from_str(input).map_err(|e| Error::parse("yaml", e.to_string()))?;
        debug!("Parsed passport with {} parts", passport.structure.parts.len());
        Ok(passport)
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if a value cannot be encoded.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// YAML in the same shape [`DigitalProductPassport::from_yaml_str`] reads.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if a value cannot be encoded.
    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::Serialization(e.to_string()))
    }
}
