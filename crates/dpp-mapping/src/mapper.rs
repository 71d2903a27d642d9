//! Mapper contract
//!
//! Implementors supply schema metadata, one mapping per layer, validation
//! and a linked-data context. Orchestration is provided: `map_dpp` builds
//! the document, validates it, and propagates every failure unchanged.

use crate::config::MapperConfig;
use crate::document::{Fragment, MappedDocument, ValidationResult};
use crate::{Error, Result};
use dpp_model::{
    DigitalProductPassport, IdentityLayer, LifecycleLayer, Part, ProvenanceLayer, RiskLayer,
    StructureLayer, SustainabilityLayer,
};
use serde_json::Value;
use std::fmt;
use tracing::{error, info};

/// Borrowed view of the six layers of a passport
#[derive(Debug, Clone, Copy)]
pub struct PassportLayers<'a> {
    pub identity: &'a IdentityLayer,
    pub structure: &'a StructureLayer,
    pub lifecycle: &'a LifecycleLayer,
    pub risk: &'a RiskLayer,
    pub sustainability: &'a SustainabilityLayer,
    pub provenance: &'a ProvenanceLayer,
}

impl<'a> From<&'a DigitalProductPassport> for PassportLayers<'a> {
    fn from(passport: &'a DigitalProductPassport) -> Self {
        Self {
            identity: &passport.identity,
            structure: &passport.structure,
            lifecycle: &passport.lifecycle,
            risk: &passport.risk,
            sustainability: &passport.sustainability,
            provenance: &passport.provenance,
        }
    }
}

/// Converts a passport into one external schema
pub trait SchemaMapper: Send + Sync + fmt::Debug {
    /// Configuration supplied at construction.
    fn config(&self) -> &MapperConfig;

    /// Canonical schema name (e.g., "ECLASS", "ISA-95").
    fn schema_name(&self) -> &str;

    fn schema_version(&self) -> &str;

    /// # Errors
    ///
    /// Returns an error if the layer cannot be represented in this schema.
    fn map_identity(&self, layer: &IdentityLayer) -> Result<Fragment>;

    /// # Errors
    ///
    /// Returns an error if the layer or one of its parts cannot be mapped.
    fn map_structure(&self, layer: &StructureLayer) -> Result<Fragment>;

    /// # Errors
    ///
    /// Returns an error if the layer cannot be represented in this schema.
    fn map_lifecycle(&self, layer: &LifecycleLayer) -> Result<Fragment>;

    /// # Errors
    ///
    /// Returns an error if the layer cannot be represented in this schema.
    fn map_risk(&self, layer: &RiskLayer) -> Result<Fragment>;

    /// # Errors
    ///
    /// Returns an error if the layer cannot be represented in this schema.
    fn map_sustainability(&self, layer: &SustainabilityLayer) -> Result<Fragment>;

    /// # Errors
    ///
    /// Returns an error if the layer cannot be represented in this schema.
    fn map_provenance(&self, layer: &ProvenanceLayer) -> Result<Fragment>;

    /// Check an assembled document against the schema's constraints.
    fn validate_mapping(&self, document: &MappedDocument) -> ValidationResult;

    /// Linked-data context for the document's `@context` key.
    fn context(&self) -> Fragment;

    /// Map a single part. Defaults to a field-by-field conversion.
    ///
    /// # Errors
    ///
    /// Returns an error if a part field cannot be represented as JSON.
    fn map_part(&self, part: &Part) -> Result<Fragment> {
        default_part_mapping(part)
    }

    /// Top-level configuration value for a key.
    fn mapping_config(&self, key: &str) -> Option<&Value> {
        self.config().get(key)
    }

    /// Concrete type name, for introspection.
    fn mapper_type(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Map a whole passport and validate the result.
    ///
    /// # Errors
    ///
    /// Returns the first layer mapping error unchanged, or
    /// [`Error::Validation`] carrying every message `validate_mapping`
    /// reported.
    fn map_dpp(&self, passport: &DigitalProductPassport) -> Result<MappedDocument> {
        self.map_layers(PassportLayers::from(passport))
    }

    /// Same as [`SchemaMapper::map_dpp`] for independently held layers.
    ///
    /// # Errors
    ///
    /// See [`SchemaMapper::map_dpp`].
    fn map_layers(&self, layers: PassportLayers<'_>) -> Result<MappedDocument> {
        info!("Starting mapping to {}", self.schema_name());

        let document = assemble(self, &layers).inspect_err(|e| {
            error!("Error during mapping to {}: {}", self.schema_name(), e);
        })?;

        let validation = self.validate_mapping(&document);
        if !validation.is_valid {
            let err = Error::Validation(validation.errors);
            error!("Error during mapping to {}: {}", self.schema_name(), err);
            return Err(err);
        }

        info!("Successfully mapped passport to {}", self.schema_name());
        Ok(document)
    }
}

/// Construction from a configuration, used for eager registration
pub trait FromConfig: Sized {
    fn from_config(config: MapperConfig) -> Self;
}

/// Field-by-field conversion of a part, typed payload fields included.
///
/// # Errors
///
/// Returns an error if a part field cannot be represented as JSON.
pub fn default_part_mapping(part: &Part) -> Result<Fragment> {
    Ok(part.to_flat_map()?)
}

fn assemble<M: SchemaMapper + ?Sized>(
    mapper: &M,
    layers: &PassportLayers<'_>,
) -> Result<MappedDocument> {
    Ok(MappedDocument {
        schema: mapper.schema_name().to_string(),
        schema_version: mapper.schema_version().to_string(),
        context: mapper.context(),
        identity: mapper.map_identity(layers.identity)?,
        structure: mapper.map_structure(layers.structure)?,
        lifecycle: mapper.map_lifecycle(layers.lifecycle)?,
        risk: mapper.map_risk(layers.risk)?,
        sustainability: mapper.map_sustainability(layers.sustainability)?,
        provenance: mapper.map_provenance(layers.provenance)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dpp_model::PartKind;
    use dpp_model::part::PartDetails;

    /// Minimal mapper whose behaviour is steered by its config:
    /// `fail_layer` names a layer that errors, `errors` lists validation
    /// messages to report.
    #[derive(Debug, Default)]
    struct ProbeMapper {
        config: MapperConfig,
    }

    impl ProbeMapper {
        fn layer(&self, name: &str) -> Result<Fragment> {
            if self.config.get("fail_layer").and_then(Value::as_str) == Some(name) {
                return Err(Error::layer(name, "probe failure"));
            }
            let mut fragment = Fragment::new();
            fragment.insert("layer".into(), name.into());
            Ok(fragment)
        }
    }

    impl FromConfig for ProbeMapper {
        fn from_config(config: MapperConfig) -> Self {
            Self { config }
        }
    }

    impl SchemaMapper for ProbeMapper {
        fn config(&self) -> &MapperConfig {
            &self.config
        }
        fn schema_name(&self) -> &str {
            "PROBE"
        }
        fn schema_version(&self) -> &str {
            "0.1"
        }
        fn map_identity(&self, _: &IdentityLayer) -> Result<Fragment> {
            self.layer("identity")
        }
        fn map_structure(&self, _: &StructureLayer) -> Result<Fragment> {
            self.layer("structure")
        }
        fn map_lifecycle(&self, _: &LifecycleLayer) -> Result<Fragment> {
            self.layer("lifecycle")
        }
        fn map_risk(&self, _: &RiskLayer) -> Result<Fragment> {
            self.layer("risk")
        }
        fn map_sustainability(&self, _: &SustainabilityLayer) -> Result<Fragment> {
            self.layer("sustainability")
        }
        fn map_provenance(&self, _: &ProvenanceLayer) -> Result<Fragment> {
            self.layer("provenance")
        }
        fn validate_mapping(&self, _: &MappedDocument) -> ValidationResult {
            let errors = self
                .config
                .get("errors")
                .and_then(Value::as_array)
                .map(|list| {
                    list.iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();
            ValidationResult::from_errors(errors)
        }
        fn context(&self) -> Fragment {
            let mut context = Fragment::new();
            context.insert("probe".into(), "urn:probe:".into());
            context
        }
    }

    fn probe(config: Value) -> ProbeMapper {
        ProbeMapper::from_config(MapperConfig::new(config))
    }

    #[test]
    fn test_map_dpp_contains_all_keys() {
        let mapper = probe(serde_json::json!({}));
        let document = mapper.map_dpp(&DigitalProductPassport::default()).unwrap();

        assert_eq!(document.schema, "PROBE");
        assert_eq!(document.schema_version, "0.1");
        assert_eq!(document.context["probe"], "urn:probe:");
        for layer in MappedDocument::LAYERS {
            assert_eq!(document.layer(layer).unwrap()["layer"], layer);
        }
    }

    #[test]
    fn test_validation_failure_carries_every_message() {
        let mapper = probe(serde_json::json!({"errors": ["missing id", "bad version"]}));
        let err = mapper
            .map_dpp(&DigitalProductPassport::default())
            .unwrap_err();

        let message = err.to_string();
        assert_eq!(message, "Validation failed: missing id; bad version");
        match err {
            Error::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("Expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_layer_error_propagates_unchanged() {
        let mapper = probe(serde_json::json!({"fail_layer": "risk"}));
        let err = mapper
            .map_dpp(&DigitalProductPassport::default())
            .unwrap_err();

        match err {
            Error::Layer { layer, message } => {
                assert_eq!(layer, "risk");
                assert_eq!(message, "probe failure");
            }
            other => panic!("Expected Layer, got {other:?}"),
        }
    }

    #[test]
    fn test_map_layers_matches_map_dpp() {
        let mapper = probe(serde_json::json!({}));
        let passport = DigitalProductPassport::default();
        let layers = PassportLayers::from(&passport);

        assert_eq!(
            mapper.map_layers(layers).unwrap(),
            mapper.map_dpp(&passport).unwrap()
        );
    }

    #[test]
    fn test_default_part_mapping_is_flat() {
        let mapper = probe(serde_json::json!({}));
        let part = Part::with_details("T1", "Heater", PartDetails::empty(PartKind::Thermal));

        let fragment = mapper.map_part(&part).unwrap();
        assert_eq!(fragment["part_id"], "T1");
        assert_eq!(fragment["type"], "Thermal");
        assert!(fragment.contains_key("delta_t"));
    }

    #[test]
    fn test_introspection() {
        let mapper = probe(serde_json::json!({"threshold": 3}));
        assert_eq!(mapper.mapping_config("threshold"), Some(&serde_json::json!(3)));
        assert!(mapper.mapping_config("absent").is_none());
        assert!(mapper.mapper_type().ends_with("ProbeMapper"));

        let boxed: Box<dyn SchemaMapper> = Box::new(probe(serde_json::json!({})));
        assert!(boxed.mapper_type().ends_with("ProbeMapper"));
    }
}
