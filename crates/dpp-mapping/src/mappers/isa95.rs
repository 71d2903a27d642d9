//! ISA-95 (IEC 62264) / B2MML equipment model

use super::first_or_fallback;
use crate::config::MapperConfig;
use crate::document::{Fragment, MappedDocument, ValidationResult};
use crate::mapper::{FromConfig, SchemaMapper};
use crate::Result;
use dpp_model::{
    IdentityLayer, LifecycleLayer, Part, ProvenanceLayer, RiskLayer, StructureLayer,
    SustainabilityLayer,
};
use serde_json::{Value, json};
use tracing::debug;

const SCHEMA_NAME: &str = "ISA-95";
const ONTOLOGY: &str = "ISA-95";

/// Maps a passport onto B2MML Equipment elements
#[derive(Debug, Clone, Default)]
pub struct Isa95Mapper {
    config: MapperConfig,
}

impl Isa95Mapper {
    #[must_use]
    pub fn new(config: MapperConfig) -> Self {
        Self { config }
    }
}

impl FromConfig for Isa95Mapper {
    fn from_config(config: MapperConfig) -> Self {
        Self::new(config)
    }
}

fn property_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl SchemaMapper for Isa95Mapper {
    fn config(&self) -> &MapperConfig {
        &self.config
    }

    fn schema_name(&self) -> &str {
        SCHEMA_NAME
    }

    fn schema_version(&self) -> &str {
        "V0600"
    }

    fn context(&self) -> Fragment {
        let mut context = Fragment::new();
        context.insert("isa95".into(), "http://www.mesa.org/xml/B2MML-V0600".into());
        context
    }

    fn map_identity(&self, layer: &IdentityLayer) -> Result<Fragment> {
        let mut fragment = Fragment::new();
        fragment.insert("ID".into(), layer.primary_id().into());
        fragment.insert("Description".into(), layer.display_name().into());
        fragment.insert("EquipmentLevel".into(), "Unit".into());
        Ok(fragment)
    }

    fn map_structure(&self, layer: &StructureLayer) -> Result<Fragment> {
        let equipment = layer
            .parts
            .iter()
            .map(|part| self.map_part(part).map(Value::Object))
            .collect::<Result<Vec<_>>>()?;

        let mut fragment = Fragment::new();
        fragment.insert("Hierarchy".into(), Value::Object(layer.hierarchy.clone()));
        fragment.insert("NestedEquipment".into(), Value::Array(equipment));
        Ok(fragment)
    }

    fn map_lifecycle(&self, layer: &LifecycleLayer) -> Result<Fragment> {
        let mut fragment = Fragment::new();
        fragment.insert(
            "WorkOrder".into(),
            layer.manufacture.get("lot").cloned().unwrap_or(Value::Null),
        );
        fragment.insert(
            "ProductionDate".into(),
            layer.manufacture.get("date").cloned().unwrap_or(Value::Null),
        );
        Ok(fragment)
    }

    fn map_risk(&self, _layer: &RiskLayer) -> Result<Fragment> {
        Ok(Fragment::new())
    }

    fn map_sustainability(&self, _layer: &SustainabilityLayer) -> Result<Fragment> {
        Ok(Fragment::new())
    }

    fn map_provenance(&self, _layer: &ProvenanceLayer) -> Result<Fragment> {
        Ok(Fragment::new())
    }

    /// One Equipment element per part. The equipment class comes from the
    /// part's ISA-95 binding, else from the configured domain table.
    fn map_part(&self, part: &Part) -> Result<Fragment> {
        let bound = part
            .get_binding(ONTOLOGY)
            .map(|b| b.class_ids.as_slice())
            .unwrap_or_default();
        let class_id = first_or_fallback(
            bound,
            self.config.domain_ids(&part.part_type, "isa95_type_ids"),
        );
        if class_id.is_null() {
            debug!("No equipment class for part {} ({})", part.part_id, part.part_type);
        }

        let properties: Vec<Value> = part
            .properties
            .iter()
            .map(|(key, value)| json!({"ID": key, "Value": [property_value(value)]}))
            .collect();

        let mut fragment = Fragment::new();
        fragment.insert("ID".into(), part.part_id.clone().into());
        fragment.insert("EquipmentClassID".into(), class_id);
        fragment.insert("Description".into(), part.name.clone().into());
        fragment.insert("EquipmentProperty".into(), Value::Array(properties));
        Ok(fragment)
    }

    fn validate_mapping(&self, document: &MappedDocument) -> ValidationResult {
        let mut result = ValidationResult::valid();
        if document.schema != SCHEMA_NAME {
            result.add_error(format!(
                "Schema mismatch: expected {SCHEMA_NAME}, got {}",
                document.schema
            ));
        }

        let equipment = document
            .structure
            .get("NestedEquipment")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        for (idx, item) in equipment.iter().enumerate() {
            let has_id = item
                .get("ID")
                .and_then(Value::as_str)
                .is_some_and(|id| !id.is_empty());
            if !has_id {
                result.add_error(format!("NestedEquipment[{idx}] has no ID"));
            }
        }
        result
    }
}
