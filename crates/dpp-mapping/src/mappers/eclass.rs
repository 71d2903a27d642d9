//! ECLASS product classification

use super::{first_or_fallback, objects};
use crate::config::MapperConfig;
use crate::document::{Fragment, MappedDocument, ValidationResult};
use crate::mapper::{FromConfig, SchemaMapper};
use crate::Result;
use dpp_model::{
    Attributes, IdentityLayer, LifecycleLayer, Part, ProvenanceLayer, RiskLayer, StructureLayer,
    SustainabilityLayer,
};
use serde_json::Value;

const SCHEMA_NAME: &str = "ECLASS";
const ONTOLOGY: &str = "ECLASS";

/// Maps a passport onto ECLASS-classified product data
#[derive(Debug, Clone, Default)]
pub struct EclassMapper {
    config: MapperConfig,
}

impl EclassMapper {
    #[must_use]
    pub fn new(config: MapperConfig) -> Self {
        Self { config }
    }

    /// Untyped properties, then every set typed field.
    fn attributes(part: &Part) -> Result<Attributes> {
        let mut attributes = part.properties.clone();
        if let Some(details) = &part.details {
            attributes.extend(details.fields()?.into_iter().filter(|(_, v)| !v.is_null()));
        }
        Ok(attributes)
    }
}

impl FromConfig for EclassMapper {
    fn from_config(config: MapperConfig) -> Self {
        Self::new(config)
    }
}

impl SchemaMapper for EclassMapper {
    fn config(&self) -> &MapperConfig {
        &self.config
    }

    fn schema_name(&self) -> &str {
        SCHEMA_NAME
    }

    fn schema_version(&self) -> &str {
        "16.0"
    }

    fn context(&self) -> Fragment {
        let mut context = Fragment::new();
        context.insert("eclass".into(), "https://eclass.eu/".into());
        context.insert("schema".into(), "http://schema.org/".into());
        context.insert("manufacturerId".into(), "schema:manufacturer".into());
        context.insert("productId".into(), "schema:productID".into());
        context.insert("eclassIrdi".into(), "eclass:irdi".into());
        context
    }

    fn map_identity(&self, layer: &IdentityLayer) -> Result<Fragment> {
        let mut fragment = Fragment::new();
        fragment.insert(
            "manufacturerId".into(),
            layer.ownership.get("manufacturer").cloned().into(),
        );
        fragment.insert("productId".into(), layer.primary_id().into());
        fragment.insert("brand".into(), layer.make_model.get("brand").cloned().into());
        fragment.insert("model".into(), layer.make_model.get("model").cloned().into());
        fragment.insert("conformity".into(), layer.conformity.clone().into());
        Ok(fragment)
    }

    fn map_structure(&self, layer: &StructureLayer) -> Result<Fragment> {
        let components = layer
            .parts
            .iter()
            .map(|part| self.map_part(part).map(Value::Object))
            .collect::<Result<Vec<_>>>()?;

        let mut fragment = Fragment::new();
        fragment.insert("hierarchy".into(), Value::Object(layer.hierarchy.clone()));
        fragment.insert("components".into(), Value::Array(components));
        fragment.insert("bomRefs".into(), layer.bom_refs.clone().into());
        Ok(fragment)
    }

    fn map_lifecycle(&self, layer: &LifecycleLayer) -> Result<Fragment> {
        let manufacture = |key: &str| layer.manufacture.get(key).cloned().unwrap_or(Value::Null);

        let mut fragment = Fragment::new();
        fragment.insert("manufacturingDate".into(), manufacture("date"));
        fragment.insert("batch".into(), manufacture("lot"));
        fragment.insert("events".into(), objects(&layer.events));
        Ok(fragment)
    }

    fn map_risk(&self, layer: &RiskLayer) -> Result<Fragment> {
        let mut fragment = Fragment::new();
        fragment.insert("criticality".into(), Value::Object(layer.criticality.clone()));
        fragment.insert("fmea".into(), objects(&layer.fmea));
        fragment.insert("security".into(), Value::Object(layer.security.clone()));
        Ok(fragment)
    }

    fn map_sustainability(&self, layer: &SustainabilityLayer) -> Result<Fragment> {
        let energy: Attributes = layer
            .energy
            .iter()
            .map(|(k, v)| (k.clone(), Value::from(*v)))
            .collect();

        let mut fragment = Fragment::new();
        fragment.insert("mass".into(), layer.mass.into());
        fragment.insert("energy".into(), Value::Object(energy));
        fragment.insert(
            "recycledContent".into(),
            Value::Object(layer.recycled_content.clone()),
        );
        fragment.insert(
            "remanufacture".into(),
            Value::Object(layer.remanufacture.clone()),
        );
        Ok(fragment)
    }

    fn map_provenance(&self, layer: &ProvenanceLayer) -> Result<Fragment> {
        let mut fragment = Fragment::new();
        fragment.insert("signatures".into(), objects(&layer.signatures));
        fragment.insert("traceLinks".into(), layer.trace_links.clone().into());
        Ok(fragment)
    }

    fn map_part(&self, part: &Part) -> Result<Fragment> {
        let binding = part.get_binding(ONTOLOGY);

        let bound_classes = binding.map(|b| b.class_ids.as_slice()).unwrap_or_default();
        let irdi = first_or_fallback(
            bound_classes,
            self.config.domain_ids(&part.part_type, "eclass_class_ids"),
        );

        let items = match binding {
            Some(b) if !b.case_item_ids.is_empty() => b.case_item_ids.clone(),
            _ => self
                .config
                .domain_ids(&part.part_type, "eclass_case_item_ids"),
        };

        let mut fragment = Fragment::new();
        fragment.insert("id".into(), part.part_id.clone().into());
        fragment.insert("name".into(), part.name.clone().into());
        fragment.insert("type".into(), part.part_type.clone().into());
        fragment.insert("eclassIrdi".into(), irdi);
        fragment.insert("eclassItemIds".into(), items.into());
        fragment.insert("attributes".into(), Value::Object(Self::attributes(part)?));
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

        let components = document
            .structure
            .get("components")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        for (idx, component) in components.iter().enumerate() {
            let has_id = component
                .get("id")
                .and_then(Value::as_str)
                .is_some_and(|id| !id.is_empty());
            if !has_id {
                result.add_error(format!("Component {idx} has no id"));
            }
        }
        result
    }
}
