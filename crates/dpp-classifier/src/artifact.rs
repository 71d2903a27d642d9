//! Domain tables and their persisted form
//!
//! An artifact is the per-schema mapping configuration read back by the
//! mappers: `domain_mappings.<Domain>.eclass_class_ids` and
//! `domain_mappings.<Domain>.isa95_type_ids` are the keys they consume.

use crate::eclass::{EclassClass, EclassCorpus};
use crate::isa95::{Isa95Corpus, Isa95Definition};
use crate::scoring::Classifier;
use crate::{Error, Result};
use dpp_model::{Attributes, Part, PartKind};
use serde::{Serialize, Serializer};
use serde_json::{Value, json};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// One entry per domain, in classifier dictionary order
#[derive(Debug, Clone, PartialEq)]
pub struct DomainTable<E> {
    entries: Vec<(PartKind, E)>,
}

impl<E> DomainTable<E> {
    fn new(domains: impl Iterator<Item = PartKind>, mut init: impl FnMut(PartKind) -> E) -> Self {
        Self {
            entries: domains.map(|kind| (kind, init(kind))).collect(),
        }
    }

    #[must_use]
    pub fn get(&self, kind: PartKind) -> Option<&E> {
        self.entries
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, entry)| entry)
    }

    fn get_mut(&mut self, kind: PartKind) -> Option<&mut E> {
        self.entries
            .iter_mut()
            .find(|(k, _)| *k == kind)
            .map(|(_, entry)| entry)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PartKind, &E)> {
        self.entries.iter().map(|(kind, entry)| (*kind, entry))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E: Serialize> Serialize for DomainTable<E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(kind, entry)| (kind.name(), entry)))
    }
}

/// ECLASS classes selected for one domain
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EclassDomainEntry {
    pub domain_class: String,
    /// Categorization ids classified into the domain, sorted
    pub eclass_class_ids: Vec<String>,
    /// Items declared a case of any of those categories, sorted
    pub eclass_case_item_ids: Vec<String>,
    pub eclass_classes: BTreeMap<String, EclassClass>,
}

impl EclassDomainEntry {
    fn new(kind: PartKind) -> Self {
        Self {
            domain_class: kind.name().to_string(),
            eclass_class_ids: Vec::new(),
            eclass_case_item_ids: Vec::new(),
            eclass_classes: BTreeMap::new(),
        }
    }
}

/// ISA-95 definitions selected for one domain
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Isa95DomainEntry {
    pub domain_class: String,
    /// Sorted definition names
    pub isa95_type_ids: Vec<String>,
    pub isa95_types: BTreeMap<String, Isa95Definition>,
}

impl Isa95DomainEntry {
    fn new(kind: PartKind) -> Self {
        Self {
            domain_class: kind.name().to_string(),
            isa95_type_ids: Vec::new(),
            isa95_types: BTreeMap::new(),
        }
    }
}

/// Classified ECLASS table, persisted as `eclass_mapping.yml`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EclassArtifact {
    pub eclass_version: String,
    pub total_classes: usize,
    pub domain_mappings: DomainTable<EclassDomainEntry>,
}

impl EclassArtifact {
    pub const VERSION: &'static str = "16.0";

    /// Classify every categorization class of the corpus by its definition.
    #[must_use]
    pub fn build(corpus: &EclassCorpus, classifier: &Classifier) -> Self {
        let mut table = DomainTable::new(classifier.domains(), EclassDomainEntry::new);

        for class in corpus.categorization_classes() {
            let Some(kind) = classifier.classify(&class.definition) else {
                continue;
            };
            debug!("ECLASS {} -> {}", class.id, kind);
            if let Some(entry) = table.get_mut(kind) {
                entry.eclass_classes.insert(class.id.clone(), class.clone());
            }
        }

        for (_, entry) in &mut table.entries {
            entry.eclass_class_ids = entry.eclass_classes.keys().cloned().collect();
            let items: BTreeSet<&String> = entry
                .eclass_class_ids
                .iter()
                .flat_map(|id| corpus.items_of(id))
                .collect();
            entry.eclass_case_item_ids = items.into_iter().cloned().collect();
        }

        let artifact = Self {
            eclass_version: Self::VERSION.to_string(),
            total_classes: corpus.total_classes(),
            domain_mappings: table,
        };
        info!(
            "ECLASS table: {} of {} classes classified",
            artifact.classified(),
            artifact.total_classes
        );
        artifact
    }

    /// Number of classes assigned to some domain.
    #[must_use]
    pub fn classified(&self) -> usize {
        self.domain_mappings
            .iter()
            .map(|(_, entry)| entry.eclass_class_ids.len())
            .sum()
    }

    /// One example part per domain carrying the domain's ECLASS binding.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if the class records cannot be
    /// converted into binding metadata.
    pub fn example_parts(&self) -> Result<Vec<Part>> {
        self.domain_mappings
            .iter()
            .map(|(kind, entry)| -> Result<Part> {
                let mut part = Part::new(
                    format!("{}-example-001", kind.name().to_lowercase()),
                    format!("Example {kind}"),
                    kind.name(),
                )
                .with_property("example", true);

                let mut metadata = Attributes::new();
                metadata.insert("version".into(), json!(self.eclass_version));
                metadata.insert("total_items".into(), json!(entry.eclass_case_item_ids.len()));
                metadata.insert("classes".into(), to_value(&entry.eclass_classes)?);

                part.bind_ontology(
                    "ECLASS",
                    Some(entry.eclass_class_ids.clone()),
                    Some(entry.eclass_case_item_ids.clone()),
                    Some(metadata),
                );
                Ok(part)
            })
            .collect()
    }
}

/// Classified ISA-95 table, persisted as `isa95_mapping.yml`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Isa95Artifact {
    pub isa95_source: String,
    pub total_definitions: usize,
    pub domain_mappings: DomainTable<Isa95DomainEntry>,
}

impl Isa95Artifact {
    pub const SOURCE: &'static str = "xsd";

    /// Classify every definition of the corpus by its documentation.
    #[must_use]
    pub fn build(corpus: &Isa95Corpus, classifier: &Classifier) -> Self {
        let mut table = DomainTable::new(classifier.domains(), Isa95DomainEntry::new);

        for (name, definition) in &corpus.definitions {
            let Some(kind) = classifier.classify(&definition.description) else {
                continue;
            };
            debug!("ISA-95 {} -> {}", name, kind);
            if let Some(entry) = table.get_mut(kind) {
                entry.isa95_type_ids.push(name.clone());
                entry.isa95_types.insert(name.clone(), definition.clone());
            }
        }
        for (_, entry) in &mut table.entries {
            entry.isa95_type_ids.sort();
        }

        let artifact = Self {
            isa95_source: Self::SOURCE.to_string(),
            total_definitions: corpus.total_definitions(),
            domain_mappings: table,
        };
        info!(
            "ISA-95 table: {} of {} definitions classified",
            artifact.classified(),
            artifact.total_definitions
        );
        artifact
    }

    /// Number of definitions assigned to some domain.
    #[must_use]
    pub fn classified(&self) -> usize {
        self.domain_mappings
            .iter()
            .map(|(_, entry)| entry.isa95_type_ids.len())
            .sum()
    }

    /// One example part per domain carrying the domain's ISA-95 binding.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if the definitions cannot be
    /// converted into binding metadata.
    pub fn example_parts(&self) -> Result<Vec<Part>> {
        self.domain_mappings
            .iter()
            .map(|(kind, entry)| -> Result<Part> {
                let mut part = Part::new(
                    format!("{}-isa95-example-001", kind.name().to_lowercase()),
                    format!("Example {kind} (ISA-95 XSD)"),
                    kind.name(),
                )
                .with_property("example", true)
                .with_property("ontology", "ISA-95");

                let mut metadata = Attributes::new();
                metadata.insert("source".into(), json!(self.isa95_source));
                metadata.insert("total_types".into(), json!(entry.isa95_type_ids.len()));
                metadata.insert("types".into(), to_value(&entry.isa95_types)?);

                part.bind_ontology(
                    "ISA-95",
                    Some(entry.isa95_type_ids.clone()),
                    Some(Vec::new()),
                    Some(metadata),
                );
                Ok(part)
            })
            .collect()
    }
}

fn to_value<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| Error::Serialization(e.to_string()))
}

/// Write an artifact as YAML, creating the parent directory if needed.
///
/// # Errors
///
/// Returns [`Error::Serialization`] if the artifact cannot be rendered and
/// [`Error::Io`] if the file cannot be written.
pub fn write_artifact<T: Serialize>(path: &Path, artifact: &T) -> Result<()> {
    let yaml = serde_yaml::to_string(artifact).map_err(|e| Error::Serialization(e.to_string()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| Error::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, yaml).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eclass::parse_eclass_document;
    use crate::isa95::parse_xsd_document;

    const ECLASS_DOC: &str = r#"<ontoml xmlns="urn:iso:std:iso:is:13584:-32:ed-1:tech:xml-schema:ontoml"
        xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <class id="0173-1#01-AGZ376#020" xsi:type="ontoml:CATEGORIZATION_CLASS_Type">
    <preferred_name><label>Pressure transmitter</label></preferred_name>
    <definition><text>Pressure transducer for process measurement</text></definition>
  </class>
  <class id="0173-1#01-AKE795#017" xsi:type="ontoml:CATEGORIZATION_CLASS_Type">
    <preferred_name><label>Linear actuator</label></preferred_name>
    <definition><text>Servo actuator for linear positioning</text></definition>
  </class>
  <class id="0173-1#01-ZZZ000#001" xsi:type="ontoml:CATEGORIZATION_CLASS_Type">
    <definition><text>Packaging label</text></definition>
  </class>
  <class id="0173-1#01-AKE796#017" xsi:type="ontoml:ITEM_CLASS_CASE_OF_Type">
    <is_case_of class_ref="0173-1#01-AKE795#017"/>
  </class>
  <class id="0173-1#01-AKE797#017" xsi:type="ontoml:ITEM_CLASS_CASE_OF_Type">
    <is_case_of class_ref="0173-1#01-AKE795#017"/>
    <is_case_of class_ref="0173-1#01-AKE796#017"/>
  </class>
</ontoml>"#;

    fn eclass_artifact() -> EclassArtifact {
        let mut corpus = EclassCorpus::default();
        corpus.add_document(parse_eclass_document(ECLASS_DOC, "sample.xml").unwrap());
        EclassArtifact::build(&corpus, &Classifier::eclass())
    }

    #[test]
    fn test_eclass_table() {
        let artifact = eclass_artifact();
        assert_eq!(artifact.total_classes, 5);
        assert_eq!(artifact.domain_mappings.len(), 15);
        assert_eq!(artifact.classified(), 2);

        let sensor = artifact.domain_mappings.get(PartKind::Sensor).unwrap();
        assert_eq!(sensor.eclass_class_ids, vec!["0173-1#01-AGZ376#020"]);
        assert!(sensor.eclass_case_item_ids.is_empty());

        let actuator = artifact.domain_mappings.get(PartKind::Actuator).unwrap();
        assert_eq!(actuator.eclass_class_ids, vec!["0173-1#01-AKE795#017"]);
        assert_eq!(
            actuator.eclass_case_item_ids,
            vec!["0173-1#01-AKE796#017", "0173-1#01-AKE797#017"]
        );
        assert_eq!(actuator.eclass_classes["0173-1#01-AKE795#017"].name, "Linear actuator");
    }

    #[test]
    fn test_domain_table_serializes_in_dictionary_order() {
        let artifact = eclass_artifact();
        let yaml = serde_yaml::to_string(&artifact).unwrap();
        let first = yaml.find("PowerConversion:").unwrap();
        let last = yaml.find("Fastener:").unwrap();
        assert!(first < last);

        let value = serde_json::to_value(&artifact).unwrap();
        assert_eq!(value["eclass_version"], "16.0");
        assert_eq!(value["domain_mappings"]["Sensor"]["domain_class"], "Sensor");
    }

    #[test]
    fn test_eclass_example_parts() {
        let parts = eclass_artifact().example_parts().unwrap();
        assert_eq!(parts.len(), 15);

        let actuator = parts.iter().find(|p| p.part_type == "Actuator").unwrap();
        assert_eq!(actuator.part_id, "actuator-example-001");
        assert_eq!(actuator.name, "Example Actuator");
        assert_eq!(actuator.properties["example"], true);

        let binding = actuator.get_binding("ECLASS").unwrap();
        assert_eq!(binding.class_ids, vec!["0173-1#01-AKE795#017"]);
        assert_eq!(binding.case_item_ids.len(), 2);
        assert_eq!(binding.metadata["total_items"], 2);
        assert_eq!(binding.metadata["version"], "16.0");
    }

    #[test]
    fn test_isa95_table_and_examples() {
        let mut corpus = Isa95Corpus::default();
        corpus.add_document(
            parse_xsd_document(
                r#"<schema xmlns="http://www.w3.org/2001/XMLSchema">
  <complexType name="TemperatureType"><annotation><documentation>Heater temperature setting</documentation></annotation></complexType>
  <element name="FuseRating"><annotation><documentation>Rating of the fuse</documentation></annotation></element>
  <element name="Unrelated"><annotation><documentation>Free text</documentation></annotation></element>
</schema>"#,
                "B2MML-Common.xsd",
            )
            .unwrap(),
        );

        let artifact = Isa95Artifact::build(&corpus, &Classifier::isa95());
        assert_eq!(artifact.isa95_source, "xsd");
        assert_eq!(artifact.total_definitions, 3);
        assert_eq!(artifact.classified(), 2);

        let thermal = artifact.domain_mappings.get(PartKind::Thermal).unwrap();
        assert_eq!(thermal.isa95_type_ids, vec!["TemperatureType"]);

        let parts = artifact.example_parts().unwrap();
        let protection = parts.iter().find(|p| p.part_type == "Protection").unwrap();
        assert_eq!(protection.part_id, "protection-isa95-example-001");
        assert_eq!(protection.name, "Example Protection (ISA-95 XSD)");
        assert_eq!(protection.properties["ontology"], "ISA-95");
        let binding = protection.get_binding("ISA-95").unwrap();
        assert_eq!(binding.class_ids, vec!["FuseRating"]);
        assert!(binding.case_item_ids.is_empty());
        assert_eq!(binding.metadata["types"]["FuseRating"]["group"], "Element");
    }

    #[test]
    fn test_write_artifact_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config").join("eclass_mapping.yml");
        write_artifact(&path, &eclass_artifact()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(&text).unwrap();
        assert_eq!(value["total_classes"].as_u64(), Some(5));
    }
}
