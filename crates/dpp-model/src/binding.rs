//! Ontology bindings
//!
//! A binding projects one part into one external ontology: the ontology's
//! category identifiers for the part, the item identifiers declared as cases
//! of those categories, and free-form metadata. Re-binding the same ontology
//! merges into the existing binding instead of replacing it.

use crate::Attributes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Per-ontology projection of a part
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OntologyBinding {
    /// Ontology name (e.g., "ECLASS", "ISA-95")
    pub ontology_name: String,

    /// Category identifiers in the ontology
    #[serde(default)]
    pub class_ids: Vec<String>,

    /// Item identifiers declared as cases of `class_ids`
    #[serde(default)]
    pub case_item_ids: Vec<String>,

    /// Ontology-specific annotations
    #[serde(default)]
    pub metadata: Attributes,
}

impl OntologyBinding {
    /// Create a binding from the given values; missing lists default to empty.
    #[must_use]
    pub fn new(
        ontology_name: impl Into<String>,
        class_ids: Option<Vec<String>>,
        case_item_ids: Option<Vec<String>>,
        metadata: Option<Attributes>,
    ) -> Self {
        Self {
            ontology_name: ontology_name.into(),
            class_ids: class_ids.unwrap_or_default(),
            case_item_ids: case_item_ids.unwrap_or_default(),
            metadata: metadata.unwrap_or_default(),
        }
    }

    /// Merge new values into this binding.
    ///
    /// Id lists become the sorted set-union of existing and incoming values.
    /// Metadata is merged shallowly: incoming top-level keys overwrite.
    /// `None` leaves the corresponding field untouched.
    pub fn merge(
        &mut self,
        class_ids: Option<Vec<String>>,
        case_item_ids: Option<Vec<String>>,
        metadata: Option<Attributes>,
    ) {
        if let Some(incoming) = class_ids {
            self.class_ids = union_ids(&self.class_ids, incoming);
        }
        if let Some(incoming) = case_item_ids {
            self.case_item_ids = union_ids(&self.case_item_ids, incoming);
        }
        if let Some(incoming) = metadata {
            merge_metadata(&mut self.metadata, incoming);
        }
    }
}

/// Sorted set-union of two id lists with duplicates collapsed.
#[must_use]
pub fn union_ids(existing: &[String], incoming: Vec<String>) -> Vec<String> {
    let mut ids: BTreeSet<String> = existing.iter().cloned().collect();
    ids.extend(incoming);
    ids.into_iter().collect()
}

/// Shallow key-by-key merge; incoming values replace existing ones.
pub fn merge_metadata(existing: &mut Attributes, incoming: Attributes) {
    for (key, value) in incoming {
        existing.insert(key, value);
    }
}
