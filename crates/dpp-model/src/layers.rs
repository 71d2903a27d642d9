//! Passport layers
//!
//! Every layer is a flat bag of attributes. All fields default to empty so a
//! passport document may omit anything it does not know.

use crate::Attributes;
use crate::part::Part;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Product identity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityLayer {
    /// Global identifiers (GTIN, SGTIN, serial, manufacturer PN, UUID)
    pub global_ids: BTreeMap<String, String>,

    /// Brand, model, hardware and firmware revision
    pub make_model: BTreeMap<String, String>,

    /// Manufacturer, owner, operator, location
    pub ownership: BTreeMap<String, String>,

    /// Certifications and approvals (CE, UKCA, RoHS, ...)
    pub conformity: Vec<String>,
}

impl IdentityLayer {
    /// GTIN if present, otherwise the serial number.
    #[must_use]
    pub fn primary_id(&self) -> Option<&str> {
        self.global_ids
            .get("gtin")
            .or_else(|| self.global_ids.get("serial"))
            .map(String::as_str)
    }

    /// "brand model", skipping whichever part is missing.
    #[must_use]
    pub fn display_name(&self) -> String {
        ["brand", "model"]
            .iter()
            .filter_map(|key| self.make_model.get(*key))
            .filter(|s| !s.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// How the product is organised and built
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureLayer {
    /// Product -> subsystem -> assembly -> component description
    pub hierarchy: Attributes,

    /// Parts owned by this product
    pub parts: Vec<Part>,

    /// Electrical, mechanical, fluid and data interfaces
    pub interfaces: Vec<Attributes>,

    /// Material composition entries
    pub materials: Vec<Attributes>,

    /// Bill of materials references
    pub bom_refs: Vec<String>,
}

impl StructureLayer {
    /// First part with the given identifier.
    #[must_use]
    pub fn find_part(&self, part_id: &str) -> Option<&Part> {
        self.parts.iter().find(|p| p.part_id == part_id)
    }

    /// Identifiers that occur on more than one part, in first-seen order.
    #[must_use]
    pub fn duplicate_part_ids(&self) -> Vec<String> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        let mut order = Vec::new();
        for part in &self.parts {
            let count = counts.entry(part.part_id.as_str()).or_insert(0);
            *count += 1;
            if *count == 2 {
                order.push(part.part_id.clone());
            }
        }
        order
    }
}

/// Manufacture, use, service and end-of-life records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleLayer {
    /// Lot, batch, factory, date, process
    pub manufacture: Attributes,

    /// Usage counters and operating ranges
    #[serde(rename = "use")]
    pub usage: Attributes,

    /// Maintenance schedule, spare mapping, repairability
    pub serviceability: Attributes,

    /// Installation, inspection, failure, update events
    pub events: Vec<Attributes>,

    /// Disassembly, hazards, recovery routes
    pub end_of_life: Attributes,
}

/// Criticality, reliability and security
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskLayer {
    pub criticality: Attributes,
    pub fmea: Vec<Attributes>,
    pub security: Attributes,
}

/// Impact and circularity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SustainabilityLayer {
    /// Total mass (kg)
    pub mass: f64,

    /// Standby/active energy, water use
    pub energy: BTreeMap<String, f64>,

    pub recycled_content: Attributes,
    pub remanufacture: Attributes,
}

/// Signatures and traceability
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvenanceLayer {
    pub signatures: Vec<Attributes>,

    /// EPCIS events, QR/NFC tags
    pub trace_links: Vec<String>,
}
