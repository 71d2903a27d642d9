//! Part record and domain kinds
//!
//! A [`Part`] carries a string discriminant (`type`) naming its domain kind,
//! an open property bag, ontology bindings, and optionally a typed payload
//! ([`PartDetails`]) with the kind-specific engineering fields. A part with a
//! payload always has a discriminant matching the payload's kind; a part
//! without one accepts any discriminant.

use crate::binding::OntologyBinding;
use crate::{Attributes, Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::trace;

/// The fifteen domain kinds a part can belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PartKind {
    PowerConversion,
    EnergyStorage,
    Actuator,
    Sensor,
    ControlUnit,
    UserInterface,
    Thermal,
    Fluidics,
    Structural,
    Transmission,
    Protection,
    Connectivity,
    SoftwareModule,
    Consumable,
    Fastener,
}

impl PartKind {
    /// All kinds in canonical order.
    pub const ALL: [PartKind; 15] = [
        PartKind::PowerConversion,
        PartKind::EnergyStorage,
        PartKind::Actuator,
        PartKind::Sensor,
        PartKind::ControlUnit,
        PartKind::UserInterface,
        PartKind::Thermal,
        PartKind::Fluidics,
        PartKind::Structural,
        PartKind::Transmission,
        PartKind::Protection,
        PartKind::Connectivity,
        PartKind::SoftwareModule,
        PartKind::Consumable,
        PartKind::Fastener,
    ];

    /// Canonical name, used as the part discriminant.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            PartKind::PowerConversion => "PowerConversion",
            PartKind::EnergyStorage => "EnergyStorage",
            PartKind::Actuator => "Actuator",
            PartKind::Sensor => "Sensor",
            PartKind::ControlUnit => "ControlUnit",
            PartKind::UserInterface => "UserInterface",
            PartKind::Thermal => "Thermal",
            PartKind::Fluidics => "Fluidics",
            PartKind::Structural => "Structural",
            PartKind::Transmission => "Transmission",
            PartKind::Protection => "Protection",
            PartKind::Connectivity => "Connectivity",
            PartKind::SoftwareModule => "SoftwareModule",
            PartKind::Consumable => "Consumable",
            PartKind::Fastener => "Fastener",
        }
    }
}

impl fmt::Display for PartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PartKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        PartKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| Error::UnknownPartType(s.to_string()))
    }
}

/// Power supplies, inverters, alternators
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerConversion {
    /// Nominal input voltage (V)
    pub input_voltage: Option<f64>,
    /// Nominal output voltage (V)
    pub output_voltage: Option<f64>,
    /// Maximum continuous output power (W)
    pub power_rating: Option<f64>,
    /// Efficiency as a fraction between 0 and 1
    pub efficiency: Option<f64>,
}

/// Batteries, capacitors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyStorage {
    /// Wh for batteries, F for capacitors
    pub capacity: Option<f64>,
    pub voltage: Option<f64>,
    /// e.g. "Li-ion", "NiMH"
    pub chemistry: Option<String>,
    pub recharge_cycles: Option<u32>,
}

/// Motors, valves, servos
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Actuator {
    /// Maximum torque (Nm)
    pub torque: Option<f64>,
    /// Maximum speed (rpm)
    pub speed: Option<f64>,
    pub duty_cycle: Option<f64>,
    pub voltage: Option<f64>,
    /// e.g. "electric", "hydraulic", "pneumatic"
    pub actuation_type: Option<String>,
}

/// Temperature, pressure, flow, vibration sensors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sensor {
    pub sensor_type: Option<String>,
    pub range_min: Option<f64>,
    pub range_max: Option<f64>,
    pub accuracy: Option<f64>,
    /// Measurement drift per unit time
    pub drift: Option<f64>,
    /// Response time (ms)
    pub response_time: Option<f64>,
}

/// ECUs, MCU boards, FADEC
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlUnit {
    pub cpu_type: Option<String>,
    /// RAM (MB)
    pub memory: Option<f64>,
    pub firmware_version: Option<String>,
    pub io_count: Option<u32>,
}

/// HMIs, buttons, touchscreens, indicators
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserInterface {
    pub ui_type: Option<String>,
    /// Display diagonal (inches)
    pub display_size: Option<f64>,
    pub input_methods: Option<Vec<String>>,
    pub indicator_count: Option<u32>,
}

/// Heaters, exchangers, fans
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thermal {
    /// Thermal or electrical power (W)
    pub power: Option<f64>,
    pub delta_t: Option<f64>,
    pub airflow: Option<f64>,
}

/// Pumps, tanks, lines, filters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fluidics {
    pub flow_rate: Option<f64>,
    pub pressure: Option<f64>,
    pub fluid_type: Option<String>,
    /// Internal volume (l)
    pub volume: Option<f64>,
}

/// Housings, frames, blades, disks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Structural {
    pub material: Option<String>,
    /// Mass (kg)
    pub mass: Option<f64>,
    pub dimensions: Option<BTreeMap<String, f64>>,
    pub load_rating: Option<f64>,
}

/// Gears, bearings, belts, shafts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transmission {
    pub torque_rating: Option<f64>,
    pub speed_rating: Option<f64>,
    pub transmission_type: Option<String>,
}

/// Fuses, breakers, EMI/RFI filters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Protection {
    pub protection_type: Option<String>,
    pub rating: Option<f64>,
    /// Trip time (ms)
    pub response_time: Option<f64>,
}

/// Harnesses, connectors, buses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Connectivity {
    pub interface_type: Option<String>,
    pub connector_standard: Option<String>,
    pub pin_count: Option<u32>,
}

/// Firmware, control laws, DSP blocks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoftwareModule {
    pub version: Option<String>,
    pub language: Option<String>,
    pub license: Option<String>,
    /// Hashes keyed by algorithm name
    pub checksums: Option<BTreeMap<String, String>>,
}

/// Filters, seals, oils
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Consumable {
    pub consumable_type: Option<String>,
    pub capacity: Option<f64>,
    /// e.g. "500 h", "12 months"
    pub replacement_interval: Option<String>,
}

/// Screws, rivets, adhesives
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fastener {
    pub fastener_type: Option<String>,
    pub material: Option<String>,
    /// Diameter (mm)
    pub diameter: Option<f64>,
    /// Length (mm)
    pub length: Option<f64>,
    pub strength: Option<f64>,
}

/// Kind-specific typed payload of a part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PartDetails {
    PowerConversion(PowerConversion),
    EnergyStorage(EnergyStorage),
    Actuator(Actuator),
    Sensor(Sensor),
    ControlUnit(ControlUnit),
    UserInterface(UserInterface),
    Thermal(Thermal),
    Fluidics(Fluidics),
    Structural(Structural),
    Transmission(Transmission),
    Protection(Protection),
    Connectivity(Connectivity),
    SoftwareModule(SoftwareModule),
    Consumable(Consumable),
    Fastener(Fastener),
}

impl PartDetails {
    /// Domain kind of this payload.
    #[must_use]
    pub fn kind(&self) -> PartKind {
        match self {
            PartDetails::PowerConversion(_) => PartKind::PowerConversion,
            PartDetails::EnergyStorage(_) => PartKind::EnergyStorage,
            PartDetails::Actuator(_) => PartKind::Actuator,
            PartDetails::Sensor(_) => PartKind::Sensor,
            PartDetails::ControlUnit(_) => PartKind::ControlUnit,
            PartDetails::UserInterface(_) => PartKind::UserInterface,
            PartDetails::Thermal(_) => PartKind::Thermal,
            PartDetails::Fluidics(_) => PartKind::Fluidics,
            PartDetails::Structural(_) => PartKind::Structural,
            PartDetails::Transmission(_) => PartKind::Transmission,
            PartDetails::Protection(_) => PartKind::Protection,
            PartDetails::Connectivity(_) => PartKind::Connectivity,
            PartDetails::SoftwareModule(_) => PartKind::SoftwareModule,
            PartDetails::Consumable(_) => PartKind::Consumable,
            PartDetails::Fastener(_) => PartKind::Fastener,
        }
    }

    /// Empty payload for a kind.
    #[must_use]
    pub fn empty(kind: PartKind) -> Self {
        match kind {
            PartKind::PowerConversion => PartDetails::PowerConversion(PowerConversion::default()),
            PartKind::EnergyStorage => PartDetails::EnergyStorage(EnergyStorage::default()),
            PartKind::Actuator => PartDetails::Actuator(Actuator::default()),
            PartKind::Sensor => PartDetails::Sensor(Sensor::default()),
            PartKind::ControlUnit => PartDetails::ControlUnit(ControlUnit::default()),
            PartKind::UserInterface => PartDetails::UserInterface(UserInterface::default()),
            PartKind::Thermal => PartDetails::Thermal(Thermal::default()),
            PartKind::Fluidics => PartDetails::Fluidics(Fluidics::default()),
            PartKind::Structural => PartDetails::Structural(Structural::default()),
            PartKind::Transmission => PartDetails::Transmission(Transmission::default()),
            PartKind::Protection => PartDetails::Protection(Protection::default()),
            PartKind::Connectivity => PartDetails::Connectivity(Connectivity::default()),
            PartKind::SoftwareModule => PartDetails::SoftwareModule(SoftwareModule::default()),
            PartKind::Consumable => PartDetails::Consumable(Consumable::default()),
            PartKind::Fastener => PartDetails::Fastener(Fastener::default()),
        }
    }

    /// Typed fields as a flat JSON object (unset fields are `null`).
    ///
    /// # Errors
    ///
    /// Returns an error if a field cannot be represented as JSON.
    pub fn fields(&self) -> Result<Attributes> {
        let value = match self {
            PartDetails::PowerConversion(d) => serde_json::to_value(d),
            PartDetails::EnergyStorage(d) => serde_json::to_value(d),
            PartDetails::Actuator(d) => serde_json::to_value(d),
            PartDetails::Sensor(d) => serde_json::to_value(d),
            PartDetails::ControlUnit(d) => serde_json::to_value(d),
            PartDetails::UserInterface(d) => serde_json::to_value(d),
            PartDetails::Thermal(d) => serde_json::to_value(d),
            PartDetails::Fluidics(d) => serde_json::to_value(d),
            PartDetails::Structural(d) => serde_json::to_value(d),
            PartDetails::Transmission(d) => serde_json::to_value(d),
            PartDetails::Protection(d) => serde_json::to_value(d),
            PartDetails::Connectivity(d) => serde_json::to_value(d),
            PartDetails::SoftwareModule(d) => serde_json::to_value(d),
            PartDetails::Consumable(d) => serde_json::to_value(d),
            PartDetails::Fastener(d) => serde_json::to_value(d),
        }
        .map_err(|e| Error::Serialization(e.to_string()))?;

        match value {
            serde_json::Value::Object(map) => Ok(map),
            other => Err(Error::Serialization(format!(
                "expected object for {} payload, got {other}",
                self.kind()
            ))),
        }
    }
}

/// Atomic item in a product's structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PartRecord")]
pub struct Part {
    /// Identifier, unique within a passport (not enforced here)
    pub part_id: String,

    /// Descriptive name (e.g., "Main Gearbox")
    pub name: String,

    /// Discriminant naming the domain kind
    #[serde(rename = "type")]
    pub part_type: String,

    /// Untyped additional attributes
    #[serde(default)]
    pub properties: Attributes,

    /// Ontology name -> binding
    #[serde(default)]
    pub ontology_bindings: BTreeMap<String, OntologyBinding>,

    /// Kind-specific typed fields, written as `{Kind: {...}}` in JSON and YAML
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_yaml::with::singleton_map"
    )]
    pub details: Option<PartDetails>,
}

/// Unchecked wire shape of a part; converted through [`Part::try_new`].
#[derive(Deserialize)]
struct PartRecord {
    part_id: String,
    name: String,
    #[serde(rename = "type")]
    part_type: String,
    #[serde(default)]
    properties: Attributes,
    #[serde(default)]
    ontology_bindings: BTreeMap<String, OntologyBinding>,
    #[serde(default, with = "serde_yaml::with::singleton_map")]
    details: Option<PartDetails>,
}

impl TryFrom<PartRecord> for Part {
    type Error = Error;

    fn try_from(record: PartRecord) -> Result<Self> {
        let mut part = Part::try_new(record.part_id, record.name, record.part_type, record.details)?;
        part.properties = record.properties;
        part.ontology_bindings = record.ontology_bindings;
        Ok(part)
    }
}

impl Part {
    /// Create a part without a typed payload. Any discriminant is accepted.
    pub fn new(
        part_id: impl Into<String>,
        name: impl Into<String>,
        part_type: impl Into<String>,
    ) -> Self {
        Self {
            part_id: part_id.into(),
            name: name.into(),
            part_type: part_type.into(),
            properties: Attributes::new(),
            ontology_bindings: BTreeMap::new(),
            details: None,
        }
    }

    /// Create a typed part; the discriminant is taken from the payload.
    pub fn with_details(
        part_id: impl Into<String>,
        name: impl Into<String>,
        details: PartDetails,
    ) -> Self {
        let mut part = Self::new(part_id, name, details.kind().name());
        part.details = Some(details);
        part
    }

    /// Create a part, checking that the payload matches the discriminant.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KindMismatch`] if `details` is present and its kind
    /// differs from `part_type`.
    pub fn try_new(
        part_id: impl Into<String>,
        name: impl Into<String>,
        part_type: impl Into<String>,
        details: Option<PartDetails>,
    ) -> Result<Self> {
        let mut part = Self::new(part_id, name, part_type);
        if let Some(details) = details {
            let payload = details.kind().name();
            if part.part_type != payload {
                return Err(Error::KindMismatch {
                    part_id: part.part_id,
                    declared: part.part_type,
                    payload: payload.to_string(),
                });
            }
            part.details = Some(details);
        }
        Ok(part)
    }

    /// Set an untyped property (builder style).
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Domain kind named by the discriminant, if it names one.
    #[must_use]
    pub fn kind(&self) -> Option<PartKind> {
        self.part_type.parse().ok()
    }

    /// Attach or merge an ontology binding.
    ///
    /// The first call for an ontology creates the binding; later calls merge
    /// (id lists by set-union, metadata by shallow overwrite).
    pub fn bind_ontology(
        &mut self,
        ontology_name: &str,
        class_ids: Option<Vec<String>>,
        case_item_ids: Option<Vec<String>>,
        metadata: Option<Attributes>,
    ) {
        if let Some(existing) = self.ontology_bindings.get_mut(ontology_name) {
            trace!("Merging {} binding on part {}", ontology_name, self.part_id);
            existing.merge(class_ids, case_item_ids, metadata);
        } else {
            trace!("Creating {} binding on part {}", ontology_name, self.part_id);
            self.ontology_bindings.insert(
                ontology_name.to_string(),
                OntologyBinding::new(ontology_name, class_ids, case_item_ids, metadata),
            );
        }
    }

    /// Binding for an ontology, if present.
    #[must_use]
    pub fn get_binding(&self, ontology_name: &str) -> Option<&OntologyBinding> {
        self.ontology_bindings.get(ontology_name)
    }

    /// Item identifiers this part may manifest as; empty when unbound.
    #[must_use]
    pub fn allowed_item_types(&self, ontology_name: &str) -> Vec<String> {
        self.get_binding(ontology_name)
            .map(|binding| binding.case_item_ids.clone())
            .unwrap_or_default()
    }

    /// Names of all currently bound ontologies.
    #[must_use]
    pub fn supported_ontologies(&self) -> Vec<String> {
        self.ontology_bindings.keys().cloned().collect()
    }

    /// `part_id`, `name` and `type` are all non-empty.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        !self.part_id.is_empty() && !self.name.is_empty() && !self.part_type.is_empty()
    }

    /// Field-by-field conversion: base fields followed by the payload's
    /// typed fields at the top level.
    ///
    /// # Errors
    ///
    /// Returns an error if a binding or payload field cannot be represented
    /// as JSON.
    pub fn to_flat_map(&self) -> Result<Attributes> {
        let mut map = Attributes::new();
        map.insert("part_id".into(), self.part_id.clone().into());
        map.insert("name".into(), self.name.clone().into());
        map.insert("type".into(), self.part_type.clone().into());
        map.insert(
            "properties".into(),
            serde_json::Value::Object(self.properties.clone()),
        );
        map.insert(
            "ontology_bindings".into(),
            serde_json::to_value(&self.ontology_bindings)
                .map_err(|e| Error::Serialization(e.to_string()))?,
        );

        if let Some(details) = &self.details {
            map.extend(details.fields()?);
        }

        Ok(map)
    }
}
