//! Per-domain keyword dictionaries
//!
//! Each domain maps to an ordered list of lower-cased phrases. Dictionary
//! order matters: it is the tie-break order of classification.

use dpp_model::PartKind;

/// Domains with their phrases, in iteration order
pub type Dictionary = Vec<(PartKind, Vec<String>)>;

/// Minimum keyword hits for ECLASS definitions
pub const ECLASS_MIN_SCORE: usize = 2;

/// Minimum keyword hits for ISA-95 documentation
pub const ISA95_MIN_SCORE: usize = 1;

const ECLASS: [(PartKind, &[&str]); 15] = [
    (
        PartKind::PowerConversion,
        &[
            "power supply",
            "power-supply",
            "power converter",
            "ac/dc converter",
            "dc/dc converter",
            "inverter",
            "rectifier",
            "uninterruptible power supply",
            "ups",
            "transformer",
        ],
    ),
    (
        PartKind::EnergyStorage,
        &[
            "battery",
            "accumulator",
            "energy storage",
            "cell",
            "capacitor",
            "supercapacitor",
        ],
    ),
    (
        PartKind::Actuator,
        &[
            "actuator",
            "drive",
            "servo",
            "motion",
            "positioning",
            "valve actuator",
        ],
    ),
    (
        PartKind::Sensor,
        &[
            "sensor",
            "transducer",
            "measuring device",
            "detector",
            "measurement",
            "temperature sensor",
            "pressure sensor",
            "flow sensor",
            "position sensor",
            "vibration sensor",
        ],
    ),
    (
        PartKind::ControlUnit,
        &[
            "controller",
            "control unit",
            "logic controller",
            "plc",
            "control system",
            "control device",
        ],
    ),
    (
        PartKind::UserInterface,
        &[
            "user interface",
            "operator panel",
            "display",
            "hmi",
            "control panel",
            "keypad",
        ],
    ),
    (
        PartKind::Thermal,
        &[
            "heating",
            "cooling",
            "thermal",
            "heat exchanger",
            "radiator",
            "heater",
            "fan",
        ],
    ),
    (
        PartKind::Fluidics,
        &["fluid", "hydraulic", "pneumatic", "pump", "valve", "compressor"],
    ),
    (
        PartKind::Structural,
        &[
            "structural",
            "frame",
            "housing",
            "support",
            "chassis",
            "enclosure",
            "bracket",
        ],
    ),
    (
        PartKind::Transmission,
        &[
            "gear",
            "gearing",
            "drive shaft",
            "drivetrain",
            "belt drive",
            "chain drive",
            "coupling",
            "bearing",
        ],
    ),
    (
        PartKind::Protection,
        &[
            "protection device",
            "fuse",
            "circuit breaker",
            "breaker",
            "protector",
            "surge protector",
            "overcurrent",
            "overvoltage",
        ],
    ),
    (
        PartKind::Connectivity,
        &[
            "connector",
            "plug",
            "socket",
            "cable",
            "terminal block",
            "interface",
            "bus system",
        ],
    ),
    (
        PartKind::SoftwareModule,
        &[
            "software",
            "firmware",
            "program",
            "control software",
            "software module",
        ],
    ),
    (
        PartKind::Consumable,
        &[
            "consumable",
            "filter",
            "lubricant",
            "oil",
            "grease",
            "sealant",
            "cleaning agent",
        ],
    ),
    (
        PartKind::Fastener,
        &[
            "fastener",
            "screw",
            "bolt",
            "nut",
            "washer",
            "rivet",
            "anchor bolt",
        ],
    ),
];

const ISA95: [(PartKind, &[&str]); 15] = [
    (
        PartKind::PowerConversion,
        &[
            "transformer",
            "inverter",
            "rectifier",
            "power supply",
            "power-supply",
            "converter",
            "converter unit",
            "ac/dc",
            "dc/dc",
            "uninterruptible power supply",
            "ups",
            "voltage regulator",
            "energy",
            "power",
        ],
    ),
    (
        PartKind::EnergyStorage,
        &[
            "battery",
            "energy storage",
            "accumulator",
            "cell",
            "storage tank",
            "reservoir",
            "silo",
            "storage",
            "storage zone",
            "storage unit",
        ],
    ),
    (
        PartKind::Actuator,
        &[
            "actuator",
            "drive",
            "servo",
            "motion",
            "positioning",
            "valve actuator",
            "controlled element",
            "mechanical output",
            "execution",
        ],
    ),
    (
        PartKind::Sensor,
        &[
            "sensor",
            "transducer",
            "measuring device",
            "detector",
            "measurement",
            "measurement device",
            "instrument",
            "test",
            "sample",
            "quality",
            "result",
            "value",
        ],
    ),
    (
        PartKind::ControlUnit,
        &[
            "controller",
            "control unit",
            "control system",
            "control function",
            "logic controller",
            "plc",
            "programmable controller",
            "automation controller",
            "control",
            "module",
            "logic",
            "capability",
            "process code",
        ],
    ),
    (
        PartKind::UserInterface,
        &[
            "user interface",
            "operator",
            "hmi",
            "display",
            "panel",
            "annunciator",
            "alarm panel",
            "operator station",
            "person",
            "personnel",
            "individual",
        ],
    ),
    (
        PartKind::Thermal,
        &[
            "heating",
            "cooling",
            "thermal",
            "heat exchanger",
            "furnace",
            "oven",
            "kiln",
            "heater",
            "cooler",
            "temperature",
        ],
    ),
    (
        PartKind::Fluidics,
        &[
            "pump",
            "compressor",
            "valve",
            "pipeline",
            "pipe",
            "duct",
            "fluid",
            "hydraulic",
            "pneumatic",
            "liquid",
            "gas",
            "flow",
        ],
    ),
    (
        PartKind::Structural,
        &[
            "structure",
            "frame",
            "support",
            "foundation",
            "housing",
            "enclosure",
            "chassis",
            "platform",
            "physical asset",
            "asset",
            "class",
        ],
    ),
    (
        PartKind::Transmission,
        &[
            "gear",
            "gearbox",
            "transmission",
            "drive train",
            "belt drive",
            "chain drive",
            "shaft",
            "coupling",
            "bearing",
            "assembly",
        ],
    ),
    (
        PartKind::Protection,
        &[
            "protection",
            "protective",
            "fuse",
            "circuit breaker",
            "breaker",
            "protector",
            "safety device",
            "interlock",
            "safety interlock",
            "safety",
            "alarm",
            "alert",
            "security",
        ],
    ),
    (
        PartKind::Connectivity,
        &[
            "connector",
            "connection",
            "terminal",
            "terminal block",
            "i/o point",
            "communication link",
            "network connection",
            "bus",
            "fieldbus",
            "network",
            "resource network",
            "interface",
        ],
    ),
    (
        PartKind::SoftwareModule,
        &[
            "software",
            "software component",
            "application",
            "program",
            "execution logic",
            "algorithm",
            "recipe logic",
            "job",
            "order",
            "command",
            "transaction",
            "dispatch",
        ],
    ),
    (
        PartKind::Consumable,
        &[
            "consumable",
            "material",
            "ingredient",
            "feedstock",
            "raw material",
            "lubricant",
            "cleaning",
            "consumed",
            "produced",
            "lot",
            "sublot",
            "inventory",
            "bill of material",
        ],
    ),
    (
        PartKind::Fastener,
        &[
            "fastener", "bolt", "screw", "nut", "washer", "anchor", "clamp", "joint",
        ],
    ),
];

fn to_dictionary(table: &[(PartKind, &[&str])]) -> Dictionary {
    table
        .iter()
        .map(|(kind, phrases)| (*kind, phrases.iter().map(|p| (*p).to_string()).collect()))
        .collect()
}

/// Phrases tuned for ECLASS class definitions.
#[must_use]
pub fn eclass_keywords() -> Dictionary {
    to_dictionary(&ECLASS)
}

/// Phrases tuned for ISA-95 XSD documentation.
#[must_use]
pub fn isa95_keywords() -> Dictionary {
    to_dictionary(&ISA95)
}
