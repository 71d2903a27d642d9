//! Built-in sample passport: an espresso machine with fifty-one parts

use dpp_model::part::{
    Actuator, Connectivity, ControlUnit, Fastener, Fluidics, PowerConversion, Sensor, Structural,
    Thermal, UserInterface,
};
use dpp_model::{
    Attributes, DigitalProductPassport, IdentityLayer, LifecycleLayer, Part, PartDetails,
    StructureLayer, SustainabilityLayer,
};
use serde_json::json;
use std::collections::BTreeMap;

const PART_COUNT: usize = 51;
const SCREW_SIZES: [(&str, f64); 3] = [("M3x10", 10.0), ("M4x12", 12.0), ("M5x20", 20.0)];

fn actuator(id: &str, name: &str, torque: f64, speed: f64, voltage: f64, kind: &str) -> Part {
    Part::with_details(
        id,
        name,
        PartDetails::Actuator(Actuator {
            torque: Some(torque),
            speed: Some(speed),
            voltage: Some(voltage),
            actuation_type: Some(kind.to_string()),
            ..Default::default()
        }),
    )
}

fn thermal(id: &str, name: &str, power: f64, delta_t: f64) -> Part {
    Part::with_details(
        id,
        name,
        PartDetails::Thermal(Thermal {
            power: Some(power),
            delta_t: Some(delta_t),
            airflow: Some(0.0),
        }),
    )
}

fn sensor(id: &str, name: &str, sensor_type: &str, range: Option<(f64, f64)>) -> Part {
    Part::with_details(
        id,
        name,
        PartDetails::Sensor(Sensor {
            sensor_type: Some(sensor_type.to_string()),
            range_min: range.map(|(min, _)| min),
            range_max: range.map(|(_, max)| max),
            ..Default::default()
        }),
    )
}

fn housing(id: &str, name: &str, material: &str, mass: f64) -> Part {
    Part::with_details(
        id,
        name,
        PartDetails::Structural(Structural {
            material: Some(material.to_string()),
            mass: Some(mass),
            ..Default::default()
        }),
    )
}

/// Parts of the sample machine, padded with screws to a fixed count.
#[must_use]
pub fn sample_parts() -> Vec<Part> {
    let mut parts = vec![
        actuator("M01-MainPump", "High Pressure Pump", 1.5, 3000.0, 230.0, "vibration_pump"),
        actuator("M02-Grinder", "Bean Grinder Motor", 2.0, 1500.0, 230.0, "electric_motor"),
        actuator("M03-BrewGroup", "Brew Group Driver", 5.0, 60.0, 24.0, "servo"),
        thermal("H01-Boiler", "Main Boiler", 1400.0, 95.0),
        thermal("H02-SteamThermoblock", "Steam Thermoblock", 1200.0, 130.0),
        thermal("H03-CupWarmer", "Cup Warmer Plate", 50.0, 40.0),
    ];

    for i in 1..=3 {
        parts.push(sensor(
            &format!("S{i:02}-NTC"),
            &format!("NTC Temp Sensor {i}"),
            "temperature",
            Some((0.0, 150.0)),
        ));
    }
    parts.push(sensor("S04-Flow", "Flow Meter", "flow", Some((0.0, 2000.0))));
    parts.push(sensor("S05-Level", "Water Tank Level", "capacitive_level", None));

    parts.push(Part::with_details(
        "F01-Tank",
        "Water Tank",
        PartDetails::Fluidics(Fluidics {
            volume: Some(2.5),
            fluid_type: Some("water".into()),
            ..Default::default()
        }),
    ));
    parts.push(Part::with_details(
        "F02-Spout",
        "Coffee Spout",
        PartDetails::Fluidics(Fluidics {
            fluid_type: Some("coffee".into()),
            ..Default::default()
        }),
    ));
    for i in 1..=5 {
        parts.push(Part::with_details(
            format!("F{}-Tube", 10 + i),
            format!("PTFE Tube {i}"),
            PartDetails::Fluidics(Fluidics {
                pressure: Some(15.0),
                fluid_type: Some("water/steam".into()),
                ..Default::default()
            }),
        ));
    }

    parts.push(Part::with_details(
        "E01-MainBoard",
        "Main PCB Controller",
        PartDetails::ControlUnit(ControlUnit {
            cpu_type: Some("STM32".into()),
            memory: Some(1.0),
            firmware_version: Some("3.4.1".into()),
            ..Default::default()
        }),
    ));
    parts.push(Part::with_details(
        "P01-PSU",
        "Power Supply 230V-24V",
        PartDetails::PowerConversion(PowerConversion {
            input_voltage: Some(230.0),
            output_voltage: Some(24.0),
            power_rating: Some(150.0),
            ..Default::default()
        }),
    ));
    parts.push(Part::with_details(
        "UI01-Display",
        "Touch Display",
        PartDetails::UserInterface(UserInterface {
            ui_type: Some("touchscreen".into()),
            display_size: Some(5.0),
            ..Default::default()
        }),
    ));

    parts.push(housing("ST01-Chassis", "Main Chassis Frame", "Steel", 2.5));
    parts.push(housing("ST02-HousingL", "Housing Left", "ABS Plastic", 0.4));
    parts.push(housing("ST03-HousingR", "Housing Right", "ABS Plastic", 0.4));
    parts.push(housing("ST04-DripTray", "Drip Tray", "Steel/Plastic", 0.8));

    for i in 1..=5 {
        parts.push(Part::with_details(
            format!("C{i:02}-Cable"),
            format!("Harness Segment {i}"),
            PartDetails::Connectivity(Connectivity {
                interface_type: Some("power/signal".into()),
                ..Default::default()
            }),
        ));
    }

    let screws = PART_COUNT - parts.len();
    for i in 0..screws {
        let (size, length) = SCREW_SIZES[i % SCREW_SIZES.len()];
        parts.push(Part::with_details(
            format!("FAST-{:02}", i + 1),
            format!("Screw {size}"),
            PartDetails::Fastener(Fastener {
                fastener_type: Some("screw".into()),
                material: Some("Stainless Steel".into()),
                length: Some(length),
                ..Default::default()
            }),
        ));
    }

    parts
}

fn attributes(value: serde_json::Value) -> Attributes {
    match value {
        serde_json::Value::Object(map) => map,
        _ => Attributes::new(),
    }
}

/// The sample passport.
#[must_use]
pub fn sample_passport() -> DigitalProductPassport {
    let identity = IdentityLayer {
        global_ids: BTreeMap::from([
            ("gtin".to_string(), "00-CAFE-9000".to_string()),
            ("serial".to_string(), "CM2025-001".to_string()),
        ]),
        make_model: BTreeMap::from([
            ("brand".to_string(), "BaristaPro".to_string()),
            ("model".to_string(), "EspressoMaster 9000".to_string()),
        ]),
        ownership: BTreeMap::from([(
            "manufacturer".to_string(),
            "CoffeeTech Industries".to_string(),
        )]),
        conformity: vec!["CE".into(), "UL".into(), "CB".into()],
    };

    DigitalProductPassport {
        identity,
        structure: StructureLayer {
            hierarchy: attributes(json!({ "product": "EspressoMaster 9000" })),
            parts: sample_parts(),
            ..Default::default()
        },
        lifecycle: LifecycleLayer {
            manufacture: attributes(json!({ "date": "2025-06-01", "factory": "Plant A" })),
            ..Default::default()
        },
        sustainability: SustainabilityLayer {
            mass: 12.5,
            ..Default::default()
        },
        ..Default::default()
    }
}
