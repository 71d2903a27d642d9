#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # dpp-model
//!
//! Layered, schema-agnostic Digital Product Passport model.
//!
//! A passport aggregates six layers (identity, structure, lifecycle, risk,
//! sustainability, provenance). The structure layer owns the product's
//! [`Part`]s, each typed as one of fifteen domain kinds and optionally bound
//! to any number of external ontologies through [`OntologyBinding`]s.

/// Per-ontology projection of a part and its merge rules.
pub mod binding;
/// The six passport layers.
pub mod layers;
/// Part record, domain kinds, and typed payloads.
pub mod part;
/// Top-level passport aggregate.
pub mod passport;

pub use binding::OntologyBinding;
pub use layers::{
    IdentityLayer, LifecycleLayer, ProvenanceLayer, RiskLayer, StructureLayer,
    SustainabilityLayer,
};
pub use part::{Part, PartDetails, PartKind};
pub use passport::DigitalProductPassport;

use thiserror::Error;

/// Open, string-keyed attribute bag used throughout the layers.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// Errors that can occur when building or reading model values
#[derive(Error, Debug)]
pub enum Error {
    #[error("Part '{part_id}' declares type '{declared}' but carries a {payload} payload")]
    KindMismatch {
        part_id: String,
        declared: String,
        payload: String,
    },

    #[error("Unknown part type: {0}")]
    UnknownPartType(String),

    #[error("Passport parse error ({format}): {message}")]
    Parse { format: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Build a parse error tagged with the input format.
    pub fn parse(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            format: format.into(),
            message: message.into(),
        }
    }
}

/// Crate-local result type for model operations.
pub type Result<T> = std::result::Result<T, Error>;
