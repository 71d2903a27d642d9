#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # dpp-mapping
//!
//! Mapper contract and orchestration for converting a Digital Product
//! Passport into external schema documents.
//!
//! A [`SchemaMapper`] maps each passport layer independently; the provided
//! [`SchemaMapper::map_dpp`] assembles the layer fragments into a
//! [`MappedDocument`], validates it, and fails with [`Error::Validation`]
//! if the mapper rejects its own output.

/// Mapper configuration loaded from the per-schema mapping file.
pub mod config;
/// Mapped output document and validation result.
pub mod document;
/// The mapper contract and its orchestration.
pub mod mapper;
/// Built-in ECLASS and ISA-95 mappers.
pub mod mappers;

pub use config::MapperConfig;
pub use document::{Fragment, MappedDocument, ValidationResult};
pub use mapper::{FromConfig, PassportLayers, SchemaMapper, default_part_mapping};
pub use mappers::{EclassMapper, Isa95Mapper};

use thiserror::Error;

/// Errors that can occur during mapping
#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Failed to map {layer} layer: {message}")]
    Layer { layer: String, message: String },

    #[error("Model error: {0}")]
    Model(#[from] dpp_model::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Build a layer mapping error.
    pub fn layer(layer: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Layer {
            layer: layer.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
