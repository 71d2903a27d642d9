#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # dpp-schema
//!
//! Registry resolving schema names and aliases to mapper instances.
//!
//! Mappers are registered as factories, either eagerly or behind a deferred
//! loader. On first use the registry reads the schema's mapping file from
//! its config directory, builds the mapper with it, and caches both the
//! configuration and the instance under the canonical name.

/// Registration of the built-in mappers.
pub mod builtin;
/// Per-schema config file naming and tolerant loading.
pub mod config;
/// Factory, alias, config and instance tables.
pub mod registry;

pub use builtin::register_builtin_mappers;
pub use config::{config_file_name, read_mapper_config};
pub use registry::{LazyLoader, MapperFactory, SchemaInfo, SchemaRegistry, factory_of};

use thiserror::Error;

/// Errors that can occur when resolving or using a schema mapper
#[derive(Error, Debug)]
pub enum Error {
    #[error("Schema '{name}' not registered. Available: {available:?}")]
    NotFound { name: String, available: Vec<String> },

    #[error("Mapper registered as '{name}' does not satisfy the mapper contract: {reason}")]
    TypeMismatch { name: String, reason: String },

    #[error(transparent)]
    Mapping(#[from] dpp_mapping::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
