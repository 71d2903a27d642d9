#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # dpp-classifier
//!
//! Offline builder of domain -> ontology identifier tables.
//!
//! Taxonomy documents (ECLASS XML, ISA-95 XSD) are scanned for identifiers
//! and their free-text definitions. Each definition is scored against a
//! per-domain keyword dictionary; the resulting table is persisted as the
//! per-schema mapping configuration consumed by the mappers.

/// Domain tables built from a classified corpus, and their persistence.
pub mod artifact;
/// Corpus directory scanning with skip-and-continue.
pub mod corpus;
/// ECLASS dictionary reader.
pub mod eclass;
/// ISA-95 XSD reader.
pub mod isa95;
/// Per-domain keyword dictionaries and thresholds.
pub mod keywords;
/// Keyword scoring and classification.
pub mod scoring;

pub use artifact::{DomainTable, EclassArtifact, Isa95Artifact, write_artifact};
pub use corpus::{CorpusScan, SkippedDocument};
pub use eclass::{EclassClass, EclassClassKind, EclassCorpus};
pub use isa95::{Isa95Corpus, Isa95Definition, Isa95Group};
pub use keywords::{Dictionary, ECLASS_MIN_SCORE, ISA95_MIN_SCORE};
pub use scoring::Classifier;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading taxonomies or writing tables
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to parse {source_name}: {message}")]
    Xml {
        source_name: String,
        message: String,
    },

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    pub(crate) fn xml(source_name: &str, message: impl ToString) -> Self {
        Self::Xml {
            source_name: source_name.to_string(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
