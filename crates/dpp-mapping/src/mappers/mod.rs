//! Built-in schema mappers

pub mod eclass;
pub mod isa95;

pub use eclass::EclassMapper;
pub use isa95::Isa95Mapper;

use dpp_model::Attributes;
use serde_json::Value;

/// List of attribute bags as a JSON array.
fn objects(list: &[Attributes]) -> Value {
    Value::Array(list.iter().cloned().map(Value::Object).collect())
}

/// First identifier: the binding's, else the configured table's.
fn first_or_fallback(bound: &[String], fallback: Vec<String>) -> Value {
    bound
        .first()
        .cloned()
        .or_else(|| fallback.into_iter().next())
        .map_or(Value::Null, Value::String)
}
