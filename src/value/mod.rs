//! Typed scalar values, wire decoding, and schema-driven conversion
//!
//! This is the value subsystem the triple exporter consumes: canonical
//! byte encodings for typed scalars (`TypedValue::canonical_bytes`) and
//! best-effort conversion of raw engine payloads keyed by the declared
//! attribute type (`Schema::convert_with_best_effort`).

mod convert;
mod schema;
mod types;

pub use convert::{coerce, decode, parse_lexical, RawValue};
pub use schema::Schema;
pub use types::{ScalarType, TypedValue, ValueError, ValueResult};
