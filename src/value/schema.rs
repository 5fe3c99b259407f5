//! Attribute type registry
//!
//! Maps attribute names to their declared scalar types and drives the
//! best-effort conversion the triple emitter uses for scalar lists.

use rustc_hash::FxHashMap;

use super::convert::{coerce, decode, RawValue};
use super::types::{ScalarType, TypedValue, ValueResult};

/// Declared attribute types, as known to the query engine
#[derive(Debug, Clone, Default)]
pub struct Schema {
    types: FxHashMap<String, ScalarType>,
}

impl Schema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the type of an attribute
    pub fn declare(&mut self, attr: impl Into<String>, tid: ScalarType) {
        self.types.insert(attr.into(), tid);
    }

    /// Get the declared type for an attribute, if any
    pub fn declared_type(&self, attr: &str) -> Option<ScalarType> {
        self.types.get(attr).copied()
    }

    /// Convert a raw engine value to the type declared for `attr`.
    ///
    /// The payload is decoded under its stored tag and then coerced to
    /// the declared type. Attributes without a declaration keep the
    /// stored tag.
    pub fn convert_with_best_effort(&self, raw: &RawValue, attr: &str) -> ValueResult<TypedValue> {
        let typed = decode(raw)?;
        match self.declared_type(attr) {
            Some(target) => coerce(typed, target),
            None => Ok(typed),
        }
    }
}
