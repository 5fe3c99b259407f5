//! Result-shape classification
//!
//! Each (node, subject) pair has exactly one output shape. Classifying
//! once up front keeps the precedence order (count, then relation, then
//! scalar row) in a single testable match instead of scattered
//! presence checks.

use crate::value::RawValue;

use super::node::SourceEntry;

/// The kind of output a single subject produces
#[derive(Debug, Clone, PartialEq)]
pub enum ResultShape<'a> {
    /// Count-aggregation result
    Count(u64),
    /// Uid-to-uid relation list
    Relation(&'a [u64]),
    /// Scalar row (possibly empty)
    Scalars(&'a [RawValue]),
    /// No result data for this subject
    None,
}

impl SourceEntry {
    /// Classify this entry's output shape.
    ///
    /// Counts take precedence, then a non-empty relation list, then the
    /// scalar row if one was materialized.
    pub fn shape(&self) -> ResultShape<'_> {
        if let Some(count) = self.count {
            return ResultShape::Count(count);
        }
        if !self.targets.is_empty() {
            return ResultShape::Relation(&self.targets);
        }
        match &self.values {
            Some(values) => ResultShape::Scalars(values),
            None => ResultShape::None,
        }
    }
}
