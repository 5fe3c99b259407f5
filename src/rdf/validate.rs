//! Compatibility validation for triple export
//!
//! The triple line format cannot represent every result shape the query
//! engine can produce. Each unsupported feature is rejected with a
//! distinct error before any output is written, and the whole batch is
//! aborted: partial output for the other trees would be misleading.

use thiserror::Error;

use crate::result::{ResultNode, UID_ATTR};

/// Function name whose results must never be serialized
const CHECK_PASSWORD_FUNC: &str = "checkpwd";

/// Result features the triple format cannot represent
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedFeature {
    /// Grouped aggregation
    #[error("groupby is not supported in rdf output format")]
    GroupBy,

    /// `count(uid)` requested as an internal aggregate
    #[error("uid count is not supported in the rdf output format")]
    UidCount,

    /// Normalize directive
    #[error("normalize directive is not supported in the rdf output format")]
    Normalize,

    /// Reflexive-edge suppression
    #[error("ignorereflex directive is not supported in the rdf output format")]
    IgnoreReflex,

    /// Password-check function
    #[error("chkpwd function is not supported in the rdf output format")]
    CheckPassword,

    /// Facet data
    #[error("facet is not supported in the rdf output format")]
    Facets,
}

/// Check a node for features the triple format cannot represent.
///
/// Applied to every root before traversal and re-applied to each node as
/// it is visited; traversal never proceeds past a violation.
pub fn validate(node: &ResultNode) -> Result<(), UnsupportedFeature> {
    if node.is_group_by {
        return Err(UnsupportedFeature::GroupBy);
    }
    let uid_count = node.attribute == UID_ATTR && node.directives.do_count && node.is_internal;
    if uid_count {
        return Err(UnsupportedFeature::UidCount);
    }
    if node.directives.normalize {
        return Err(UnsupportedFeature::Normalize);
    }
    if node.directives.ignore_reflex {
        return Err(UnsupportedFeature::IgnoreReflex);
    }
    if node.source_function.as_deref() == Some(CHECK_PASSWORD_FUNC) {
        return Err(UnsupportedFeature::CheckPassword);
    }
    if node.has_facets {
        return Err(UnsupportedFeature::Facets);
    }
    Ok(())
}
