//! Query-result tree structures
//!
//! A query produces a tree of `ResultNode`s, one per predicate in the
//! query body. The exporter treats the tree as read-only input: nodes
//! are fully constructed by the engine before conversion begins, and
//! per-subject data is paired with its subject in `SourceEntry` records
//! rather than parallel arrays.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::value::{RawValue, TypedValue};

/// The reflexive identifier attribute
pub const UID_ATTR: &str = "uid";

/// Directives attached to a result node by the query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Directives {
    /// Suppress all output for this node's subjects
    pub ignore_result: bool,
    /// Expansion target; internal nodes with an expansion produce no
    /// direct output (the expanded predicates appear as sibling nodes)
    pub expand: Option<String>,
    /// Node is a count aggregation
    pub do_count: bool,
    /// Normalize directive (unsupported by the triple format)
    pub normalize: bool,
    /// Reflexive-edge suppression (unsupported by the triple format)
    pub ignore_reflex: bool,
}

/// Per-subject result data.
///
/// `count` wins over a non-empty `targets` list, which wins over the
/// scalar row. `values: Some(vec![])` means the engine materialized a
/// scalar row for this subject that happens to be empty; `None` means
/// there is no scalar row at all. The distinction matters for the
/// reflexive `uid` attribute, which emits per subject regardless of the
/// row's content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceEntry {
    /// Subject identifier
    pub uid: u64,
    /// Count-aggregation result for this subject
    pub count: Option<u64>,
    /// Destination identifiers reachable via the node's attribute
    pub targets: Vec<u64>,
    /// Scalar row for this subject
    pub values: Option<Vec<RawValue>>,
}

impl SourceEntry {
    /// Create an entry carrying only a subject id
    pub fn new(uid: u64) -> Self {
        Self {
            uid,
            ..Self::default()
        }
    }

    /// Entry with a count result
    pub fn with_count(uid: u64, count: u64) -> Self {
        Self {
            uid,
            count: Some(count),
            ..Self::default()
        }
    }

    /// Entry with a uid-relation list
    pub fn with_targets(uid: u64, targets: Vec<u64>) -> Self {
        Self {
            uid,
            targets,
            ..Self::default()
        }
    }

    /// Entry with a scalar row
    pub fn with_values(uid: u64, values: Vec<RawValue>) -> Self {
        Self {
            uid,
            values: Some(values),
            ..Self::default()
        }
    }
}

/// One node of the query-result tree
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultNode {
    /// Predicate name this node represents
    pub attribute: String,
    /// Display name overriding `attribute` for synthetic fields
    pub alias: Option<String>,
    /// Per-subject results, in subject order; empty for internal/root
    /// nodes that carry no subjects of their own
    pub sources: Vec<SourceEntry>,
    /// Destination ids that survived filtering; relations pointing
    /// elsewhere are suppressed
    pub filtered_targets: FxHashSet<u64>,
    /// Facet data present (unsupported by the triple format)
    pub has_facets: bool,
    /// Query directives
    pub directives: Directives,
    /// Synthetic/computed field (aggregate or variable) rather than a
    /// stored predicate
    pub is_internal: bool,
    /// Grouped aggregation node (unsupported by the triple format)
    pub is_group_by: bool,
    /// Name of the function applied at this node, if any
    pub source_function: Option<String>,
    /// Precomputed values per subject; consulted only for internal nodes
    pub computed: FxHashMap<u64, TypedValue>,
    /// Variable name bound at this node, used for aggregate field naming
    pub var_name: Option<String>,
    /// Child nodes, in document order
    pub children: Vec<ResultNode>,
}

impl ResultNode {
    /// Create a node for the given attribute
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            ..Self::default()
        }
    }

    /// Display name for this node: alias if set, else the attribute
    pub fn field_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.attribute)
    }

    /// Display name for a count result: alias if set, else
    /// `count(<attribute>)`
    pub fn count_field_name(&self) -> String {
        match &self.alias {
            Some(alias) => alias.clone(),
            None => format!("count({})", self.attribute),
        }
    }

    /// Display name for an aggregate-with-variable result: alias if
    /// set, else `val(<var>)`, wrapped by the source function name when
    /// one is attached
    pub fn aggregate_field_name(&self) -> String {
        if let Some(alias) = &self.alias {
            return alias.clone();
        }
        let base = format!("val({})", self.var_name.as_deref().unwrap_or_default());
        match &self.source_function {
            Some(func) => format!("{}({})", func, base),
            None => base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_name_prefers_alias() {
        let mut node = ResultNode::new("friend");
        assert_eq!(node.field_name(), "friend");

        node.alias = Some("buddies".to_string());
        assert_eq!(node.field_name(), "buddies");
    }

    #[test]
    fn test_count_field_name() {
        let mut node = ResultNode::new("friend");
        assert_eq!(node.count_field_name(), "count(friend)");

        node.alias = Some("friendCount".to_string());
        assert_eq!(node.count_field_name(), "friendCount");
    }

    #[test]
    fn test_aggregate_field_name() {
        let mut node = ResultNode::new("var");
        node.var_name = Some("a".to_string());
        assert_eq!(node.aggregate_field_name(), "val(a)");

        node.source_function = Some("sum".to_string());
        assert_eq!(node.aggregate_field_name(), "sum(val(a))");

        node.alias = Some("total".to_string());
        assert_eq!(node.aggregate_field_name(), "total");
    }
}
