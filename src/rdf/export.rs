//! Triple export of query-result trees
//!
//! Walks each tree depth-first and writes one line per fact in the
//! legacy exchange form `<subject> <predicate> <object> .`. Subjects
//! are always uids; objects are either literal bytes or an
//! angle-bracketed reference when they denote a node. The root of each
//! submitted tree is never emitted, only descended into.

use thiserror::Error;
use tracing::debug;

use crate::result::{ResultNode, ResultShape, SourceEntry, UID_ATTR};
use crate::value::{RawValue, Schema, ValueError};

use super::validate::{validate, UnsupportedFeature};

/// Export errors
#[derive(Error, Debug)]
pub enum ExportError {
    /// The result tree uses a feature the triple format cannot represent
    #[error(transparent)]
    Unsupported(#[from] UnsupportedFeature),

    /// An aggregate value could not be encoded
    #[error("cannot encode aggregate value: {0}")]
    Value(#[from] ValueError),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// Convert the given result trees into triple lines.
///
/// On success the returned buffer holds zero or more newline-terminated
/// lines, in document order of the trees and their children. Any
/// rejection or aggregate-encoding failure aborts the whole batch; no
/// partial output is returned.
pub fn export_rdf(trees: &[ResultNode], schema: &Schema) -> ExportResult<Vec<u8>> {
    debug!("exporting {} result trees as triples", trees.len());
    let mut builder = RdfBuilder::new(schema);
    for tree in trees {
        validate(tree)?;
        // Skip the root: only its descendants contribute lines.
        for child in &tree.children {
            builder.cast_node(child)?;
        }
    }
    Ok(builder.into_bytes())
}

/// Accumulates triple lines for a single conversion call
struct RdfBuilder<'a> {
    buf: Vec<u8>,
    schema: &'a Schema,
}

impl<'a> RdfBuilder<'a> {
    fn new(schema: &'a Schema) -> Self {
        Self {
            buf: Vec::new(),
            schema,
        }
    }

    fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Convert one node and its descendants, re-validating as we go
    fn cast_node(&mut self, node: &ResultNode) -> ExportResult<()> {
        validate(node)?;
        if !node.sources.is_empty() {
            self.emit_node(node)?;
        }
        for child in &node.children {
            self.cast_node(child)?;
        }
        Ok(())
    }

    /// Emit triples for every subject of a node
    fn emit_node(&mut self, node: &ResultNode) -> ExportResult<()> {
        for entry in &node.sources {
            if node.directives.ignore_result {
                continue;
            }
            if node.is_internal {
                self.emit_aggregate(node, entry)?;
                continue;
            }
            match entry.shape() {
                ResultShape::Count(count) => self.emit_count(node, entry.uid, count),
                ResultShape::Relation(targets) => self.emit_relation(node, entry.uid, targets),
                ResultShape::Scalars(values) => self.emit_scalars(node, entry.uid, values),
                ResultShape::None => {}
            }
        }
        Ok(())
    }

    /// Internal (aggregate/variable) nodes emit their precomputed value.
    ///
    /// An aggregate that fails to encode breaks an input invariant and
    /// aborts the batch, unlike scalar-list conversions which skip.
    fn emit_aggregate(&mut self, node: &ResultNode, entry: &SourceEntry) -> ExportResult<()> {
        if node.directives.expand.is_some() {
            // Expansion results are rendered by sibling nodes.
            return Ok(());
        }
        let Some(value) = node.computed.get(&entry.uid) else {
            return Ok(());
        };
        let object = value.canonical_bytes()?;
        self.write_rdf(entry.uid, node.aggregate_field_name().as_bytes(), &object);
        Ok(())
    }

    fn emit_count(&mut self, node: &ResultNode, subject: u64, count: u64) {
        self.write_rdf(
            subject,
            node.count_field_name().as_bytes(),
            count.to_string().as_bytes(),
        );
    }

    fn emit_relation(&mut self, node: &ResultNode, subject: u64, targets: &[u64]) {
        for &target in targets {
            if !node.filtered_targets.contains(&target) {
                // This target was removed by filtering.
                continue;
            }
            let object = wrap_ref(format_uid(target).as_bytes());
            self.write_rdf(subject, node.field_name().as_bytes(), &object);
        }
    }

    fn emit_scalars(&mut self, node: &ResultNode, subject: u64, values: &[RawValue]) {
        if node.attribute == UID_ATTR {
            // The reflexive uid field names the subject itself, once per
            // subject, independent of the scalar row's content.
            let object = wrap_ref(format_uid(subject).as_bytes());
            self.write_rdf(subject, node.attribute.as_bytes(), &object);
            return;
        }
        for raw in values {
            let typed = match self.schema.convert_with_best_effort(raw, &node.attribute) {
                Ok(typed) => typed,
                Err(err) => {
                    debug!(attribute = %node.attribute, %err, "skipping unconvertible scalar");
                    continue;
                }
            };
            let is_ref = typed.is_uid();
            let object = match typed.canonical_bytes() {
                Ok(bytes) => bytes,
                Err(err) => {
                    debug!(attribute = %node.attribute, %err, "skipping unencodable scalar");
                    continue;
                }
            };
            if is_ref {
                self.write_rdf(subject, node.field_name().as_bytes(), &wrap_ref(&object));
            } else {
                self.write_rdf(subject, node.field_name().as_bytes(), &object);
            }
        }
    }

    /// Write one triple line: `<0xHEX> <predicate> object .\n`
    fn write_rdf(&mut self, subject: u64, predicate: &[u8], object: &[u8]) {
        self.buf.push(b'<');
        self.buf.extend_from_slice(format_uid(subject).as_bytes());
        self.buf.push(b'>');
        self.buf.push(b' ');
        self.buf.push(b'<');
        self.buf.extend_from_slice(predicate);
        self.buf.push(b'>');
        self.buf.push(b' ');
        self.buf.extend_from_slice(object);
        self.buf.extend_from_slice(b" .\n");
    }
}

/// Lowercase `0x`-prefixed hex, minimal width
fn format_uid(uid: u64) -> String {
    format!("{:#x}", uid)
}

/// Wrap object bytes in angle brackets, marking them a node reference
fn wrap_ref(val: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(val.len() + 2);
    out.push(b'<');
    out.extend_from_slice(val);
    out.push(b'>');
    out
}
