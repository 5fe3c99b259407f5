//! rdfcast
//!
//! Converts hierarchical graph query results into the legacy triple
//! exchange format: one line per fact, `<subject> <predicate> <object> .`.
//!
//! The input is a tree of per-predicate [`ResultNode`]s as produced by a
//! graph query engine. Conversion is a single synchronous pass:
//!
//! 1. **Validation** — result shapes the triple format cannot represent
//!    (group-by, uid counts, normalize, ignore-reflex, password checks,
//!    facets) are rejected before any output is written.
//! 2. **Tree walk** — depth-first over each tree's children; the root
//!    itself is never emitted.
//! 3. **Emission** — each subject is classified once into a
//!    [`ResultShape`] (count, relation, scalar row, or nothing) and
//!    encoded accordingly.
//!
//! The whole batch either converts or fails; no partial output is
//! returned. Individual malformed scalar values are skipped rather than
//! failing the batch.
//!
//! # Example
//!
//! ```rust
//! use rdfcast::{export_rdf, ResultNode, Schema, SourceEntry};
//! use rdfcast::value::RawValue;
//!
//! let mut name = ResultNode::new("name");
//! name.sources = vec![SourceEntry::with_values(0x1, vec![RawValue::from("Alice")])];
//!
//! let mut root = ResultNode::new("me");
//! root.children = vec![name];
//!
//! let out = export_rdf(&[root], &Schema::new()).unwrap();
//! assert_eq!(out, b"<0x1> <name> Alice .\n".to_vec());
//! ```

#![warn(clippy::all)]

pub mod rdf;
pub mod result;
pub mod value;

pub use rdf::{export_rdf, ExportError, ExportResult, UnsupportedFeature};
pub use result::{Directives, ResultNode, ResultShape, SourceEntry};
pub use value::{RawValue, ScalarType, Schema, TypedValue, ValueError};
