//! Triple (RDF line) export
//!
//! This module is the conversion core: upfront compatibility validation
//! of each result tree, a depth-first walk of its children, and the
//! per-subject triple emitter.

mod export;
mod validate;

pub use export::{export_rdf, ExportError, ExportResult};
pub use validate::{validate, UnsupportedFeature};
