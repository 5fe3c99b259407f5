//! The query-result tree consumed by the exporter

mod node;
mod shape;

pub use node::{Directives, ResultNode, SourceEntry, UID_ATTR};
pub use shape::ResultShape;
