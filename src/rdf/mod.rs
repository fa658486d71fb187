//! RDF input: Turtle documents read into an in-memory triple graph
//!
//! Parsing is done by sophia. The Wikidata prefixes (`wd:`, `wds:`, `wdt:`,
//! `p:`, `ps:`, `pq:`, `pr:`, `wikibase:`, ...) and `wikidatabots:` are
//! prepended as `@prefix` lines, so patch documents may use them without
//! declaring them.

mod graph;
mod parser;
pub mod vocab;

pub use graph::{Graph, Literal, Term, Triple};
pub use parser::{parse, prefix_header};

use thiserror::Error;

/// Errors raised while reading an RDF document
#[derive(Debug, Error)]
pub enum RdfError {
    #[error("Turtle syntax error: {0}")]
    Syntax(String),

    #[error("Unsupported term: {0}")]
    Unsupported(String),
}

/// Result type for RDF reading
pub type RdfResult<T> = Result<T, RdfError>;
