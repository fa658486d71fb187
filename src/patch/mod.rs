//! The patch pipeline: classify triples, mutate claims, aggregate edits

pub mod aggregate;
pub mod classify;
mod engine;
pub mod mutate;

pub use aggregate::{ChangeAggregator, ChangedClaim, ClaimChange, FinalizedEdit};
pub use classify::{classify, classify_statement, Operation, ResolvedTerm, StatementOp};
pub use engine::{process_document, PatchEngine};

use crate::entity::{EntityError, PropertyId};
use crate::rdf::RdfError;
use crate::resolve::ResolveError;
use thiserror::Error;

/// Errors raised while applying a patch
#[derive(Debug, Error)]
pub enum PatchError {
    #[error("RDF error: {0}")]
    Rdf(#[from] RdfError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("Invalid value: {0}")]
    Value(#[from] EntityError),

    #[error("Invalid rank: {0}")]
    InvalidRank(String),

    #[error("Statement node _:{node} has no ps:{property} value")]
    MissingStatementValue { property: PropertyId, node: String },

    #[error("Can't convert {0} to a claim value")]
    InvalidTarget(String),

    #[error("Statement {statement} is a {expected} claim, not {found}")]
    PropertyMismatch {
        statement: String,
        expected: PropertyId,
        found: PropertyId,
    },

    #[error("Invalid reference triple: {0}")]
    InvalidReference(String),
}

impl PatchError {
    /// Transient wiki failures only cost the triple that hit them; every
    /// other error means the input itself is unusable.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, PatchError::Resolve(ResolveError::Wiki(e)) if e.is_transient())
    }
}

/// Result type for patch operations
pub type PatchResult<T> = Result<T, PatchError>;
