//! Entity reference resolution
//!
//! Turns IRIs into typed references and `wds:` statement IRIs into claim slot
//! keys, loading items from the wiki on demand.

mod reference;
mod resolver;

pub use reference::{EntityRef, ValueForm, Vocab};
pub use resolver::Resolver;

use crate::entity::{ClaimKey, ItemId};
use crate::wiki::WikiError;
use thiserror::Error;

/// Errors raised while resolving references
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Unresolvable reference: <{0}>")]
    Unresolvable(String),

    #[error("Can't resolve statement GUID: {0}")]
    StatementNotFound(String),

    #[error("Item {0} was not loaded")]
    ItemNotLoaded(ItemId),

    #[error("No claim at {0}")]
    StaleKey(ClaimKey),

    #[error("Wiki error: {0}")]
    Wiki(#[from] WikiError),
}

/// Result type for resolution
pub type ResolveResult<T> = Result<T, ResolveError>;
