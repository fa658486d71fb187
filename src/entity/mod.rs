//! Wikibase entity model: identifiers, values, claims and items

mod claim;
mod ids;
mod item;
pub mod json;
pub mod value;

pub use claim::{Claim, Rank, Reference, Snak, SnakGroups, SnakValue};
pub use ids::{ItemId, PropertyId, StatementGuid};
pub use item::{ClaimKey, EntityStore, Item};
pub use value::{QuantityValue, Target, TimeValue};

use thiserror::Error;

/// Errors raised while building entity values
#[derive(Debug, Error)]
pub enum EntityError {
    #[error("Unsupported literal datatype <{datatype}> for {lexical:?}")]
    UnsupportedLiteral { datatype: String, lexical: String },

    #[error("Invalid <{datatype}> literal: {lexical:?}")]
    InvalidLiteral { datatype: String, lexical: String },

    #[error("Malformed entity JSON: {0}")]
    MalformedJson(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for entity operations
pub type EntityResult<T> = Result<T, EntityError>;

/// A changed claim that cannot be written back to the wiki
#[derive(Debug, Clone, Error)]
pub enum SerializationError {
    #[error("Claim {claim} has no value")]
    MissingValue { claim: String },

    #[error("Claim {claim} has an invalid value: {reason}")]
    InvalidValue { claim: String, reason: String },

    #[error("Claim {claim} could not be encoded: {reason}")]
    Encode { claim: String, reason: String },

    #[error("Changed claim {claim} is not loaded")]
    MissingClaim { claim: String },
}
