//! Wiki collaborator trait definitions

use crate::entity::{EntityError, Item, ItemId};
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while talking to the wiki
#[derive(Debug, Error)]
pub enum WikiError {
    /// Transport failure or unreadable response inside the MediaWiki client
    #[error("MediaWiki error: {0}")]
    MediaWiki(String),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error {code}: {info}")]
    Api { code: String, info: String },

    #[error("Item not found: {0}")]
    NotFound(ItemId),

    #[error("Login failed: {0}")]
    Login(String),

    #[error("Malformed API response: {0}")]
    Malformed(String),

    #[error("Entity error: {0}")]
    Entity(#[from] EntityError),
}

impl WikiError {
    /// Whether retrying the same request later could succeed.
    ///
    /// Network failures, replication lag, edit conflicts and rate limits are
    /// transient; permission, token and not-found errors are not.
    pub fn is_transient(&self) -> bool {
        match self {
            WikiError::MediaWiki(_) => true,
            WikiError::Api { code, .. } => {
                matches!(code.as_str(), "maxlag" | "editconflict" | "ratelimited" | "readonly")
            }
            _ => false,
        }
    }
}

/// Result type for wiki operations
pub type WikiResult<T> = Result<T, WikiError>;

/// One item's edit transaction: the full JSON of every changed claim.
#[derive(Debug, Clone, PartialEq)]
pub struct EditRequest {
    pub item: ItemId,
    /// Serialized claims in `wbeditentity` form
    pub claims: Vec<Value>,
    pub summary: Option<String>,
    /// Revision the claims were read at, sent as `baserevid`
    pub base_revision: Option<u64>,
}

impl EditRequest {
    /// The `data` parameter of `wbeditentity`.
    pub fn data(&self) -> Value {
        serde_json::json!({ "claims": self.claims })
    }
}

/// Outcome of an accepted edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditResult {
    pub item: ItemId,
    pub revision: Option<u64>,
    /// The wiki accepted the edit but nothing changed
    pub nochange: bool,
}

/// The wiki as seen by the patch engine.
///
/// Implementations must be thread-safe (Send + Sync) so commits can later be
/// partitioned by item across threads.
pub trait WikiClient: Send + Sync {
    /// Load an item with its full claim set. A missing item is an error.
    fn fetch_item(&self, id: &ItemId) -> WikiResult<Item>;

    /// Submit one item's edit transaction.
    fn submit_edit(&self, edit: &EditRequest) -> WikiResult<EditResult>;

    /// Plain text of a wiki page, `None` if the page does not exist.
    fn page_text(&self, title: &str) -> WikiResult<Option<String>>;
}
