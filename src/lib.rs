//! wdpatch: apply RDF patches to Wikidata claims
//!
//! Reads a Turtle document describing desired statements, qualifiers, ranks
//! and references, resolves every triple against the live wiki entities and
//! emits the minimal set of claim edits, one transaction per item.
//!
//! # Pipeline
//!
//! - **rdf**: Turtle reader with the Wikidata prefixes predeclared
//! - **resolve**: IRIs to typed entity references; statement GUID lookup
//! - **patch**: triple classification, idempotent claim mutations and
//!   per-item change aggregation
//! - **commit**: dry-run diff or `wbeditentity` submission through a
//!   [`WikiClient`]
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use wdpatch::{MemoryWiki, PatchEngine};
//!
//! let wiki = Arc::new(MemoryWiki::new());
//! wiki.insert_entity(serde_json::json!({"id": "Q1", "claims": {}})).unwrap();
//!
//! let mut engine = PatchEngine::new(wiki);
//! engine.process_document("wd:Q1 wdt:P31 wd:Q5 .").unwrap();
//! let edits = engine.finalize();
//! assert_eq!(edits.len(), 1);
//! ```

pub mod commit;
pub mod config;
pub mod entity;
pub mod patch;
pub mod rdf;
pub mod resolve;
pub mod wiki;

pub use commit::{
    page_blocklist, CommitDriver, CommitError, CommitFailure, CommitMode, CommitReport,
};
pub use config::{Config, ConfigError};
pub use entity::{
    Claim, ClaimKey, EntityStore, Item, ItemId, PropertyId, Rank, SerializationError,
    StatementGuid, Target,
};
pub use patch::{process_document, FinalizedEdit, PatchEngine, PatchError, PatchResult};
pub use rdf::{Graph, RdfError};
pub use resolve::{EntityRef, ResolveError, Resolver};
pub use wiki::{ApiClient, EditRequest, MemoryWiki, WikiClient, WikiError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
