//! Wiki access: the collaborator trait plus HTTP and in-memory implementations

mod api;
mod memory;
mod traits;

pub use api::{ApiClient, WIKIDATA_API};
pub use memory::MemoryWiki;
pub use traits::{EditRequest, EditResult, WikiClient, WikiError, WikiResult};
