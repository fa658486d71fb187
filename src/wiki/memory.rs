//! In-memory wiki
//!
//! Holds items as entity JSON and applies `wbeditentity` claim payloads the way
//! the wiki does: a claim with an `id` replaces the stored claim with that id,
//! a claim without one is appended under a freshly generated GUID.

use super::traits::{EditRequest, EditResult, WikiClient, WikiError, WikiResult};
use crate::entity::{json, Item, ItemId};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Debug, Default)]
struct State {
    entities: HashMap<ItemId, Value>,
    fetches: Vec<ItemId>,
    edits: Vec<EditRequest>,
    rejected: HashSet<ItemId>,
    pages: HashMap<String, String>,
}

/// A `WikiClient` backed by a map of entity documents.
#[derive(Debug, Default)]
pub struct MemoryWiki {
    state: Mutex<State>,
}

impl MemoryWiki {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an entity document (`{"id": "Q..", "claims": {...}}`).
    pub fn insert_entity(&self, entity: Value) -> WikiResult<()> {
        let id = entity["id"]
            .as_str()
            .and_then(ItemId::parse)
            .ok_or_else(|| WikiError::Malformed(format!("entity without item id: {}", entity)))?;
        let mut entity = entity;
        if entity.get("lastrevid").is_none() {
            entity["lastrevid"] = json!(1);
        }
        self.state()?.entities.insert(id, entity);
        Ok(())
    }

    /// Add or replace a wiki page's plain text.
    pub fn insert_page(&self, title: impl Into<String>, text: impl Into<String>) -> WikiResult<()> {
        self.state()?.pages.insert(title.into(), text.into());
        Ok(())
    }

    /// Make every edit to `id` fail with a permission error.
    pub fn reject_edits_to(&self, id: ItemId) -> WikiResult<()> {
        self.state()?.rejected.insert(id);
        Ok(())
    }

    /// Current entity document.
    pub fn entity(&self, id: &ItemId) -> Option<Value> {
        self.state().ok()?.entities.get(id).cloned()
    }

    /// Every accepted edit, in submission order.
    pub fn edits(&self) -> Vec<EditRequest> {
        self.state().map(|s| s.edits.clone()).unwrap_or_default()
    }

    /// Every `fetch_item` call, in order.
    pub fn fetches(&self) -> Vec<ItemId> {
        self.state().map(|s| s.fetches.clone()).unwrap_or_default()
    }

    fn state(&self) -> WikiResult<std::sync::MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| WikiError::Malformed("wiki state lock poisoned".to_string()))
    }
}

impl WikiClient for MemoryWiki {
    fn fetch_item(&self, id: &ItemId) -> WikiResult<Item> {
        let mut state = self.state()?;
        state.fetches.push(id.clone());
        let entity = state
            .entities
            .get(id)
            .ok_or_else(|| WikiError::NotFound(id.clone()))?;
        Ok(json::item_from_json(entity)?)
    }

    fn submit_edit(&self, edit: &EditRequest) -> WikiResult<EditResult> {
        let mut state = self.state()?;
        if state.rejected.contains(&edit.item) {
            return Err(WikiError::Api {
                code: "permissiondenied".to_string(),
                info: format!("You do not have permission to edit {}", edit.item),
            });
        }
        let entity = state
            .entities
            .get_mut(&edit.item)
            .ok_or_else(|| WikiError::NotFound(edit.item.clone()))?;

        let revision = entity["lastrevid"].as_u64().unwrap_or(0);
        if let Some(base) = edit.base_revision {
            if base != revision {
                return Err(WikiError::Api {
                    code: "editconflict".to_string(),
                    info: format!("Edit conflict on {}", edit.item),
                });
            }
        }

        for claim in &edit.claims {
            apply_claim(entity, &edit.item, claim)?;
        }
        let revision = revision + 1;
        entity["lastrevid"] = json!(revision);
        state.edits.push(edit.clone());

        Ok(EditResult {
            item: edit.item.clone(),
            revision: Some(revision),
            nochange: false,
        })
    }

    fn page_text(&self, title: &str) -> WikiResult<Option<String>> {
        Ok(self.state()?.pages.get(title).cloned())
    }
}

fn apply_claim(entity: &mut Value, item: &ItemId, claim: &Value) -> WikiResult<()> {
    let property = claim["mainsnak"]["property"]
        .as_str()
        .ok_or_else(|| WikiError::Malformed(format!("claim without property: {}", claim)))?
        .to_string();
    if !entity["claims"].is_object() {
        entity["claims"] = json!({});
    }
    let claims = entity["claims"]
        .as_object_mut()
        .ok_or_else(|| WikiError::Malformed("claims is not an object".to_string()))?
        .entry(property)
        .or_insert_with(|| json!([]));
    let list = claims
        .as_array_mut()
        .ok_or_else(|| WikiError::Malformed("claim list is not an array".to_string()))?;

    match claim["id"].as_str() {
        Some(id) => {
            let slot = list
                .iter_mut()
                .find(|existing| existing["id"].as_str() == Some(id))
                .ok_or_else(|| WikiError::Api {
                    code: "no-such-claim".to_string(),
                    info: format!("Claim {} not found on {}", id, item),
                })?;
            *slot = claim.clone();
        }
        None => {
            let mut claim = claim.clone();
            let guid = uuid::Uuid::new_v4().to_string().to_uppercase();
            claim["id"] = json!(format!("{}${}", item, guid));
            list.push(claim);
        }
    }
    Ok(())
}
