//! Common test utilities for patch engine integration tests
//!
//! Builds in-memory wikis seeded with fixture items and runs documents
//! through the engine.

#![allow(dead_code)]

pub mod fixtures;

use std::collections::HashSet;
use std::sync::Arc;
use wdpatch::wiki::{EditRequest, EditResult, WikiResult};
use wdpatch::{
    process_document, FinalizedEdit, Item, ItemId, MemoryWiki, PatchResult, WikiClient, WikiError,
};

/// A wiki holding the fixture items plus an empty Q1.
pub fn seeded_wiki() -> Arc<MemoryWiki> {
    let wiki = MemoryWiki::new();
    wiki.insert_entity(fixtures::shawshank()).expect("insert Q172241");
    wiki.insert_entity(fixtures::batman_returns()).expect("insert Q1292541");
    wiki.insert_entity(fixtures::empty_item("Q1")).expect("insert Q1");
    Arc::new(wiki)
}

/// Run a document through a fresh engine.
pub fn run(wiki: &Arc<MemoryWiki>, document: &str) -> PatchResult<Vec<FinalizedEdit>> {
    process_document(wiki.clone(), document, None)
}

pub fn qid(id: &str) -> ItemId {
    ItemId::parse(id).expect("valid item id")
}

/// Wraps a wiki and answers reads of some items with a `maxlag` error.
pub struct LaggedWiki {
    inner: Arc<MemoryWiki>,
    lagged: HashSet<ItemId>,
}

impl LaggedWiki {
    pub fn new(inner: Arc<MemoryWiki>, lagged: &[&str]) -> Self {
        Self {
            inner,
            lagged: lagged.iter().map(|id| qid(id)).collect(),
        }
    }
}

impl WikiClient for LaggedWiki {
    fn fetch_item(&self, id: &ItemId) -> WikiResult<Item> {
        if self.lagged.contains(id) {
            return Err(WikiError::Api {
                code: "maxlag".to_string(),
                info: "Waiting for a database server: 7 seconds lagged".to_string(),
            });
        }
        self.inner.fetch_item(id)
    }

    fn submit_edit(&self, edit: &EditRequest) -> WikiResult<EditResult> {
        self.inner.submit_edit(edit)
    }

    fn page_text(&self, title: &str) -> WikiResult<Option<String>> {
        self.inner.page_text(title)
    }
}
