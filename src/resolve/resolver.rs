//! Per-run resolver: IRI cache, lazy item loading, statement lookup

use super::reference::EntityRef;
use super::{ResolveError, ResolveResult};
use crate::entity::{Claim, ClaimKey, EntityStore, Item, ItemId, StatementGuid};
use crate::wiki::WikiClient;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Resolves IRIs against the wiki for the lifetime of one run.
///
/// Owns the entity arena. Every item is fetched at most once; statement
/// lookups and IRI parses are memoized by raw IRI.
pub struct Resolver {
    wiki: Arc<dyn WikiClient>,
    refs: HashMap<String, Option<EntityRef>>,
    statements: HashMap<String, ClaimKey>,
    store: EntityStore,
}

impl Resolver {
    pub fn new(wiki: Arc<dyn WikiClient>) -> Self {
        Self {
            wiki,
            refs: HashMap::new(),
            statements: HashMap::new(),
            store: EntityStore::new(),
        }
    }

    /// Parse an IRI, memoized. `None` means a plain, non-Wikidata IRI.
    pub fn entity_ref(&mut self, iri: &str) -> ResolveResult<Option<EntityRef>> {
        if let Some(cached) = self.refs.get(iri) {
            return Ok(cached.clone());
        }
        let resolved = EntityRef::parse(iri)?;
        self.refs.insert(iri.to_string(), resolved.clone());
        Ok(resolved)
    }

    /// Make sure an item is in the arena, fetching it on first use.
    pub fn load_item(&mut self, id: &ItemId) -> ResolveResult<&mut Item> {
        if !self.store.contains(id) {
            debug!("Load item: {}", id);
            let item = self.wiki.fetch_item(id)?;
            self.store.insert(item);
        }
        self.store
            .get_mut(id)
            .ok_or_else(|| ResolveError::ItemNotLoaded(id.clone()))
    }

    /// Find the claim a `wds:` IRI names.
    ///
    /// Loads the owning item and scans every claim under every property.
    pub fn resolve_statement(
        &mut self,
        iri: &str,
        guid: &StatementGuid,
    ) -> ResolveResult<ClaimKey> {
        if let Some(key) = self.statements.get(iri) {
            return Ok(key.clone());
        }
        let item = self.load_item(guid.item())?;
        let key = item
            .find_statement(guid)
            .ok_or_else(|| ResolveError::StatementNotFound(guid.to_string()))?;
        debug!("Resolved statement {} to {}", guid, key);
        self.statements.insert(iri.to_string(), key.clone());
        Ok(key)
    }

    pub fn claim(&self, key: &ClaimKey) -> ResolveResult<&Claim> {
        self.store
            .claim(key)
            .ok_or_else(|| ResolveError::StaleKey(key.clone()))
    }

    pub fn claim_mut(&mut self, key: &ClaimKey) -> ResolveResult<&mut Claim> {
        self.store
            .claim_mut(key)
            .ok_or_else(|| ResolveError::StaleKey(key.clone()))
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }
}
