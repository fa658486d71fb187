//! Items and the per-run entity arena

use super::claim::Claim;
use super::ids::{ItemId, PropertyId, StatementGuid};
use std::collections::{BTreeMap, HashMap};

/// Stable handle to one claim: (item, property, position in the property's
/// claim list). Claims are never removed during a run, so positions do not
/// shift.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClaimKey {
    pub item: ItemId,
    pub property: PropertyId,
    pub index: usize,
}

impl ClaimKey {
    pub fn new(item: ItemId, property: PropertyId, index: usize) -> Self {
        Self {
            item,
            property,
            index,
        }
    }
}

impl std::fmt::Display for ClaimKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}#{}", self.item, self.property, self.index)
    }
}

/// A wiki item with its claims grouped by property.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ItemId,
    /// Revision the claims were read at, when known
    pub lastrevid: Option<u64>,
    claims: BTreeMap<PropertyId, Vec<Claim>>,
}

impl Item {
    pub fn new(id: ItemId) -> Self {
        Self {
            id,
            lastrevid: None,
            claims: BTreeMap::new(),
        }
    }

    /// Claims for one property.
    pub fn claims(&self, property: &PropertyId) -> &[Claim] {
        self.claims.get(property).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every claim with its key, grouped by property.
    pub fn all_claims(&self) -> impl Iterator<Item = (ClaimKey, &Claim)> {
        self.claims.iter().flat_map(move |(property, claims)| {
            claims.iter().enumerate().map(move |(index, claim)| {
                (ClaimKey::new(self.id.clone(), property.clone(), index), claim)
            })
        })
    }

    pub fn claim_count(&self) -> usize {
        self.claims.values().map(Vec::len).sum()
    }

    pub fn claim(&self, key: &ClaimKey) -> Option<&Claim> {
        if key.item != self.id {
            return None;
        }
        self.claims.get(&key.property)?.get(key.index)
    }

    pub fn claim_mut(&mut self, key: &ClaimKey) -> Option<&mut Claim> {
        if key.item != self.id {
            return None;
        }
        self.claims.get_mut(&key.property)?.get_mut(key.index)
    }

    /// Append a claim under its property and return its key.
    pub fn push_claim(&mut self, claim: Claim) -> ClaimKey {
        let property = claim.property.clone();
        let claims = self.claims.entry(property.clone()).or_default();
        claims.push(claim);
        ClaimKey::new(self.id.clone(), property, claims.len() - 1)
    }

    /// Scan every claim under every property for a GUID.
    pub fn find_statement(&self, guid: &StatementGuid) -> Option<ClaimKey> {
        self.all_claims()
            .find(|(_, claim)| claim.id.as_deref().is_some_and(|id| guid.matches(id)))
            .map(|(key, _)| key)
    }
}

/// Owns every item loaded during a run.
#[derive(Debug, Default)]
pub struct EntityStore {
    items: HashMap<ItemId, Item>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.contains_key(id)
    }

    pub fn insert(&mut self, item: Item) {
        self.items.insert(item.id.clone(), item);
    }

    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.get(id)
    }

    pub fn get_mut(&mut self, id: &ItemId) -> Option<&mut Item> {
        self.items.get_mut(id)
    }

    pub fn claim(&self, key: &ClaimKey) -> Option<&Claim> {
        self.items.get(&key.item)?.claim(key)
    }

    pub fn claim_mut(&mut self, key: &ClaimKey) -> Option<&mut Claim> {
        self.items.get_mut(&key.item)?.claim_mut(key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
