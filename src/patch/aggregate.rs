//! Change aggregation
//!
//! Collects changed claim slots per item, keeps a change log for each slot and
//! turns the result into one edit request per item.

use crate::entity::{
    json, ClaimKey, EntityStore, ItemId, PropertyId, Rank, SerializationError, SnakValue, Target,
};
use crate::wiki::EditRequest;
use std::collections::HashMap;

/// One recorded change to a claim
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimChange {
    Created { value: Target },
    QualifierAdded { property: PropertyId, value: Target },
    RankChanged { from: Rank, to: Rank },
    ValueChanged { from: Option<SnakValue>, to: Target },
    ReferenceAdded { properties: Vec<PropertyId> },
}

impl std::fmt::Display for ClaimChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClaimChange::Created { value } => write!(f, "+ value {}", value),
            ClaimChange::QualifierAdded { property, value } => {
                write!(f, "+ qualifier {} = {}", property, value)
            }
            ClaimChange::RankChanged { from, to } => write!(f, "~ rank {} -> {}", from, to),
            ClaimChange::ValueChanged { from: Some(from), to } => {
                write!(f, "~ value {} -> {}", from, to)
            }
            ClaimChange::ValueChanged { from: None, to } => write!(f, "~ value (unset) -> {}", to),
            ClaimChange::ReferenceAdded { properties } => {
                let names: Vec<_> = properties.iter().map(|p| p.as_str()).collect();
                write!(f, "+ reference {}", names.join(", "))
            }
        }
    }
}

/// A changed claim slot and its change log
#[derive(Debug, Clone, PartialEq)]
pub struct ChangedClaim {
    pub key: ClaimKey,
    /// Wiki GUID, `None` for claims created in this run
    pub guid: Option<String>,
    pub changes: Vec<ClaimChange>,
}

/// Per-item pending edits, in first-change order
#[derive(Debug, Clone, Default)]
struct PendingEdit {
    slots: Vec<ClaimKey>,
    changes: HashMap<ClaimKey, Vec<ClaimChange>>,
}

/// The outcome of finalizing one item
#[derive(Debug, Clone)]
pub struct FinalizedEdit {
    pub item: ItemId,
    pub summary: Option<String>,
    pub claims: Vec<ChangedClaim>,
    /// The request to submit, or why the item's claims could not be written
    pub request: Result<EditRequest, SerializationError>,
}

/// Accumulates changes for every item touched by a run.
#[derive(Debug, Default)]
pub struct ChangeAggregator {
    order: Vec<ItemId>,
    pending: HashMap<ItemId, PendingEdit>,
    summaries: HashMap<ItemId, String>,
    default_summary: Option<String>,
}

impl ChangeAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Summary for items that do not carry their own.
    pub fn with_default_summary(mut self, summary: Option<String>) -> Self {
        self.default_summary = summary;
        self
    }

    /// Record a change to a claim slot.
    ///
    /// The slot joins its item's edit set the first time; later changes only
    /// extend its log.
    pub fn record(&mut self, key: &ClaimKey, change: ClaimChange) {
        let item = &key.item;
        if !self.pending.contains_key(item) {
            self.order.push(item.clone());
        }
        let pending = self.pending.entry(item.clone()).or_default();
        match pending.changes.get_mut(key) {
            Some(log) => log.push(change),
            None => {
                pending.slots.push(key.clone());
                pending.changes.insert(key.clone(), vec![change]);
            }
        }
    }

    /// Set an item's edit summary. The last one recorded wins.
    pub fn set_summary(&mut self, item: &ItemId, summary: impl Into<String>) {
        self.summaries.insert(item.clone(), summary.into());
    }

    pub fn summary(&self, item: &ItemId) -> Option<&str> {
        self.summaries
            .get(item)
            .or(self.default_summary.as_ref())
            .map(String::as_str)
    }

    /// Items with at least one changed claim, in first-change order.
    pub fn changed_items(&self) -> &[ItemId] {
        &self.order
    }

    /// Changed slots of an item, in first-change order.
    pub fn changed_slots(&self, item: &ItemId) -> &[ClaimKey] {
        self.pending
            .get(item)
            .map(|p| p.slots.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Serialize every changed claim, one edit per item.
    pub fn finalize(&self, store: &EntityStore) -> Vec<FinalizedEdit> {
        self.order
            .iter()
            .filter_map(|item| {
                let pending = self.pending.get(item)?;
                Some(self.finalize_item(item, pending, store))
            })
            .collect()
    }

    fn finalize_item(
        &self,
        item: &ItemId,
        pending: &PendingEdit,
        store: &EntityStore,
    ) -> FinalizedEdit {
        let summary = self.summary(item).map(str::to_string);
        let claims = pending
            .slots
            .iter()
            .map(|key| ChangedClaim {
                key: key.clone(),
                guid: store.claim(key).and_then(|c| c.id.clone()),
                changes: pending.changes.get(key).cloned().unwrap_or_default(),
            })
            .collect();

        let request = pending
            .slots
            .iter()
            .map(|key| {
                let claim = store.claim(key).ok_or_else(|| SerializationError::MissingClaim {
                    claim: key.to_string(),
                })?;
                json::claim_to_json(claim)
            })
            .collect::<Result<Vec<_>, _>>()
            .map(|claims| EditRequest {
                item: item.clone(),
                claims,
                summary: summary.clone(),
                base_revision: store.get(item).and_then(|i| i.lastrevid),
            });

        FinalizedEdit {
            item: item.clone(),
            summary,
            claims,
            request,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Claim, Item};

    fn q(id: &str) -> ItemId {
        ItemId::parse(id).unwrap()
    }

    fn p(id: &str) -> PropertyId {
        PropertyId::parse(id).unwrap()
    }

    fn store_with(claims: &[(&str, Claim)]) -> (EntityStore, Vec<ClaimKey>) {
        let mut store = EntityStore::new();
        let mut keys = Vec::new();
        for (item, claim) in claims {
            let id = q(item);
            if !store.contains(&id) {
                store.insert(Item::new(id.clone()));
            }
            keys.push(store.get_mut(&id).unwrap().push_claim(claim.clone()));
        }
        (store, keys)
    }

    #[test]
    fn slots_dedupe_and_keep_first_change_order() {
        let (store, keys) = store_with(&[
            ("Q2", Claim::new(p("P31"), Target::String("a".into()))),
            ("Q1", Claim::new(p("P31"), Target::String("b".into()))),
            ("Q2", Claim::new(p("P17"), Target::String("c".into()))),
        ]);
        let mut aggregator = ChangeAggregator::new();
        aggregator.record(&keys[0], ClaimChange::Created { value: Target::String("a".into()) });
        aggregator.record(&keys[1], ClaimChange::Created { value: Target::String("b".into()) });
        aggregator.record(
            &keys[0],
            ClaimChange::QualifierAdded {
                property: p("P642"),
                value: Target::String("x".into()),
            },
        );
        aggregator.record(&keys[2], ClaimChange::RankChanged { from: Rank::Normal, to: Rank::Preferred });

        assert_eq!(aggregator.changed_items(), &[q("Q2"), q("Q1")]);
        assert_eq!(aggregator.changed_slots(&q("Q2")), &[keys[0].clone(), keys[2].clone()]);

        let edits = aggregator.finalize(&store);
        assert_eq!(edits.len(), 2);
        assert_eq!(edits[0].item, q("Q2"));
        assert_eq!(edits[0].claims[0].changes.len(), 2);
        let request = edits[0].request.as_ref().unwrap();
        assert_eq!(request.claims.len(), 2);
    }

    #[test]
    fn summaries_last_wins_and_default_applies() {
        let (store, keys) = store_with(&[
            ("Q1", Claim::new(p("P31"), Target::String("a".into()))),
            ("Q2", Claim::new(p("P31"), Target::String("b".into()))),
        ]);
        let mut aggregator = ChangeAggregator::new().with_default_summary(Some("batch".into()));
        aggregator.record(&keys[0], ClaimChange::Created { value: Target::String("a".into()) });
        aggregator.record(&keys[1], ClaimChange::Created { value: Target::String("b".into()) });
        aggregator.set_summary(&q("Q1"), "first");
        aggregator.set_summary(&q("Q1"), "second");
        aggregator.set_summary(&q("Q3"), "never emitted");

        let edits = aggregator.finalize(&store);
        assert_eq!(edits.len(), 2);
        assert_eq!(edits[0].summary.as_deref(), Some("second"));
        assert_eq!(edits[1].summary.as_deref(), Some("batch"));
    }

    #[test]
    fn incomplete_claims_fail_only_their_item() {
        let (store, keys) = store_with(&[
            ("Q1", Claim::empty(p("P31"))),
            ("Q2", Claim::new(p("P31"), Target::String("b".into()))),
        ]);
        let mut aggregator = ChangeAggregator::new();
        aggregator.record(&keys[0], ClaimChange::RankChanged { from: Rank::Normal, to: Rank::Deprecated });
        aggregator.record(&keys[1], ClaimChange::Created { value: Target::String("b".into()) });

        let edits = aggregator.finalize(&store);
        assert!(matches!(edits[0].request, Err(SerializationError::MissingValue { .. })));
        assert!(edits[1].request.is_ok());
    }

    #[test]
    fn no_changes_no_edits() {
        let aggregator = ChangeAggregator::new();
        assert!(aggregator.is_empty());
        assert!(aggregator.finalize(&EntityStore::new()).is_empty());
    }
}
