//! Idempotent claim mutations
//!
//! Every operation reports whether it changed anything. Applying the same
//! operation twice leaves the second call a no-op.

use super::{PatchError, PatchResult};
use crate::entity::{Claim, ClaimKey, Item, PropertyId, Rank, Reference, Snak, SnakValue, Target};

/// Append a claim unless one with an equal value exists under the property.
///
/// Returns whether a claim was added, and the key of the matching or new claim.
pub fn append_claim_target(
    item: &mut Item,
    property: &PropertyId,
    target: &Target,
) -> (bool, ClaimKey) {
    let existing = item
        .claims(property)
        .iter()
        .position(|claim| claim.target_equals(target));
    match existing {
        Some(index) => (false, ClaimKey::new(item.id.clone(), property.clone(), index)),
        None => {
            let key = item.push_claim(Claim::new(property.clone(), target.clone()));
            (true, key)
        }
    }
}

/// Append a qualifier unless an equal one exists for the property.
///
/// Returns whether it was added and its index within the property's group.
pub fn append_qualifier(
    claim: &mut Claim,
    property: &PropertyId,
    target: &Target,
) -> (bool, usize) {
    let existing = claim
        .qualifiers
        .get(property)
        .iter()
        .position(|snak| snak.same_target(target));
    match existing {
        Some(index) => (false, index),
        None => (true, claim.qualifiers.push(Snak::new(property.clone(), target.clone()))),
    }
}

pub fn set_rank(claim: &mut Claim, rank: Rank) -> bool {
    if claim.rank == rank {
        return false;
    }
    claim.rank = rank;
    true
}

/// Replace the main value of a claim.
///
/// The property must be the claim's own. The property datatype survives the
/// replacement; the stale snak hash does not.
pub fn set_statement_value(
    claim: &mut Claim,
    property: &PropertyId,
    target: &Target,
) -> PatchResult<bool> {
    if &claim.property != property {
        return Err(PatchError::PropertyMismatch {
            statement: claim.id.clone().unwrap_or_else(|| "(new claim)".to_string()),
            expected: claim.property.clone(),
            found: property.clone(),
        });
    }
    if claim.target_equals(target) {
        return Ok(false);
    }
    let datatype = claim.mainsnak.as_ref().and_then(|snak| snak.datatype.clone());
    claim.mainsnak = Some(Snak {
        property: property.clone(),
        value: SnakValue::Value(target.clone()),
        datatype,
        hash: None,
    });
    Ok(true)
}

/// Append a reference block unless one with the same content exists.
pub fn add_reference(claim: &mut Claim, reference: Reference) -> bool {
    if reference.snaks.is_empty() {
        return false;
    }
    if claim
        .references
        .iter()
        .any(|existing| existing.snaks.same_content(&reference.snaks))
    {
        return false;
    }
    claim.references.push(reference);
    true
}
