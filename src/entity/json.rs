//! Wikibase entity JSON codec
//!
//! Reads the `claims` section of `wbgetentities` responses and writes claims
//! back in the shape `wbeditentity` accepts. Snak hashes and GUIDs read from
//! the wiki are carried through so untouched parts serialize verbatim.

use super::claim::{Claim, Rank, Reference, Snak, SnakGroups, SnakValue};
use super::ids::{ItemId, PropertyId};
use super::item::Item;
use super::value::{QuantityValue, Target, TimeValue, PRECISION_MAX};
use super::{EntityError, EntityResult, SerializationError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
struct WireEntity {
    id: String,
    #[serde(default)]
    lastrevid: Option<u64>,
    #[serde(default)]
    claims: BTreeMap<String, Vec<WireClaim>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireClaim {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    mainsnak: WireSnak,
    #[serde(rename = "type", default = "statement_type")]
    kind: String,
    #[serde(default = "normal_rank")]
    rank: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    qualifiers: BTreeMap<String, Vec<WireSnak>>,
    #[serde(
        rename = "qualifiers-order",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    qualifiers_order: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    references: Vec<WireReference>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireSnak {
    snaktype: String,
    property: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    datavalue: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    datatype: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hash: Option<String>,
    snaks: BTreeMap<String, Vec<WireSnak>>,
    #[serde(rename = "snaks-order", default)]
    snaks_order: Vec<String>,
}

fn statement_type() -> String {
    "statement".to_string()
}

fn normal_rank() -> String {
    "normal".to_string()
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode one entity object (a value of the `entities` map).
pub fn item_from_json(entity: &Value) -> EntityResult<Item> {
    let wire: WireEntity = serde_json::from_value(entity.clone())?;
    let id = ItemId::parse(&wire.id)
        .ok_or_else(|| EntityError::MalformedJson(format!("not an item id: {}", wire.id)))?;

    let mut item = Item::new(id);
    item.lastrevid = wire.lastrevid;
    for (property, claims) in wire.claims {
        let property = parse_property(&property)?;
        for wire_claim in claims {
            let claim = claim_from_wire(&property, wire_claim)?;
            item.push_claim(claim);
        }
    }
    Ok(item)
}

/// Decode a single claim object.
pub fn claim_from_json(value: &Value) -> EntityResult<Claim> {
    let wire: WireClaim = serde_json::from_value(value.clone())?;
    let property = parse_property(&wire.mainsnak.property)?;
    claim_from_wire(&property, wire)
}

fn claim_from_wire(property: &PropertyId, wire: WireClaim) -> EntityResult<Claim> {
    let rank = Rank::from_wiki(&wire.rank)
        .ok_or_else(|| EntityError::MalformedJson(format!("unknown rank: {}", wire.rank)))?;
    let mainsnak = snak_from_wire(wire.mainsnak)?;
    if &mainsnak.property != property {
        return Err(EntityError::MalformedJson(format!(
            "claim {} filed under {} has main snak property {}",
            wire.id.as_deref().unwrap_or("(new)"),
            property,
            mainsnak.property
        )));
    }
    let qualifiers = groups_from_wire(wire.qualifiers, &wire.qualifiers_order)?;
    let references = wire
        .references
        .into_iter()
        .map(|r| {
            Ok(Reference {
                hash: r.hash,
                snaks: groups_from_wire(r.snaks, &r.snaks_order)?,
            })
        })
        .collect::<EntityResult<Vec<_>>>()?;

    Ok(Claim {
        id: wire.id,
        property: property.clone(),
        mainsnak: Some(mainsnak),
        rank,
        qualifiers,
        references,
    })
}

fn groups_from_wire(
    mut map: BTreeMap<String, Vec<WireSnak>>,
    order: &[String],
) -> EntityResult<SnakGroups> {
    let mut groups = SnakGroups::new();
    let mut keys: Vec<String> = order.iter().filter(|k| map.contains_key(*k)).cloned().collect();
    keys.extend(map.keys().filter(|k| !order.contains(*k)).cloned());
    for key in keys {
        for snak in map.remove(&key).unwrap_or_default() {
            groups.push(snak_from_wire(snak)?);
        }
    }
    Ok(groups)
}

fn snak_from_wire(wire: WireSnak) -> EntityResult<Snak> {
    let property = parse_property(&wire.property)?;
    let value = match wire.snaktype.as_str() {
        "somevalue" => SnakValue::SomeValue,
        "novalue" => SnakValue::NoValue,
        "value" => {
            let datavalue = wire.datavalue.ok_or_else(|| {
                EntityError::MalformedJson(format!("value snak on {} without datavalue", property))
            })?;
            SnakValue::Value(target_from_datavalue(&datavalue)?)
        }
        other => {
            return Err(EntityError::MalformedJson(format!("unknown snaktype: {}", other)));
        }
    };
    Ok(Snak {
        property,
        value,
        datatype: wire.datatype,
        hash: wire.hash,
    })
}

fn parse_property(s: &str) -> EntityResult<PropertyId> {
    PropertyId::parse(s)
        .ok_or_else(|| EntityError::MalformedJson(format!("not a property id: {}", s)))
}

/// Decode a `{"type": ..., "value": ...}` datavalue.
pub fn target_from_datavalue(datavalue: &Value) -> EntityResult<Target> {
    let kind = datavalue.get("type").and_then(Value::as_str).unwrap_or_default();
    let value = &datavalue["value"];
    let malformed =
        || EntityError::MalformedJson(format!("malformed {} datavalue: {}", kind, value));

    let target = match kind {
        "string" => Target::String(value.as_str().ok_or_else(malformed)?.to_string()),
        "monolingualtext" => Target::Monolingual {
            text: str_field(value, "text").ok_or_else(malformed)?,
            language: str_field(value, "language").ok_or_else(malformed)?,
        },
        "wikibase-entityid" => {
            let id = entity_id(value).ok_or_else(malformed)?;
            match (ItemId::parse(&id), PropertyId::parse(&id)) {
                (Some(item), _) => Target::Item(item),
                (_, Some(property)) => Target::Property(property),
                // lexemes, forms, senses
                _ => Target::Other(datavalue.clone()),
            }
        }
        "time" => Target::Time(TimeValue {
            time: str_field(value, "time").ok_or_else(malformed)?,
            precision: value["precision"]
                .as_u64()
                .and_then(|p| u8::try_from(p).ok())
                .ok_or_else(malformed)?,
            timezone: int_field(value, "timezone"),
            before: int_field(value, "before"),
            after: int_field(value, "after"),
            calendar_model: str_field(value, "calendarmodel").ok_or_else(malformed)?,
        }),
        "quantity" => Target::Quantity(QuantityValue {
            amount: str_field(value, "amount").ok_or_else(malformed)?,
            unit: str_field(value, "unit").ok_or_else(malformed)?,
            upper_bound: str_field(value, "upperBound"),
            lower_bound: str_field(value, "lowerBound"),
        }),
        _ => Target::Other(datavalue.clone()),
    };
    Ok(target)
}

fn str_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

fn int_field(value: &Value, key: &str) -> i32 {
    value
        .get(key)
        .and_then(Value::as_i64)
        .and_then(|n| i32::try_from(n).ok())
        .unwrap_or(0)
}

fn entity_id(value: &Value) -> Option<String> {
    if let Some(id) = value.get("id").and_then(Value::as_str) {
        return Some(id.to_string());
    }
    let numeric = value.get("numeric-id").and_then(Value::as_u64)?;
    match value.get("entity-type").and_then(Value::as_str)? {
        "item" => Some(format!("Q{}", numeric)),
        "property" => Some(format!("P{}", numeric)),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Serialize a claim in full for `wbeditentity`.
pub fn claim_to_json(claim: &Claim) -> Result<Value, SerializationError> {
    let wire = claim_to_wire(claim)?;
    serde_json::to_value(wire).map_err(|e| SerializationError::Encode {
        claim: describe(claim),
        reason: e.to_string(),
    })
}

fn claim_to_wire(claim: &Claim) -> Result<WireClaim, SerializationError> {
    let mainsnak = claim
        .mainsnak
        .as_ref()
        .ok_or_else(|| SerializationError::MissingValue { claim: describe(claim) })?;

    let (qualifiers, qualifiers_order) = groups_to_wire(&claim.qualifiers, claim)?;
    let references = claim
        .references
        .iter()
        .map(|reference| {
            let (snaks, snaks_order) = groups_to_wire(&reference.snaks, claim)?;
            Ok(WireReference {
                hash: reference.hash.clone(),
                snaks,
                snaks_order,
            })
        })
        .collect::<Result<Vec<_>, SerializationError>>()?;

    Ok(WireClaim {
        id: claim.id.clone(),
        mainsnak: snak_to_wire(mainsnak, claim)?,
        kind: statement_type(),
        rank: claim.rank.as_str().to_string(),
        qualifiers,
        qualifiers_order,
        references,
    })
}

type WireGroups = (BTreeMap<String, Vec<WireSnak>>, Vec<String>);

fn groups_to_wire(groups: &SnakGroups, claim: &Claim) -> Result<WireGroups, SerializationError> {
    let mut map = BTreeMap::new();
    let mut order = Vec::new();
    for (property, snaks) in groups.iter() {
        if snaks.is_empty() {
            continue;
        }
        let wire = snaks
            .iter()
            .map(|snak| snak_to_wire(snak, claim))
            .collect::<Result<Vec<_>, _>>()?;
        order.push(property.to_string());
        map.insert(property.to_string(), wire);
    }
    Ok((map, order))
}

fn snak_to_wire(snak: &Snak, claim: &Claim) -> Result<WireSnak, SerializationError> {
    let (snaktype, datavalue) = match &snak.value {
        SnakValue::Value(target) => ("value", Some(datavalue_to_json(target, claim)?)),
        SnakValue::SomeValue => ("somevalue", None),
        SnakValue::NoValue => ("novalue", None),
    };
    Ok(WireSnak {
        snaktype: snaktype.to_string(),
        property: snak.property.to_string(),
        hash: snak.hash.clone(),
        datavalue,
        datatype: snak.datatype.clone(),
    })
}

fn datavalue_to_json(target: &Target, claim: &Claim) -> Result<Value, SerializationError> {
    let value = match target {
        Target::String(s) => json!(s),
        Target::Monolingual { text, language } => json!({"text": text, "language": language}),
        Target::Item(id) => json!({
            "entity-type": "item",
            "numeric-id": id.numeric_id(),
            "id": id.as_str(),
        }),
        Target::Property(id) => json!({
            "entity-type": "property",
            "numeric-id": id.numeric_id(),
            "id": id.as_str(),
        }),
        Target::Time(t) => {
            if t.precision > PRECISION_MAX {
                return Err(SerializationError::InvalidValue {
                    claim: describe(claim),
                    reason: format!("time precision {} out of range", t.precision),
                });
            }
            json!({
                "time": t.time,
                "timezone": t.timezone,
                "before": t.before,
                "after": t.after,
                "precision": t.precision,
                "calendarmodel": t.calendar_model,
            })
        }
        Target::Quantity(q) => {
            let mut value = json!({"amount": q.amount, "unit": q.unit});
            if let Some(upper) = &q.upper_bound {
                value["upperBound"] = json!(upper);
            }
            if let Some(lower) = &q.lower_bound {
                value["lowerBound"] = json!(lower);
            }
            value
        }
        Target::Other(datavalue) => return Ok(datavalue.clone()),
    };
    Ok(json!({"value": value, "type": target.value_type()}))
}

fn describe(claim: &Claim) -> String {
    match &claim.id {
        Some(id) => format!("{} ({})", id, claim.property),
        None => format!("new {} claim", claim.property),
    }
}
