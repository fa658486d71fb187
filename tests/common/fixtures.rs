//! Entity documents for integration tests
//!
//! Trimmed copies of real Wikidata items: The Shawshank Redemption (Q172241)
//! and Batman Returns (Q1292541, deprecated TMDb id).

use serde_json::{json, Value};

pub const SHAWSHANK: &str = "Q172241";
pub const BATMAN_RETURNS: &str = "Q1292541";

/// P161 (cast member) Morgan Freeman, qualifier P4633 'Ellis Boyd "Red" Redding'
pub const RED_STATEMENT: &str = "q172241-E0C7392E-5020-4DC1-8520-EEBF57C3AB66";
pub const RED_GUID: &str = "q172241$E0C7392E-5020-4DC1-8520-EEBF57C3AB66";

/// P161 (cast member) Tim Robbins, qualifier P4633 "Andy Dufresne"
pub const ANDY_STATEMENT: &str = "q172241-91B6C9F4-2F78-4577-9726-6E9D8D76B486";

/// P4947 (TMDb movie ID) "278", normal rank
pub const TMDB_STATEMENT: &str = "Q172241-6B571F20-7732-47E1-86B2-1DFA6D0A15F5";
pub const TMDB_GUID: &str = "Q172241$6B571F20-7732-47E1-86B2-1DFA6D0A15F5";

fn string_snak(property: &str, value: &str) -> Value {
    json!({
        "snaktype": "value",
        "property": property,
        "datavalue": {"value": value, "type": "string"},
        "datatype": "string"
    })
}

fn item_snak(property: &str, numeric_id: u64) -> Value {
    json!({
        "snaktype": "value",
        "property": property,
        "datavalue": {
            "value": {"entity-type": "item", "numeric-id": numeric_id, "id": format!("Q{}", numeric_id)},
            "type": "wikibase-entityid"
        },
        "datatype": "wikibase-item"
    })
}

fn cast_member(guid: &str, actor: u64, character: &str) -> Value {
    json!({
        "mainsnak": item_snak("P161", actor),
        "type": "statement",
        "qualifiers": {"P4633": [string_snak("P4633", character)]},
        "qualifiers-order": ["P4633"],
        "id": guid,
        "rank": "normal"
    })
}

pub fn shawshank() -> Value {
    json!({
        "type": "item",
        "id": SHAWSHANK,
        "lastrevid": 1000,
        "claims": {
            "P31": [{
                "mainsnak": item_snak("P31", 11424),
                "type": "statement",
                "id": "Q172241$96DBF1E6-7C60-4A28-9E3F-0B0E4F6A7E24",
                "rank": "normal"
            }],
            "P161": [
                cast_member(RED_GUID, 48337, "Ellis Boyd \"Red\" Redding"),
                cast_member("q172241$91B6C9F4-2F78-4577-9726-6E9D8D76B486", 2263, "Andy Dufresne"),
            ],
            "P4947": [{
                "mainsnak": {
                    "snaktype": "value",
                    "property": "P4947",
                    "hash": "6e6b4a1e0c3a1f3c0b2b5c0d6f9e8a7b6c5d4e3f",
                    "datavalue": {"value": "278", "type": "string"},
                    "datatype": "external-id"
                },
                "type": "statement",
                "id": TMDB_GUID,
                "rank": "normal"
            }]
        }
    })
}

pub fn batman_returns() -> Value {
    json!({
        "type": "item",
        "id": BATMAN_RETURNS,
        "lastrevid": 2000,
        "claims": {
            "P4947": [{
                "mainsnak": {
                    "snaktype": "value",
                    "property": "P4947",
                    "datavalue": {"value": "429486", "type": "string"},
                    "datatype": "external-id"
                },
                "type": "statement",
                "id": "Q1292541$2203A57C-488F-4371-9F88-9A5EB91C4883",
                "rank": "deprecated",
                "qualifiers": {"P2241": [item_snak("P2241", 21441764)]},
                "qualifiers-order": ["P2241"]
            }]
        }
    })
}

/// An item with no claims at all.
pub fn empty_item(id: &str) -> Value {
    json!({"type": "item", "id": id, "lastrevid": 1, "claims": {}})
}
