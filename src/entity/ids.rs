//! Wikibase identifiers

use serde::{Deserialize, Serialize};

/// Item identifier, e.g. `Q42`
///
/// Always stored upper-cased; `q42` parses to the same id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Parse `Q<digits>` (case-insensitive prefix).
    pub fn parse(s: &str) -> Option<Self> {
        parse_numeric_id(s, 'Q').map(|n| Self(format!("Q{}", n)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn numeric_id(&self) -> u64 {
        self.0[1..].parse().unwrap_or_default()
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Property identifier, e.g. `P31`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(String);

impl PropertyId {
    /// Parse `P<digits>` (case-insensitive prefix).
    pub fn parse(s: &str) -> Option<Self> {
        parse_numeric_id(s, 'P').map(|n| Self(format!("P{}", n)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn numeric_id(&self) -> u64 {
        self.0[1..].parse().unwrap_or_default()
    }
}

impl std::fmt::Display for PropertyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn parse_numeric_id(s: &str, prefix: char) -> Option<u64> {
    let mut chars = s.chars();
    let first = chars.next()?;
    if !first.eq_ignore_ascii_case(&prefix) {
        return None;
    }
    let digits = chars.as_str();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) || digits.starts_with('0') {
        return None;
    }
    digits.parse().ok()
}

/// Statement GUID: owning item plus an opaque per-statement hash.
///
/// The wiki writes it as `Q42$F078E5B3-...`, the RDF export as the local name
/// `Q42-F078E5B3-...` of a `wds:` IRI.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StatementGuid {
    item: ItemId,
    hash: String,
}

impl StatementGuid {
    /// Parse the local name of a `wds:` IRI.
    pub fn from_rdf_local(local: &str) -> Option<Self> {
        if local.contains('$') {
            return None;
        }
        let (item, hash) = local.split_once('-')?;
        Self::from_parts(item, hash)
    }

    /// Parse the wiki form `Q42$hash`.
    pub fn from_wiki(guid: &str) -> Option<Self> {
        let (item, hash) = guid.split_once('$')?;
        Self::from_parts(item, hash)
    }

    fn from_parts(item: &str, hash: &str) -> Option<Self> {
        if hash.is_empty() {
            return None;
        }
        Some(Self {
            item: ItemId::parse(item)?,
            hash: hash.to_string(),
        })
    }

    pub fn item(&self) -> &ItemId {
        &self.item
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Whether a GUID as stored on the wiki denotes this statement.
    ///
    /// Older statements carry a lower-case `q` prefix and the hash case varies
    /// between the API and the RDF export, so the comparison ignores case.
    pub fn matches(&self, wiki_guid: &str) -> bool {
        match wiki_guid.split_once('$') {
            Some((item, hash)) => {
                item.eq_ignore_ascii_case(self.item.as_str())
                    && hash.eq_ignore_ascii_case(&self.hash)
            }
            None => false,
        }
    }
}

impl std::fmt::Display for StatementGuid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}${}", self.item, self.hash)
    }
}
