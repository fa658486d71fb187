//! Claims, snaks and references

use super::ids::PropertyId;
use super::value::Target;
use crate::rdf::vocab;

/// Statement rank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rank {
    #[default]
    Normal,
    Preferred,
    Deprecated,
}

impl Rank {
    /// Parse a `wikibase:*Rank` IRI.
    pub fn from_iri(iri: &str) -> Option<Rank> {
        match iri {
            vocab::wikibase::NORMAL_RANK => Some(Rank::Normal),
            vocab::wikibase::PREFERRED_RANK => Some(Rank::Preferred),
            vocab::wikibase::DEPRECATED_RANK => Some(Rank::Deprecated),
            _ => None,
        }
    }

    /// Parse the rank string used in entity JSON.
    pub fn from_wiki(s: &str) -> Option<Rank> {
        match s {
            "normal" => Some(Rank::Normal),
            "preferred" => Some(Rank::Preferred),
            "deprecated" => Some(Rank::Deprecated),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rank::Normal => "normal",
            Rank::Preferred => "preferred",
            Rank::Deprecated => "deprecated",
        }
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The value slot of a snak.
#[derive(Debug, Clone, PartialEq)]
pub enum SnakValue {
    Value(Target),
    SomeValue,
    NoValue,
}

impl SnakValue {
    /// Concrete-value equality; somevalue/novalue never match a target.
    pub fn same_target(&self, target: &Target) -> bool {
        match self {
            SnakValue::Value(value) => value.same_value(target),
            SnakValue::SomeValue | SnakValue::NoValue => false,
        }
    }
}

impl std::fmt::Display for SnakValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnakValue::Value(target) => write!(f, "{}", target),
            SnakValue::SomeValue => write!(f, "(some value)"),
            SnakValue::NoValue => write!(f, "(no value)"),
        }
    }
}

/// A property/value pair: a main snak, qualifier or reference snak.
#[derive(Debug, Clone, PartialEq)]
pub struct Snak {
    pub property: PropertyId,
    pub value: SnakValue,
    /// Property datatype as reported by the wiki (`external-id`, `url`, ...)
    pub datatype: Option<String>,
    /// Content hash assigned by the wiki; dropped when the value changes
    pub hash: Option<String>,
}

impl Snak {
    pub fn new(property: PropertyId, target: Target) -> Self {
        Self {
            property,
            value: SnakValue::Value(target),
            datatype: None,
            hash: None,
        }
    }

    pub fn same_target(&self, target: &Target) -> bool {
        self.value.same_target(target)
    }
}

/// Snaks grouped by property, in first-seen property order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnakGroups {
    groups: Vec<(PropertyId, Vec<Snak>)>,
}

impl SnakGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, property: &PropertyId) -> &[Snak] {
        self.groups
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, snaks)| snaks.as_slice())
            .unwrap_or(&[])
    }

    /// Append a snak to its property group. Returns its index within the group.
    pub fn push(&mut self, snak: Snak) -> usize {
        match self.groups.iter_mut().find(|(p, _)| *p == snak.property) {
            Some((_, snaks)) => {
                snaks.push(snak);
                snaks.len() - 1
            }
            None => {
                self.groups.push((snak.property.clone(), vec![snak]));
                0
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PropertyId, &[Snak])> {
        self.groups.iter().map(|(p, snaks)| (p, snaks.as_slice()))
    }

    pub fn properties(&self) -> impl Iterator<Item = &PropertyId> {
        self.groups.iter().map(|(p, _)| p)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|(_, snaks)| snaks.is_empty())
    }

    pub fn snak_count(&self) -> usize {
        self.groups.iter().map(|(_, snaks)| snaks.len()).sum()
    }

    /// Same properties carrying the same values, ignoring hashes and order.
    pub fn same_content(&self, other: &SnakGroups) -> bool {
        if self.snak_count() != other.snak_count() {
            return false;
        }
        self.iter().all(|(property, snaks)| {
            let theirs = other.get(property);
            snaks.len() == theirs.len()
                && snaks.iter().all(|snak| theirs.iter().any(|t| same_snak(t, snak)))
        })
    }
}

fn same_snak(a: &Snak, b: &Snak) -> bool {
    match (&a.value, &b.value) {
        (SnakValue::Value(x), SnakValue::Value(y)) => x.same_value(y),
        (x, y) => x == y,
    }
}

/// A reference block attached to a claim.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reference {
    pub hash: Option<String>,
    pub snaks: SnakGroups,
}

impl Reference {
    pub fn new(snaks: SnakGroups) -> Self {
        Self { hash: None, snaks }
    }
}

/// A statement on an item.
#[derive(Debug, Clone, PartialEq)]
pub struct Claim {
    /// Wiki GUID (`Q42$...`); `None` until the wiki assigns one
    pub id: Option<String>,
    pub property: PropertyId,
    /// Main snak; `None` for a claim whose value has not been set yet
    pub mainsnak: Option<Snak>,
    pub rank: Rank,
    pub qualifiers: SnakGroups,
    pub references: Vec<Reference>,
}

impl Claim {
    /// New normal-rank claim with a value and no GUID.
    pub fn new(property: PropertyId, target: Target) -> Self {
        Self {
            id: None,
            mainsnak: Some(Snak::new(property.clone(), target)),
            property,
            rank: Rank::Normal,
            qualifiers: SnakGroups::new(),
            references: Vec::new(),
        }
    }

    /// Claim with no value set.
    pub fn empty(property: PropertyId) -> Self {
        Self {
            id: None,
            property,
            mainsnak: None,
            rank: Rank::Normal,
            qualifiers: SnakGroups::new(),
            references: Vec::new(),
        }
    }

    pub fn value(&self) -> Option<&SnakValue> {
        self.mainsnak.as_ref().map(|snak| &snak.value)
    }

    pub fn target_equals(&self, target: &Target) -> bool {
        self.value().is_some_and(|value| value.same_target(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::ItemId;

    fn p(id: &str) -> PropertyId {
        PropertyId::parse(id).unwrap()
    }

    fn item(id: &str) -> Target {
        Target::Item(ItemId::parse(id).unwrap())
    }

    #[test]
    fn rank_iris() {
        assert_eq!(
            Rank::from_iri("http://wikiba.se/ontology#PreferredRank"),
            Some(Rank::Preferred)
        );
        assert_eq!(Rank::from_iri("http://wikiba.se/ontology#BestRank"), None);
        assert_eq!(Rank::from_wiki("deprecated"), Some(Rank::Deprecated));
        assert_eq!(Rank::default(), Rank::Normal);
    }

    #[test]
    fn snak_groups_keep_property_order() {
        let mut groups = SnakGroups::new();
        assert_eq!(groups.push(Snak::new(p("P642"), item("Q1"))), 0);
        assert_eq!(groups.push(Snak::new(p("P580"), item("Q2"))), 0);
        assert_eq!(groups.push(Snak::new(p("P642"), item("Q3"))), 1);

        let order: Vec<_> = groups.properties().map(|p| p.as_str()).collect();
        assert_eq!(order, vec!["P642", "P580"]);
        assert_eq!(groups.get(&p("P642")).len(), 2);
        assert!(groups.get(&p("P1")).is_empty());
        assert_eq!(groups.snak_count(), 3);
    }

    #[test]
    fn snak_group_content_ignores_hashes_and_order() {
        let mut a = SnakGroups::new();
        a.push(Snak::new(p("P854"), Target::String("https://example.org".into())));
        a.push(Snak::new(p("P813"), item("Q5")));

        let mut b = SnakGroups::new();
        let mut hashed = Snak::new(p("P813"), item("Q5"));
        hashed.hash = Some("abc".into());
        b.push(hashed);
        b.push(Snak::new(p("P854"), Target::String("https://example.org".into())));

        assert!(a.same_content(&b));

        b.push(Snak::new(p("P813"), item("Q6")));
        assert!(!a.same_content(&b));
    }

    #[test]
    fn somevalue_never_equals_target() {
        let mut claim = Claim::new(p("P31"), item("Q5"));
        assert!(claim.target_equals(&item("Q5")));
        claim.mainsnak.as_mut().unwrap().value = SnakValue::SomeValue;
        assert!(!claim.target_equals(&item("Q5")));
        assert!(!Claim::empty(p("P31")).target_equals(&item("Q5")));
    }
}
