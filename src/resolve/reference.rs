//! Typed views of Wikidata IRIs

use super::{ResolveError, ResolveResult};
use crate::entity::{ItemId, PropertyId, Rank, StatementGuid};
use crate::rdf::vocab;

/// Which of the three value predicates of a property an IRI names
/// (`ps:`/`psv:`/`psn:`, `pq:`/`pqv:`/`pqn:`, `pr:`/`prv:`/`prn:`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueForm {
    Simple,
    Full,
    Normalized,
}

/// Fixed vocabulary the patch engine knows by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Vocab {
    /// `wikibase:rank`
    Rank,
    /// `wikibase:NormalRank` and friends
    RankValue(Rank),
    /// Any other `wikibase:` term
    Wikibase(String),
    /// `rdf:type`
    Type,
    /// `rdfs:label`
    Label,
    /// `skos:prefLabel`
    PrefLabel,
    /// `skos:altLabel`
    AltLabel,
    /// `schema:name`
    Name,
    /// `schema:description`
    Description,
    /// `prov:wasDerivedFrom`
    WasDerivedFrom,
    /// `wikidatabots:editSummary`
    EditSummary,
}

/// A Wikidata IRI resolved to what it denotes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityRef {
    /// `wd:Q..`
    Item(ItemId),
    /// `wd:P..`
    Property(PropertyId),
    /// `wds:Q..-hash`
    Statement(StatementGuid),
    /// `wdt:P..`
    Direct(PropertyId),
    /// `wdtn:P..`
    DirectNormalized(PropertyId),
    /// `p:P..`
    StatementProperty(PropertyId),
    /// `ps:P..`, `psv:P..`, `psn:P..`
    StatementValue(PropertyId, ValueForm),
    /// `pq:P..`, `pqv:P..`, `pqn:P..`
    Qualifier(PropertyId, ValueForm),
    /// `pr:P..`, `prv:P..`, `prn:P..`
    Reference(PropertyId, ValueForm),
    /// `wdno:P..`
    NoValue(PropertyId),
    Vocab(Vocab),
}

impl EntityRef {
    /// Resolve an IRI syntactically.
    ///
    /// Returns `Ok(None)` for IRIs outside every namespace this crate knows
    /// (plain IRIs such as URL values). A malformed local name inside a
    /// Wikidata namespace is an error.
    pub fn parse(iri: &str) -> ResolveResult<Option<EntityRef>> {
        let Some((prefix, local)) = vocab::compact(iri) else {
            return Ok(None);
        };
        let unresolvable = || ResolveError::Unresolvable(iri.to_string());
        let property = || PropertyId::parse(local).ok_or_else(unresolvable);

        let resolved = match prefix {
            "wd" => match (ItemId::parse(local), PropertyId::parse(local)) {
                (Some(item), _) => EntityRef::Item(item),
                (_, Some(property)) => EntityRef::Property(property),
                _ => return Err(unresolvable()),
            },
            "wds" => {
                EntityRef::Statement(StatementGuid::from_rdf_local(local).ok_or_else(unresolvable)?)
            }
            "wdt" => EntityRef::Direct(property()?),
            "wdtn" => EntityRef::DirectNormalized(property()?),
            "p" => EntityRef::StatementProperty(property()?),
            "ps" => EntityRef::StatementValue(property()?, ValueForm::Simple),
            "psv" => EntityRef::StatementValue(property()?, ValueForm::Full),
            "psn" => EntityRef::StatementValue(property()?, ValueForm::Normalized),
            "pq" => EntityRef::Qualifier(property()?, ValueForm::Simple),
            "pqv" => EntityRef::Qualifier(property()?, ValueForm::Full),
            "pqn" => EntityRef::Qualifier(property()?, ValueForm::Normalized),
            "pr" => EntityRef::Reference(property()?, ValueForm::Simple),
            "prv" => EntityRef::Reference(property()?, ValueForm::Full),
            "prn" => EntityRef::Reference(property()?, ValueForm::Normalized),
            "wdno" => EntityRef::NoValue(property()?),
            "wikibase" => EntityRef::Vocab(match iri {
                vocab::wikibase::RANK => Vocab::Rank,
                _ => match Rank::from_iri(iri) {
                    Some(rank) => Vocab::RankValue(rank),
                    None => Vocab::Wikibase(local.to_string()),
                },
            }),
            _ => match named_vocab(iri) {
                Some(term) => EntityRef::Vocab(term),
                None => return Ok(None),
            },
        };
        Ok(Some(resolved))
    }
}

fn named_vocab(iri: &str) -> Option<Vocab> {
    let term = match iri {
        vocab::rdf::TYPE => Vocab::Type,
        vocab::rdfs::LABEL => Vocab::Label,
        vocab::skos::PREF_LABEL => Vocab::PrefLabel,
        vocab::skos::ALT_LABEL => Vocab::AltLabel,
        vocab::schema::NAME => Vocab::Name,
        vocab::schema::DESCRIPTION => Vocab::Description,
        vocab::prov::WAS_DERIVED_FROM => Vocab::WasDerivedFrom,
        vocab::wikidatabots::EDIT_SUMMARY => Vocab::EditSummary,
        _ => return None,
    };
    Some(term)
}

impl std::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let form = |prefix: &str, form: &ValueForm| match form {
            ValueForm::Simple => prefix.to_string(),
            ValueForm::Full => format!("{}v", prefix),
            ValueForm::Normalized => format!("{}n", prefix),
        };
        match self {
            EntityRef::Item(id) => write!(f, "wd:{}", id),
            EntityRef::Property(id) => write!(f, "wd:{}", id),
            EntityRef::Statement(guid) => write!(f, "wds:{}-{}", guid.item(), guid.hash()),
            EntityRef::Direct(p) => write!(f, "wdt:{}", p),
            EntityRef::DirectNormalized(p) => write!(f, "wdtn:{}", p),
            EntityRef::StatementProperty(p) => write!(f, "p:{}", p),
            EntityRef::StatementValue(p, v) => write!(f, "{}:{}", form("ps", v), p),
            EntityRef::Qualifier(p, v) => write!(f, "{}:{}", form("pq", v), p),
            EntityRef::Reference(p, v) => write!(f, "{}:{}", form("pr", v), p),
            EntityRef::NoValue(p) => write!(f, "wdno:{}", p),
            EntityRef::Vocab(term) => write!(f, "{:?}", term),
        }
    }
}
