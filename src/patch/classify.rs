//! Triple classification
//!
//! Maps a resolved (subject, predicate, object) triple to the operation it
//! requests. The first matching row wins:
//!
//! | subject   | predicate                  | object                   | operation            |
//! |-----------|----------------------------|--------------------------|----------------------|
//! | blank     | any                        | any                      | skip                 |
//! | any       | `rdf:type`                 | any                      | skip                 |
//! | item      | `wdt:`                     | literal/item/property/IRI| append claim         |
//! | item      | `p:`                       | blank                    | append statement     |
//! | item      | `wikidatabots:editSummary` | literal                  | item summary         |
//! | item      | `wikibase:*`               | any                      | skip                 |
//! | statement | `pq:`                      | literal/item/property/IRI| append qualifier     |
//! | statement | `ps:`                      | literal/item/property/IRI| set statement value  |
//! | statement | `wikibase:rank`            | rank IRI                 | set rank             |
//! | statement | `prov:wasDerivedFrom`      | blank                    | add reference        |
//! | statement | `wikidatabots:editSummary` | literal                  | item summary         |
//! | any       | any                        | any                      | unrecognized         |
//!
//! Vocabulary that is understood but not supported (`wdtn:`, `psv:`, labels,
//! ...) classifies as [`Operation::Unimplemented`].

use super::{PatchError, PatchResult};
use crate::entity::{ItemId, PropertyId, Rank, StatementGuid, Target};
use crate::rdf::Literal;
use crate::resolve::{EntityRef, ValueForm, Vocab};

/// An RDF term after IRI resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedTerm {
    Entity(EntityRef),
    /// An IRI outside the Wikidata namespaces
    Iri(String),
    Literal(Literal),
    /// Blank node label
    Blank(String),
}

impl std::fmt::Display for ResolvedTerm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolvedTerm::Entity(entity) => write!(f, "{}", entity),
            ResolvedTerm::Iri(iri) => write!(f, "<{}>", iri),
            ResolvedTerm::Literal(literal) => write!(f, "{}", literal),
            ResolvedTerm::Blank(label) => write!(f, "_:{}", label),
        }
    }
}

/// What a triple on an item or statement subject asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Skip,
    /// `wd:Q wdt:P value`
    AppendClaimTarget {
        item: ItemId,
        property: PropertyId,
        target: Target,
    },
    /// `wd:Q p:P [ ps:P value; ... ]`
    AppendStatement {
        item: ItemId,
        property: PropertyId,
        node: String,
    },
    EditSummary {
        item: ItemId,
        summary: String,
    },
    /// A triple whose subject is an existing statement
    Statement {
        statement: StatementGuid,
        op: StatementOp,
    },
    Unimplemented(&'static str),
    Unrecognized,
}

/// What a triple on a statement (a `wds:` IRI or a `p:` blank node) asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum StatementOp {
    Skip,
    AppendQualifier { property: PropertyId, target: Target },
    SetValue { property: PropertyId, target: Target },
    SetRank(Rank),
    AddReference { node: String },
    EditSummary(String),
    Unimplemented(&'static str),
    Unrecognized,
}

/// Classify a triple by its subject, predicate and object.
pub fn classify(
    subject: &ResolvedTerm,
    predicate: &ResolvedTerm,
    object: &ResolvedTerm,
) -> PatchResult<Operation> {
    use EntityRef as E;
    use ResolvedTerm as T;

    let op = match (subject, predicate) {
        (T::Blank(_), _) => Operation::Skip,

        (_, T::Entity(E::Vocab(Vocab::Type))) => match object {
            T::Entity(E::NoValue(_)) => Operation::Unimplemented("wdno"),
            _ => Operation::Skip,
        },

        (T::Entity(E::Item(item)), T::Entity(E::Direct(property))) => match object_target(object)? {
            Some(target) => Operation::AppendClaimTarget {
                item: item.clone(),
                property: property.clone(),
                target,
            },
            None => Operation::Unrecognized,
        },

        (T::Entity(E::Item(item)), T::Entity(E::StatementProperty(property))) => match object {
            T::Blank(node) => Operation::AppendStatement {
                item: item.clone(),
                property: property.clone(),
                node: node.clone(),
            },
            _ => Operation::Unimplemented("p: with a non-blank object"),
        },

        (T::Entity(E::Item(item)), T::Entity(E::Vocab(Vocab::EditSummary))) => match object {
            T::Literal(literal) => Operation::EditSummary {
                item: item.clone(),
                summary: literal.lexical.clone(),
            },
            _ => Operation::Unrecognized,
        },

        (
            T::Entity(E::Item(_)),
            T::Entity(E::Vocab(Vocab::Rank | Vocab::RankValue(_) | Vocab::Wikibase(_))),
        ) => Operation::Skip,

        (T::Entity(E::Item(_)), T::Entity(E::DirectNormalized(_))) => {
            Operation::Unimplemented("wdtn")
        }

        (T::Entity(E::Item(_)), T::Entity(E::Vocab(vocab))) => match unimplemented_vocab(vocab) {
            Some(what) => Operation::Unimplemented(what),
            None => Operation::Unrecognized,
        },

        (T::Entity(E::Statement(statement)), _) => Operation::Statement {
            statement: statement.clone(),
            op: classify_statement(predicate, object)?,
        },

        _ => Operation::Unrecognized,
    };
    Ok(op)
}

/// Classify a (predicate, object) pair attached to a statement.
pub fn classify_statement(
    predicate: &ResolvedTerm,
    object: &ResolvedTerm,
) -> PatchResult<StatementOp> {
    use EntityRef as E;
    use ResolvedTerm as T;

    let T::Entity(predicate) = predicate else {
        return Ok(StatementOp::Unrecognized);
    };

    let op = match predicate {
        E::Vocab(Vocab::Type) => StatementOp::Skip,

        E::Qualifier(property, ValueForm::Simple) => match object_target(object)? {
            Some(target) => StatementOp::AppendQualifier {
                property: property.clone(),
                target,
            },
            None => StatementOp::Unrecognized,
        },

        E::StatementValue(property, ValueForm::Simple) => match object_target(object)? {
            Some(target) => StatementOp::SetValue {
                property: property.clone(),
                target,
            },
            None => StatementOp::Unrecognized,
        },

        E::Vocab(Vocab::Rank) => match object {
            T::Entity(E::Vocab(Vocab::RankValue(rank))) => StatementOp::SetRank(*rank),
            other => return Err(PatchError::InvalidRank(other.to_string())),
        },

        E::Vocab(Vocab::WasDerivedFrom) => match object {
            T::Blank(node) => StatementOp::AddReference { node: node.clone() },
            _ => StatementOp::Unrecognized,
        },

        E::Vocab(Vocab::EditSummary) => match object {
            T::Literal(literal) => StatementOp::EditSummary(literal.lexical.clone()),
            _ => StatementOp::Unrecognized,
        },

        E::StatementValue(_, ValueForm::Full) => StatementOp::Unimplemented("psv"),
        E::StatementValue(_, ValueForm::Normalized) => StatementOp::Unimplemented("psn"),
        E::Qualifier(_, ValueForm::Full) => StatementOp::Unimplemented("pqv"),
        E::Qualifier(_, ValueForm::Normalized) => StatementOp::Unimplemented("pqn"),
        E::Reference(_, ValueForm::Full) => StatementOp::Unimplemented("prv"),
        E::Reference(_, ValueForm::Normalized) => StatementOp::Unimplemented("prn"),

        _ => StatementOp::Unrecognized,
    };
    Ok(op)
}

/// Convert an object term into a claim value.
///
/// Literals, items, properties and plain IRIs (URL values) convert; anything
/// else yields `None`. Literals of unsupported datatypes are an error.
pub fn object_target(object: &ResolvedTerm) -> PatchResult<Option<Target>> {
    let target = match object {
        ResolvedTerm::Literal(literal) => Some(Target::from_literal(literal)?),
        ResolvedTerm::Entity(EntityRef::Item(id)) => Some(Target::Item(id.clone())),
        ResolvedTerm::Entity(EntityRef::Property(id)) => Some(Target::Property(id.clone())),
        ResolvedTerm::Iri(iri) => Some(Target::String(iri.clone())),
        ResolvedTerm::Entity(_) | ResolvedTerm::Blank(_) => None,
    };
    Ok(target)
}

fn unimplemented_vocab(vocab: &Vocab) -> Option<&'static str> {
    match vocab {
        Vocab::Label => Some("rdfs:label"),
        Vocab::PrefLabel => Some("skos:prefLabel"),
        Vocab::AltLabel => Some("skos:altLabel"),
        Vocab::Name => Some("schema:name"),
        Vocab::Description => Some("schema:description"),
        _ => None,
    }
}
