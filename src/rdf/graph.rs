//! In-memory triple graph

use super::vocab;
use std::collections::{HashMap, HashSet};

/// An RDF literal: lexical form plus datatype IRI and optional language tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    pub lexical: String,
    pub datatype: String,
    pub language: Option<String>,
}

impl Literal {
    /// A plain `xsd:string` literal.
    pub fn string(lexical: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: vocab::xsd::STRING.to_string(),
            language: None,
        }
    }

    /// A literal with an explicit datatype.
    pub fn typed(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: datatype.into(),
            language: None,
        }
    }

    /// A language-tagged `rdf:langString` literal.
    pub fn lang(lexical: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: vocab::rdf::LANG_STRING.to_string(),
            language: Some(language.into()),
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.lexical)?;
        match &self.language {
            Some(lang) => write!(f, "@{}", lang),
            None if self.datatype == vocab::xsd::STRING => Ok(()),
            None => write!(f, "^^<{}>", self.datatype),
        }
    }
}

/// A node in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    Iri(String),
    /// Blank node label (document labels and generated ids share one space)
    Blank(String),
    Literal(Literal),
}

impl Term {
    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(iri.into())
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Term::Blank(_))
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Iri(iri) => match vocab::compact(iri) {
                Some((prefix, local)) => write!(f, "{}:{}", prefix, local),
                None => write!(f, "<{}>", iri),
            },
            Term::Blank(label) => write!(f, "_:{}", label),
            Term::Literal(literal) => write!(f, "{}", literal),
        }
    }
}

/// A single (subject, predicate, object) statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    pub subject: Term,
    pub predicate: String,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: Term, predicate: impl Into<String>, object: Term) -> Self {
        Self {
            subject,
            predicate: predicate.into(),
            object,
        }
    }
}

impl std::fmt::Display for Triple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.subject, Term::Iri(self.predicate.clone()), self.object)
    }
}

/// A set of triples indexed by subject.
///
/// Subjects iterate in the order they first appear in the document, and each
/// subject's triples iterate in document order. Duplicate triples collapse,
/// since an RDF graph is a set.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    triples: Vec<Triple>,
    seen: HashSet<Triple>,
    subjects: Vec<Term>,
    by_subject: HashMap<Term, Vec<usize>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a triple. Returns false if it was already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        if self.seen.contains(&triple) {
            return false;
        }
        let index = self.triples.len();
        match self.by_subject.get_mut(&triple.subject) {
            Some(indices) => indices.push(index),
            None => {
                self.subjects.push(triple.subject.clone());
                self.by_subject.insert(triple.subject.clone(), vec![index]);
            }
        }
        self.seen.insert(triple.clone());
        self.triples.push(triple);
        true
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn triples(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Distinct subjects in first-seen order.
    pub fn subjects(&self) -> impl Iterator<Item = &Term> {
        self.subjects.iter()
    }

    /// All (predicate, object) pairs of a subject.
    pub fn predicate_objects<'g>(
        &'g self,
        subject: &Term,
    ) -> impl Iterator<Item = (&'g str, &'g Term)> + 'g {
        self.by_subject
            .get(subject)
            .into_iter()
            .flatten()
            .map(move |&i| (self.triples[i].predicate.as_str(), &self.triples[i].object))
    }

    /// First object for (subject, predicate), if any.
    pub fn value(&self, subject: &Term, predicate: &str) -> Option<&Term> {
        self.predicate_objects(subject)
            .find(|(p, _)| *p == predicate)
            .map(|(_, o)| o)
    }
}
