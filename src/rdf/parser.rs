//! Turtle reading through sophia's parser, collected into a [`Graph`]

use super::graph::{Graph, Literal, Term, Triple};
use super::vocab::{self, xsd};
use super::{RdfError, RdfResult};
use sophia::term::{TTerm, TermKind};
use sophia::triple::stream::TripleSource;
use sophia::triple::Triple as _;

/// `@prefix` lines for every default namespace. Documents may redeclare them.
pub fn prefix_header() -> String {
    vocab::DEFAULT_PREFIXES
        .iter()
        .map(|(prefix, ns)| format!("@prefix {}: <{}> .\n", prefix, ns))
        .collect()
}

/// Parse a Turtle document with the default Wikidata prefixes predeclared.
pub fn parse(input: &str) -> RdfResult<Graph> {
    let document = format!("{}{}", prefix_header(), input);
    let mut graph = Graph::new();
    let mut failure = None;

    sophia::parser::turtle::parse_str(&document)
        .for_each_triple(|t| {
            if failure.is_some() {
                return;
            }
            match (convert(t.s()), convert(t.p()), convert(t.o())) {
                (Ok(subject), Ok(Term::Iri(predicate)), Ok(object)) => {
                    graph.insert(Triple::new(subject, predicate, object));
                }
                (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => failure = Some(e),
                (_, Ok(predicate), _) => {
                    failure = Some(RdfError::Unsupported(predicate.to_string()))
                }
            }
        })
        .map_err(|e| RdfError::Syntax(e.to_string()))?;

    match failure {
        Some(e) => Err(e),
        None => Ok(graph),
    }
}

fn convert<T: TTerm + ?Sized>(term: &T) -> RdfResult<Term> {
    match term.kind() {
        TermKind::Iri => Ok(Term::Iri(term.value().to_string())),
        TermKind::BlankNode => Ok(Term::Blank(term.value().to_string())),
        TermKind::Literal => {
            let lexical = term.value().to_string();
            Ok(Term::Literal(match term.language() {
                Some(language) => Literal::lang(lexical, language.to_string()),
                None => match term.datatype() {
                    Some(datatype) => Literal::typed(lexical, datatype.value().to_string()),
                    None => Literal::typed(lexical, xsd::STRING),
                },
            }))
        }
        _ => Err(RdfError::Unsupported(term.value().to_string())),
    }
}
