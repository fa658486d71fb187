//! Namespaces and well-known IRIs of the Wikidata RDF vocabulary

pub mod rdf {
    pub const NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    pub const FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
    pub const REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
    pub const NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
    pub const LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
}

pub mod rdfs {
    pub const NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    pub const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
}

pub mod xsd {
    pub const NS: &str = "http://www.w3.org/2001/XMLSchema#";
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    pub const DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
    pub const DATE: &str = "http://www.w3.org/2001/XMLSchema#date";
    pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
}

pub mod schema {
    pub const NS: &str = "http://schema.org/";
    pub const NAME: &str = "http://schema.org/name";
    pub const DESCRIPTION: &str = "http://schema.org/description";
}

pub mod skos {
    pub const NS: &str = "http://www.w3.org/2004/02/skos/core#";
    pub const ALT_LABEL: &str = "http://www.w3.org/2004/02/skos/core#altLabel";
    pub const PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";
}

pub mod prov {
    pub const NS: &str = "http://www.w3.org/ns/prov#";
    pub const WAS_DERIVED_FROM: &str = "http://www.w3.org/ns/prov#wasDerivedFrom";
}

pub mod wikibase {
    pub const NS: &str = "http://wikiba.se/ontology#";
    pub const RANK: &str = "http://wikiba.se/ontology#rank";
    pub const NORMAL_RANK: &str = "http://wikiba.se/ontology#NormalRank";
    pub const PREFERRED_RANK: &str = "http://wikiba.se/ontology#PreferredRank";
    pub const DEPRECATED_RANK: &str = "http://wikiba.se/ontology#DeprecatedRank";
}

pub mod wikidatabots {
    pub const NS: &str = "https://github.com/josh/wikidatabots#";
    pub const EDIT_SUMMARY: &str = "https://github.com/josh/wikidatabots#editSummary";
}

/// Wikidata entity and property namespaces.
pub mod wd {
    pub const ENTITY: &str = "http://www.wikidata.org/entity/";
    pub const STATEMENT: &str = "http://www.wikidata.org/entity/statement/";
    pub const DIRECT: &str = "http://www.wikidata.org/prop/direct/";
    pub const DIRECT_NORMALIZED: &str = "http://www.wikidata.org/prop/direct-normalized/";
    pub const CLAIM: &str = "http://www.wikidata.org/prop/";
    pub const STATEMENT_SIMPLE: &str = "http://www.wikidata.org/prop/statement/";
    pub const STATEMENT_VALUE: &str = "http://www.wikidata.org/prop/statement/value/";
    pub const STATEMENT_NORMALIZED: &str =
        "http://www.wikidata.org/prop/statement/value-normalized/";
    pub const QUALIFIER: &str = "http://www.wikidata.org/prop/qualifier/";
    pub const QUALIFIER_VALUE: &str = "http://www.wikidata.org/prop/qualifier/value/";
    pub const QUALIFIER_NORMALIZED: &str =
        "http://www.wikidata.org/prop/qualifier/value-normalized/";
    pub const REFERENCE: &str = "http://www.wikidata.org/prop/reference/";
    pub const REFERENCE_VALUE: &str = "http://www.wikidata.org/prop/reference/value/";
    pub const REFERENCE_NORMALIZED: &str =
        "http://www.wikidata.org/prop/reference/value-normalized/";
    pub const NOVALUE: &str = "http://www.wikidata.org/prop/novalue/";
    pub const REF: &str = "http://www.wikidata.org/reference/";
    pub const VALUE: &str = "http://www.wikidata.org/value/";
    pub const ENTITY_DATA: &str = "http://www.wikidata.org/wiki/Special:EntityData/";
}

/// Prefixes every input document may use without declaring them.
pub const DEFAULT_PREFIXES: &[(&str, &str)] = &[
    ("bd", "http://www.bigdata.com/rdf#"),
    ("cc", "http://creativecommons.org/ns#"),
    ("dct", "http://purl.org/dc/terms/"),
    ("geo", "http://www.opengis.net/ont/geosparql#"),
    ("hint", "http://www.bigdata.com/queryHints#"),
    ("ontolex", "http://www.w3.org/ns/lemon/ontolex#"),
    ("owl", "http://www.w3.org/2002/07/owl#"),
    ("prov", prov::NS),
    ("rdf", rdf::NS),
    ("rdfs", rdfs::NS),
    ("schema", schema::NS),
    ("skos", skos::NS),
    ("xsd", xsd::NS),
    ("p", wd::CLAIM),
    ("pq", wd::QUALIFIER),
    ("pqn", wd::QUALIFIER_NORMALIZED),
    ("pqv", wd::QUALIFIER_VALUE),
    ("pr", wd::REFERENCE),
    ("prn", wd::REFERENCE_NORMALIZED),
    ("prv", wd::REFERENCE_VALUE),
    ("ps", wd::STATEMENT_SIMPLE),
    ("psn", wd::STATEMENT_NORMALIZED),
    ("psv", wd::STATEMENT_VALUE),
    ("wd", wd::ENTITY),
    ("wdata", wd::ENTITY_DATA),
    ("wdno", wd::NOVALUE),
    ("wdref", wd::REF),
    ("wds", wd::STATEMENT),
    ("wdt", wd::DIRECT),
    ("wdtn", wd::DIRECT_NORMALIZED),
    ("wdv", wd::VALUE),
    ("wikibase", wikibase::NS),
    ("wikidatabots", wikidatabots::NS),
];

/// Split an IRI into (prefix, local name) using the longest matching default
/// namespace. Nested namespaces (`p:` inside `ps:` inside `psv:`) resolve to
/// the most specific one.
pub fn compact(iri: &str) -> Option<(&'static str, &str)> {
    DEFAULT_PREFIXES
        .iter()
        .filter(|(_, ns)| iri.starts_with(ns))
        .max_by_key(|(_, ns)| ns.len())
        .map(|(prefix, ns)| (*prefix, &iri[ns.len()..]))
}
