//! End-to-end patch scenarios against an in-memory wiki
//!
//! Each test feeds a small Turtle document through the engine and checks the
//! finalized per-item edits. Nothing here commits.

mod common;

use common::fixtures::{self, ANDY_STATEMENT, RED_GUID, RED_STATEMENT, TMDB_GUID, TMDB_STATEMENT};
use common::{qid, run, seeded_wiki, LaggedWiki};
use serde_json::json;
use std::sync::Arc;
use wdpatch::patch::ClaimChange;
use wdpatch::resolve::ResolveError;
use wdpatch::wiki::WikiError;
use wdpatch::{PatchEngine, PatchError, Rank};

fn only_request(edits: &[wdpatch::FinalizedEdit]) -> &wdpatch::EditRequest {
    assert_eq!(edits.len(), 1, "expected one edit, got {:?}", edits);
    edits[0].request.as_ref().expect("serializable edit")
}

// --- Direct claims ---

#[test]
fn new_direct_claim_creates_one_claim() {
    let wiki = seeded_wiki();
    let edits = run(&wiki, r#"wd:Q1 wdt:P999 "42" ."#).unwrap();

    let request = only_request(&edits);
    assert_eq!(request.item, qid("Q1"));
    assert_eq!(request.claims.len(), 1);
    let claim = &request.claims[0];
    assert!(claim.get("id").is_none());
    assert_eq!(claim["mainsnak"]["property"], "P999");
    assert_eq!(claim["mainsnak"]["datavalue"]["value"], "42");
    assert_eq!(edits[0].claims[0].guid, None);
    assert!(matches!(edits[0].claims[0].changes[0], ClaimChange::Created { .. }));
}

#[test]
fn existing_direct_value_is_a_noop() {
    let wiki = seeded_wiki();
    let edits = run(&wiki, r#"wd:Q172241 wdt:P4947 "278" ."#).unwrap();
    assert!(edits.is_empty());
}

#[test]
fn repeated_direct_value_in_one_document_creates_one_claim() {
    let wiki = seeded_wiki();
    let doc = r#"
        wd:Q1 wdt:P31 wd:Q5 .
        wd:Q1 wdt:P31 wd:Q5 .
        wd:Q1 wdt:P31 <http://www.wikidata.org/entity/Q5> .
    "#;
    let edits = run(&wiki, doc).unwrap();
    let request = only_request(&edits);
    assert_eq!(request.claims.len(), 1);
    assert_eq!(request.claims[0]["mainsnak"]["datavalue"]["value"]["id"], "Q5");
}

#[test]
fn numeric_literals_compare_by_value() {
    let wiki = seeded_wiki();
    wiki.insert_entity(json!({
        "id": "Q2",
        "claims": {
            "P1082": [{
                "mainsnak": {
                    "snaktype": "value",
                    "property": "P1082",
                    "datavalue": {"value": {"amount": "+42", "unit": "1"}, "type": "quantity"},
                    "datatype": "quantity"
                },
                "type": "statement",
                "id": "Q2$AAAA",
                "rank": "normal"
            }]
        }
    }))
    .unwrap();

    let edits = run(&wiki, "wd:Q2 wdt:P1082 42 .\nwd:Q2 wdt:P1082 42.0 .").unwrap();
    assert!(edits.is_empty());
}

#[test]
fn missing_item_is_fatal() {
    let wiki = seeded_wiki();
    let err = run(&wiki, "wd:Q404 wdt:P31 wd:Q5 .").unwrap_err();
    assert!(matches!(
        err,
        PatchError::Resolve(ResolveError::Wiki(WikiError::NotFound(_)))
    ));
}

#[test]
fn lagged_item_skips_its_triple_and_keeps_going() {
    let wiki = seeded_wiki();
    let mut engine = PatchEngine::new(Arc::new(LaggedWiki::new(wiki.clone(), &["Q1"])));
    engine
        .process_document(r#"wd:Q1 wdt:P999 "42" . wd:Q172241 wdt:P999 "x" ."#)
        .unwrap();

    assert_eq!(engine.failed_triples(), 1);
    let edits = engine.finalize();
    let request = only_request(&edits);
    assert_eq!(request.item, qid("Q172241"));
    assert_eq!(request.claims[0]["mainsnak"]["datavalue"]["value"], "x");
}

#[test]
fn lagged_statement_lookup_is_skipped_too() {
    let wiki = seeded_wiki();
    let mut engine = PatchEngine::new(Arc::new(LaggedWiki::new(wiki.clone(), &["Q172241"])));
    let doc = format!(
        r#"wds:{s} wikibase:rank wikibase:DeprecatedRank .
        wd:Q1 wdt:P31 wd:Q5 ."#,
        s = TMDB_STATEMENT
    );
    engine.process_document(&doc).unwrap();

    assert_eq!(engine.failed_triples(), 1);
    assert_eq!(only_request(&engine.finalize()).item, qid("Q1"));
}

// --- Statement blank nodes ---

#[test]
fn statement_node_adds_qualifier_to_matching_claim() {
    let wiki = seeded_wiki();
    let doc = r#"
        wd:Q172241 p:P161 [
            ps:P161 wd:Q48337 ;
            pq:P4633 "Narrator"
        ] .
    "#;
    let edits = run(&wiki, doc).unwrap();

    let request = only_request(&edits);
    assert_eq!(request.claims.len(), 1);
    let claim = &request.claims[0];
    assert_eq!(claim["id"], RED_GUID);
    let roles: Vec<_> = claim["qualifiers"]["P4633"]
        .as_array()
        .unwrap()
        .iter()
        .map(|snak| snak["datavalue"]["value"].as_str().unwrap())
        .collect();
    assert_eq!(roles, vec!["Ellis Boyd \"Red\" Redding", "Narrator"]);
    assert_eq!(edits[0].claims[0].changes.len(), 1);
}

#[test]
fn statement_node_for_new_value_creates_qualified_claim() {
    let wiki = seeded_wiki();
    let doc = r#"
        wd:Q172241 p:P161 [
            ps:P161 wd:Q1101938 ;
            pq:P4633 "Warden Norton" ;
            wikibase:rank wikibase:PreferredRank
        ] .
    "#;
    let edits = run(&wiki, doc).unwrap();

    let request = only_request(&edits);
    let claim = &request.claims[0];
    assert!(claim.get("id").is_none());
    assert_eq!(claim["mainsnak"]["datavalue"]["value"]["id"], "Q1101938");
    assert_eq!(claim["qualifiers"]["P4633"][0]["datavalue"]["value"], "Warden Norton");
    assert_eq!(claim["rank"], "preferred");
    assert_eq!(edits[0].claims[0].changes.len(), 3);
}

#[test]
fn statement_node_without_value_is_fatal() {
    let wiki = seeded_wiki();
    let err = run(&wiki, r#"wd:Q172241 p:P161 [ pq:P4633 "Narrator" ] ."#).unwrap_err();
    assert!(matches!(err, PatchError::MissingStatementValue { .. }));
}

// --- Statement subjects ---

#[test]
fn existing_qualifier_is_a_noop() {
    let wiki = seeded_wiki();
    let doc = format!(r#"wds:{} pq:P4633 "Andy Dufresne" ."#, ANDY_STATEMENT);
    assert!(run(&wiki, &doc).unwrap().is_empty());
}

#[test]
fn qualifier_append_keeps_existing_values() {
    let wiki = seeded_wiki();
    let doc = format!(r#"wds:{} pq:P4633 "Narrator" ."#, RED_STATEMENT);
    let edits = run(&wiki, &doc).unwrap();
    let request = only_request(&edits);
    assert_eq!(request.claims[0]["qualifiers"]["P4633"].as_array().unwrap().len(), 2);
    assert_eq!(request.base_revision, Some(1000));
}

#[test]
fn rank_change_rewrites_statement() {
    let wiki = seeded_wiki();
    let doc = format!("wds:{} wikibase:rank wikibase:DeprecatedRank .", TMDB_STATEMENT);
    let edits = run(&wiki, &doc).unwrap();

    let request = only_request(&edits);
    let claim = &request.claims[0];
    assert_eq!(claim["id"], TMDB_GUID);
    assert_eq!(claim["rank"], "deprecated");
    assert_eq!(claim["mainsnak"]["datavalue"]["value"], "278");
    assert_eq!(claim["mainsnak"]["datatype"], "external-id");
    assert_eq!(
        edits[0].claims[0].changes,
        vec![ClaimChange::RankChanged {
            from: Rank::Normal,
            to: Rank::Deprecated
        }]
    );
}

#[test]
fn unchanged_rank_is_a_noop() {
    let wiki = seeded_wiki();
    let doc = format!("wds:{} wikibase:rank wikibase:NormalRank .", TMDB_STATEMENT);
    assert!(run(&wiki, &doc).unwrap().is_empty());
}

#[test]
fn invalid_rank_is_fatal() {
    let wiki = seeded_wiki();
    let doc = format!("wds:{} wikibase:rank wd:Q5 .", TMDB_STATEMENT);
    assert!(matches!(run(&wiki, &doc), Err(PatchError::InvalidRank(_))));
}

#[test]
fn same_statement_value_is_a_noop() {
    let wiki = seeded_wiki();
    let doc = format!(r#"wds:{} ps:P4947 "278" ."#, TMDB_STATEMENT);
    assert!(run(&wiki, &doc).unwrap().is_empty());
}

#[test]
fn statement_value_replacement() {
    let wiki = seeded_wiki();
    let doc = format!(r#"wds:{} ps:P4947 "279" ."#, TMDB_STATEMENT);
    let edits = run(&wiki, &doc).unwrap();
    let request = only_request(&edits);
    assert_eq!(request.claims[0]["id"], TMDB_GUID);
    assert_eq!(request.claims[0]["mainsnak"]["datavalue"]["value"], "279");
}

#[test]
fn statement_value_for_other_property_is_fatal() {
    let wiki = seeded_wiki();
    let doc = format!(r#"wds:{} ps:P345 "tt0111161" ."#, TMDB_STATEMENT);
    assert!(matches!(run(&wiki, &doc), Err(PatchError::PropertyMismatch { .. })));
}

#[test]
fn unknown_statement_is_fatal_and_nothing_is_committed() {
    let wiki = seeded_wiki();
    let doc = r#"
        wd:Q1 wdt:P999 "42" .
        wds:Q1-zzz wikibase:rank wikibase:PreferredRank .
    "#;
    let err = run(&wiki, doc).unwrap_err();
    assert!(matches!(
        err,
        PatchError::Resolve(ResolveError::StatementNotFound(_))
    ));
    assert!(wiki.edits().is_empty());
}

#[test]
fn reference_is_attached_once() {
    let wiki = seeded_wiki();
    let doc = format!(
        r#"
        wds:{stmt} prov:wasDerivedFrom [
            pr:P854 <https://www.themoviedb.org/movie/278> ;
            pr:P813 "2026-10-19"^^xsd:date
        ] .
        wds:{stmt} prov:wasDerivedFrom [
            pr:P854 <https://www.themoviedb.org/movie/278> ;
            pr:P813 "2026-10-19"^^xsd:date
        ] .
        "#,
        stmt = TMDB_STATEMENT
    );
    let edits = run(&wiki, &doc).unwrap();

    let request = only_request(&edits);
    let references = request.claims[0]["references"].as_array().unwrap();
    assert_eq!(references.len(), 1);
    assert_eq!(
        references[0]["snaks"]["P854"][0]["datavalue"]["value"],
        "https://www.themoviedb.org/movie/278"
    );
    assert_eq!(
        references[0]["snaks"]["P813"][0]["datavalue"]["value"]["time"],
        "+2026-10-19T00:00:00Z"
    );
    assert_eq!(edits[0].claims[0].changes.len(), 1);
}

#[test]
fn reference_with_non_reference_predicate_is_fatal() {
    let wiki = seeded_wiki();
    let doc = format!(
        r#"wds:{} prov:wasDerivedFrom [ pq:P854 "x" ] ."#,
        TMDB_STATEMENT
    );
    assert!(matches!(run(&wiki, &doc), Err(PatchError::InvalidReference(_))));
}

// --- Aggregation ---

#[test]
fn changes_to_one_statement_share_one_claim() {
    let wiki = seeded_wiki();
    let doc = format!(
        "wds:{s} wikibase:rank wikibase:DeprecatedRank .\nwds:{s} pq:P2241 wd:Q21441764 .",
        s = TMDB_STATEMENT
    );
    let edits = run(&wiki, &doc).unwrap();

    let request = only_request(&edits);
    assert_eq!(request.claims.len(), 1);
    assert_eq!(request.claims[0]["rank"], "deprecated");
    assert_eq!(
        request.claims[0]["qualifiers"]["P2241"][0]["datavalue"]["value"]["id"],
        "Q21441764"
    );
    assert_eq!(edits[0].claims[0].changes.len(), 2);
}

#[test]
fn direct_value_and_statement_node_for_same_value_share_one_claim() {
    let wiki = seeded_wiki();
    let doc = r#"
        wd:Q1 wdt:P31 wd:Q5 .
        wd:Q1 p:P31 [ ps:P31 wd:Q5 ; pq:P580 "2000-01-01"^^xsd:date ] .
    "#;
    let edits = run(&wiki, doc).unwrap();
    let request = only_request(&edits);
    assert_eq!(request.claims.len(), 1);
    assert_eq!(edits[0].claims[0].changes.len(), 2);
}

#[test]
fn edits_follow_first_change_order_across_items() {
    let wiki = seeded_wiki();
    let doc = format!(
        r#"
        wds:{} wikibase:rank wikibase:PreferredRank .
        wd:Q1 wdt:P31 wd:Q5 .
        wd:Q1292541 wdt:P4947 "364" .
        "#,
        TMDB_STATEMENT
    );
    let edits = run(&wiki, &doc).unwrap();
    let items: Vec<_> = edits.iter().map(|e| e.item.to_string()).collect();
    assert_eq!(items, vec![fixtures::SHAWSHANK, "Q1", fixtures::BATMAN_RETURNS]);
}

// --- Summaries and ignored triples ---

#[test]
fn edit_summary_attaches_to_item() {
    let wiki = seeded_wiki();
    let doc = r#"
        wd:Q1 wdt:P999 "42" ;
            wikidatabots:editSummary "Add answer" .
    "#;
    let edits = run(&wiki, doc).unwrap();
    assert_eq!(only_request(&edits).summary.as_deref(), Some("Add answer"));
}

#[test]
fn statement_edit_summary_attaches_to_its_item() {
    let wiki = seeded_wiki();
    let doc = format!(
        r#"wds:{s} wikibase:rank wikibase:DeprecatedRank ;
            wikidatabots:editSummary "Deprecate TMDb id" ."#,
        s = TMDB_STATEMENT
    );
    let edits = run(&wiki, &doc).unwrap();
    assert_eq!(edits[0].summary.as_deref(), Some("Deprecate TMDb id"));
}

#[test]
fn summary_without_changes_emits_nothing() {
    let wiki = seeded_wiki();
    let doc = r#"wd:Q1 wikidatabots:editSummary "Nothing to do" ."#;
    assert!(run(&wiki, doc).unwrap().is_empty());
}

#[test]
fn default_summary_applies_when_document_has_none() {
    let wiki = seeded_wiki();
    let doc = "wd:Q1 wdt:P31 wd:Q5 .";
    let edits = wdpatch::process_document(wiki.clone(), doc, Some("batch".into())).unwrap();
    assert_eq!(edits[0].summary.as_deref(), Some("batch"));
}

#[test]
fn unknown_and_unimplemented_triples_are_skipped() {
    let wiki = seeded_wiki();
    let doc = r#"
        @prefix ex: <http://example.org/> .
        wd:Q1 ex:likes "cheese" .
        wd:Q1 rdfs:label "Universe"@en .
        wd:Q1 a wikibase:Item .
        ex:thing wdt:P31 wd:Q5 .
    "#;
    assert!(run(&wiki, doc).unwrap().is_empty());
}

#[test]
fn syntax_errors_are_fatal() {
    let wiki = seeded_wiki();
    assert!(matches!(run(&wiki, "wd:Q1 wdt:P31"), Err(PatchError::Rdf(_))));
    assert!(wiki.fetches().is_empty());
}
