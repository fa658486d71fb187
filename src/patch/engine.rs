//! PatchEngine: walks an RDF graph and applies it to wiki claims

use super::aggregate::{ChangeAggregator, ClaimChange, FinalizedEdit};
use super::classify::{
    classify, classify_statement, object_target, Operation, ResolvedTerm, StatementOp,
};
use super::mutate;
use super::{PatchError, PatchResult};
use crate::entity::{
    ClaimKey, EntityStore, ItemId, PropertyId, Reference, Snak, SnakGroups,
};
use crate::rdf::{self, vocab, Graph, Term, Triple};
use crate::resolve::{EntityRef, Resolver, ValueForm, Vocab};
use crate::wiki::WikiClient;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// One patch run.
///
/// Owns the resolver (caches and loaded items) and the change aggregator.
/// Feed it graphs with [`PatchEngine::process_graph`], then call
/// [`PatchEngine::finalize`] for the per-item edits.
///
/// A triple whose wiki lookup fails transiently is skipped and counted in
/// [`PatchEngine::failed_triples`]; the rest of the graph still applies.
pub struct PatchEngine {
    resolver: Resolver,
    aggregator: ChangeAggregator,
    failed_triples: usize,
}

impl PatchEngine {
    pub fn new(wiki: Arc<dyn WikiClient>) -> Self {
        Self {
            resolver: Resolver::new(wiki),
            aggregator: ChangeAggregator::new(),
            failed_triples: 0,
        }
    }

    /// Summary used for items whose triples carry none.
    pub fn with_default_summary(mut self, summary: Option<String>) -> Self {
        self.aggregator = self.aggregator.with_default_summary(summary);
        self
    }

    /// Parse a Turtle document and process it.
    pub fn process_document(&mut self, input: &str) -> PatchResult<()> {
        let graph = rdf::parse(input)?;
        debug!("Parsed {} triples", graph.len());
        self.process_graph(&graph)
    }

    /// Visit every subject in first-seen order and apply its triples.
    pub fn process_graph(&mut self, graph: &Graph) -> PatchResult<()> {
        for subject in graph.subjects() {
            for (predicate, object) in graph.predicate_objects(subject) {
                let triple = Triple::new(subject.clone(), predicate, object.clone());
                match self.process_triple(graph, &triple) {
                    Ok(()) => {}
                    Err(e) if e.is_recoverable() => {
                        error!("Skipping {}: {}", triple, e);
                        self.failed_triples += 1;
                    }
                    Err(e) => return Err(e),
                }
            }
        }
        Ok(())
    }

    /// Triples skipped because the wiki failed while applying them.
    pub fn failed_triples(&self) -> usize {
        self.failed_triples
    }

    fn process_triple(&mut self, graph: &Graph, triple: &Triple) -> PatchResult<()> {
        let subject = self.resolve_term(&triple.subject)?;
        let predicate = self.resolve_iri(&triple.predicate)?;
        let object = self.resolve_term(&triple.object)?;
        let operation = classify(&subject, &predicate, &object)?;
        self.apply(graph, &triple.subject, triple, operation)
    }

    /// Serialize the pending changes into one edit per item.
    pub fn finalize(&self) -> Vec<FinalizedEdit> {
        self.aggregator.finalize(self.resolver.store())
    }

    pub fn aggregator(&self) -> &ChangeAggregator {
        &self.aggregator
    }

    pub fn store(&self) -> &EntityStore {
        self.resolver.store()
    }

    fn resolve_iri(&mut self, iri: &str) -> PatchResult<ResolvedTerm> {
        Ok(match self.resolver.entity_ref(iri)? {
            Some(entity) => ResolvedTerm::Entity(entity),
            None => ResolvedTerm::Iri(iri.to_string()),
        })
    }

    fn resolve_term(&mut self, term: &Term) -> PatchResult<ResolvedTerm> {
        match term {
            Term::Iri(iri) => self.resolve_iri(iri),
            Term::Blank(label) => Ok(ResolvedTerm::Blank(label.clone())),
            Term::Literal(literal) => Ok(ResolvedTerm::Literal(literal.clone())),
        }
    }

    fn apply(
        &mut self,
        graph: &Graph,
        subject: &Term,
        triple: &Triple,
        operation: Operation,
    ) -> PatchResult<()> {
        match operation {
            Operation::Skip => debug!("Skip: {}", triple),

            Operation::AppendClaimTarget { item, property, target } => {
                let loaded = self.resolver.load_item(&item)?;
                let (changed, key) = mutate::append_claim_target(loaded, &property, &target);
                if changed {
                    info!("{}: new {} claim {}", item, property, target);
                    self.aggregator.record(&key, ClaimChange::Created { value: target });
                }
            }

            Operation::AppendStatement { item, property, node } => {
                self.append_statement(graph, &item, &property, &node)?;
            }

            Operation::EditSummary { item, summary } => self.aggregator.set_summary(&item, summary),

            Operation::Statement { statement, op } => {
                let iri = subject.as_iri().unwrap_or_default();
                let key = self.resolver.resolve_statement(iri, &statement)?;
                self.apply_statement(graph, &key, triple, op)?;
            }

            Operation::Unimplemented(what) => error!("Unimplemented {} triple: {}", what, triple),

            Operation::Unrecognized => warn!("Unknown triple: {}", triple),
        }
        Ok(())
    }

    /// `wd:Q p:P _:b`: append the node's `ps:` value, then apply the node's
    /// other triples to the resulting claim.
    fn append_statement(
        &mut self,
        graph: &Graph,
        item: &ItemId,
        property: &PropertyId,
        node: &str,
    ) -> PatchResult<()> {
        let node_term = Term::Blank(node.to_string());
        let value_predicate = format!("{}{}", vocab::wd::STATEMENT_SIMPLE, property);
        let value = graph
            .value(&node_term, &value_predicate)
            .ok_or_else(|| PatchError::MissingStatementValue {
                property: property.clone(),
                node: node.to_string(),
            })?
            .clone();
        let resolved_value = self.resolve_term(&value)?;
        let target = object_target(&resolved_value)?
            .ok_or_else(|| PatchError::InvalidTarget(value.to_string()))?;

        let loaded = self.resolver.load_item(item)?;
        let (changed, key) = mutate::append_claim_target(loaded, property, &target);
        if changed {
            info!("{}: new {} statement {}", item, property, target);
            self.aggregator.record(&key, ClaimChange::Created { value: target });
        }

        for (predicate, object) in graph.predicate_objects(&node_term) {
            let triple = Triple::new(node_term.clone(), predicate, object.clone());
            let resolved_predicate = self.resolve_iri(predicate)?;
            let resolved_object = self.resolve_term(object)?;
            let op = classify_statement(&resolved_predicate, &resolved_object)?;
            self.apply_statement(graph, &key, &triple, op)?;
        }
        Ok(())
    }

    fn apply_statement(
        &mut self,
        graph: &Graph,
        key: &ClaimKey,
        triple: &Triple,
        op: StatementOp,
    ) -> PatchResult<()> {
        match op {
            StatementOp::Skip => debug!("Skip: {}", triple),

            StatementOp::AppendQualifier { property, target } => {
                let claim = self.resolver.claim_mut(key)?;
                let (changed, _) = mutate::append_qualifier(claim, &property, &target);
                if changed {
                    info!("{}: qualifier {} = {}", key, property, target);
                    let change = ClaimChange::QualifierAdded {
                        property,
                        value: target,
                    };
                    self.aggregator.record(key, change);
                }
            }

            StatementOp::SetValue { property, target } => {
                let claim = self.resolver.claim_mut(key)?;
                let from = claim.value().cloned();
                if mutate::set_statement_value(claim, &property, &target)? {
                    info!("{}: value -> {}", key, target);
                    self.aggregator.record(key, ClaimChange::ValueChanged { from, to: target });
                }
            }

            StatementOp::SetRank(rank) => {
                let claim = self.resolver.claim_mut(key)?;
                let from = claim.rank;
                if mutate::set_rank(claim, rank) {
                    info!("{}: rank {} -> {}", key, from, rank);
                    self.aggregator.record(key, ClaimChange::RankChanged { from, to: rank });
                }
            }

            StatementOp::AddReference { node } => {
                let reference = self.build_reference(graph, &node)?;
                let properties: Vec<PropertyId> = reference.snaks.properties().cloned().collect();
                let claim = self.resolver.claim_mut(key)?;
                if mutate::add_reference(claim, reference) {
                    info!("{}: reference added", key);
                    self.aggregator.record(key, ClaimChange::ReferenceAdded { properties });
                }
            }

            StatementOp::EditSummary(summary) => self.aggregator.set_summary(&key.item, summary),

            StatementOp::Unimplemented(what) => error!("Unimplemented {} triple: {}", what, triple),

            StatementOp::Unrecognized => warn!("Unknown statement triple: {}", triple),
        }
        Ok(())
    }

    /// Collect a `prov:wasDerivedFrom` node's `pr:` triples into a reference.
    fn build_reference(&mut self, graph: &Graph, node: &str) -> PatchResult<Reference> {
        let node_term = Term::Blank(node.to_string());
        let mut snaks = SnakGroups::new();
        for (predicate, object) in graph.predicate_objects(&node_term) {
            let triple = Triple::new(node_term.clone(), predicate, object.clone());
            let property = match self.resolve_iri(predicate)? {
                ResolvedTerm::Entity(EntityRef::Reference(property, ValueForm::Simple)) => property,
                ResolvedTerm::Entity(EntityRef::Vocab(Vocab::Type)) => continue,
                _ => return Err(PatchError::InvalidReference(triple.to_string())),
            };
            let resolved_object = self.resolve_term(object)?;
            let target = object_target(&resolved_object)?
                .ok_or_else(|| PatchError::InvalidReference(triple.to_string()))?;
            snaks.push(Snak::new(property, target));
        }
        Ok(Reference::new(snaks))
    }
}

/// Parse and process one document against a wiki, returning the finalized
/// per-item edits.
pub fn process_document(
    wiki: Arc<dyn WikiClient>,
    input: &str,
    default_summary: Option<String>,
) -> PatchResult<Vec<FinalizedEdit>> {
    let mut engine = PatchEngine::new(wiki).with_default_summary(default_summary);
    engine.process_document(input)?;
    Ok(engine.finalize())
}
