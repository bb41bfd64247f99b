//! Build pipeline: the stages the CLI chains together.
//!
//! `load` maps every configured dataset into a fresh graph, `enrich` is the
//! separate and restartable Wikidata pass, and `save` writes the snapshot the
//! query service reads.

use crate::config::BuildConfig;
use crate::error::KgResult;
use crate::graph::FootballGraph;
use crate::link::{CountryLookup, KnowledgeBase, LinkReport, Linker, WikidataClient};
use crate::mapper::{LoadSummary, load_datasets};

/// Map every dataset in `config` into a new graph seeded with the ontology header.
pub fn load(config: &BuildConfig) -> KgResult<(FootballGraph, LoadSummary)> {
    let graph = FootballGraph::new()?;
    let summary = load_datasets(&graph, config)?;
    Ok((graph, summary))
}

/// Link `graph` against Wikidata using the endpoints in `config`.
pub fn enrich(graph: &FootballGraph, config: &BuildConfig) -> KgResult<LinkReport> {
    let client = WikidataClient::new(&config.wikidata);
    enrich_with(graph, config, &client)
}

/// Link `graph` against an arbitrary knowledge base.
pub fn enrich_with<K: KnowledgeBase>(
    graph: &FootballGraph,
    config: &BuildConfig,
    kb: &K,
) -> KgResult<LinkReport> {
    let countries = CountryLookup::load(&config.lookup_file)?;
    let report = Linker::new(graph, kb, &countries).link_all()?;
    Ok(report)
}

/// Write `graph` to the configured snapshot path.
pub fn save(graph: &FootballGraph, config: &BuildConfig) -> KgResult<()> {
    graph.save_turtle(&config.output)?;
    Ok(())
}
