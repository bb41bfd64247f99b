// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # football-kg
//!
//! Builds an RDF knowledge graph of football players, teams, countries and
//! leagues from CSV statistics files, links the entities to Wikidata, and
//! serves the resulting Turtle snapshot over a small SPARQL endpoint.
//!
//! ## Architecture
//!
//! - **Vocabulary** (`vocab`): the `fb:` namespace, class/property IRIs, ontology header
//! - **Graph** (`graph`): an oxigraph-backed [`graph::FootballGraph`] handle with Turtle I/O
//! - **Mapper** (`mapper`): CSV rows to players, teams and anonymous stats records
//! - **Linker** (`link`): best-effort `owl:sameAs` enrichment against Wikidata
//! - **Pipeline** (`pipeline`): load, enrich and save stages used by the CLI
//! - **Query** (`query`): read-only SPARQL evaluation over a snapshot
//! - **Server** (`server`, feature `server`): HTTP surface for the query service
//!
//! ## Library usage
//!
//! ```no_run
//! use football_kg::config::BuildConfig;
//! use football_kg::pipeline;
//! use football_kg::query::QueryService;
//!
//! let config = BuildConfig::default();
//! let (graph, _summary) = pipeline::load(&config).unwrap();
//! pipeline::save(&graph, &config).unwrap();
//!
//! let service = QueryService::open(&config.output).unwrap();
//! let response = service.execute("ASK { ?s ?p ?o }").unwrap();
//! assert_eq!(response.results[0]["boolean"], "true");
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod link;
pub mod mapper;
pub mod pipeline;
pub mod query;
pub mod reports;
#[cfg(feature = "server")]
pub mod server;
pub mod vocab;
