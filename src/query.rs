//! Read-only SPARQL evaluation over a loaded snapshot.
//!
//! Results are flattened into rows of `variable → value` strings so the CLI and
//! the HTTP surface can print or serialize them without caring about RDF term
//! types.

use std::collections::BTreeMap;
use std::path::Path;

use oxigraph::model::{NamedOrBlankNode, Term};
use oxigraph::sparql::QueryResults;
use serde::Serialize;

use crate::error::{QueryError, QueryResult};
use crate::graph::FootballGraph;

/// One result row: variable name → lexical value.
pub type Row = BTreeMap<String, String>;

/// Flattened result of one query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryResponse {
    pub results: Vec<Row>,
    /// Projection order of a SELECT; `boolean` for ASK, the triple positions
    /// for CONSTRUCT/DESCRIBE.
    #[serde(skip)]
    pub variables: Vec<String>,
}

/// Evaluates queries against an immutable graph.
#[derive(Debug, Clone)]
pub struct QueryService {
    graph: FootballGraph,
}

impl QueryService {
    pub fn new(graph: FootballGraph) -> Self {
        Self { graph }
    }

    /// Load the Turtle snapshot at `path`.
    pub fn open(path: &Path) -> QueryResult<Self> {
        Ok(Self::new(FootballGraph::load_turtle(path)?))
    }

    /// Number of triples in the snapshot.
    pub fn triple_count(&self) -> QueryResult<usize> {
        Ok(self.graph.len()?)
    }

    /// Run one SPARQL query.
    #[allow(deprecated)]
    pub fn execute(&self, sparql: &str) -> QueryResult<QueryResponse> {
        let results = self
            .graph
            .store()
            .query(sparql)
            .map_err(|e| QueryError::Parse {
                message: e.to_string(),
            })?;
        let evaluation = |e: &dyn std::fmt::Display| QueryError::Evaluation {
            message: e.to_string(),
        };

        let response = match results {
            QueryResults::Solutions(solutions) => {
                let variables: Vec<String> = solutions
                    .variables()
                    .iter()
                    .map(|v| v.as_str().to_string())
                    .collect();
                let mut rows = Vec::new();
                for solution in solutions {
                    let solution = solution.map_err(|e| evaluation(&e))?;
                    let row: Row = solution
                        .iter()
                        .map(|(var, term)| (var.as_str().to_string(), term_value(term)))
                        .collect();
                    rows.push(row);
                }
                QueryResponse {
                    results: rows,
                    variables,
                }
            }
            QueryResults::Boolean(answer) => QueryResponse {
                results: vec![Row::from([("boolean".to_string(), answer.to_string())])],
                variables: vec!["boolean".into()],
            },
            QueryResults::Graph(triples) => {
                let mut rows = Vec::new();
                for triple in triples {
                    let triple = triple.map_err(|e| evaluation(&e))?;
                    rows.push(Row::from([
                        ("subject".to_string(), subject_value(&triple.subject)),
                        ("predicate".to_string(), triple.predicate.as_str().to_string()),
                        ("object".to_string(), term_value(&triple.object)),
                    ]));
                }
                QueryResponse {
                    results: rows,
                    variables: ["subject", "predicate", "object"]
                        .map(String::from)
                        .to_vec(),
                }
            }
        };
        tracing::debug!(rows = response.results.len(), "query evaluated");
        Ok(response)
    }
}

fn term_value(term: &Term) -> String {
    match term {
        Term::NamedNode(node) => node.as_str().to_string(),
        Term::BlankNode(node) => format!("_:{}", node.as_str()),
        Term::Literal(literal) => literal.value().to_string(),
        #[allow(unreachable_patterns)]
        other => other.to_string(),
    }
}

fn subject_value(subject: &NamedOrBlankNode) -> String {
    match subject {
        NamedOrBlankNode::NamedNode(node) => node.as_str().to_string(),
        NamedOrBlankNode::BlankNode(node) => format!("_:{}", node.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use oxigraph::model::Literal;
    use oxigraph::model::vocab::rdf;

    use super::*;
    use crate::vocab::{self, fb};

    fn sample() -> QueryService {
        let graph = FootballGraph::empty().unwrap();
        let player = vocab::entity("John Smith").unwrap();
        let team = vocab::entity("Arsenal").unwrap();
        graph.insert(&player, rdf::TYPE, fb::PLAYER).unwrap();
        graph.insert(&player, fb::PLAYS_FOR, &team).unwrap();
        graph
            .insert(&player, fb::GOALS, &Literal::from(10_i64))
            .unwrap();
        QueryService::new(graph)
    }

    #[test]
    fn select_flattens_terms() {
        let service = sample();
        let response = service
            .execute(
                "PREFIX fb: <http://example.org/football/>
                 SELECT ?player ?goals ?missing WHERE {
                   ?player fb:goals ?goals .
                   OPTIONAL { ?player fb:assists ?missing }
                 }",
            )
            .unwrap();
        assert_eq!(response.variables, ["player", "goals", "missing"]);
        assert_eq!(response.results.len(), 1);
        let row = &response.results[0];
        assert_eq!(row["player"], "http://example.org/football/John_Smith");
        assert_eq!(row["goals"], "10");
        assert!(!row.contains_key("missing"));
    }

    #[test]
    fn ask_yields_boolean_row() {
        let response = sample()
            .execute("ASK { ?s <http://example.org/football/playsFor> ?o }")
            .unwrap();
        assert_eq!(response.results, vec![Row::from([("boolean".into(), "true".into())])]);
    }

    #[test]
    fn construct_yields_triples() {
        let response = sample()
            .execute(
                "CONSTRUCT { ?s <http://example.org/football/playsFor> ?o }
                 WHERE { ?s <http://example.org/football/playsFor> ?o }",
            )
            .unwrap();
        assert_eq!(response.results.len(), 1);
        assert_eq!(
            response.results[0]["object"],
            "http://example.org/football/Arsenal"
        );
    }

    #[test]
    fn malformed_query_is_client_error() {
        let err = sample().execute("SELEKT * WHERE { ?s ?p ?o }").unwrap_err();
        assert!(matches!(err, QueryError::Parse { .. }));
    }

    #[test]
    fn empty_graph_select_is_empty() {
        let service = QueryService::new(FootballGraph::empty().unwrap());
        let response = service.execute("SELECT * WHERE { ?s ?p ?o }").unwrap();
        assert!(response.results.is_empty());
        assert_eq!(service.triple_count().unwrap(), 0);
    }

    #[test]
    fn serializes_results_only() {
        let response = sample()
            .execute("ASK { ?s ?p ?o }")
            .unwrap();
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({"results": [{"boolean": "true"}]}));
    }
}
