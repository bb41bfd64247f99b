//! HTTP surface for the query service.
//!
//! - `GET  /sparql?query=...` : evaluate a query
//! - `POST /sparql` with `{"query": "..."}` : same, for long queries
//! - `GET  /health` : status, version and triple count
//!
//! Query failures and malformed requests are client errors:
//! `400 {"detail": "<message>"}`.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::error::QueryError;
use crate::query::{QueryResponse, QueryService};

/// Shared state: one immutable snapshot for every request.
pub struct ServerState {
    service: QueryService,
}

impl ServerState {
    pub fn new(service: QueryService) -> Self {
        Self { service }
    }
}

#[derive(Debug, Deserialize)]
pub struct SparqlParams {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub triples: usize,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ErrorDetail {
    pub detail: String,
}

type ApiError = (StatusCode, Json<ErrorDetail>);

fn query_error(e: QueryError) -> ApiError {
    let status = match e {
        QueryError::Graph(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    };
    (
        status,
        Json(ErrorDetail {
            detail: e.to_string(),
        }),
    )
}

fn rejection_error(detail: String) -> ApiError {
    tracing::warn!(error = %detail, "request rejected");
    (StatusCode::BAD_REQUEST, Json(ErrorDetail { detail }))
}

fn evaluate(state: &ServerState, sparql: &str) -> Result<Json<QueryResponse>, ApiError> {
    match state.service.execute(sparql) {
        Ok(response) => {
            tracing::info!(rows = response.results.len(), "query answered");
            Ok(Json(response))
        }
        Err(e) => {
            tracing::warn!(error = %e, "query rejected");
            Err(query_error(e))
        }
    }
}

pub async fn health(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<HealthResponse>, ApiError> {
    let triples = state.service.triple_count().map_err(query_error)?;
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        triples,
    }))
}

pub async fn sparql_get(
    State(state): State<Arc<ServerState>>,
    params: Result<Query<SparqlParams>, QueryRejection>,
) -> Result<Json<QueryResponse>, ApiError> {
    let Query(params) = params.map_err(|e| rejection_error(e.body_text()))?;
    evaluate(&state, &params.query)
}

pub async fn sparql_post(
    State(state): State<Arc<ServerState>>,
    params: Result<Json<SparqlParams>, JsonRejection>,
) -> Result<Json<QueryResponse>, ApiError> {
    let Json(params) = params.map_err(|e| rejection_error(e.body_text()))?;
    evaluate(&state, &params.query)
}

/// Build the application router around `service`.
pub fn router(service: QueryService) -> Router {
    let state = Arc::new(ServerState::new(service));
    Router::new()
        .route("/health", get(health))
        .route("/sparql", get(sparql_get).post(sparql_post))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use oxigraph::model::Literal;
    use oxigraph::model::vocab::rdf;

    use super::*;
    use crate::graph::FootballGraph;
    use crate::vocab::{self, fb};

    fn state() -> Arc<ServerState> {
        let graph = FootballGraph::empty().unwrap();
        let player = vocab::entity("John Smith").unwrap();
        graph.insert(&player, rdf::TYPE, fb::PLAYER).unwrap();
        graph
            .insert(&player, fb::GOALS, &Literal::from(10_i64))
            .unwrap();
        Arc::new(ServerState::new(QueryService::new(graph)))
    }

    #[tokio::test]
    async fn health_reports_triple_count() {
        let Json(body) = health(State(state())).await.unwrap();
        assert_eq!(body.status, "ok");
        assert_eq!(body.triples, 2);
    }

    #[tokio::test]
    async fn get_returns_rows() {
        let params = SparqlParams {
            query: "PREFIX fb: <http://example.org/football/>
                    SELECT ?goals WHERE { ?p fb:goals ?goals }"
                .into(),
        };
        let Json(body) = sparql_get(State(state()), Ok(Query(params))).await.unwrap();
        assert_eq!(body.results.len(), 1);
        assert_eq!(body.results[0]["goals"], "10");
    }

    #[tokio::test]
    async fn malformed_query_is_bad_request() {
        let params = SparqlParams {
            query: "SELECT WHERE {".into(),
        };
        let (status, Json(body)) = sparql_post(State(state()), Ok(Json(params)))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!body.detail.is_empty());
    }

    #[tokio::test]
    async fn ask_over_post() {
        let params = SparqlParams {
            query: "ASK { ?s ?p ?o }".into(),
        };
        let Json(body) = sparql_post(State(state()), Ok(Json(params))).await.unwrap();
        assert_eq!(body.results[0]["boolean"], "true");
    }

    #[tokio::test]
    async fn missing_query_parameter_is_bad_request() {
        let uri: axum::http::Uri = "/sparql?q=ASK".parse().unwrap();
        let params = Query::<SparqlParams>::try_from_uri(&uri);
        assert!(params.is_err());

        let (status, Json(body)) = sparql_get(State(state()), params).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.detail.contains("query"), "{}", body.detail);
    }

    #[tokio::test]
    async fn body_without_query_is_bad_request() {
        let params = Json::<SparqlParams>::from_bytes(br#"{"sparql": "ASK {}"}"#);
        let (status, Json(body)) = sparql_post(State(state()), params).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!body.detail.is_empty());
    }

    #[test]
    fn router_builds() {
        let graph = FootballGraph::empty().unwrap();
        let _app = router(QueryService::new(graph));
    }
}
