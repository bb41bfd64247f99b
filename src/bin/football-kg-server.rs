//! football-kg SPARQL server.
//!
//! Loads a Turtle snapshot once at startup and answers queries against it:
//!
//! - `GET  /sparql?query=...` : evaluate a query
//! - `POST /sparql` : evaluate `{"query": "..."}`
//! - `GET  /health` : server status
//!
//! Environment:
//! - `FOOTBALL_KG_BIND` (default `0.0.0.0`) and `FOOTBALL_KG_PORT` (default `8000`)
//! - `FOOTBALL_KG_SNAPSHOT` (default `football_ontology.ttl`)
//!
//! Build and run: `cargo run --features server --bin football-kg-server`

use std::path::PathBuf;

use football_kg::query::QueryService;
use football_kg::server;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let bind = std::env::var("FOOTBALL_KG_BIND").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("FOOTBALL_KG_PORT").unwrap_or_else(|_| "8000".to_string());
    let addr = format!("{bind}:{port}");
    let snapshot = std::env::var("FOOTBALL_KG_SNAPSHOT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("football_ontology.ttl"));

    let service = QueryService::open(&snapshot).unwrap_or_else(|e| {
        tracing::error!("failed to load snapshot {}: {e}", snapshot.display());
        std::process::exit(1);
    });
    match service.triple_count() {
        Ok(triples) => tracing::info!(
            snapshot = %snapshot.display(),
            triples,
            "football-kg server initialized"
        ),
        Err(e) => tracing::warn!(error = %e, "could not count snapshot triples"),
    }

    let app = server::router(service);

    tracing::info!("football-kg server listening on {addr}");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {e}");
        std::process::exit(1);
    }
}
