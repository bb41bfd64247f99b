//! Blocking Wikidata client.
//!
//! Uses `ureq` for synchronous HTTP requests: one call at a time, no retry.
//! A per-request timeout keeps a stalled endpoint from hanging the pass forever.

use std::time::Duration;

use serde::Deserialize;

use super::KnowledgeBase;
use crate::config::WikidataConfig;
use crate::error::{LinkError, LinkResult};

/// `wbsearchentities` response body.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    id: String,
}

/// SPARQL JSON results body for an ASK query.
#[derive(Debug, Deserialize)]
struct AskResponse {
    boolean: bool,
}

/// Wikidata entity search plus the public query service.
pub struct WikidataClient {
    agent: ureq::Agent,
    search_url: String,
    sparql_url: String,
    language: String,
}

impl WikidataClient {
    pub fn new(config: &WikidataConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build();
        Self {
            agent,
            search_url: config.search_url.clone(),
            sparql_url: config.sparql_url.clone(),
            language: config.language.clone(),
        }
    }
}

impl KnowledgeBase for WikidataClient {
    fn search(&self, label: &str) -> LinkResult<Vec<String>> {
        let url = &self.search_url;
        let response = self
            .agent
            .get(url)
            .query("action", "wbsearchentities")
            .query("search", label)
            .query("language", &self.language)
            .query("format", "json")
            .query("type", "item")
            .call()
            .map_err(|e| request_error(url, e))?;
        let body: SearchResponse = response.into_json().map_err(|e| LinkError::Response {
            url: url.clone(),
            message: e.to_string(),
        })?;
        Ok(body.search.into_iter().map(|hit| hit.id).collect())
    }

    fn ask(&self, query: &str) -> LinkResult<bool> {
        let url = &self.sparql_url;
        let response = self
            .agent
            .get(url)
            .set("Accept", "application/sparql-results+json")
            .query("query", query)
            .query("format", "json")
            .call()
            .map_err(|e| request_error(url, e))?;
        let body: AskResponse = response.into_json().map_err(|e| LinkError::Response {
            url: url.clone(),
            message: e.to_string(),
        })?;
        Ok(body.boolean)
    }
}

fn request_error(url: &str, error: ureq::Error) -> LinkError {
    match error {
        ureq::Error::Status(status, _) => LinkError::Status {
            url: url.to_string(),
            status,
        },
        ureq::Error::Transport(transport) => LinkError::Transport {
            url: url.to_string(),
            message: transport.to_string(),
        },
    }
}
