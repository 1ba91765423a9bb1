//! HTTP client for the remote `/api/search` endpoint.

use std::future::Future;
use std::time::{Duration, Instant};

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::model::types::{SearchRequest, SearchResponse};
use crate::model::wire::decode_response;

/// Alert shown for an empty query.
pub const EMPTY_QUERY_MESSAGE: &str = "Por favor, ingresa una consulta.";
/// Alert shown for every other failure.
pub const SEARCH_FAILED_MESSAGE: &str = "No se pudo realizar la búsqueda. Intenta nuevamente.";

/// Path of the search route relative to the configured endpoint.
pub const SEARCH_PATH: &str = "/api/search";

/// Errors surfaced by a search attempt.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("query must not be empty")]
    EmptyQuery,

    #[error("search service returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("search request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid search response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl SearchError {
    /// Generic text shown to the user; details stay in the logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::EmptyQuery => EMPTY_QUERY_MESSAGE,
            _ => SEARCH_FAILED_MESSAGE,
        }
    }
}

/// Anything able to answer a [`SearchRequest`].
pub trait SearchBackend: Send + Sync {
    fn search(
        &self,
        request: &SearchRequest,
    ) -> impl Future<Output = Result<SearchResponse, SearchError>> + Send;
}

/// `reqwest`-backed implementation talking JSON over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSearchClient {
    client: Client,
    url: String,
}

impl HttpSearchClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("alphaquery/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url: search_url(endpoint),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, SearchError> {
        Self::new(&config.endpoint, config.timeout)
    }
}

impl SearchBackend for HttpSearchClient {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        let started = Instant::now();
        info!(
            url = %self.url,
            query = %request.query,
            method = %request.method,
            "search_start"
        );

        let resp = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await
            .inspect_err(|e| warn!("search request failed: {e}"))?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), body = %body, "search service error");
            return Err(SearchError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed = decode_response(&body).inspect_err(|e| {
            warn!("search response not decodable: {e}");
            debug!(body = %body, "undecodable body");
        })?;

        info!(
            results = parsed.results.len(),
            latency_ms = started.elapsed().as_millis() as u64,
            "search_done"
        );
        Ok(parsed)
    }
}

/// Joins the endpoint base with [`SEARCH_PATH`], tolerating a trailing slash or a full URL.
pub fn search_url(endpoint: &str) -> String {
    let base = endpoint.trim().trim_end_matches('/');
    if base.ends_with(SEARCH_PATH) {
        base.to_string()
    } else {
        format!("{base}{SEARCH_PATH}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_url_variants() {
        assert_eq!(
            search_url("http://127.0.0.1:5000"),
            "http://127.0.0.1:5000/api/search"
        );
        assert_eq!(
            search_url("http://127.0.0.1:5000/"),
            "http://127.0.0.1:5000/api/search"
        );
        assert_eq!(
            search_url("http://host/api/search/"),
            "http://host/api/search"
        );
    }

    #[test]
    fn user_messages_are_generic() {
        assert_eq!(SearchError::EmptyQuery.user_message(), EMPTY_QUERY_MESSAGE);
        let http = SearchError::Http {
            status: 500,
            body: "Error interno del servidor".into(),
        };
        assert_eq!(http.user_message(), SEARCH_FAILED_MESSAGE);
        assert!(http.to_string().contains("500"));
    }
}
