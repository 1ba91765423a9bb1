//! The cached search session and the stores that hold it.
//!
//! A session is a single slot: every save replaces the previous value wholesale. On disk it
//! is kept as five string slots (`searchQuery`, `searchMethod`, `searchResults`,
//! `searchMetrics`, `selectedCategory`). The two JSON-valued slots are decoded
//! defensively so a damaged cache degrades to an empty session instead of an error.

mod file;
mod memory;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::types::{MetricsSummary, ResultItem, SearchMethod};

/// Everything the Results View needs to re-render itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchSession {
    pub query: String,
    pub method: SearchMethod,
    /// The full, unfiltered result list of the last search.
    pub results: Vec<ResultItem>,
    pub metrics: MetricsSummary,
    /// Active category filter; empty means no filter.
    pub selected_category: String,
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("session store I/O failed at {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Read/write contract for the session slot.
pub trait SessionStore {
    /// Last saved session, or `None` when nothing usable was stored.
    fn load(&self) -> Option<SearchSession>;

    /// Replace the stored session.
    fn save(&mut self, session: &SearchSession) -> Result<(), SessionError>;

    /// Forget the stored session.
    fn clear(&mut self) -> Result<(), SessionError>;
}

/// Serialized form: all slots are strings, JSON slots hold JSON text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSlots {
    #[serde(rename = "searchQuery", default, skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
    #[serde(rename = "searchMethod", default, skip_serializing_if = "Option::is_none")]
    pub search_method: Option<String>,
    #[serde(rename = "searchResults", default, skip_serializing_if = "Option::is_none")]
    pub search_results: Option<String>,
    #[serde(rename = "searchMetrics", default, skip_serializing_if = "Option::is_none")]
    pub search_metrics: Option<String>,
    #[serde(rename = "selectedCategory", default, skip_serializing_if = "Option::is_none")]
    pub selected_category: Option<String>,
}

impl SessionSlots {
    pub fn encode(session: &SearchSession) -> Result<Self, serde_json::Error> {
        Ok(Self {
            search_query: Some(session.query.clone()),
            search_method: Some(session.method.as_str().to_string()),
            search_results: Some(serde_json::to_string(&session.results)?),
            search_metrics: Some(serde_json::to_string(&session.metrics)?),
            selected_category: Some(session.selected_category.clone()),
        })
    }

    /// `None` when no slot is populated at all.
    pub fn decode(&self) -> Option<SearchSession> {
        if *self == Self::default() {
            return None;
        }

        let method = self
            .search_method
            .as_deref()
            .and_then(SearchMethod::parse)
            .unwrap_or_default();

        let results = self
            .search_results
            .as_deref()
            .and_then(|raw| {
                serde_json::from_str::<Vec<ResultItem>>(raw)
                    .inspect_err(|e| tracing::warn!("discarding cached results: {e}"))
                    .ok()
            })
            .unwrap_or_default();

        let metrics = self
            .search_metrics
            .as_deref()
            .and_then(|raw| {
                serde_json::from_str::<MetricsSummary>(raw)
                    .inspect_err(|e| tracing::warn!("discarding cached metrics: {e}"))
                    .ok()
            })
            .unwrap_or_default();

        Some(SearchSession {
            query: self.search_query.clone().unwrap_or_default(),
            method,
            results,
            metrics,
            selected_category: self.selected_category.clone().unwrap_or_default(),
        })
    }
}
