//! Normalized search entities shared by the client, the session store and the views.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Characters of full text kept in a result card preview.
pub const PREVIEW_CHARS: usize = 200;

/// Retrieval method understood by the search service.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SearchMethod {
    Bow,
    #[default]
    Tfidf,
    Word2vec,
}

impl SearchMethod {
    pub const ALL: [SearchMethod; 3] = [Self::Bow, Self::Tfidf, Self::Word2vec];

    /// Wire value sent in the request body.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bow => "bow",
            Self::Tfidf => "tfidf",
            Self::Word2vec => "word2vec",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Bow => "Bag of Words (BoW)",
            Self::Tfidf => "TF-IDF",
            Self::Word2vec => "Word2Vec",
        }
    }

    /// Lenient parse used when reading cached state. Unknown values yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "bow" => Some(Self::Bow),
            "tfidf" | "tf-idf" => Some(Self::Tfidf),
            "word2vec" => Some(Self::Word2vec),
            _ => None,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Bow => Self::Tfidf,
            Self::Tfidf => Self::Word2vec,
            Self::Word2vec => Self::Bow,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Bow => Self::Word2vec,
            Self::Tfidf => Self::Bow,
            Self::Word2vec => Self::Tfidf,
        }
    }
}

impl fmt::Display for SearchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /api/search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    pub query: String,
    pub method: SearchMethod,
}

impl SearchRequest {
    /// Trims the query; returns `None` when nothing is left to send.
    pub fn new(query: &str, method: SearchMethod) -> Option<Self> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        Some(Self {
            query: query.to_string(),
            method,
        })
    }
}

/// One document returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultItem {
    pub title: String,
    pub full_text: String,
    pub similarity: f64,
    /// Comma-joined category labels, possibly empty.
    #[serde(default)]
    pub categories: String,
}

impl ResultItem {
    pub fn preview(&self) -> String {
        truncate_chars(&self.full_text, PREVIEW_CHARS)
    }

    /// Category labels, trimmed, empties dropped.
    pub fn category_list(&self) -> Vec<&str> {
        self.categories
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Retrieval quality metrics reported alongside the results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    #[serde(default)]
    pub precision: Option<f64>,
    #[serde(default)]
    pub recall: Option<f64>,
    #[serde(default)]
    pub f1: Option<f64>,
}

impl MetricsSummary {
    pub fn is_empty(&self) -> bool {
        self.precision.is_none() && self.recall.is_none() && self.f1.is_none()
    }
}

/// A search response after normalization at the network boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResponse {
    pub results: Vec<ResultItem>,
    pub metrics: MetricsSummary,
}

/// Renders a metric for display, `N/A` when absent.
pub fn format_metric(value: Option<f64>) -> String {
    match value {
        Some(v) => format_score(v),
        None => "N/A".to_string(),
    }
}

/// Up to four decimals, trailing zeros trimmed (`0.8`, `0.7712`).
pub fn format_score(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let fixed = format!("{value:.4}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}
