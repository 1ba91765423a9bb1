//! Raw response shapes of `/api/search` and their normalization.
//!
//! The service has answered in two shapes over time:
//!
//! - legacy: a bare array of `{nombre_archivo, similitud, texto}`
//! - current: `{resultados: [{titulo, texto, similitud, cats}], metricas, categories}`
//!
//! Both are decoded here and turned into a single [`SearchResponse`].

use serde::{Deserialize, Deserializer};

use super::types::{MetricsSummary, ResultItem, SearchResponse};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireResponse {
    Legacy(Vec<WireItem>),
    Current(WireEnvelope),
}

#[derive(Debug, Default, Deserialize)]
struct WireEnvelope {
    #[serde(default, deserialize_with = "null_as_default")]
    resultados: Vec<WireItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    metricas: WireMetrics,
}

#[derive(Debug, Default, Deserialize)]
struct WireItem {
    #[serde(default, alias = "titulo", alias = "nombre_archivo")]
    title: Option<String>,
    #[serde(default, alias = "texto")]
    text: Option<String>,
    #[serde(default, alias = "similitud")]
    similarity: Option<f64>,
    #[serde(default, alias = "cats", deserialize_with = "string_or_list")]
    categories: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WireMetrics {
    #[serde(default)]
    precision: Option<f64>,
    #[serde(default)]
    recall: Option<f64>,
    #[serde(default, alias = "f1_score")]
    f1: Option<f64>,
}

impl From<WireItem> for ResultItem {
    fn from(raw: WireItem) -> Self {
        ResultItem {
            title: raw.title.unwrap_or_default(),
            full_text: raw.text.unwrap_or_default(),
            similarity: raw.similarity.unwrap_or_default(),
            categories: raw.categories.join(","),
        }
    }
}

impl From<WireMetrics> for MetricsSummary {
    fn from(raw: WireMetrics) -> Self {
        MetricsSummary {
            precision: raw.precision,
            recall: raw.recall,
            f1: raw.f1,
        }
    }
}

impl From<WireResponse> for SearchResponse {
    fn from(raw: WireResponse) -> Self {
        match raw {
            WireResponse::Legacy(items) => SearchResponse {
                results: items.into_iter().map(ResultItem::from).collect(),
                metrics: MetricsSummary::default(),
            },
            WireResponse::Current(env) => SearchResponse {
                results: env.resultados.into_iter().map(ResultItem::from).collect(),
                metrics: env.metricas.into(),
            },
        }
    }
}

/// Decodes a response body in either shape.
pub fn decode_response(body: &str) -> Result<SearchResponse, serde_json::Error> {
    let raw: WireResponse = serde_json::from_str(body)?;
    Ok(raw.into())
}

fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

/// Accepts `"a,b"`, `["a", "b"]` or `null`.
fn string_or_list<'de, D>(de: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<Raw>::deserialize(de)? {
        None => Vec::new(),
        Some(Raw::One(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Raw::Many(list)) => list
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
    })
}
