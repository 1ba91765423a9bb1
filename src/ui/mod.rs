//! Views of the client: search form, results and detail, plus the ratatui front-end
//! that drives them.

pub mod components;
pub mod detail;
pub mod form;
pub mod nav;
pub mod results;
pub mod tui;

use crate::search::client::SearchError;

/// Blocking message shown to the user until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub message: String,
    /// Technical detail, kept for logs and `--json` output.
    pub detail: Option<String>,
}

impl Alert {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            detail: None,
        }
    }
}

impl From<&SearchError> for Alert {
    fn from(err: &SearchError) -> Self {
        Self {
            message: err.user_message().to_string(),
            detail: match err {
                SearchError::EmptyQuery => None,
                other => Some(other.to_string()),
            },
        }
    }
}

impl std::fmt::Display for Alert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}
