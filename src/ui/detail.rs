//! Detail view of a single result.

use crate::model::types::{ResultItem, SearchMethod, format_score};
use crate::session::SearchSession;
use crate::ui::nav::Route;

/// Label shown when a result has no categories.
pub const NO_CATEGORY: &str = "Sin categoría";

#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub item: ResultItem,
    /// Session that was current when the detail was opened.
    pub session: SearchSession,
}

impl DetailView {
    pub fn new(item: ResultItem, session: SearchSession) -> Self {
        Self { item, session }
    }

    pub fn title(&self) -> &str {
        &self.item.title
    }

    pub fn category_label(&self) -> &str {
        if self.item.categories.trim().is_empty() {
            NO_CATEGORY
        } else {
            &self.item.categories
        }
    }

    pub fn text(&self) -> &str {
        &self.item.full_text
    }

    pub fn method(&self) -> SearchMethod {
        self.session.method
    }

    pub fn similarity_label(&self) -> String {
        format_score(self.item.similarity)
    }

    /// Route back to the results with the session the detail was opened from.
    pub fn back(self) -> Route {
        Route::Results(Some(self.session))
    }
}
