//! Search form: query input plus method selector.

use tracing::warn;

use crate::model::types::{SearchMethod, SearchRequest, SearchResponse};
use crate::search::client::SearchError;
use crate::search::tracker::{RequestTracker, SearchTicket};
use crate::session::SearchSession;
use crate::ui::Alert;
use crate::ui::nav::Route;

#[derive(Debug, Clone, Default)]
pub struct SearchForm {
    pub query: String,
    pub method: SearchMethod,
    tracker: RequestTracker,
}

impl SearchForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_submitting(&self) -> bool {
        self.tracker.is_pending()
    }

    /// Validates the input and issues one request. Blank queries never reach the network.
    pub fn submit(&mut self) -> Result<SearchTicket, Alert> {
        let request = SearchRequest::new(&self.query, self.method)
            .ok_or_else(|| Alert::from(&SearchError::EmptyQuery))?;
        Ok(self.tracker.issue(request))
    }

    /// Turns the response of a submitted request into navigation.
    ///
    /// `Ok(None)` means the response belonged to a superseded submit and was dropped.
    pub fn finish(
        &mut self,
        ticket: &SearchTicket,
        result: Result<SearchResponse, SearchError>,
    ) -> Result<Option<Route>, Alert> {
        if !self.tracker.resolve(ticket.id) {
            return Ok(None);
        }
        match result {
            Ok(response) => Ok(Some(Route::Results(Some(SearchSession {
                query: ticket.request.query.clone(),
                method: ticket.request.method,
                results: response.results,
                metrics: response.metrics,
                selected_category: String::new(),
            })))),
            Err(err) => {
                warn!("search from form failed: {err}");
                Err(Alert::from(&err))
            }
        }
    }
}
