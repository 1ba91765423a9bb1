//! Results view state: the current search session, category filter and pagination.
//!
//! Every mutation of the session fields (query, method, results, metrics, category) is
//! followed by a full rewrite of the session store, so the cache always mirrors what is
//! on screen.

use std::ops::Range;

use tracing::{debug, warn};

use crate::config::CategoryMatch;
use crate::model::types::{MetricsSummary, ResultItem, SearchMethod, SearchRequest, SearchResponse};
use crate::search::client::{SearchBackend, SearchError};
use crate::search::tracker::{RequestTracker, SearchTicket};
use crate::session::{SearchSession, SessionStore};
use crate::ui::Alert;
use crate::ui::detail::DetailView;

/// Results per page.
pub const PAGE_SIZE: usize = 5;

/// What happened to a finished request.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Results and metrics were replaced.
    Applied,
    /// The request failed; prior results are still shown.
    Failed(Alert),
    /// A newer request was issued meanwhile; the response was dropped.
    Stale,
}

pub struct ResultsView<S: SessionStore> {
    store: S,
    category_match: CategoryMatch,
    query: String,
    method: SearchMethod,
    all_results: Vec<ResultItem>,
    filtered: Vec<ResultItem>,
    metrics: MetricsSummary,
    selected_category: String,
    page: usize,
    tracker: RequestTracker,
    /// Request behind the latest ticket; its query and method are adopted on success.
    in_flight: Option<SearchRequest>,
    alert: Option<Alert>,
}

impl<S: SessionStore> ResultsView<S> {
    /// Navigation state wins over the cache; with neither the view starts empty.
    pub fn initialize(store: S, category_match: CategoryMatch, nav: Option<SearchSession>) -> Self {
        let session = match nav {
            Some(session) => {
                debug!("results view: adopting navigation state");
                session
            }
            None => match store.load() {
                Some(session) => {
                    debug!(results = session.results.len(), "results view: restored cached session");
                    session
                }
                None => SearchSession::default(),
            },
        };

        let mut view = Self {
            store,
            category_match,
            query: session.query,
            method: session.method,
            filtered: Vec::new(),
            all_results: session.results,
            metrics: session.metrics,
            selected_category: session.selected_category,
            page: 1,
            tracker: RequestTracker::default(),
            in_flight: None,
            alert: None,
        };
        view.refilter();
        view.persist();
        view
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn method(&self) -> SearchMethod {
        self.method
    }

    pub fn metrics(&self) -> &MetricsSummary {
        &self.metrics
    }

    pub fn selected_category(&self) -> &str {
        &self.selected_category
    }

    /// Last fetched list, unfiltered.
    pub fn all_results(&self) -> &[ResultItem] {
        &self.all_results
    }

    /// Current list after the category filter.
    pub fn results(&self) -> &[ResultItem] {
        &self.filtered
    }

    pub fn is_loading(&self) -> bool {
        self.tracker.is_pending()
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub fn dismiss_alert(&mut self) -> Option<Alert> {
        self.alert.take()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn session(&self) -> SearchSession {
        SearchSession {
            query: self.query.clone(),
            method: self.method,
            results: self.all_results.clone(),
            metrics: self.metrics,
            selected_category: self.selected_category.clone(),
        }
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.persist();
    }

    pub fn set_method(&mut self, method: SearchMethod) {
        self.method = method;
        self.persist();
    }

    /// Validates and issues a search for the current query and method.
    ///
    /// An empty query raises an alert and issues nothing.
    pub fn begin_search(&mut self) -> Result<SearchTicket, Alert> {
        let query = self.query.clone();
        self.search(&query, self.method)
    }

    /// Issues a search for `query` and `method`.
    ///
    /// Nothing is written to the view or the store until the response is applied; a blank
    /// query only raises the alert.
    pub fn search(&mut self, query: &str, method: SearchMethod) -> Result<SearchTicket, Alert> {
        let Some(request) = SearchRequest::new(query, method) else {
            let alert = Alert::from(&SearchError::EmptyQuery);
            self.alert = Some(alert.clone());
            return Err(alert);
        };
        let ticket = self.tracker.issue(request);
        debug!(id = ticket.id, query = %ticket.request.query, "search issued");
        self.in_flight = Some(ticket.request.clone());
        Ok(ticket)
    }

    /// Applies the response of request `id`, unless a newer one was issued since.
    pub fn finish_search(
        &mut self,
        id: u64,
        result: Result<SearchResponse, SearchError>,
    ) -> SearchOutcome {
        if !self.tracker.resolve(id) {
            debug!(id, latest = self.tracker.latest(), "stale_response");
            return SearchOutcome::Stale;
        }

        let request = self.in_flight.take();
        match result {
            Ok(response) => {
                if let Some(request) = request {
                    self.query = request.query;
                    self.method = request.method;
                }
                self.all_results = response.results;
                self.metrics = response.metrics;
                self.selected_category.clear();
                self.refilter();
                self.persist();
                SearchOutcome::Applied
            }
            Err(err) => {
                warn!("search failed: {err}");
                let alert = Alert::from(&err);
                self.alert = Some(alert.clone());
                SearchOutcome::Failed(alert)
            }
        }
    }

    /// Issue and await a search against `backend` in one go.
    pub async fn run_search<B: SearchBackend>(
        &mut self,
        backend: &B,
        query: &str,
        method: SearchMethod,
    ) -> SearchOutcome {
        let ticket = match self.search(query, method) {
            Ok(ticket) => ticket,
            Err(alert) => return SearchOutcome::Failed(alert),
        };
        let result = backend.search(&ticket.request).await;
        self.finish_search(ticket.id, result)
    }

    /// Category labels present in the fetched results.
    pub fn categories(&self) -> Vec<String> {
        derive_categories(&self.all_results)
    }

    /// Empty `category` restores the unfiltered list.
    pub fn filter_by_category(&mut self, category: &str) {
        self.selected_category = category.trim().to_string();
        self.refilter();
        self.persist();
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        page_count(self.filtered.len())
    }

    /// Moves to 1-based `page`. Pages outside the button range are ignored.
    pub fn paginate(&mut self, page: usize) -> bool {
        if page == 0 || page > self.page_count().max(1) {
            return false;
        }
        self.page = page;
        true
    }

    pub fn page_items(&self) -> &[ResultItem] {
        &self.filtered[page_bounds(self.filtered.len(), self.page)]
    }

    /// Detail for the `index`-th (0-based) item of the current page.
    pub fn open_detail(&self, index: usize) -> Option<DetailView> {
        let item = self.page_items().get(index)?;
        Some(DetailView::new(item.clone(), self.session()))
    }

    /// Detail for the `index`-th (0-based) item of the filtered list.
    pub fn open_detail_absolute(&self, index: usize) -> Option<DetailView> {
        let item = self.filtered.get(index)?;
        Some(DetailView::new(item.clone(), self.session()))
    }

    fn refilter(&mut self) {
        self.filtered = filter_results(&self.all_results, &self.selected_category, self.category_match);
        self.page = 1;
    }

    fn persist(&mut self) {
        let session = self.session();
        if let Err(e) = self.store.save(&session) {
            warn!("failed to persist session: {e}");
        }
    }
}

/// Unique category labels in first-seen order.
pub fn derive_categories(items: &[ResultItem]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for item in items {
        for cat in item.category_list() {
            if !seen.iter().any(|s| s == cat) {
                seen.push(cat.to_string());
            }
        }
    }
    seen
}

pub fn matches_category(item: &ResultItem, category: &str, mode: CategoryMatch) -> bool {
    match mode {
        CategoryMatch::Substring => item.categories.contains(category),
        CategoryMatch::Exact => item.category_list().contains(&category),
    }
}

/// Items matching `category`; an empty category keeps everything.
pub fn filter_results(items: &[ResultItem], category: &str, mode: CategoryMatch) -> Vec<ResultItem> {
    if category.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| matches_category(item, category, mode))
        .cloned()
        .collect()
}

pub fn page_count(len: usize) -> usize {
    len.div_ceil(PAGE_SIZE)
}

/// Index range of 1-based `page`, clipped to `len`. Page 0 is treated as page 1.
pub fn page_bounds(len: usize, page: usize) -> Range<usize> {
    let start = page.saturating_sub(1).saturating_mul(PAGE_SIZE).min(len);
    let end = start.saturating_add(PAGE_SIZE).min(len);
    start..end
}
