//! Latest-wins bookkeeping for overlapping searches.
//!
//! Each issued request gets a fresh id. Only the most recently issued id is current; a
//! response carrying an older id is stale and must not touch view state.

use crate::model::types::SearchRequest;

/// A request that was validated and issued, waiting for its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub id: u64,
    pub request: SearchRequest,
}

#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    issued: u64,
    pending: Option<u64>,
}

impl RequestTracker {
    pub fn issue(&mut self, request: SearchRequest) -> SearchTicket {
        self.issued += 1;
        self.pending = Some(self.issued);
        SearchTicket {
            id: self.issued,
            request,
        }
    }

    /// Marks `id` as answered. Returns `false` for a stale id, leaving the pending request
    /// untouched.
    pub fn resolve(&mut self, id: u64) -> bool {
        if id != self.issued {
            return false;
        }
        self.pending = None;
        true
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn latest(&self) -> u64 {
        self.issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::SearchMethod;

    fn req(q: &str) -> SearchRequest {
        SearchRequest::new(q, SearchMethod::Tfidf).unwrap()
    }

    #[test]
    fn only_latest_resolves() {
        let mut tracker = RequestTracker::default();
        let first = tracker.issue(req("a"));
        let second = tracker.issue(req("b"));
        assert!(second.id > first.id);
        assert!(tracker.is_pending());

        assert!(!tracker.resolve(first.id));
        assert!(tracker.is_pending());

        assert!(tracker.resolve(second.id));
        assert!(!tracker.is_pending());
    }

    #[test]
    fn resolve_after_completion_is_harmless() {
        let mut tracker = RequestTracker::default();
        let t = tracker.issue(req("a"));
        assert!(tracker.resolve(t.id));
        assert!(tracker.resolve(t.id));
        assert!(!tracker.is_pending());
    }
}
