use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use alphaquery::config::CategoryMatch;
use alphaquery::model::types::{MetricsSummary, ResultItem, SearchMethod, SearchRequest, SearchResponse};
use alphaquery::model::wire::decode_response;
use alphaquery::search::client::{SearchBackend, SearchError};
use alphaquery::session::{FileSessionStore, SessionStore};
use alphaquery::ui::nav::Route;
use alphaquery::ui::results::{ResultsView, SearchOutcome};
use tempfile::TempDir;

/// Backend answering from a queue of canned results.
struct ScriptedBackend {
    replies: Mutex<Vec<Result<SearchResponse, SearchError>>>,
    calls: AtomicUsize,
    seen: Mutex<Vec<SearchRequest>>,
}

impl ScriptedBackend {
    fn new(mut replies: Vec<Result<SearchResponse, SearchError>>) -> Self {
        replies.reverse();
        Self {
            replies: Mutex::new(replies),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SearchBackend for ScriptedBackend {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Ok(SearchResponse::default()))
    }
}

fn doc_a() -> SearchResponse {
    decode_response(
        r#"{"resultados":[{"titulo":"Doc A","texto":"...","similitud":0.92,"cats":"ai,ml"}],
            "metricas":{"precision":0.8,"recall":0.75,"f1_score":0.77}}"#,
    )
    .unwrap()
}

fn items(n: usize) -> Vec<ResultItem> {
    (0..n)
        .map(|i| ResultItem {
            title: format!("doc {i}"),
            full_text: format!("text {i}"),
            similarity: 1.0 / (i as f64 + 1.0),
            categories: if i % 2 == 0 { "par".into() } else { "impar".into() },
        })
        .collect()
}

fn store_in(dir: &TempDir) -> FileSessionStore {
    FileSessionStore::new(dir.path().join("session.json"))
}

#[tokio::test]
async fn machine_learning_walkthrough() {
    let dir = TempDir::new().unwrap();
    let backend = ScriptedBackend::new(vec![Ok(doc_a())]);
    let mut view = ResultsView::initialize(store_in(&dir), CategoryMatch::Substring, None);

    let outcome = view
        .run_search(&backend, "machine learning", SearchMethod::Tfidf)
        .await;
    assert_eq!(outcome, SearchOutcome::Applied);

    let seen = backend.seen.lock().unwrap().clone();
    assert_eq!(seen, vec![SearchRequest::new("machine learning", SearchMethod::Tfidf).unwrap()]);

    assert_eq!(view.results().len(), 1);
    assert_eq!(view.categories(), vec!["ai", "ml"]);
    assert_eq!(view.page_count(), 1);
    assert_eq!(
        *view.metrics(),
        MetricsSummary {
            precision: Some(0.8),
            recall: Some(0.75),
            f1: Some(0.77)
        }
    );

    // A fresh view with no navigation state restores the same session from disk.
    let restored = ResultsView::initialize(store_in(&dir), CategoryMatch::Substring, None);
    assert_eq!(restored.session(), view.session());
}

#[tokio::test]
async fn blank_query_never_reaches_the_backend() {
    let dir = TempDir::new().unwrap();
    let backend = ScriptedBackend::new(vec![]);
    let mut view = ResultsView::initialize(store_in(&dir), CategoryMatch::Substring, None);

    let outcome = view.run_search(&backend, "   ", SearchMethod::Bow).await;
    match outcome {
        SearchOutcome::Failed(alert) => {
            assert_eq!(alert.message, "Por favor, ingresa una consulta.");
        }
        other => panic!("expected alert, got {other:?}"),
    }
    assert_eq!(backend.calls(), 0);
    assert!(!view.is_loading());
}

#[tokio::test]
async fn failed_search_keeps_previous_results() {
    let dir = TempDir::new().unwrap();
    let backend = ScriptedBackend::new(vec![
        Ok(doc_a()),
        Err(SearchError::Http {
            status: 503,
            body: "down".into(),
        }),
    ]);
    let mut view = ResultsView::initialize(store_in(&dir), CategoryMatch::Substring, None);
    view.run_search(&backend, "machine learning", SearchMethod::Tfidf)
        .await;

    let outcome = view.run_search(&backend, "otra", SearchMethod::Bow).await;
    assert!(matches!(outcome, SearchOutcome::Failed(_)));
    assert_eq!(view.results().len(), 1);
    assert_eq!(view.results()[0].title, "Doc A");
    assert!(!view.is_loading());
    assert_eq!(
        view.alert().map(|a| a.message.as_str()),
        Some("No se pudo realizar la búsqueda. Intenta nuevamente.")
    );
}

#[test]
fn overlapping_requests_latest_wins() {
    let dir = TempDir::new().unwrap();
    let mut view = ResultsView::initialize(store_in(&dir), CategoryMatch::Substring, None);

    let first = view.search("uno", SearchMethod::Tfidf).unwrap();
    let second = view.search("dos", SearchMethod::Tfidf).unwrap();

    let mut late = doc_a();
    late.results[0].title = "late".into();
    assert_eq!(view.finish_search(second.id, Ok(doc_a())), SearchOutcome::Applied);
    assert_eq!(view.finish_search(first.id, Ok(late)), SearchOutcome::Stale);

    assert_eq!(view.results()[0].title, "Doc A");
    assert!(!view.is_loading());
}

#[test]
fn category_filter_survives_detail_round_trip() {
    let dir = TempDir::new().unwrap();
    let mut view = ResultsView::initialize(store_in(&dir), CategoryMatch::Substring, None);
    let ticket = view.search("q", SearchMethod::Word2vec).unwrap();
    view.finish_search(
        ticket.id,
        Ok(SearchResponse {
            results: items(12),
            ..Default::default()
        }),
    );

    view.filter_by_category("impar");
    assert_eq!(view.results().len(), 6);
    assert_eq!(view.page_count(), 2);
    assert!(view.paginate(2));

    let detail = view.open_detail(0).expect("item on page 2");
    assert_eq!(detail.title(), "doc 11");

    let Route::Results(Some(session)) = detail.back() else {
        panic!("back must carry the session");
    };
    let back = ResultsView::initialize(store_in(&dir), CategoryMatch::Substring, Some(session));
    assert_eq!(back.selected_category(), "impar");
    assert_eq!(back.results().len(), 6);
    assert_eq!(back.page(), 1);
}

#[test]
fn navigation_state_beats_cache() {
    let dir = TempDir::new().unwrap();
    let mut cached = ResultsView::initialize(store_in(&dir), CategoryMatch::Substring, None);
    cached.set_query("cached");

    let nav = alphaquery::session::SearchSession {
        query: "from nav".into(),
        method: SearchMethod::Bow,
        ..Default::default()
    };
    let view = ResultsView::initialize(store_in(&dir), CategoryMatch::Substring, Some(nav));
    assert_eq!(view.query(), "from nav");
    assert_eq!(view.store().load().unwrap().query, "from nav");
}

mod properties {
    use super::*;
    use alphaquery::session::MemorySessionStore;
    use proptest::prelude::*;

    fn loaded(n: usize) -> ResultsView<MemorySessionStore> {
        let mut view = ResultsView::initialize(MemorySessionStore::new(), CategoryMatch::Substring, None);
        let ticket = view.search("q", SearchMethod::Tfidf).unwrap();
        view.finish_search(
            ticket.id,
            Ok(SearchResponse {
                results: items(n),
                ..Default::default()
            }),
        );
        view
    }

    fn arb_item() -> impl Strategy<Value = ResultItem> {
        ("[a-z ]{0,12}", ".{0,40}", 0.0f64..1.0, "(ai|ml|nlp|,){0,4}").prop_map(
            |(title, full_text, similarity, categories)| ResultItem {
                title,
                full_text,
                similarity,
                categories,
            },
        )
    }

    fn arb_metric() -> impl Strategy<Value = Option<f64>> {
        prop::option::of(prop::num::f64::NORMAL | prop::num::f64::ZERO)
    }

    proptest! {
        #[test]
        fn session_survives_a_file_round_trip(
            results in prop::collection::vec(arb_item(), 0..12),
            precision in arb_metric(),
            recall in arb_metric(),
            f1 in arb_metric(),
            query in "[a-z ]{1,20}",
        ) {
            let dir = TempDir::new().unwrap();
            let session = alphaquery::session::SearchSession {
                query,
                method: SearchMethod::Word2vec,
                results,
                metrics: MetricsSummary { precision, recall, f1 },
                selected_category: "ml".into(),
            };
            let mut store = store_in(&dir);
            store.save(&session).unwrap();
            prop_assert_eq!(store_in(&dir).load(), Some(session));
        }

        #[test]
        fn pages_cover_every_result_once(n in 0usize..60) {
            let mut view = loaded(n);
            prop_assert_eq!(view.page_count(), n.div_ceil(5));

            let mut seen = Vec::new();
            for page in 1..=view.page_count() {
                prop_assert!(view.paginate(page));
                prop_assert!(view.page_items().len() <= 5);
                seen.extend(view.page_items().iter().map(|i| i.title.clone()));
            }
            let all: Vec<String> = view.results().iter().map(|i| i.title.clone()).collect();
            prop_assert_eq!(seen, all);
        }

        #[test]
        fn out_of_range_pages_are_ignored(n in 0usize..30, extra in 1usize..5) {
            let mut view = loaded(n);
            let beyond = view.page_count().max(1) + extra;
            prop_assert!(!view.paginate(beyond));
            prop_assert!(!view.paginate(0));
            prop_assert_eq!(view.page(), 1);
        }

        #[test]
        fn clearing_the_filter_restores_everything(n in 0usize..30, cat in "(par|impar|zzz)") {
            let mut view = loaded(n);
            view.filter_by_category(&cat);
            let once = view.results().to_vec();
            view.filter_by_category(&cat);
            prop_assert_eq!(view.results(), once.as_slice());

            view.filter_by_category("");
            prop_assert_eq!(view.results(), view.all_results());
        }
    }
}
