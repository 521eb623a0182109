mod common;

use async_trait::async_trait;
use common::harness;
use dashboard_sdk::models::Employee;
use dashboard_sdk::{ClientError, ListController, ListPage, ListSource, Phase};
use mockito::Matcher;
use serde_json::{json, Map, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Responder = dyn Fn(&Map<String, Value>) -> (Duration, Result<ListPage, ClientError>) + Send + Sync;

/// Records every payload and answers from a script keyed on the payload.
struct ScriptedSource {
    calls: Mutex<Vec<Map<String, Value>>>,
    respond: Box<Responder>,
}

impl ScriptedSource {
    fn new(
        respond: impl Fn(&Map<String, Value>) -> (Duration, Result<ListPage, ClientError>) + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(ScriptedSource {
            calls: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        })
    }

    fn calls(&self) -> Vec<Map<String, Value>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ListSource for ScriptedSource {
    async fn fetch_page(&self, _endpoint: &str, payload: Map<String, Value>) -> Result<ListPage, ClientError> {
        self.calls.lock().unwrap().push(payload.clone());
        let (delay, result) = (self.respond)(&payload);
        tokio::time::sleep(delay).await;
        result
    }
}

fn page_of(page_number: u64, count: u64) -> ListPage {
    ListPage {
        rows: vec![json!({ "page": page_number })],
        count,
    }
}

/// Echoes the requested page back as a single row.
fn echo(delay_ms: u64) -> Arc<ScriptedSource> {
    ScriptedSource::new(move |p| {
        let page = p["pageNumber"].as_u64().unwrap();
        (Duration::from_millis(delay_ms), Ok(page_of(page, 42)))
    })
}

fn controller(source: &Arc<ScriptedSource>) -> ListController<Value> {
    let source: Arc<dyn ListSource> = source.clone();
    ListController::builder(source, "employees.list").spawn()
}

#[tokio::test(start_paused = true)]
async fn mount_fetches_once_at_page_one() {
    let source = echo(10);
    let list = controller(&source);
    let state = list.wait_for(|s| s.is_settled()).await;

    assert_eq!(state.phase, Phase::Ready);
    assert_eq!(state.rows, vec![json!({ "page": 1 })]);
    assert_eq!(state.total_count, 42);
    assert_eq!(state.page_count(), 5);

    tokio::time::sleep(Duration::from_secs(3)).await;
    let calls = source.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0]["pageNumber"], json!(1));
    assert!(calls[0].get("search").is_none());
}

#[tokio::test(start_paused = true)]
async fn page_change_sends_one_indexed_page() {
    let source = echo(10);
    let list = controller(&source);
    list.wait_for(|s| s.is_settled()).await;

    list.set_page_number(4);
    let state = list.wait_for(|s| s.page_number == 4 && s.is_settled()).await;
    assert_eq!(state.rows, vec![json!({ "page": 5 })]);

    // Same page again is not a change.
    list.set_page_number(4);
    tokio::time::sleep(Duration::from_secs(2)).await;

    let calls = source.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1]["pageNumber"], json!(5));
}

#[tokio::test(start_paused = true)]
async fn search_is_debounced_to_the_last_value_and_resets_page() {
    let source = echo(10);
    let list = controller(&source);
    list.wait_for(|s| s.is_settled()).await;
    list.set_page_number(2);
    list.wait_for(|s| s.page_number == 2 && s.is_settled()).await;

    list.set_search("c");
    tokio::time::sleep(Duration::from_millis(300)).await;
    list.set_search("cr");
    tokio::time::sleep(Duration::from_millis(300)).await;
    list.set_search("crane");
    tokio::time::sleep(Duration::from_millis(999)).await;
    assert_eq!(source.calls().len(), 2, "no fetch before the debounce delay elapses");

    let state = list.wait_for(|s| s.search == "crane" && s.is_settled()).await;
    assert_eq!(state.page_number, 0);

    tokio::time::sleep(Duration::from_secs(3)).await;
    let calls = source.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[2]["search"], json!("crane"));
    assert_eq!(calls[2]["pageNumber"], json!(1));
}

#[tokio::test(start_paused = true)]
async fn search_settling_back_to_the_same_text_does_not_fetch() {
    let source = echo(10);
    let source_dyn: Arc<dyn ListSource> = source.clone();
    let list: ListController<Value> = ListController::builder(source_dyn, "projects.list")
        .search("tower")
        .spawn();
    list.wait_for(|s| s.is_settled()).await;
    assert_eq!(source.calls()[0]["search"], json!("tower"));

    list.set_search("towe");
    tokio::time::sleep(Duration::from_millis(200)).await;
    list.set_search("tower");
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(source.calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn listener_toggle_resets_page_and_refetches_once() {
    let source = echo(10);
    let list = controller(&source);
    list.wait_for(|s| s.is_settled()).await;
    list.set_page_number(3);
    list.wait_for(|s| s.page_number == 3 && s.is_settled()).await;

    list.set_listener(true);
    let state = list.wait_for(|s| s.page_number == 0 && s.is_settled()).await;
    assert_eq!(state.rows, vec![json!({ "page": 1 })]);

    // Same value again is not a change; toggling back is.
    list.set_listener(true);
    list.toggle_listener();
    tokio::time::sleep(Duration::from_secs(2)).await;

    let pages: Vec<Value> = source.calls().iter().map(|c| c["pageNumber"].clone()).collect();
    assert_eq!(pages, vec![json!(1), json!(4), json!(1), json!(1)]);
}

#[tokio::test(start_paused = true)]
async fn slow_earlier_response_does_not_overwrite_later_one() {
    // Page 2 is slow, page 3 is fast.
    let source = ScriptedSource::new(|p| {
        let page = p["pageNumber"].as_u64().unwrap();
        let delay = match page {
            2 => 500,
            _ => 50,
        };
        (Duration::from_millis(delay), Ok(page_of(page, 30)))
    });
    let list = controller(&source);
    list.wait_for(|s| s.is_settled()).await;

    list.set_page_number(1);
    tokio::time::sleep(Duration::from_millis(10)).await;
    list.set_page_number(2);

    let state = list.wait_for(|s| s.page_number == 2 && s.is_settled()).await;
    assert_eq!(state.rows, vec![json!({ "page": 3 })]);

    // Let the slow page-2 response arrive; it must be ignored.
    tokio::time::sleep(Duration::from_secs(1)).await;
    let state = list.state();
    assert_eq!(state.rows, vec![json!({ "page": 3 })]);
    assert_eq!(state.page_number, 2);
    assert!(!state.is_loading);
}

#[tokio::test(start_paused = true)]
async fn failed_fetch_keeps_previous_rows() {
    let source = ScriptedSource::new(|p| {
        let page = p["pageNumber"].as_u64().unwrap();
        if page == 1 {
            (
                Duration::from_millis(10),
                Ok(ListPage {
                    rows: vec![json!("A"), json!("B")],
                    count: 12,
                }),
            )
        } else {
            (
                Duration::from_millis(10),
                Err(ClientError::Transport("connection reset".into())),
            )
        }
    });
    let list = controller(&source);
    list.wait_for(|s| s.is_settled()).await;

    list.set_page_number(1);
    let state = list.wait_for(|s| s.phase == Phase::Errored).await;
    assert_eq!(state.rows, vec![json!("A"), json!("B")]);
    assert_eq!(state.total_count, 12);
    assert_eq!(state.error.unwrap().message, "connection reset");
    assert!(!state.is_loading);

    list.set_page_number(0);
    let state = list.wait_for(|s| s.page_number == 0 && s.phase == Phase::Ready).await;
    assert!(state.error.is_none());
}

#[tokio::test(start_paused = true)]
async fn crashed_latest_fetch_settles_while_older_one_is_in_flight() {
    // The mount fetch is slow; the page-2 fetch panics straight away.
    let source = ScriptedSource::new(|p| {
        let page = p["pageNumber"].as_u64().unwrap();
        if page == 2 {
            panic!("list source blew up");
        }
        (Duration::from_millis(500), Ok(page_of(page, 10)))
    });
    let list = controller(&source);
    tokio::time::sleep(Duration::from_millis(10)).await;
    list.set_page_number(1);

    let state = list.wait_for(|s| s.page_number == 1 && s.is_settled()).await;
    assert_eq!(state.phase, Phase::Errored);
    assert!(state.error.unwrap().message.starts_with("list fetch failed"));

    // The stale mount response lands later and changes nothing.
    tokio::time::sleep(Duration::from_secs(1)).await;
    let state = list.state();
    assert!(!state.is_loading);
    assert!(state.rows.is_empty());
}

#[tokio::test(start_paused = true)]
async fn set_rows_and_refetch() {
    let source = echo(10);
    let list = controller(&source);
    list.wait_for(|s| s.is_settled()).await;

    list.set_rows(vec![json!({ "page": "edited" })]);
    let state = list.wait_for(|s| s.rows == vec![json!({ "page": "edited" })]).await;
    assert_eq!(state.phase, Phase::Ready);
    assert_eq!(source.calls().len(), 1);

    list.refetch();
    list.wait_for(|s| s.rows == vec![json!({ "page": 1 })]).await;
    assert_eq!(source.calls().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn static_payload_and_custom_search_key_are_sent() {
    let source = echo(10);
    let source_dyn: Arc<dyn ListSource> = source.clone();
    let mut filters = Map::new();
    filters.insert("projectId".into(), json!(8));
    let list: ListController<Value> = ListController::builder(source_dyn, "requests.list")
        .payload(filters)
        .search_key("searchValue")
        .search("pump")
        .spawn();
    list.wait_for(|s| s.is_settled()).await;
    assert_eq!(
        Value::Object(source.calls()[0].clone()),
        json!({ "projectId": 8, "pageNumber": 1, "searchValue": "pump" })
    );
}

#[tokio::test(start_paused = true)]
async fn undecodable_rows_surface_as_error() {
    let source = echo(10);
    let source_dyn: Arc<dyn ListSource> = source.clone();
    let list: ListController<Employee> = ListController::builder(source_dyn, "employees.list").spawn();
    let state = list.wait_for(|s| s.is_settled()).await;
    assert_eq!(state.phase, Phase::Errored);
    assert!(state.error.unwrap().message.starts_with("decode"));
}

#[tokio::test(start_paused = true)]
async fn dropping_the_controller_abandons_in_flight_fetch() {
    let source = echo(1_000);
    let list = controller(&source);
    let mut rx = list.subscribe();
    tokio::time::sleep(Duration::from_millis(10)).await;
    drop(list);
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(rx.borrow_and_update().is_loading);
    assert!(rx.changed().await.is_err());
}

#[tokio::test]
async fn controller_over_dispatcher_reads_list_envelope() {
    let mut server = mockito::Server::new_async().await;
    let m = server
        .mock("GET", "/employees")
        .match_query(Matcher::UrlEncoded("pageNumber".into(), "1".into()))
        .with_status(200)
        .with_body(
            r#"{"data":{"rows":[{"id":1,"nameEn":"Omar","nameAr":"عمر","email":"omar@example.com"}],"count":1},"message":null}"#,
        )
        .create_async()
        .await;

    let h = harness(&server.url());
    let source: Arc<dyn ListSource> = Arc::new(h.dispatcher.clone());
    let list: ListController<Employee> = ListController::builder(source, "employees.list").spawn();
    let state = list.wait_for(|s| s.is_settled()).await;

    assert_eq!(state.phase, Phase::Ready);
    assert_eq!(state.total_count, 1);
    assert_eq!(state.rows[0].name_en, "Omar");
    m.assert_async().await;
}
