//! The controller owns a driver task; setters send commands to it and the driver
//! publishes every state change on a watch channel.
//!
//! Each fetch carries a sequence number. Only the response of the most recently
//! issued fetch is applied, so a slow earlier page can never overwrite a later one.
//! Dropping the controller aborts the driver and every fetch still in flight.

use crate::error::ClientError;
use crate::list::source::{ListPage, ListSource};
use crate::list::state::{ListError, ListState, Phase};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::{Id, JoinError, JoinHandle, JoinSet};
use tokio::time::{sleep_until, Instant};

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(1000);
pub const DEFAULT_SEARCH_KEY: &str = "search";
pub const PAGE_NUMBER_KEY: &str = "pageNumber";

/// Payload for one fetch: static filters, 1-indexed page, and search when non-empty.
pub fn page_payload(
    base: &Map<String, Value>,
    page_number: u32,
    search_key: &str,
    search: &str,
) -> Map<String, Value> {
    let mut payload = base.clone();
    payload.insert(PAGE_NUMBER_KEY.into(), Value::from(u64::from(page_number) + 1));
    if !search.is_empty() {
        payload.insert(search_key.into(), Value::String(search.to_string()));
    }
    payload
}

enum Command<T> {
    SetPage(u32),
    SetSearch(String),
    SetListener(Value),
    ToggleListener,
    Refetch,
    SetRows(Vec<T>),
}

pub struct ListControllerBuilder<T> {
    source: Arc<dyn ListSource>,
    endpoint: String,
    payload: Map<String, Value>,
    search: String,
    listener: Value,
    search_key: String,
    debounce: Duration,
    _rows: PhantomData<fn() -> T>,
}

impl<T> ListControllerBuilder<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Static filters sent with every fetch.
    pub fn payload(mut self, payload: Map<String, Value>) -> Self {
        self.payload = payload;
        self
    }

    /// Initial search text; used by the first fetch without waiting for the debounce.
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn listener(mut self, listener: impl Into<Value>) -> Self {
        self.listener = listener.into();
        self
    }

    /// Payload key carrying the search text. Defaults to `search`.
    pub fn search_key(mut self, key: impl Into<String>) -> Self {
        self.search_key = key.into();
        self
    }

    pub fn debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Start the driver on the current tokio runtime. The first fetch is issued immediately.
    pub fn spawn(self) -> ListController<T> {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(ListState::initial(self.search.clone()));
        let driver = Driver {
            source: self.source,
            endpoint: self.endpoint,
            payload: self.payload,
            search_key: self.search_key,
            debounce: self.debounce,
            page: 0,
            raw_search: self.search.clone(),
            search: self.search,
            listener: self.listener,
            deadline: None,
            seq: 0,
            latest_task: None,
            inflight: JoinSet::new(),
            state: state_rx.borrow().clone(),
            tx: state_tx,
        };
        ListController {
            commands: commands_tx,
            state: state_rx,
            driver: tokio::spawn(driver.run(commands_rx)),
        }
    }
}

/// Handle owned by one list view.
pub struct ListController<T> {
    commands: mpsc::UnboundedSender<Command<T>>,
    state: watch::Receiver<ListState<T>>,
    driver: JoinHandle<()>,
}

impl<T> ListController<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    pub fn builder(source: Arc<dyn ListSource>, endpoint: impl Into<String>) -> ListControllerBuilder<T> {
        ListControllerBuilder {
            source,
            endpoint: endpoint.into(),
            payload: Map::new(),
            search: String::new(),
            listener: Value::Bool(false),
            search_key: DEFAULT_SEARCH_KEY.into(),
            debounce: SEARCH_DEBOUNCE,
            _rows: PhantomData,
        }
    }

    pub fn state(&self) -> ListState<T> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListState<T>> {
        self.state.clone()
    }

    /// Wait until `predicate` holds for the published state and return that state.
    pub async fn wait_for(&self, predicate: impl FnMut(&ListState<T>) -> bool) -> ListState<T> {
        let mut rx = self.state.clone();
        let state = match rx.wait_for(predicate).await {
            Ok(state) => (*state).clone(),
            Err(_) => self.state(),
        };
        state
    }

    /// Fetch at `page` (0-indexed) with the current search; no-op when already there.
    pub fn set_page_number(&self, page: u32) {
        self.send(Command::SetPage(page));
    }

    /// Raw search text; a fetch follows once it has been stable for the debounce delay.
    pub fn set_search(&self, text: impl Into<String>) {
        self.send(Command::SetSearch(text.into()));
    }

    /// Any change of the listener value resets to page 0 and refetches.
    pub fn set_listener(&self, value: impl Into<Value>) {
        self.send(Command::SetListener(value.into()));
    }

    pub fn toggle_listener(&self) {
        self.send(Command::ToggleListener);
    }

    /// Fetch the current page again.
    pub fn refetch(&self) {
        self.send(Command::Refetch);
    }

    /// Replace the visible rows locally without a fetch.
    pub fn set_rows(&self, rows: Vec<T>) {
        self.send(Command::SetRows(rows));
    }

    fn send(&self, command: Command<T>) {
        if self.commands.send(command).is_err() {
            tracing::debug!("list controller driver is gone, command dropped");
        }
    }
}

impl<T> Drop for ListController<T> {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

type FetchOutcome = (u64, Result<ListPage, ClientError>);

struct Driver<T> {
    source: Arc<dyn ListSource>,
    endpoint: String,
    payload: Map<String, Value>,
    search_key: String,
    debounce: Duration,
    page: u32,
    raw_search: String,
    search: String,
    listener: Value,
    deadline: Option<Instant>,
    seq: u64,
    /// Task running the fetch numbered `seq`.
    latest_task: Option<Id>,
    inflight: JoinSet<FetchOutcome>,
    state: ListState<T>,
    tx: watch::Sender<ListState<T>>,
}

impl<T> Driver<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command<T>>) {
        self.fetch();
        loop {
            let deadline = self.deadline;
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.apply(command),
                    None => break,
                },
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.deadline = None;
                    self.flush_search();
                }
                Some(joined) = self.inflight.join_next(), if !self.inflight.is_empty() => {
                    self.complete(joined);
                }
            }
        }
    }

    fn apply(&mut self, command: Command<T>) {
        match command {
            Command::SetPage(page) => {
                if page != self.page {
                    self.page = page;
                    self.fetch();
                }
            }
            Command::SetSearch(text) => {
                self.raw_search = text;
                self.deadline = Some(Instant::now() + self.debounce);
            }
            Command::SetListener(value) => {
                if value != self.listener {
                    self.listener = value;
                    self.restart();
                }
            }
            Command::ToggleListener => {
                self.listener = match &self.listener {
                    Value::Bool(b) => Value::Bool(!b),
                    Value::Number(n) => Value::from(n.as_u64().unwrap_or(0).wrapping_add(1)),
                    _ => Value::Bool(true),
                };
                self.restart();
            }
            Command::Refetch => self.fetch(),
            Command::SetRows(rows) => {
                self.state.rows = rows;
                self.publish();
            }
        }
    }

    fn flush_search(&mut self) {
        if self.raw_search != self.search {
            self.search = self.raw_search.clone();
            self.restart();
        }
    }

    fn restart(&mut self) {
        self.page = 0;
        self.fetch();
    }

    fn fetch(&mut self) {
        self.seq += 1;
        let seq = self.seq;
        let payload = page_payload(&self.payload, self.page, &self.search_key, &self.search);
        tracing::debug!(endpoint = %self.endpoint, seq, page = self.page, search = %self.search, "list fetch");

        self.state.page_number = self.page;
        self.state.search = self.search.clone();
        self.state.is_loading = true;
        self.state.phase = Phase::Loading;
        self.publish();

        let source = Arc::clone(&self.source);
        let endpoint = self.endpoint.clone();
        let handle = self.inflight.spawn(async move {
            let result = source.fetch_page(&endpoint, payload).await;
            (seq, result)
        });
        self.latest_task = Some(handle.id());
    }

    fn complete(&mut self, joined: Result<FetchOutcome, JoinError>) {
        let (seq, result) = match joined {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(endpoint = %self.endpoint, error = %e, "list fetch task failed");
                if Some(e.id()) == self.latest_task {
                    self.fail(format!("list fetch failed: {}", e));
                }
                return;
            }
        };
        if seq != self.seq {
            tracing::debug!(endpoint = %self.endpoint, seq, latest = self.seq, "discarding stale list response");
            return;
        }

        let decoded = result.and_then(|ListPage { rows, count }| {
            rows.into_iter()
                .map(serde_json::from_value)
                .collect::<Result<Vec<T>, _>>()
                .map(|rows| (rows, count))
                .map_err(|e| ClientError::Decode(format!("{}: {}", self.endpoint, e)))
        });
        match decoded {
            Ok((rows, count)) => {
                self.state.rows = rows;
                self.state.total_count = count;
                self.state.error = None;
                self.state.is_loading = false;
                self.state.phase = Phase::Ready;
                self.publish();
            }
            Err(e) => self.fail(e.user_message()),
        }
    }

    /// Rows and count stay as they were.
    fn fail(&mut self, message: String) {
        self.state.error = Some(ListError { message });
        self.state.is_loading = false;
        self.state.phase = Phase::Errored;
        self.publish();
    }

    fn publish(&self) {
        self.tx.send_replace(self.state.clone());
    }
}
