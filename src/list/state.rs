//! Observable state of one list controller.

use crate::envelope::page_count;

/// `Idle -> Loading -> Ready | Errored`; any page, search or listener change goes back to `Loading`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    Errored,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListError {
    pub message: String,
}

#[derive(Clone, Debug)]
pub struct ListState<T> {
    /// Rows of the last successful fetch (or the last `set_rows`); kept on error.
    pub rows: Vec<T>,
    pub total_count: u64,
    pub is_loading: bool,
    pub error: Option<ListError>,
    /// 0-indexed; the request carries `page_number + 1`.
    pub page_number: u32,
    /// Debounced search text the current rows were fetched with.
    pub search: String,
    pub phase: Phase,
}

impl<T> ListState<T> {
    pub(crate) fn initial(search: String) -> Self {
        ListState {
            rows: Vec::new(),
            total_count: 0,
            is_loading: false,
            error: None,
            page_number: 0,
            search,
            phase: Phase::Idle,
        }
    }

    pub fn page_count(&self) -> u64 {
        page_count(self.total_count)
    }

    pub fn is_settled(&self) -> bool {
        self.phase != Phase::Idle && !self.is_loading
    }
}
