//! Standard response envelope shapes returned by the dashboard backend.

use serde::{Deserialize, Serialize};

/// Rows per page assumed by the backend's list endpoints.
pub const PAGE_SIZE: u64 = 10;

/// `{ data, message }` wrapper around every response body.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    #[serde(default)]
    pub message: Option<String>,
}

/// `data` payload of list endpoints.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListData<T> {
    #[serde(default = "Vec::new")]
    pub rows: Vec<T>,
    #[serde(default)]
    pub count: u64,
}

impl<T> Default for ListData<T> {
    fn default() -> Self {
        ListData {
            rows: Vec::new(),
            count: 0,
        }
    }
}

/// Number of pages needed to show `count` rows.
pub fn page_count(count: u64) -> u64 {
    count.div_ceil(PAGE_SIZE)
}
