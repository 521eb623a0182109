//! Where a list controller gets its pages from.

use crate::dispatch::Dispatcher;
use crate::envelope::{Envelope, ListData};
use crate::error::ClientError;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// One page of untyped rows plus the server's total row count.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListPage {
    pub rows: Vec<Value>,
    pub count: u64,
}

#[async_trait]
pub trait ListSource: Send + Sync + 'static {
    async fn fetch_page(&self, endpoint: &str, payload: Map<String, Value>) -> Result<ListPage, ClientError>;
}

#[async_trait]
impl ListSource for Dispatcher {
    async fn fetch_page(&self, endpoint: &str, payload: Map<String, Value>) -> Result<ListPage, ClientError> {
        let body = self.dispatch(endpoint, payload).await?;
        let envelope: Envelope<ListData<Value>> = serde_json::from_value(body)
            .map_err(|e| ClientError::Decode(format!("{}: {}", endpoint, e)))?;
        Ok(ListPage {
            rows: envelope.data.rows,
            count: envelope.data.count,
        })
    }
}
