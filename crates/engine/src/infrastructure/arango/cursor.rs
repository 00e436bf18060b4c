//! AQL cursors: the first batch arrives with the query, the rest on demand.

use std::collections::VecDeque;

use futures_util::stream;
use serde::Deserialize;
use serde_json::{json, Value};

use super::client::ArangoClient;
use crate::infrastructure::ports::{BindVars, DocumentCursor, StoreError};

/// Rows requested per round-trip.
const BATCH_SIZE: u32 = 500;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CursorBatch {
    #[serde(default)]
    result: Vec<Value>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    id: Option<String>,
}

struct CursorState {
    client: ArangoClient,
    buffer: VecDeque<Value>,
    next_id: Option<String>,
}

impl CursorBatch {
    fn from_value(value: Value) -> Result<Self, StoreError> {
        serde_json::from_value(value).map_err(StoreError::decode)
    }

    /// Id to continue from, present only while the server holds more rows.
    fn continuation(&self) -> Option<String> {
        if self.has_more {
            self.id.clone()
        } else {
            None
        }
    }
}

/// Run a query and return a cursor that pulls later batches as it is polled.
pub(super) async fn open(
    client: &ArangoClient,
    query: &str,
    bind_vars: BindVars,
) -> Result<DocumentCursor, StoreError> {
    let url = client.db_url(&["_api", "cursor"])?;
    let body = json!({
        "query": query,
        "bindVars": bind_vars,
        "batchSize": BATCH_SIZE,
    });
    let first = CursorBatch::from_value(client.post(url, &body).await?)?;
    tracing::trace!(
        rows = first.result.len(),
        has_more = first.has_more,
        "Opened query cursor"
    );

    let state = CursorState {
        client: client.clone(),
        next_id: first.continuation(),
        buffer: first.result.into(),
    };

    let rows = stream::try_unfold(state, next_row);
    Ok(DocumentCursor::from_stream(rows))
}

async fn next_row(
    mut state: CursorState,
) -> Result<Option<(Value, CursorState)>, StoreError> {
    loop {
        if let Some(row) = state.buffer.pop_front() {
            return Ok(Some((row, state)));
        }
        let Some(id) = state.next_id.take() else {
            return Ok(None);
        };
        let url = state.client.db_url(&["_api", "cursor", &id])?;
        let batch = CursorBatch::from_value(state.client.put(url).await?)?;
        tracing::trace!(rows = batch.result.len(), "Fetched next cursor batch");
        state.next_id = batch.continuation();
        state.buffer = batch.result.into();
    }
}
