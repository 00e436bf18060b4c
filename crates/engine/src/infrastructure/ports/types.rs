//! Helper types for port operations.

use std::pin::Pin;

use futures_util::{Stream, StreamExt};
use geovision_domain::DocumentMeta;
use serde_json::{Map, Value};

use super::error::StoreError;

/// A JSON object as sent to or received from the store.
pub type JsonObject = Map<String, Value>;

/// Named query parameters. Keys prefixed with `@` bind collection names.
pub type BindVars = JsonObject;

/// Whether a collection stores vertices (documents) or edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    Vertex,
    Edge,
}

impl CollectionKind {
    /// Numeric collection type used by the ArangoDB REST API.
    pub fn arango_type(&self) -> u8 {
        match self {
            CollectionKind::Vertex => 2,
            CollectionKind::Edge => 3,
        }
    }
}

/// Handle to a collection that is known to exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionInfo {
    pub name: String,
    pub kind: CollectionKind,
}

/// Options for persistent index creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexOptions {
    pub background: bool,
    pub unique: bool,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            background: true,
            unique: false,
        }
    }
}

/// One edge collection bound into a named graph with its endpoint collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeDefinition {
    pub collection: String,
    pub from: Vec<String>,
    pub to: Vec<String>,
}

/// A stored document: store metadata plus the remaining attributes.
///
/// `body` never contains `_id`, `_key` or `_rev`; those live in `meta`.
/// Edge documents keep `_from` and `_to` in the body.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub meta: DocumentMeta,
    pub body: JsonObject,
}

impl StoredDocument {
    /// Split a raw store document into metadata and attributes.
    pub fn from_value(value: Value) -> Result<Self, StoreError> {
        let Value::Object(mut body) = value else {
            return Err(StoreError::decode("document is not a JSON object"));
        };
        let mut take = |field: &str| match body.remove(field) {
            Some(Value::String(s)) => Ok(s),
            Some(other) => Err(StoreError::decode(format!(
                "document field '{field}' is not a string: {other}"
            ))),
            None => Err(StoreError::decode(format!(
                "document is missing '{field}'"
            ))),
        };
        let meta = DocumentMeta::new(take("_id")?, take("_key")?, take("_rev")?);
        Ok(Self { meta, body })
    }
}

/// Lazily evaluated query result.
///
/// Rows are pulled on demand; `next` returns `Ok(None)` once the result is
/// exhausted. A cursor can be consumed only once.
pub struct DocumentCursor {
    inner: Pin<Box<dyn Stream<Item = Result<Value, StoreError>> + Send>>,
}

impl DocumentCursor {
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Value, StoreError>> + Send + 'static,
    {
        Self {
            inner: Box::pin(stream),
        }
    }

    /// A cursor over rows that are already in memory.
    pub fn from_rows(rows: Vec<Value>) -> Self {
        Self::from_stream(futures_util::stream::iter(rows.into_iter().map(Ok)))
    }

    pub fn empty() -> Self {
        Self::from_rows(Vec::new())
    }

    pub async fn next(&mut self) -> Result<Option<Value>, StoreError> {
        self.inner.next().await.transpose()
    }
}

impl std::fmt::Debug for DocumentCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentCursor").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stored_document_splits_meta_from_body() {
        let doc = StoredDocument::from_value(json!({
            "_id": "persons/1",
            "_key": "1",
            "_rev": "_abc",
            "name": "Ada"
        }))
        .expect("valid document");
        assert_eq!(doc.meta, DocumentMeta::new("persons/1", "1", "_abc"));
        assert_eq!(doc.body.get("name"), Some(&json!("Ada")));
        assert!(!doc.body.contains_key("_key"));
    }

    #[test]
    fn stored_document_requires_identity() {
        let err = StoredDocument::from_value(json!({ "_key": "1", "name": "Ada" }))
            .expect_err("missing _id");
        assert!(matches!(err, StoreError::Decode(_)));
    }

    #[tokio::test]
    async fn cursor_yields_rows_then_end_of_stream() {
        let mut cursor = DocumentCursor::from_rows(vec![json!(1), json!(2)]);
        assert_eq!(cursor.next().await.expect("row"), Some(json!(1)));
        assert_eq!(cursor.next().await.expect("row"), Some(json!(2)));
        assert_eq!(cursor.next().await.expect("end"), None);
    }
}
