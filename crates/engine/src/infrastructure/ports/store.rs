//! Store gateway port.
//!
//! A thin contract over a multi-model document and graph store. The engine
//! talks to the store only through this trait; the ArangoDB adapter is the
//! production implementation and `MockDocumentStore` drives unit tests.

use async_trait::async_trait;
use geovision_domain::DocumentMeta;

use super::error::StoreError;
use super::types::{
    BindVars, CollectionInfo, CollectionKind, DocumentCursor, EdgeDefinition, IndexOptions,
    JsonObject, StoredDocument,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn collection_exists(&self, name: &str) -> Result<bool, StoreError>;

    /// Return the named collection, creating it if absent.
    ///
    /// Safe under races: a caller that loses a concurrent create observes
    /// "already exists" from the store and re-fetches the collection.
    async fn get_or_create_collection(
        &self,
        name: &str,
        kind: CollectionKind,
    ) -> Result<CollectionInfo, StoreError>;

    /// Create a persistent index over `fields`; an identical existing index is success.
    async fn ensure_persistent_index(
        &self,
        collection: &str,
        fields: Vec<String>,
        options: IndexOptions,
    ) -> Result<(), StoreError>;

    /// Create the named graph if absent.
    async fn ensure_graph(&self, name: &str) -> Result<(), StoreError>;

    /// Bind an edge collection into a named graph; an existing binding is success.
    async fn ensure_edge_definition(
        &self,
        graph: &str,
        definition: EdgeDefinition,
    ) -> Result<(), StoreError>;

    /// Read a document; `StoreError::NotFound` when absent.
    async fn read_document(&self, collection: &str, key: &str)
        -> Result<StoredDocument, StoreError>;

    /// Insert a document and return its stored form.
    async fn create_document(
        &self,
        collection: &str,
        body: JsonObject,
    ) -> Result<StoredDocument, StoreError>;

    /// Merge `patch` into a document and return its stored form; `NotFound` when absent.
    async fn update_document(
        &self,
        collection: &str,
        key: &str,
        patch: JsonObject,
    ) -> Result<StoredDocument, StoreError>;

    /// Remove a document; `NotFound` when absent.
    async fn remove_document(&self, collection: &str, key: &str)
        -> Result<DocumentMeta, StoreError>;

    /// Run a parametrized query.
    async fn query(&self, aql: &str, bind_vars: BindVars) -> Result<DocumentCursor, StoreError>;
}
