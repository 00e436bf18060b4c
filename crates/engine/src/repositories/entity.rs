//! Per-kind CRUD over the vertex collections.

use std::marker::PhantomData;
use std::sync::Arc;

use geovision_domain::Entity;

use super::document::{decode_entity, to_body};
use crate::infrastructure::ports::{DocumentStore, RepoError};

/// CRUD for one entity kind, stored in the collection named by `E::KIND`.
///
/// Every returned entity carries the identity and revision assigned by the
/// store.
pub struct EntityRepository<E: Entity> {
    store: Arc<dyn DocumentStore>,
    _kind: PhantomData<fn() -> E>,
}

impl<E: Entity> EntityRepository<E> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _kind: PhantomData,
        }
    }

    fn collection(&self) -> &'static str {
        E::KIND.collection()
    }

    fn entity_type(&self) -> &'static str {
        E::KIND.entity_type()
    }

    pub async fn get(&self, key: &str) -> Result<E, RepoError> {
        let doc = self
            .store
            .read_document(self.collection(), key)
            .await
            .map_err(|e| RepoError::from_store("read_document", self.entity_type(), key, e))?;
        decode_entity(doc)
    }

    pub async fn create(&self, entity: &E) -> Result<E, RepoError> {
        let body = to_body(entity)?;
        let doc = self
            .store
            .create_document(self.collection(), body)
            .await
            .map_err(|e| RepoError::database("create_document", e))?;
        tracing::debug!(
            collection = self.collection(),
            id = %doc.meta.id,
            "Created document"
        );
        decode_entity(doc)
    }

    /// Apply `patch` to the stored document. Empty strings are not sent, so
    /// those attributes keep their stored value.
    pub async fn update(&self, key: &str, patch: &E) -> Result<E, RepoError> {
        let body = to_body(patch)?;
        let doc = self
            .store
            .update_document(self.collection(), key, body)
            .await
            .map_err(|e| RepoError::from_store("update_document", self.entity_type(), key, e))?;
        tracing::debug!(
            collection = self.collection(),
            %key,
            rev = %doc.meta.rev,
            "Updated document"
        );
        decode_entity(doc)
    }

    pub async fn delete(&self, key: &str) -> Result<(), RepoError> {
        self.store
            .remove_document(self.collection(), key)
            .await
            .map_err(|e| RepoError::from_store("remove_document", self.entity_type(), key, e))?;
        tracing::debug!(collection = self.collection(), %key, "Removed document");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockDocumentStore, StoreError, StoredDocument};
    use geovision_domain::{DocumentMeta, Event, Source};
    use serde_json::json;

    fn stored(id: &str, key: &str, rev: &str, body: serde_json::Value) -> StoredDocument {
        StoredDocument {
            meta: DocumentMeta::new(id, key, rev),
            body: body.as_object().cloned().expect("object"),
        }
    }

    #[tokio::test]
    async fn create_strips_identity_and_returns_store_meta() {
        let mut store = MockDocumentStore::new();
        store
            .expect_create_document()
            .withf(|collection, body| {
                collection == "sources"
                    && serde_json::Value::Object(body.clone()) == json!({ "name": "Test Source" })
            })
            .times(1)
            .returning(|_, _| {
                Ok(stored(
                    "sources/42",
                    "42",
                    "_a",
                    json!({ "name": "Test Source" }),
                ))
            });

        let repo = EntityRepository::<Source>::new(Arc::new(store));
        let mut input = Source::new("Test Source");
        input.meta = DocumentMeta::new("sources/forged", "forged", "_x");

        let created = repo.create(&input).await.expect("created");
        assert_eq!(created.meta, DocumentMeta::new("sources/42", "42", "_a"));
        assert_eq!(created.name, "Test Source");
    }

    #[tokio::test]
    async fn get_missing_document_is_not_found() {
        let mut store = MockDocumentStore::new();
        store
            .expect_read_document()
            .returning(|_, _| Err(StoreError::NotFound("document not found".into())));

        let repo = EntityRepository::<Event>::new(Arc::new(store));
        let err = repo.get("missing").await.expect_err("not found");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Event not found: missing");
    }

    #[tokio::test]
    async fn update_sends_only_set_attributes() {
        let mut store = MockDocumentStore::new();
        store
            .expect_update_document()
            .withf(|collection, key, patch| {
                collection == "events"
                    && key == "e1"
                    && serde_json::Value::Object(patch.clone()) == json!({ "happenedAt": 99 })
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(stored("events/e1", "e1", "_b", json!({ "happenedAt": 99 })))
            });

        let repo = EntityRepository::<Event>::new(Arc::new(store));
        let updated = repo.update("e1", &Event::new(99)).await.expect("updated");
        assert_eq!(updated.happened_at, 99);
        assert_eq!(updated.meta.rev, "_b");
    }

    #[tokio::test]
    async fn delete_propagates_not_found() {
        let mut store = MockDocumentStore::new();
        store
            .expect_remove_document()
            .returning(|_, _| Err(StoreError::NotFound("document not found".into())));

        let repo = EntityRepository::<Source>::new(Arc::new(store));
        assert!(repo.delete("gone").await.expect_err("missing").is_not_found());
    }

    #[tokio::test]
    async fn transport_failures_are_database_errors() {
        let mut store = MockDocumentStore::new();
        store
            .expect_read_document()
            .returning(|_, _| Err(StoreError::Transport("connection reset".into())));

        let repo = EntityRepository::<Source>::new(Arc::new(store));
        let err = repo.get("1").await.expect_err("failure");
        assert!(matches!(err, RepoError::Database { operation: "read_document", .. }));
    }
}
