//! Relationship operations.

use geovision_domain::Relation;

use super::error::ServiceError;
use crate::repositories::RelationshipRepository;

pub struct RelationshipService {
    repo: RelationshipRepository,
}

impl RelationshipService {
    pub fn new(repo: RelationshipRepository) -> Self {
        Self { repo }
    }

    pub async fn create(&self, relation: Option<Relation>) -> Result<Relation, ServiceError> {
        let relation =
            relation.ok_or_else(|| ServiceError::bad_request("relationship is required"))?;
        self.repo
            .create(&relation)
            .await
            .map_err(|e| ServiceError::from_repo("create_relationship", e))
    }

    /// Update the relation identified by `relation.id`.
    pub async fn update(&self, relation: Option<Relation>) -> Result<Relation, ServiceError> {
        let relation =
            relation.ok_or_else(|| ServiceError::bad_request("relationship is required"))?;
        if relation.meta.id.is_empty() {
            return Err(ServiceError::bad_request("relationship id is required"));
        }
        self.repo
            .update(&relation.meta.id, &relation)
            .await
            .map_err(|e| ServiceError::from_repo("update_relationship", e))
    }

    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        if id.is_empty() {
            return Err(ServiceError::bad_request("relationship id is required"));
        }
        self.repo
            .delete(id)
            .await
            .map_err(|e| ServiceError::from_repo("delete_relationship", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{DocumentCursor, MockDocumentStore};
    use std::sync::Arc;

    fn service(store: MockDocumentStore) -> RelationshipService {
        RelationshipService::new(RelationshipRepository::new(Arc::new(store), "osint_graph"))
    }

    #[tokio::test]
    async fn missing_relationship_is_bad_request() {
        let service = service(MockDocumentStore::new());
        assert!(matches!(service.create(None).await, Err(ServiceError::BadRequest(_))));
        assert!(matches!(service.update(None).await, Err(ServiceError::BadRequest(_))));
    }

    #[tokio::test]
    async fn update_requires_id() {
        let err = service(MockDocumentStore::new())
            .update(Some(Relation::new("", "", "renamed")))
            .await
            .expect_err("no id");
        assert_eq!(err, ServiceError::BadRequest("relationship id is required".into()));
    }

    #[tokio::test]
    async fn malformed_endpoints_are_bad_requests() {
        let mut store = MockDocumentStore::new();
        store.expect_get_or_create_collection().never();
        let err = service(store)
            .create(Some(Relation::new("events", "events/2", "related")))
            .await
            .expect_err("bad endpoint");
        assert!(matches!(err, ServiceError::BadRequest(_)));
    }

    #[tokio::test]
    async fn deleting_absent_edge_is_not_found() {
        let mut store = MockDocumentStore::new();
        store
            .expect_query()
            .returning(|_, _| Ok(DocumentCursor::empty()));
        let err = service(store)
            .delete("events_related_to_events/404")
            .await
            .expect_err("missing");
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
