//! Event operations: CRUD plus the neighborhood queries.

use geovision_domain::{Event, EventNeighborhood, EventWindow, RelatedEntity, WindowPolicy};

use super::entity::EntityService;
use super::error::{require_key, ServiceError};
use crate::repositories::EventGraphRepository;

pub struct EventService {
    crud: EntityService<Event>,
    graph: EventGraphRepository,
    window_policy: WindowPolicy,
}

impl EventService {
    pub fn new(
        crud: EntityService<Event>,
        graph: EventGraphRepository,
        window_policy: WindowPolicy,
    ) -> Self {
        Self {
            crud,
            graph,
            window_policy,
        }
    }

    pub async fn get(&self, key: &str) -> Result<Event, ServiceError> {
        self.crud.get(key).await
    }

    pub async fn create(&self, event: Option<Event>) -> Result<Event, ServiceError> {
        self.crud.create(event).await
    }

    pub async fn update(&self, key: &str, patch: Option<Event>) -> Result<Event, ServiceError> {
        self.crud.update(key, patch).await
    }

    pub async fn delete(&self, key: &str) -> Result<(), ServiceError> {
        self.crud.delete(key).await
    }

    /// Events in `[start_time, end_time]` and the relations among them.
    pub async fn get_events(
        &self,
        start_time: i64,
        end_time: i64,
    ) -> Result<EventNeighborhood, ServiceError> {
        let window = EventWindow::new(start_time, end_time, self.window_policy)?;
        self.graph
            .events_in_window(window)
            .await
            .map_err(|e| ServiceError::from_repo("get_events", e))
    }

    pub async fn get_related_entities(
        &self,
        key: &str,
    ) -> Result<Vec<RelatedEntity>, ServiceError> {
        require_key(key)?;
        self.graph
            .related_entities(key)
            .await
            .map_err(|e| ServiceError::from_repo("get_event_related_entities", e))
    }

    pub async fn get_related_events(&self, key: &str) -> Result<Vec<Event>, ServiceError> {
        require_key(key)?;
        Err(ServiceError::Unimplemented("GetRelatedEvents"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{DocumentCursor, DocumentStore, MockDocumentStore};
    use crate::repositories::EntityRepository;
    use serde_json::json;
    use std::sync::Arc;

    fn service(store: MockDocumentStore, policy: WindowPolicy) -> EventService {
        let store: Arc<dyn DocumentStore> = Arc::new(store);
        EventService::new(
            EntityService::new(EntityRepository::new(store.clone())),
            EventGraphRepository::new(store, "osint_graph"),
            policy,
        )
    }

    #[tokio::test]
    async fn zero_bounds_are_bad_requests_by_default() {
        let mut store = MockDocumentStore::new();
        store.expect_query().never();
        let service = service(store, WindowPolicy::RequireNonZero);

        for (start, end) in [(0, 10), (10, 0)] {
            assert!(matches!(
                service.get_events(start, end).await,
                Err(ServiceError::BadRequest(_))
            ));
        }
    }

    #[tokio::test]
    async fn inverted_window_is_bad_request() {
        let service = service(MockDocumentStore::new(), WindowPolicy::AllowZero);
        assert!(matches!(
            service.get_events(200, 100).await,
            Err(ServiceError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn relaxed_policy_queries_from_epoch() {
        let mut store = MockDocumentStore::new();
        store
            .expect_query()
            .withf(|_, vars| vars.get("start") == Some(&json!(0)))
            .times(1)
            .returning(|_, _| Ok(DocumentCursor::empty()));

        let result = service(store, WindowPolicy::AllowZero)
            .get_events(0, 100)
            .await
            .expect("events");
        assert!(result.events.is_empty());
    }

    #[tokio::test]
    async fn related_entities_require_key() {
        let mut store = MockDocumentStore::new();
        store.expect_query().never();
        let err = service(store, WindowPolicy::default())
            .get_related_entities("")
            .await
            .expect_err("empty key");
        assert!(matches!(err, ServiceError::BadRequest(_)));
    }

    #[tokio::test]
    async fn related_events_are_unimplemented() {
        let err = service(MockDocumentStore::new(), WindowPolicy::default())
            .get_related_events("e1")
            .await
            .expect_err("stub");
        assert_eq!(err, ServiceError::Unimplemented("GetRelatedEvents"));
    }
}
