//! E2E tests for entity CRUD.

use geovision_domain::{Event, Source, Website};

use super::ArangoTestHarness;
use crate::services::ServiceError;

#[tokio::test]
#[ignore = "requires docker (testcontainers)"]
async fn source_crud_lifecycle() {
    let harness = ArangoTestHarness::start().await.expect("harness");
    let app = harness.app();

    let created = app
        .sources
        .create(Some(Source::new("Test Source")))
        .await
        .expect("create");
    assert!(!created.meta.rev.is_empty());
    assert_eq!(created.meta.id, format!("sources/{}", created.meta.key));

    let fetched = app.sources.get(&created.meta.key).await.expect("get");
    assert_eq!(fetched.name, "Test Source");

    app.sources
        .update(&created.meta.key, Some(Source::new("Updated Test Source")))
        .await
        .expect("update");
    let fetched = app.sources.get(&created.meta.key).await.expect("get");
    assert_eq!(fetched.name, "Updated Test Source");

    app.sources.delete(&created.meta.key).await.expect("delete");
    let err = app
        .sources
        .get(&created.meta.key)
        .await
        .expect_err("deleted");
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
#[ignore = "requires docker (testcontainers)"]
async fn update_with_fetched_entity_changes_only_revision() {
    let harness = ArangoTestHarness::start().await.expect("harness");
    let app = harness.app();

    let created = app
        .websites
        .create(Some(Website::new("https://example.org")))
        .await
        .expect("create");
    let fetched = app.websites.get(&created.meta.key).await.expect("get");

    let updated = app
        .websites
        .update(&created.meta.key, Some(fetched.clone()))
        .await
        .expect("update");
    assert_eq!(updated.meta.id, fetched.meta.id);
    assert_eq!(updated.meta.key, fetched.meta.key);
    assert_eq!(updated.url, fetched.url);
}

#[tokio::test]
#[ignore = "requires docker (testcontainers)"]
async fn zero_window_bounds_are_rejected() {
    let harness = ArangoTestHarness::start().await.expect("harness");
    let app = harness.app();

    app.events
        .create(Some(Event::new(5)))
        .await
        .expect("create");
    for (start, end) in [(0, 10), (1, 0), (10, 1)] {
        let err = app
            .events
            .get_events(start, end)
            .await
            .expect_err("invalid window");
        assert!(matches!(err, ServiceError::BadRequest(_)));
    }
}
