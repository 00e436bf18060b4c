//! Schema provisioning - vertex collections, indexes and the named graph.

use geovision_domain::EntityKind;

use crate::infrastructure::ports::{CollectionKind, DocumentStore, IndexOptions, StoreError};

/// Attribute holding an event's epoch timestamp.
pub const HAPPENED_AT_FIELD: &str = "happenedAt";

/// Provision everything the service needs before it accepts requests.
///
/// Safe to call on every start-up and from concurrent processes: each step
/// is get-or-create.
pub async fn ensure_schema(store: &dyn DocumentStore, graph: &str) -> Result<(), StoreError> {
    for kind in EntityKind::ALL {
        store
            .get_or_create_collection(kind.collection(), CollectionKind::Vertex)
            .await?;
    }

    // Window queries over events filter and sort on happenedAt.
    store
        .ensure_persistent_index(
            EntityKind::Event.collection(),
            vec![HAPPENED_AT_FIELD.to_string()],
            IndexOptions::default(),
        )
        .await?;

    store.ensure_graph(graph).await?;

    tracing::info!(%graph, "ArangoDB schema initialized (collections, indexes and graph ensured)");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{CollectionInfo, MockDocumentStore};

    #[tokio::test]
    async fn provisions_all_vertex_collections_index_and_graph() {
        let mut store = MockDocumentStore::new();
        store
            .expect_get_or_create_collection()
            .times(5)
            .returning(|name, kind| {
                Ok(CollectionInfo {
                    name: name.to_string(),
                    kind,
                })
            });
        store
            .expect_ensure_persistent_index()
            .withf(|collection, fields, options| {
                collection == "events" && *fields == ["happenedAt"] && options.background
            })
            .times(1)
            .returning(|_, _, _| Ok(()));
        store
            .expect_ensure_graph()
            .withf(|graph| graph == "osint_graph")
            .times(1)
            .returning(|_| Ok(()));

        ensure_schema(&store, "osint_graph").await.expect("schema");
    }

    #[tokio::test]
    async fn stops_at_first_failure() {
        let mut store = MockDocumentStore::new();
        store
            .expect_get_or_create_collection()
            .times(1)
            .returning(|_, _| Err(StoreError::Transport("connection refused".into())));
        store.expect_ensure_persistent_index().never();
        store.expect_ensure_graph().never();

        let err = ensure_schema(&store, "osint_graph")
            .await
            .expect_err("should fail");
        assert!(matches!(err, StoreError::Transport(_)));
    }
}
