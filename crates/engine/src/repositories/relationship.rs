//! Relations stored in per-triple edge collections of the named graph.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashSet;
use geovision_domain::{EdgeCollection, QualifiedId, Relation};
use serde_json::Value;

use super::document::{decode_relation, decode_relation_value, relation_body};
use crate::infrastructure::ports::{
    BindVars, CollectionKind, DocumentStore, EdgeDefinition, RepoError,
};

const ENTITY_TYPE: &str = "Relation";

/// Binding an edge collection into the graph races with other writers of the
/// same graph document; a write-write conflict is retried this many times.
const EDGE_DEFINITION_ATTEMPTS: u32 = 3;
const EDGE_DEFINITION_BACKOFF: Duration = Duration::from_millis(20);

const UPDATE_EDGE: &str = r#"
UPDATE @key WITH UNSET(@patch, "_id", "_key", "_rev", "_from", "_to") IN @@collection
    OPTIONS { ignoreErrors: true }
    RETURN NEW
"#;

const REMOVE_EDGE: &str = r#"
FOR doc IN @@collection
    FILTER doc._key == @key
    REMOVE doc IN @@collection
    RETURN OLD
"#;

/// Creates, updates and removes relations.
///
/// Edge collections are provisioned on first use. `provisioned` only saves
/// round-trips: every provisioning step is idempotent in the store.
pub struct RelationshipRepository {
    store: Arc<dyn DocumentStore>,
    graph: String,
    provisioned: DashSet<String>,
}

impl RelationshipRepository {
    pub fn new(store: Arc<dyn DocumentStore>, graph: impl Into<String>) -> Self {
        Self {
            store,
            graph: graph.into(),
            provisioned: DashSet::new(),
        }
    }

    /// Make sure the edge collection exists and is part of the graph.
    async fn provision(&self, edge: &EdgeCollection) -> Result<String, RepoError> {
        let name = edge.name();
        if self.provisioned.contains(&name) {
            return Ok(name);
        }

        self.store
            .get_or_create_collection(&name, CollectionKind::Edge)
            .await
            .map_err(|e| RepoError::database("get_or_create_collection", e))?;
        self.bind_edge_definition(EdgeDefinition {
            collection: name.clone(),
            from: vec![edge.from_kind().collection().to_string()],
            to: vec![edge.to_kind().collection().to_string()],
        })
        .await?;

        tracing::debug!(collection = %name, graph = %self.graph, "Edge collection ready");
        self.provisioned.insert(name.clone());
        Ok(name)
    }

    /// Each attempt re-reads the graph in the store, so a binding added by
    /// the conflicting writer ends the loop.
    async fn bind_edge_definition(&self, definition: EdgeDefinition) -> Result<(), RepoError> {
        let mut attempt = 1;
        loop {
            match self
                .store
                .ensure_edge_definition(&self.graph, definition.clone())
                .await
            {
                Ok(()) => return Ok(()),
                Err(e) if e.is_conflict() && attempt < EDGE_DEFINITION_ATTEMPTS => {
                    tracing::debug!(
                        collection = %definition.collection,
                        graph = %self.graph,
                        attempt,
                        "Edge definition conflict, retrying"
                    );
                    tokio::time::sleep(EDGE_DEFINITION_BACKOFF * attempt).await;
                    attempt += 1;
                }
                Err(e) => return Err(RepoError::database("ensure_edge_definition", e)),
            }
        }
    }

    pub async fn create(&self, relation: &Relation) -> Result<Relation, RepoError> {
        let edge = EdgeCollection::for_relation(relation)?;
        let collection = self.provision(&edge).await?;

        let doc = self
            .store
            .create_document(&collection, relation_body(relation)?)
            .await
            .map_err(|e| RepoError::database("create_document", e))?;
        tracing::debug!(id = %doc.meta.id, "Created relation");
        decode_relation(doc)
    }

    /// Patch the relation named by its qualified `id`.
    ///
    /// Identity and endpoints cannot change; only the remaining attributes
    /// of `patch` are applied.
    pub async fn update(&self, id: &str, patch: &Relation) -> Result<Relation, RepoError> {
        let (collection, key) = edge_location(id)?;
        let mut bind_vars = BindVars::new();
        bind_vars.insert("@collection".into(), Value::String(collection));
        bind_vars.insert("key".into(), Value::String(key));
        bind_vars.insert("patch".into(), Value::Object(relation_body(patch)?));

        let row = self.single_row("update_relation", id, UPDATE_EDGE, bind_vars).await?;
        decode_relation_value(row)
    }

    pub async fn delete(&self, id: &str) -> Result<(), RepoError> {
        let (collection, key) = edge_location(id)?;
        let mut bind_vars = BindVars::new();
        bind_vars.insert("@collection".into(), Value::String(collection));
        bind_vars.insert("key".into(), Value::String(key));

        self.single_row("remove_relation", id, REMOVE_EDGE, bind_vars).await?;
        tracing::debug!(%id, "Removed relation");
        Ok(())
    }

    /// Run a targeted query; a cursor without rows means the edge is absent.
    async fn single_row(
        &self,
        operation: &'static str,
        id: &str,
        aql: &str,
        bind_vars: BindVars,
    ) -> Result<Value, RepoError> {
        let mut cursor = self
            .store
            .query(aql, bind_vars)
            .await
            .map_err(|e| RepoError::from_store(operation, ENTITY_TYPE, id, e))?;
        cursor
            .next()
            .await
            .map_err(|e| RepoError::from_store(operation, ENTITY_TYPE, id, e))?
            .ok_or_else(|| RepoError::not_found(ENTITY_TYPE, id))
    }
}

/// Split a relation id, refusing ids that point outside relation collections.
fn edge_location(id: &str) -> Result<(String, String), RepoError> {
    let id = QualifiedId::parse(id)?;
    EdgeCollection::parse(id.collection())?;
    Ok(id.into_parts())
}
