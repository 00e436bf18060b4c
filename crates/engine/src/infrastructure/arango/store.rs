//! `DocumentStore` implementation over the ArangoDB HTTP API.

use async_trait::async_trait;
use geovision_domain::DocumentMeta;
use serde_json::{json, Value};

use super::client::ArangoClient;
use super::cursor;
use crate::config::ArangoConfig;
use crate::infrastructure::ports::{
    BindVars, CollectionInfo, CollectionKind, DocumentCursor, DocumentStore, EdgeDefinition,
    IndexOptions, JsonObject, StoreError, StoredDocument,
};

/// Gateway to one ArangoDB database.
#[derive(Clone)]
pub struct ArangoStore {
    client: ArangoClient,
}

impl ArangoStore {
    /// Connect and make sure the configured database exists.
    pub async fn connect(config: &ArangoConfig) -> Result<Self, StoreError> {
        tracing::info!(
            url = %config.url,
            database = %config.database,
            user = %config.username,
            "Connecting to ArangoDB"
        );
        let store = Self {
            client: ArangoClient::new(config),
        };
        store.ensure_database().await?;
        Ok(store)
    }

    /// Create the database if it is absent. A concurrent creation counts as success.
    pub async fn ensure_database(&self) -> Result<(), StoreError> {
        let current = self.client.db_url(&["_api", "database", "current"])?;
        match self.client.get(current).await {
            Ok(_) => {
                tracing::debug!(database = %self.client.database(), "Database exists");
                return Ok(());
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        let url = self.client.server_url(&["_api", "database"])?;
        match self
            .client
            .post(url, &json!({ "name": self.client.database() }))
            .await
        {
            Ok(_) => {
                tracing::info!(database = %self.client.database(), "Created database");
                Ok(())
            }
            Err(e) if e.is_already_exists() => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn fetch_collection(&self, name: &str) -> Result<CollectionInfo, StoreError> {
        let url = self.client.db_url(&["_api", "collection", name])?;
        let body = self.client.get(url).await?;
        let kind = match body.get("type").and_then(Value::as_u64) {
            Some(3) => CollectionKind::Edge,
            Some(2) => CollectionKind::Vertex,
            other => {
                return Err(StoreError::decode(format!(
                    "collection '{name}' has unexpected type {other:?}"
                )))
            }
        };
        Ok(CollectionInfo {
            name: name.to_string(),
            kind,
        })
    }

    async fn fetch_graph(&self, name: &str) -> Result<Value, StoreError> {
        let url = self.client.db_url(&["_api", "gharial", name])?;
        self.client.get(url).await
    }
}

/// Whether a gharial graph description already binds `collection`.
fn has_edge_definition(graph: &Value, collection: &str) -> bool {
    graph
        .pointer("/graph/edgeDefinitions")
        .and_then(Value::as_array)
        .is_some_and(|definitions| {
            definitions
                .iter()
                .any(|d| d.get("collection").and_then(Value::as_str) == Some(collection))
        })
}

/// Build a stored document from a write response made with `returnNew=true`.
///
/// The identity always comes from the response metadata, even if the
/// returned `new` body omits it.
fn written_document(response: Value, sent: JsonObject) -> Result<StoredDocument, StoreError> {
    let Value::Object(mut response) = response else {
        return Err(StoreError::decode("write response is not a JSON object"));
    };
    let body = match response.remove("new") {
        Some(Value::Object(new)) => new,
        _ => sent,
    };
    let meta = StoredDocument::from_value(Value::Object(response))?.meta;
    let mut stored = StoredDocument::from_value(with_meta(body, &meta))?;
    stored.meta = meta;
    Ok(stored)
}

fn with_meta(mut body: JsonObject, meta: &DocumentMeta) -> Value {
    body.insert("_id".into(), Value::String(meta.id.clone()));
    body.insert("_key".into(), Value::String(meta.key.clone()));
    body.insert("_rev".into(), Value::String(meta.rev.clone()));
    Value::Object(body)
}

#[async_trait]
impl DocumentStore for ArangoStore {
    async fn collection_exists(&self, name: &str) -> Result<bool, StoreError> {
        match self.fetch_collection(name).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn get_or_create_collection(
        &self,
        name: &str,
        kind: CollectionKind,
    ) -> Result<CollectionInfo, StoreError> {
        let existing = match self.fetch_collection(name).await {
            Ok(info) => Some(info),
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(e),
        };

        let info = match existing {
            Some(info) => info,
            None => {
                let url = self.client.db_url(&["_api", "collection"])?;
                let body = json!({ "name": name, "type": kind.arango_type() });
                match self.client.post(url, &body).await {
                    Ok(_) => {
                        tracing::info!(collection = %name, ?kind, "Created collection");
                        CollectionInfo {
                            name: name.to_string(),
                            kind,
                        }
                    }
                    Err(e) if e.is_already_exists() => {
                        tracing::debug!(collection = %name, "Collection created concurrently");
                        self.fetch_collection(name).await?
                    }
                    Err(e) => return Err(e),
                }
            }
        };

        if info.kind != kind {
            return Err(StoreError::Store {
                status: 409,
                error_num: 0,
                message: format!(
                    "collection '{name}' exists as {:?}, expected {kind:?}",
                    info.kind
                ),
            });
        }
        Ok(info)
    }

    async fn ensure_persistent_index(
        &self,
        collection: &str,
        fields: Vec<String>,
        options: IndexOptions,
    ) -> Result<(), StoreError> {
        let mut url = self.client.db_url(&["_api", "index"])?;
        url.query_pairs_mut().append_pair("collection", collection);
        let body = json!({
            "type": "persistent",
            "fields": fields,
            "unique": options.unique,
            "inBackground": options.background,
        });
        let response = self.client.post(url, &body).await?;
        if response.get("isNewlyCreated").and_then(Value::as_bool) == Some(true) {
            tracing::info!(%collection, ?fields, "Created persistent index");
        }
        Ok(())
    }

    async fn ensure_graph(&self, name: &str) -> Result<(), StoreError> {
        match self.fetch_graph(name).await {
            Ok(_) => return Ok(()),
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        let url = self.client.db_url(&["_api", "gharial"])?;
        match self
            .client
            .post(url, &json!({ "name": name, "edgeDefinitions": [] }))
            .await
        {
            Ok(_) => {
                tracing::info!(graph = %name, "Created graph");
                Ok(())
            }
            Err(e) if e.is_already_exists() => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn ensure_edge_definition(
        &self,
        graph: &str,
        definition: EdgeDefinition,
    ) -> Result<(), StoreError> {
        let current = self.fetch_graph(graph).await?;
        if has_edge_definition(&current, &definition.collection) {
            return Ok(());
        }

        let url = self.client.db_url(&["_api", "gharial", graph, "edge"])?;
        let body = json!({
            "collection": definition.collection,
            "from": definition.from,
            "to": definition.to,
        });
        match self.client.post(url, &body).await {
            Ok(_) => {
                tracing::info!(
                    %graph,
                    collection = %definition.collection,
                    "Added edge definition"
                );
                Ok(())
            }
            Err(e) if e.is_already_exists() => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn read_document(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<StoredDocument, StoreError> {
        let url = self.client.db_url(&["_api", "document", collection, key])?;
        StoredDocument::from_value(self.client.get(url).await?)
    }

    async fn create_document(
        &self,
        collection: &str,
        body: JsonObject,
    ) -> Result<StoredDocument, StoreError> {
        let mut url = self.client.db_url(&["_api", "document", collection])?;
        url.query_pairs_mut().append_pair("returnNew", "true");
        let response = self.client.post(url, &Value::Object(body.clone())).await?;
        written_document(response, body)
    }

    async fn update_document(
        &self,
        collection: &str,
        key: &str,
        patch: JsonObject,
    ) -> Result<StoredDocument, StoreError> {
        let mut url = self.client.db_url(&["_api", "document", collection, key])?;
        url.query_pairs_mut().append_pair("returnNew", "true");
        let response = self.client.patch(url, &Value::Object(patch.clone())).await?;
        written_document(response, patch)
    }

    async fn remove_document(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<DocumentMeta, StoreError> {
        let url = self.client.db_url(&["_api", "document", collection, key])?;
        let response = self.client.delete(url).await?;
        Ok(StoredDocument::from_value(response)?.meta)
    }

    async fn query(&self, aql: &str, bind_vars: BindVars) -> Result<DocumentCursor, StoreError> {
        cursor::open(&self.client, aql, bind_vars).await
    }
}
