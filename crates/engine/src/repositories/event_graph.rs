//! Graph queries centred on events.

use std::collections::HashSet;
use std::sync::Arc;

use geovision_domain::{
    EntityKind, Event, EventNeighborhood, EventWindow, QualifiedId, Relation, RelatedEntity,
};
use serde::Deserialize;
use serde_json::Value;

use super::document::{decode_any, decode_entity, decode_relation_value};
use crate::infrastructure::ports::{BindVars, DocumentStore, RepoError, StoredDocument};

/// Events in the window, each with its outbound edges toward other events.
const EVENTS_IN_WINDOW: &str = r#"
FOR d IN events
    FILTER d.happenedAt >= @start AND d.happenedAt <= @end
    SORT d.happenedAt
    RETURN {
        event: d,
        edges: (
            FOR v, e IN 1..1 OUTBOUND d GRAPH @graph
                FILTER IS_SAME_COLLECTION("events", v)
                RETURN e
        )
    }
"#;

/// Plain window scan for a graph that has no edge definitions yet.
const EVENTS_IN_WINDOW_WITHOUT_EDGES: &str = r#"
FOR d IN events
    FILTER d.happenedAt >= @start AND d.happenedAt <= @end
    SORT d.happenedAt
    RETURN { event: d, edges: [] }
"#;

/// Non-event neighbours one hop out from an event.
const RELATED_ENTITIES: &str = r#"
FOR v, e IN 1..1 OUTBOUND @start GRAPH @graph
    FILTER !IS_SAME_COLLECTION("events", v)
    RETURN DISTINCT {
        type: PARSE_IDENTIFIER(v._id).collection,
        entity: v,
        edge: e
    }
"#;

#[derive(Deserialize)]
struct WindowRow {
    event: Value,
    #[serde(default)]
    edges: Vec<Value>,
}

#[derive(Deserialize)]
struct RelatedRow {
    #[serde(rename = "type")]
    collection: String,
    entity: Value,
    edge: Value,
}

/// Traversals over the named graph.
pub struct EventGraphRepository {
    store: Arc<dyn DocumentStore>,
    graph: String,
}

impl EventGraphRepository {
    pub fn new(store: Arc<dyn DocumentStore>, graph: impl Into<String>) -> Self {
        Self {
            store,
            graph: graph.into(),
        }
    }

    /// Events whose `happenedAt` lies in the window plus the relations
    /// running between two of those events.
    pub async fn events_in_window(
        &self,
        window: EventWindow,
    ) -> Result<EventNeighborhood, RepoError> {
        let mut bind_vars = BindVars::new();
        bind_vars.insert("start".into(), window.start().into());
        bind_vars.insert("end".into(), window.end().into());

        let mut traversal_vars = bind_vars.clone();
        traversal_vars.insert("graph".into(), self.graph.clone().into());
        let mut cursor = match self.store.query(EVENTS_IN_WINDOW, traversal_vars).await {
            Ok(cursor) => cursor,
            Err(e) if e.is_graph_empty() => {
                tracing::debug!(graph = %self.graph, "Graph has no edges, scanning events only");
                self.store
                    .query(EVENTS_IN_WINDOW_WITHOUT_EDGES, bind_vars)
                    .await
                    .map_err(|e| RepoError::database("events_in_window", e))?
            }
            Err(e) => return Err(RepoError::database("events_in_window", e)),
        };

        let mut events: Vec<Event> = Vec::new();
        let mut outbound: Vec<Relation> = Vec::new();
        while let Some(row) = cursor
            .next()
            .await
            .map_err(|e| RepoError::database("events_in_window", e))?
        {
            let row: WindowRow = serde_json::from_value(row).map_err(RepoError::serialization)?;
            let doc = StoredDocument::from_value(row.event).map_err(RepoError::serialization)?;
            events.push(decode_entity(doc)?);
            for edge in row.edges {
                outbound.push(decode_relation_value(edge)?);
            }
        }

        let ids: HashSet<&str> = events.iter().map(|e| e.meta.id.as_str()).collect();
        let relations: Vec<Relation> = outbound
            .into_iter()
            .filter(|r| ids.contains(r.from.as_str()) && ids.contains(r.to.as_str()))
            .collect();

        tracing::debug!(
            start = window.start(),
            end = window.end(),
            events = events.len(),
            relations = relations.len(),
            "Loaded events in window"
        );
        Ok(EventNeighborhood { events, relations })
    }

    /// Non-event vertices one outbound hop from the event, with the edge
    /// that reaches each of them. Rows that cannot be decoded are skipped.
    pub async fn related_entities(&self, key: &str) -> Result<Vec<RelatedEntity>, RepoError> {
        let seed = QualifiedId::new(EntityKind::Event.collection(), key)?;

        let mut bind_vars = BindVars::new();
        bind_vars.insert("start".into(), seed.to_string().into());
        bind_vars.insert("graph".into(), self.graph.clone().into());

        let mut cursor = match self.store.query(RELATED_ENTITIES, bind_vars).await {
            Ok(cursor) => cursor,
            Err(e) if e.is_graph_empty() => return Ok(Vec::new()),
            Err(e) => return Err(RepoError::database("related_entities", e)),
        };

        let mut related = Vec::new();
        while let Some(row) = cursor
            .next()
            .await
            .map_err(|e| RepoError::database("related_entities", e))?
        {
            match decode_related(row) {
                Ok(entity) => related.push(entity),
                Err(e) => tracing::warn!(
                    error = %e,
                    event = %seed,
                    "Skipping undecodable related entity"
                ),
            }
        }
        Ok(related)
    }
}

fn decode_related(row: Value) -> Result<RelatedEntity, RepoError> {
    let row: RelatedRow = serde_json::from_value(row).map_err(RepoError::serialization)?;
    let kind = EntityKind::from_collection(&row.collection).ok_or_else(|| {
        RepoError::serialization(format!("unknown vertex collection '{}'", row.collection))
    })?;
    Ok(RelatedEntity {
        kind,
        entity: decode_any(kind, row.entity)?,
        edge: decode_relation_value(row.edge)?,
    })
}
