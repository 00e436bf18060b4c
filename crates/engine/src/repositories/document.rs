//! Translation between domain payloads and stored document bodies.
//!
//! Domain types carry their identity as `id`/`key`/`rev` and relation
//! endpoints as `from`/`to`; the store keeps identity in `_id`/`_key`/`_rev`
//! and endpoints in `_from`/`_to`.

use geovision_domain::{AnyEntity, Entity, EntityKind, Relation};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::infrastructure::ports::{JsonObject, RepoError, StoredDocument};

const IDENTITY_FIELDS: [&str; 3] = ["id", "key", "rev"];

/// Serialize a payload into a store body, dropping caller-supplied identity.
pub(crate) fn to_body<T: Serialize>(value: &T) -> Result<JsonObject, RepoError> {
    match serde_json::to_value(value).map_err(RepoError::serialization)? {
        Value::Object(mut body) => {
            for field in IDENTITY_FIELDS {
                body.remove(field);
            }
            Ok(body)
        }
        other => Err(RepoError::serialization(format!(
            "payload serialized to {other} instead of an object"
        ))),
    }
}

/// Decode a stored body and stamp the store's identity onto it.
pub(crate) fn decode_entity<E: Entity>(doc: StoredDocument) -> Result<E, RepoError> {
    let mut entity: E = decode_body(doc.body)?;
    *entity.meta_mut() = doc.meta;
    Ok(entity)
}

/// Decode a raw document of the given kind.
pub(crate) fn decode_any(kind: EntityKind, value: Value) -> Result<AnyEntity, RepoError> {
    let doc = StoredDocument::from_value(value).map_err(RepoError::serialization)?;
    Ok(match kind {
        EntityKind::Event => AnyEntity::Event(decode_entity(doc)?),
        EntityKind::Person => AnyEntity::Person(decode_entity(doc)?),
        EntityKind::Organization => AnyEntity::Organization(decode_entity(doc)?),
        EntityKind::Source => AnyEntity::Source(decode_entity(doc)?),
        EntityKind::Website => AnyEntity::Website(decode_entity(doc)?),
    })
}

/// Store body for a relation: endpoints move to `_from`/`_to`.
pub(crate) fn relation_body(relation: &Relation) -> Result<JsonObject, RepoError> {
    let mut body = to_body(relation)?;
    rename(&mut body, "from", "_from");
    rename(&mut body, "to", "_to");
    Ok(body)
}

pub(crate) fn decode_relation(doc: StoredDocument) -> Result<Relation, RepoError> {
    let StoredDocument { meta, mut body } = doc;
    rename(&mut body, "_from", "from");
    rename(&mut body, "_to", "to");
    let mut relation: Relation = decode_body(body)?;
    relation.meta = meta;
    Ok(relation)
}

/// Decode an edge as returned inside a query row.
pub(crate) fn decode_relation_value(value: Value) -> Result<Relation, RepoError> {
    decode_relation(StoredDocument::from_value(value).map_err(RepoError::serialization)?)
}

fn decode_body<T: DeserializeOwned>(body: JsonObject) -> Result<T, RepoError> {
    serde_json::from_value(Value::Object(body)).map_err(RepoError::serialization)
}

fn rename(body: &mut JsonObject, from: &str, to: &str) {
    if let Some(value) = body.remove(from) {
        body.insert(to.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geovision_domain::{DocumentMeta, Event, Person};
    use serde_json::json;

    #[test]
    fn body_never_carries_identity() {
        let mut person = Person::new("Ada");
        person.meta = DocumentMeta::new("persons/1", "1", "_r");
        let body = to_body(&person).expect("body");
        assert_eq!(Value::Object(body), json!({ "name": "Ada" }));
    }

    #[test]
    fn event_body_uses_camel_case() {
        let body = to_body(&Event::new(1_700_000_000)).expect("body");
        assert_eq!(Value::Object(body), json!({ "happenedAt": 1_700_000_000i64 }));
    }

    #[test]
    fn decoded_entity_takes_identity_from_meta() {
        let doc = StoredDocument {
            meta: DocumentMeta::new("persons/7", "7", "_r7"),
            body: json!({ "name": "Grace" }).as_object().cloned().expect("object"),
        };
        let person: Person = decode_entity(doc).expect("person");
        assert_eq!(person.meta.id, "persons/7");
        assert_eq!(person.name, "Grace");
    }

    #[test]
    fn relation_endpoints_round_trip_through_store_names() {
        let relation = Relation::new("events/1", "persons/2", "attended by");
        let body = relation_body(&relation).expect("body");
        assert_eq!(body.get("_from"), Some(&json!("events/1")));
        assert!(!body.contains_key("from"));

        let decoded = decode_relation(StoredDocument {
            meta: DocumentMeta::new("events_attended_by_persons/9", "9", "_r"),
            body,
        })
        .expect("relation");
        assert_eq!(decoded.from, "events/1");
        assert_eq!(decoded.to, "persons/2");
        assert_eq!(decoded.meta.key, "9");
    }

    #[test]
    fn any_entity_dispatches_on_kind() {
        let entity = decode_any(
            EntityKind::Website,
            json!({ "_id": "websites/3", "_key": "3", "_rev": "_r", "url": "https://example.org" }),
        )
        .expect("website");
        assert_eq!(entity.kind(), EntityKind::Website);
        assert_eq!(entity.meta().key, "3");
    }

    #[test]
    fn malformed_rows_are_serialization_errors() {
        let err = decode_any(EntityKind::Event, json!({ "_id": "events/1" })).expect_err("bad");
        assert!(matches!(err, RepoError::Serialization(_)));

        let err = decode_any(
            EntityKind::Event,
            json!({ "_id": "events/1", "_key": "1", "_rev": "_r", "happenedAt": "yesterday" }),
        )
        .expect_err("bad type");
        assert!(matches!(err, RepoError::Serialization(_)));
    }
}
