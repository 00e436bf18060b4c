//! Conversions between protobuf messages and domain types.
//!
//! Both sides live in other crates, so these are plain functions rather
//! than `From` impls.

use geovision_domain::{
    AnyEntity, DocumentMeta, Event, EventNeighborhood, Organization, Person, Relation,
    RelatedEntity, Source, Website,
};
use geovision_protocol::pb::{self, related_entity};

pub(super) fn event_from_pb(p: pb::Event) -> Event {
    Event {
        meta: DocumentMeta::new(p.id, p.key, p.rev),
        happened_at: p.happened_at,
    }
}

pub(super) fn event_to_pb(e: Event) -> pb::Event {
    pb::Event {
        id: e.meta.id,
        key: e.meta.key,
        rev: e.meta.rev,
        happened_at: e.happened_at,
    }
}

pub(super) fn person_from_pb(p: pb::Person) -> Person {
    Person {
        meta: DocumentMeta::new(p.id, p.key, p.rev),
        name: p.name,
    }
}

pub(super) fn person_to_pb(e: Person) -> pb::Person {
    pb::Person {
        id: e.meta.id,
        key: e.meta.key,
        rev: e.meta.rev,
        name: e.name,
    }
}

pub(super) fn organization_from_pb(p: pb::Organization) -> Organization {
    Organization {
        meta: DocumentMeta::new(p.id, p.key, p.rev),
        name: p.name,
    }
}

pub(super) fn organization_to_pb(e: Organization) -> pb::Organization {
    pb::Organization {
        id: e.meta.id,
        key: e.meta.key,
        rev: e.meta.rev,
        name: e.name,
    }
}

pub(super) fn source_from_pb(p: pb::Source) -> Source {
    Source {
        meta: DocumentMeta::new(p.id, p.key, p.rev),
        name: p.name,
    }
}

pub(super) fn source_to_pb(e: Source) -> pb::Source {
    pb::Source {
        id: e.meta.id,
        key: e.meta.key,
        rev: e.meta.rev,
        name: e.name,
    }
}

pub(super) fn website_from_pb(p: pb::Website) -> Website {
    Website {
        meta: DocumentMeta::new(p.id, p.key, p.rev),
        url: p.url,
    }
}

pub(super) fn website_to_pb(e: Website) -> pb::Website {
    pb::Website {
        id: e.meta.id,
        key: e.meta.key,
        rev: e.meta.rev,
        url: e.url,
    }
}

pub(super) fn relation_from_pb(p: pb::Relation) -> Relation {
    Relation {
        meta: DocumentMeta::new(p.id, p.key, p.rev),
        from: p.from,
        to: p.to,
        name: p.name,
    }
}

pub(super) fn relation_to_pb(r: Relation) -> pb::Relation {
    pb::Relation {
        id: r.meta.id,
        key: r.meta.key,
        rev: r.meta.rev,
        from: r.from,
        to: r.to,
        name: r.name,
    }
}

pub(super) fn related_entity_to_pb(r: RelatedEntity) -> pb::RelatedEntity {
    let entity = match r.entity {
        AnyEntity::Event(e) => related_entity::Entity::Event(event_to_pb(e)),
        AnyEntity::Person(e) => related_entity::Entity::Person(person_to_pb(e)),
        AnyEntity::Organization(e) => {
            related_entity::Entity::Organization(organization_to_pb(e))
        }
        AnyEntity::Source(e) => related_entity::Entity::Source(source_to_pb(e)),
        AnyEntity::Website(e) => related_entity::Entity::Website(website_to_pb(e)),
    };
    pb::RelatedEntity {
        r#type: r.kind.collection().to_string(),
        entity: Some(entity),
        edge: Some(relation_to_pb(r.edge)),
    }
}

pub(super) fn neighborhood_to_pb(n: EventNeighborhood) -> pb::GetEventsResponse {
    pb::GetEventsResponse {
        events: n.events.into_iter().map(event_to_pb).collect(),
        relations: n.relations.into_iter().map(relation_to_pb).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geovision_domain::EntityKind;

    #[test]
    fn event_identity_survives_conversion() {
        let proto = pb::Event {
            id: "events/1".into(),
            key: "1".into(),
            rev: "_r".into(),
            happened_at: 1_700_000_000,
        };
        let event = event_from_pb(proto.clone());
        assert_eq!(event.meta.key, "1");
        assert_eq!(event_to_pb(event), proto);
    }

    #[test]
    fn relation_endpoints_survive_conversion() {
        let proto = pb::Relation {
            id: "events_cites_sources/9".into(),
            key: "9".into(),
            rev: "_r".into(),
            from: "events/1".into(),
            to: "sources/2".into(),
            name: "cites".into(),
        };
        let relation = relation_from_pb(proto.clone());
        assert_eq!(relation.from, "events/1");
        assert_eq!(relation.meta.id, "events_cites_sources/9");
        assert_eq!(relation_to_pb(relation), proto);
    }

    #[test]
    fn related_entity_uses_collection_as_type() {
        let related = RelatedEntity {
            kind: EntityKind::Website,
            entity: AnyEntity::Website(Website::new("https://example.org")),
            edge: Relation::new("events/1", "websites/2", "cited"),
        };
        let proto = related_entity_to_pb(related);
        assert_eq!(proto.r#type, "websites");
        assert!(matches!(
            proto.entity,
            Some(related_entity::Entity::Website(ref w)) if w.url == "https://example.org"
        ));
        assert_eq!(proto.edge.map(|e| e.to), Some("websites/2".to_string()));
    }

    #[test]
    fn neighborhood_keeps_events_and_relations() {
        let neighborhood = EventNeighborhood {
            events: vec![Event::new(10), Event::new(20)],
            relations: vec![Relation::new("events/a", "events/b", "related_to")],
        };
        let proto = neighborhood_to_pb(neighborhood);
        assert_eq!(proto.events.len(), 2);
        assert_eq!(proto.events[1].happened_at, 20);
        assert_eq!(proto.relations[0].name, "related_to");
    }
}
