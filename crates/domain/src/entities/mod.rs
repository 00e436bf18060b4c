//! Domain entities - vertex kinds stored in dedicated collections

macro_rules! impl_entity {
    ($name:ident, $kind:expr) => {
        impl $crate::entities::Entity for $name {
            const KIND: $crate::entities::EntityKind = $kind;

            fn meta(&self) -> &$crate::ids::DocumentMeta {
                &self.meta
            }

            fn meta_mut(&mut self) -> &mut $crate::ids::DocumentMeta {
                &mut self.meta
            }
        }
    };
}

mod event;
mod named;
mod website;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::ids::DocumentMeta;

pub use event::Event;
pub use named::{Organization, Person, Source};
pub use website::Website;

/// The vertex kinds known to the service.
///
/// Each kind lives in a vertex collection named after it; the serde form is
/// that collection name so it can be used directly as the `type` tag of a
/// related-entity row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    #[serde(rename = "events")]
    Event,
    #[serde(rename = "persons")]
    Person,
    #[serde(rename = "organizations")]
    Organization,
    #[serde(rename = "sources")]
    Source,
    #[serde(rename = "websites")]
    Website,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Event,
        EntityKind::Person,
        EntityKind::Organization,
        EntityKind::Source,
        EntityKind::Website,
    ];

    /// Name of the vertex collection holding this kind.
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::Event => "events",
            EntityKind::Person => "persons",
            EntityKind::Organization => "organizations",
            EntityKind::Source => "sources",
            EntityKind::Website => "websites",
        }
    }

    /// Human-readable name used in log lines and error messages.
    pub fn entity_type(&self) -> &'static str {
        match self {
            EntityKind::Event => "Event",
            EntityKind::Person => "Person",
            EntityKind::Organization => "Organization",
            EntityKind::Source => "Source",
            EntityKind::Website => "Website",
        }
    }

    pub fn from_collection(collection: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.collection() == collection)
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.collection())
    }
}

/// A payload type stored in one vertex collection.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const KIND: EntityKind;

    fn meta(&self) -> &DocumentMeta;

    fn meta_mut(&mut self) -> &mut DocumentMeta;
}

/// Any one of the known entity kinds, dispatched on its collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnyEntity {
    Event(Event),
    Person(Person),
    Organization(Organization),
    Source(Source),
    Website(Website),
}

impl AnyEntity {
    pub fn kind(&self) -> EntityKind {
        match self {
            AnyEntity::Event(_) => EntityKind::Event,
            AnyEntity::Person(_) => EntityKind::Person,
            AnyEntity::Organization(_) => EntityKind::Organization,
            AnyEntity::Source(_) => EntityKind::Source,
            AnyEntity::Website(_) => EntityKind::Website,
        }
    }

    pub fn meta(&self) -> &DocumentMeta {
        match self {
            AnyEntity::Event(e) => e.meta(),
            AnyEntity::Person(e) => e.meta(),
            AnyEntity::Organization(e) => e.meta(),
            AnyEntity::Source(e) => e.meta(),
            AnyEntity::Website(e) => e.meta(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_names_round_trip() {
        for kind in EntityKind::ALL {
            assert_eq!(EntityKind::from_collection(kind.collection()), Some(kind));
        }
        assert_eq!(EntityKind::from_collection("relationships"), None);
    }

    #[test]
    fn every_entity_declares_its_kind() {
        assert_eq!(Event::KIND, EntityKind::Event);
        assert_eq!(Person::KIND, EntityKind::Person);
        assert_eq!(Organization::KIND, EntityKind::Organization);
        assert_eq!(Source::KIND, EntityKind::Source);
        assert_eq!(Website::KIND, EntityKind::Website);

        let mut website = Website::new("https://example.org");
        website.meta_mut().key = "w1".into();
        assert_eq!(website.meta().key, "w1");
    }

    #[test]
    fn kind_serializes_as_collection_name() {
        let json = serde_json::to_value(EntityKind::Organization).expect("serialize");
        assert_eq!(json, "organizations");
    }

    #[test]
    fn any_entity_serializes_without_tag() {
        let org = Organization {
            meta: DocumentMeta::new("organizations/1", "1", "_r"),
            name: "ACME".into(),
        };
        let json = serde_json::to_value(AnyEntity::Organization(org)).expect("serialize");
        assert_eq!(json["name"], "ACME");
        assert_eq!(json["key"], "1");
    }
}
