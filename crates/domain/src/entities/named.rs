//! Named entities - persons, organizations and sources
//!
//! All three carry a single free-text `name`.

use serde::{Deserialize, Serialize};

use super::EntityKind;
use crate::ids::DocumentMeta;

macro_rules! define_named_entity {
    ($(#[$doc:meta])* $name:ident, $kind:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name {
            #[serde(flatten)]
            pub meta: DocumentMeta,
            #[serde(default, skip_serializing_if = "String::is_empty")]
            pub name: String,
        }

        impl $name {
            pub fn new(name: impl Into<String>) -> Self {
                Self {
                    meta: DocumentMeta::default(),
                    name: name.into(),
                }
            }
        }

        impl_entity!($name, $kind);
    };
}

define_named_entity!(
    /// A person involved in events.
    Person,
    EntityKind::Person
);
define_named_entity!(
    /// An organization involved in events.
    Organization,
    EntityKind::Organization
);
define_named_entity!(
    /// Where information about an event came from.
    Source,
    EntityKind::Source
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Entity;

    #[test]
    fn kinds_match_collections() {
        assert_eq!(Person::KIND.collection(), "persons");
        assert_eq!(Organization::KIND.collection(), "organizations");
        assert_eq!(Source::KIND.collection(), "sources");
    }

    #[test]
    fn new_entity_serializes_attributes_only() {
        let json = serde_json::to_value(Source::new("Test Source")).expect("serialize");
        assert_eq!(json, serde_json::json!({ "name": "Test Source" }));
    }
}
