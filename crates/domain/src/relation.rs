//! Directed relations between entities and the edge collections that hold them.
//!
//! A relation lives in an edge collection named
//! `<fromCollection>_<normalizedName>_<toCollection>`, so the same relation
//! name between different endpoint kinds lands in different collections.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entities::EntityKind;
use crate::error::DomainError;
use crate::ids::{DocumentMeta, QualifiedId};

/// Longest collection name the store accepts.
const MAX_COLLECTION_NAME_LEN: usize = 256;

/// A directed edge between two entities.
///
/// `from` and `to` are qualified ids (`<collection>/<key>`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    #[serde(flatten)]
    pub meta: DocumentMeta,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub from: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub to: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
}

impl Relation {
    pub fn new(from: impl Into<String>, to: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            meta: DocumentMeta::default(),
            from: from.into(),
            to: to.into(),
            name: name.into(),
        }
    }

    /// Parse both endpoints.
    pub fn endpoints(&self) -> Result<(QualifiedId, QualifiedId), DomainError> {
        Ok((QualifiedId::parse(&self.from)?, QualifiedId::parse(&self.to)?))
    }
}

/// Lowercase the name and replace spaces with underscores.
pub fn normalize_relation_name(name: &str) -> String {
    name.replace(' ', "_").to_lowercase()
}

/// The `(fromKind, normalizedName, toKind)` triple naming an edge collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EdgeCollection {
    from: EntityKind,
    relation: String,
    to: EntityKind,
}

impl EdgeCollection {
    /// Build the triple from endpoint kinds and a free-text relation name.
    pub fn new(from: EntityKind, relation_name: &str, to: EntityKind) -> Result<Self, DomainError> {
        let relation = normalize_relation_name(relation_name);
        if relation.is_empty() {
            return Err(DomainError::validation("relation name cannot be empty"));
        }
        if let Some(bad) = relation
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
        {
            return Err(DomainError::validation(format!(
                "relation name contains unsupported character '{bad}'"
            )));
        }

        let edge = Self { from, relation, to };
        if edge.name().len() > MAX_COLLECTION_NAME_LEN {
            return Err(DomainError::validation(format!(
                "relation name is too long (edge collections allow \
                 {MAX_COLLECTION_NAME_LEN} characters)"
            )));
        }
        Ok(edge)
    }

    /// Derive the edge collection for a relation from its endpoints and name.
    ///
    /// Both endpoints must be qualified ids into one of the known vertex
    /// collections.
    pub fn for_relation(relation: &Relation) -> Result<Self, DomainError> {
        let (from, to) = relation.endpoints()?;
        let from_kind = vertex_kind(&from)?;
        let to_kind = vertex_kind(&to)?;
        Self::new(from_kind, &relation.name, to_kind)
    }

    /// Recover the triple from a physical edge collection name.
    pub fn parse(name: &str) -> Result<Self, DomainError> {
        let not_edge = || DomainError::invalid_id(format!("'{name}' is not a relation collection"));
        let from = EntityKind::ALL
            .into_iter()
            .find(|kind| name.starts_with(&format!("{}_", kind.collection())))
            .ok_or_else(not_edge)?;
        let rest = &name[from.collection().len() + 1..];
        let to = EntityKind::ALL
            .into_iter()
            .find(|kind| rest.ends_with(&format!("_{}", kind.collection())))
            .ok_or_else(not_edge)?;
        let relation = &rest[..rest.len() - to.collection().len() - 1];
        Self::new(from, relation, to).map_err(|_| not_edge())
    }

    pub fn from_kind(&self) -> EntityKind {
        self.from
    }

    pub fn to_kind(&self) -> EntityKind {
        self.to
    }

    /// The normalized relation name.
    pub fn relation(&self) -> &str {
        &self.relation
    }

    /// Physical collection name: `<from>_<relation>_<to>`.
    pub fn name(&self) -> String {
        format!(
            "{}_{}_{}",
            self.from.collection(),
            self.relation,
            self.to.collection()
        )
    }
}

impl fmt::Display for EdgeCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

fn vertex_kind(id: &QualifiedId) -> Result<EntityKind, DomainError> {
    EntityKind::from_collection(id.collection()).ok_or_else(|| {
        DomainError::invalid_id(format!(
            "'{}' is not a known vertex collection (in '{id}')",
            id.collection()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_lowercases_and_replaces_spaces() {
        assert_eq!(normalize_relation_name("Related To"), "related_to");
        assert_eq!(normalize_relation_name("hosted_by"), "hosted_by");
        assert_eq!(normalize_relation_name("  "), "__");
        assert_eq!(normalize_relation_name(""), "");
    }

    #[test]
    fn edge_collection_name_encodes_triple() {
        let relation = Relation::new("events/1", "events/2", "related to");
        let edge = EdgeCollection::for_relation(&relation).expect("valid relation");
        assert_eq!(edge.name(), "events_related_to_events");
        assert_eq!(edge.relation(), "related_to");
        assert_eq!(edge.from_kind(), EntityKind::Event);
    }

    #[test]
    fn same_name_between_different_kinds_uses_different_collections() {
        let a = Relation::new("events/1", "organizations/2", "Hosted By");
        let b = Relation::new("events/1", "persons/2", "Hosted By");
        let a = EdgeCollection::for_relation(&a).expect("valid");
        let b = EdgeCollection::for_relation(&b).expect("valid");
        assert_eq!(a.name(), "events_hosted_by_organizations");
        assert_eq!(b.name(), "events_hosted_by_persons");
    }

    #[test]
    fn empty_name_is_rejected() {
        let relation = Relation::new("events/1", "events/2", "");
        let err = EdgeCollection::for_relation(&relation).expect_err("empty name");
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn malformed_endpoint_is_rejected_before_name() {
        let relation = Relation::new("not-a-qualified-id", "events/2", "");
        let err = EdgeCollection::for_relation(&relation).expect_err("bad from");
        assert!(matches!(err, DomainError::InvalidId(_)));
    }

    #[test]
    fn unknown_vertex_collection_is_rejected() {
        let relation = Relation::new("planets/1", "events/2", "orbits");
        let err = EdgeCollection::for_relation(&relation).expect_err("unknown kind");
        assert!(matches!(err, DomainError::InvalidId(_)));
    }

    #[test]
    fn parse_recovers_triple_from_collection_name() {
        let edge = EdgeCollection::parse("events_hosted_by_organizations").expect("edge name");
        assert_eq!(edge.from_kind(), EntityKind::Event);
        assert_eq!(edge.relation(), "hosted_by");
        assert_eq!(edge.to_kind(), EntityKind::Organization);
    }

    #[test]
    fn parse_rejects_vertex_and_unknown_collections() {
        for name in ["persons", "events_events", "planets_orbits_events", "events__events"] {
            let err = EdgeCollection::parse(name).expect_err(name);
            assert!(matches!(err, DomainError::InvalidId(_)), "{name}");
        }
    }

    #[test]
    fn unsupported_characters_are_rejected() {
        let err = EdgeCollection::new(EntityKind::Event, "part/of", EntityKind::Event)
            .expect_err("slash");
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
