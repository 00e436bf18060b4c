//! Geovision domain types.
//!
//! Pure types and rules shared by the engine: the five vertex kinds and their
//! payloads, directed relations, store-assigned document identity, the
//! qualified-id codec, and the time window used by event queries.

pub mod entities;
pub mod error;
pub mod ids;
pub mod neighborhood;
pub mod relation;

pub use entities::{
    AnyEntity, Entity, EntityKind, Event, Organization, Person, Source, Website,
};
pub use error::DomainError;
pub use ids::{DocumentMeta, QualifiedId};
pub use neighborhood::{EventNeighborhood, EventWindow, RelatedEntity, WindowPolicy};
pub use relation::{normalize_relation_name, EdgeCollection, Relation};
