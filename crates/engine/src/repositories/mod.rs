//! Repository modules - data access over the document store port.
//!
//! Repositories translate store errors into `RepoError` at their boundary;
//! callers never see a `StoreError`.

mod document;
mod entity;
mod event_graph;
mod relationship;

pub use entity::EntityRepository;
pub use event_graph::EventGraphRepository;
pub use relationship::RelationshipRepository;
