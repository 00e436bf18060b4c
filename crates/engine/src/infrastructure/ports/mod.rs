//! Port traits for infrastructure boundaries.
//!
//! The store gateway is the only abstraction in the engine; everything above
//! it is concrete types. It exists so the ArangoDB adapter can be swapped for
//! a mock in tests (or another multi-model store).

mod error;
mod store;
mod types;

pub use error::{RepoError, StoreError};
pub use store::DocumentStore;
pub use types::{
    BindVars, CollectionInfo, CollectionKind, DocumentCursor, EdgeDefinition, IndexOptions,
    JsonObject, StoredDocument,
};

#[cfg(test)]
pub use store::MockDocumentStore;
