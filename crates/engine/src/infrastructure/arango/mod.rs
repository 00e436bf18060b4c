//! ArangoDB implementation of the document store port.

mod client;
mod cursor;
mod schema;
mod store;

pub use schema::{ensure_schema, HAPPENED_AT_FIELD};
pub use store::ArangoStore;
