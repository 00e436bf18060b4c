//! Infrastructure implementations.
//!
//! Contains the document store port and its ArangoDB adapter.

pub mod arango;
pub mod correlation;
pub mod ports;
