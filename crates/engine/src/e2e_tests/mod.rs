//! Backend E2E integration tests.
//!
//! These tests run the façade services against a real ArangoDB started via
//! testcontainers. Every test gets its own container.
//!
//! # Running E2E Tests
//!
//! ```bash
//! # Run all E2E tests (requires Docker)
//! cargo test -p geovision-engine --lib e2e_tests -- --ignored
//!
//! # Run specific test
//! cargo test -p geovision-engine --lib source_crud_lifecycle -- --ignored
//! ```

mod arango_test_harness;
mod entity_crud_tests;

pub use arango_test_harness::*;
