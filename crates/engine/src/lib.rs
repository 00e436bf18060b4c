//! Geovision Engine library.
//!
//! Entity and relationship service over ArangoDB, served on gRPC and HTTP.
//!
//! ## Structure
//!
//! - `infrastructure/` - Store port, ArangoDB adapter, correlation ids
//! - `repositories/` - Collection-level persistence for entities and relations
//! - `services/` - Façade operations shared by both transports
//! - `api/` - gRPC services and HTTP routes
//! - `app` - Application composition
//! - `config` - Environment configuration

pub mod api;
pub mod app;
pub mod config;
pub mod infrastructure;
pub mod repositories;
pub mod services;

/// E2E integration tests using real ArangoDB via testcontainers.
#[cfg(test)]
mod e2e_tests;

pub use app::App;
