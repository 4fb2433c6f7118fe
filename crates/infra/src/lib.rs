//! Infrastructure layer: store boundaries and their implementations.
//!
//! Each store is a small async trait with an in-memory implementation for
//! tests/dev and a Postgres implementation for production.

pub mod db;
pub mod directory_store;
pub mod error;
pub mod incident_store;

pub use directory_store::{Directory, InMemoryDirectory, PostgresDirectory};
pub use error::StoreError;
pub use incident_store::{IncidentStore, InMemoryIncidentStore, PostgresIncidentStore};
