//! Incident persistence boundary.
//!
//! The store owns the authoritative lifecycle state of each incident row.
//! `close` is defined to be conditional on the row still being `open`, read
//! and updated as one atomic step, so two racing close attempts cannot both
//! succeed.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use lossdesk_core::IncidentId;
use lossdesk_incidents::{IncidentSummary, NewIncident};

use crate::error::StoreError;

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryIncidentStore;
pub use postgres::PostgresIncidentStore;

/// Persistent incident storage.
#[async_trait]
pub trait IncidentStore: Send + Sync {
    /// Insert a new incident and return the assigned id.
    ///
    /// Fails with [`StoreError::Constraint`] when the record references an
    /// unknown manager or restaurant.
    async fn insert(&self, incident: NewIncident) -> Result<IncidentId, StoreError>;

    /// Currently-open incidents, newest start first, capped at `limit`.
    async fn list_open(&self, limit: usize) -> Result<Vec<IncidentSummary>, StoreError>;

    /// Close an open incident with the given end timestamp.
    ///
    /// Returns `false` when the row is not currently `open` (already closed
    /// by a concurrent session, or unknown).
    async fn close(&self, id: IncidentId, ended_at: DateTime<Utc>) -> Result<bool, StoreError>;
}

#[async_trait]
impl<S> IncidentStore for Arc<S>
where
    S: IncidentStore + ?Sized,
{
    async fn insert(&self, incident: NewIncident) -> Result<IncidentId, StoreError> {
        (**self).insert(incident).await
    }

    async fn list_open(&self, limit: usize) -> Result<Vec<IncidentSummary>, StoreError> {
        (**self).list_open(limit).await
    }

    async fn close(&self, id: IncidentId, ended_at: DateTime<Utc>) -> Result<bool, StoreError> {
        (**self).close(id, ended_at).await
    }
}
