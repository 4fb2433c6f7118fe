//! In-memory incident store.
//!
//! Intended for tests/dev. Checks referential integrity against an
//! [`InMemoryDirectory`] the way the SQL schema would, and performs the
//! conditional close under a single write lock.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use lossdesk_core::IncidentId;
use lossdesk_incidents::{Incident, IncidentStatus, IncidentSummary, NewIncident};

use super::IncidentStore;
use crate::directory_store::InMemoryDirectory;
use crate::error::StoreError;

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    rows: BTreeMap<IncidentId, Incident>,
}

#[derive(Debug)]
pub struct InMemoryIncidentStore {
    directory: Arc<InMemoryDirectory>,
    inner: RwLock<Inner>,
}

impl InMemoryIncidentStore {
    pub fn new(directory: Arc<InMemoryDirectory>) -> Self {
        Self {
            directory,
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Test/debug peek at a stored row.
    pub fn get(&self, id: IncidentId) -> Option<Incident> {
        self.inner
            .read()
            .ok()
            .and_then(|inner| inner.rows.get(&id).cloned())
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn summary(&self, row: &Incident) -> IncidentSummary {
        IncidentSummary {
            id: row.id,
            started_at: row.started_at,
            reason: row.reason,
            amount: row.amount,
            restaurant_name: self
                .directory
                .restaurant_name(row.restaurant_id)
                .unwrap_or("?")
                .to_string(),
            manager_name: self
                .directory
                .manager_name(row.manager_id)
                .unwrap_or("?")
                .to_string(),
        }
    }
}

#[async_trait]
impl IncidentStore for InMemoryIncidentStore {
    async fn insert(&self, incident: NewIncident) -> Result<IncidentId, StoreError> {
        if !self.directory.contains_manager(incident.manager_id) {
            return Err(StoreError::constraint(format!(
                "unknown manager id {}",
                incident.manager_id
            )));
        }
        if !self.directory.contains_restaurant(incident.restaurant_id) {
            return Err(StoreError::constraint(format!(
                "unknown restaurant id {}",
                incident.restaurant_id
            )));
        }

        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::storage("lock poisoned"))?;

        inner.next_id += 1;
        let id = IncidentId::new(inner.next_id);
        let status = incident.status();
        inner.rows.insert(
            id,
            Incident {
                id,
                manager_id: incident.manager_id,
                restaurant_id: incident.restaurant_id,
                started_at: incident.started_at,
                ended_at: incident.ended_at,
                reason: incident.reason,
                comment: incident.comment,
                amount: incident.amount,
                status,
            },
        );
        Ok(id)
    }

    async fn list_open(&self, limit: usize) -> Result<Vec<IncidentSummary>, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::storage("lock poisoned"))?;

        let mut open: Vec<&Incident> = inner
            .rows
            .values()
            .filter(|row| row.status == IncidentStatus::Open)
            .collect();
        open.sort_by(|a, b| b.started_at.cmp(&a.started_at));

        Ok(open
            .into_iter()
            .take(limit)
            .map(|row| self.summary(row))
            .collect())
    }

    async fn close(&self, id: IncidentId, ended_at: DateTime<Utc>) -> Result<bool, StoreError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::storage("lock poisoned"))?;

        match inner.rows.get_mut(&id) {
            Some(row) if row.status == IncidentStatus::Open => {
                row.ended_at = Some(ended_at);
                row.status = IncidentStatus::Closed;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use lossdesk_core::{Amount, ManagerId, RestaurantId};
    use lossdesk_incidents::{COMMENT_PLACEHOLDER, LossReason};

    fn directory() -> Arc<InMemoryDirectory> {
        let mut dir = InMemoryDirectory::new();
        dir.add_manager(ManagerId::new(1), "Ivanov");
        dir.add_restaurant(RestaurantId::new(10), "Restaurant-1");
        dir.assign(ManagerId::new(1), RestaurantId::new(10));
        Arc::new(dir)
    }

    fn record(start_hour: u32) -> NewIncident {
        NewIncident {
            manager_id: ManagerId::new(1),
            restaurant_id: RestaurantId::new(10),
            started_at: Utc.with_ymd_and_hms(2025, 3, 10, start_hour, 0, 0).unwrap(),
            ended_at: None,
            reason: LossReason::External,
            comment: COMMENT_PLACEHOLDER.to_string(),
            amount: Amount::new(50_000).unwrap(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids_and_derives_status() {
        let store = InMemoryIncidentStore::new(directory());
        let first = store.insert(record(9)).await.unwrap();
        let second = store.insert(record(10)).await.unwrap();
        assert!(second > first);
        assert_eq!(store.get(first).unwrap().status, IncidentStatus::Open);
    }

    #[tokio::test]
    async fn insert_rejects_unknown_references() {
        let store = InMemoryIncidentStore::new(directory());
        let mut bad = record(9);
        bad.restaurant_id = RestaurantId::new(99);
        assert!(matches!(
            store.insert(bad).await,
            Err(StoreError::Constraint(_))
        ));
    }

    #[tokio::test]
    async fn list_open_is_newest_first_and_capped() {
        let store = InMemoryIncidentStore::new(directory());
        for hour in 8..12 {
            store.insert(record(hour)).await.unwrap();
        }

        let open = store.list_open(3).await.unwrap();
        assert_eq!(open.len(), 3);
        assert!(open[0].started_at > open[1].started_at);
        assert_eq!(open[0].manager_name, "Ivanov");
        assert_eq!(open[0].restaurant_name, "Restaurant-1");
    }

    #[tokio::test]
    async fn close_is_conditional_on_open_status() {
        let store = InMemoryIncidentStore::new(directory());
        let id = store.insert(record(9)).await.unwrap();
        let end = Utc.with_ymd_and_hms(2025, 3, 10, 10, 30, 0).unwrap();

        assert!(store.close(id, end).await.unwrap());
        // Second close observes the closed row and reports failure.
        assert!(!store.close(id, end).await.unwrap());
        assert!(!store.close(IncidentId::new(999), end).await.unwrap());

        let row = store.get(id).unwrap();
        assert_eq!(row.status, IncidentStatus::Closed);
        assert_eq!(row.ended_at, Some(end));
    }

    #[tokio::test]
    async fn concurrent_closes_let_exactly_one_win() {
        let store = Arc::new(InMemoryIncidentStore::new(directory()));
        let id = store.insert(record(9)).await.unwrap();
        let end = Utc.with_ymd_and_hms(2025, 3, 10, 11, 0, 0).unwrap();

        let mut handles = Vec::new();
        for _ in 0..2 {
            let store = store.clone();
            handles.push(tokio::spawn(async move { store.close(id, end).await }));
        }

        let mut wins = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap() {
                wins += 1;
            }
        }
        assert_eq!(wins, 1);
    }
}
