//! Postgres-backed incident store.
//!
//! The conditional close is a single `UPDATE ... WHERE status = 'open'`, so
//! the open-check and the write are one atomic statement.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use lossdesk_core::{Amount, IncidentId};
use lossdesk_incidents::{IncidentSummary, LossReason, NewIncident};

use super::IncidentStore;
use crate::error::StoreError;

#[derive(Debug, Clone)]
pub struct PostgresIncidentStore {
    pool: Arc<PgPool>,
}

impl PostgresIncidentStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

fn summary_from_row(row: &PgRow) -> Result<IncidentSummary, StoreError> {
    let id: i64 = row.try_get("id").map_err(StoreError::from)?;
    let started_at: DateTime<Utc> = row.try_get("start_time").map_err(StoreError::from)?;
    let reason: String = row.try_get("reason").map_err(StoreError::from)?;
    let amount: i64 = row.try_get("amount").map_err(StoreError::from)?;
    let restaurant_name: String = row.try_get("restaurant").map_err(StoreError::from)?;
    let manager_name: String = row.try_get("manager").map_err(StoreError::from)?;

    Ok(IncidentSummary {
        id: IncidentId::new(id),
        started_at,
        reason: LossReason::from_code(&reason)
            .map_err(|e| StoreError::storage(format!("bad incident row: {e}")))?,
        amount: Amount::new(u64::try_from(amount).unwrap_or(0))
            .map_err(|e| StoreError::storage(format!("bad incident row: {e}")))?,
        restaurant_name,
        manager_name,
    })
}

#[async_trait]
impl IncidentStore for PostgresIncidentStore {
    #[instrument(
        skip(self, incident),
        fields(
            manager = %incident.manager_id,
            restaurant = %incident.restaurant_id,
            status = incident.status().as_str()
        ),
        err
    )]
    async fn insert(&self, incident: NewIncident) -> Result<IncidentId, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO incidents(manager_id, restaurant_id, start_time, end_time,
                                  reason, comment, amount, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(incident.manager_id.get())
        .bind(incident.restaurant_id.get())
        .bind(incident.started_at)
        .bind(incident.ended_at)
        .bind(incident.reason.code())
        .bind(&incident.comment)
        .bind(i64::try_from(incident.amount.get()).map_err(|_| {
            StoreError::constraint(format!("amount out of range: {}", incident.amount))
        })?)
        .bind(incident.status().as_str())
        .fetch_one(&*self.pool)
        .await?;

        let id: i64 = row.try_get("id").map_err(StoreError::from)?;
        Ok(IncidentId::new(id))
    }

    #[instrument(skip(self), err)]
    async fn list_open(&self, limit: usize) -> Result<Vec<IncidentSummary>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT i.id, i.start_time, i.reason, i.amount,
                   r.name AS restaurant, m.name AS manager
            FROM incidents i
            JOIN restaurants r ON r.id = i.restaurant_id
            JOIN managers m ON m.id = i.manager_id
            WHERE i.status = 'open'
            ORDER BY i.start_time DESC
            LIMIT $1
            "#,
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&*self.pool)
        .await?;

        rows.iter().map(summary_from_row).collect()
    }

    #[instrument(skip(self), fields(incident = %id), err)]
    async fn close(&self, id: IncidentId, ended_at: DateTime<Utc>) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE incidents
            SET end_time = $2, status = 'closed'
            WHERE id = $1 AND status = 'open'
            "#,
        )
        .bind(id.get())
        .bind(ended_at)
        .execute(&*self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
