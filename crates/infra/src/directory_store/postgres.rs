//! Postgres-backed reference data.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::instrument;

use lossdesk_core::{ManagerId, RestaurantId};
use lossdesk_directory::{Manager, Restaurant};

use super::Directory;
use crate::error::StoreError;

#[derive(Debug, Clone)]
pub struct PostgresDirectory {
    pool: Arc<PgPool>,
}

impl PostgresDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait]
impl Directory for PostgresDirectory {
    #[instrument(skip(self), err)]
    async fn list_managers(&self) -> Result<Vec<Manager>, StoreError> {
        let rows = sqlx::query("SELECT id, name FROM managers ORDER BY name")
            .fetch_all(&*self.pool)
            .await?;

        rows.iter()
            .map(|row| {
                let id: i64 = row.try_get("id").map_err(StoreError::from)?;
                let name: String = row.try_get("name").map_err(StoreError::from)?;
                Ok(Manager::new(ManagerId::new(id), name))
            })
            .collect()
    }

    #[instrument(skip(self), fields(manager = %manager), err)]
    async fn list_restaurants(&self, manager: ManagerId) -> Result<Vec<Restaurant>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT r.id, r.name
            FROM restaurants r
            JOIN manager_restaurants mr ON mr.restaurant_id = r.id
            WHERE mr.manager_id = $1
            ORDER BY r.name
            "#,
        )
        .bind(manager.get())
        .fetch_all(&*self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let id: i64 = row.try_get("id").map_err(StoreError::from)?;
                let name: String = row.try_get("name").map_err(StoreError::from)?;
                Ok(Restaurant::new(RestaurantId::new(id), name))
            })
            .collect()
    }
}
