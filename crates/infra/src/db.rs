//! Database wiring: connection pool and schema bootstrap.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::error::StoreError;

/// Schema for the incident tables. Idempotent.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS managers (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS restaurants (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS manager_restaurants (
    manager_id BIGINT NOT NULL REFERENCES managers(id),
    restaurant_id BIGINT NOT NULL REFERENCES restaurants(id),
    PRIMARY KEY (manager_id, restaurant_id)
);

CREATE TABLE IF NOT EXISTS incidents (
    id BIGSERIAL PRIMARY KEY,
    manager_id BIGINT NOT NULL REFERENCES managers(id),
    restaurant_id BIGINT NOT NULL REFERENCES restaurants(id),
    start_time TIMESTAMPTZ NOT NULL,
    end_time TIMESTAMPTZ,
    reason TEXT NOT NULL,
    comment TEXT NOT NULL DEFAULT '—',
    amount BIGINT NOT NULL CHECK (amount > 0),
    status TEXT NOT NULL CHECK (status IN ('open', 'closed'))
);

CREATE INDEX IF NOT EXISTS incidents_open_idx
    ON incidents (start_time DESC)
    WHERE status = 'open';
"#;

/// Connect a small pool (the conversational workload is low-volume).
pub async fn connect_pool(database_url: &str) -> Result<PgPool, StoreError> {
    let pool = PgPoolOptions::new()
        .min_connections(1)
        .max_connections(5)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Create the tables if they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    Ok(())
}
