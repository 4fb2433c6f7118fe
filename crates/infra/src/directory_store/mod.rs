//! Reference data boundary: managers and the restaurants they cover.
//!
//! Read-only by design — the directory is maintained out of band and the
//! workflow engine only ever lists from it.

use std::sync::Arc;

use async_trait::async_trait;

use lossdesk_core::ManagerId;
use lossdesk_directory::{Manager, Restaurant};

use crate::error::StoreError;

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryDirectory;
pub use postgres::PostgresDirectory;

/// Read-only reference data provider.
#[async_trait]
pub trait Directory: Send + Sync {
    /// All managers, ordered by display name. May be empty.
    async fn list_managers(&self) -> Result<Vec<Manager>, StoreError>;

    /// Restaurants assigned to `manager`, ordered by display name.
    /// Empty when the manager has none.
    async fn list_restaurants(&self, manager: ManagerId) -> Result<Vec<Restaurant>, StoreError>;
}

#[async_trait]
impl<S> Directory for Arc<S>
where
    S: Directory + ?Sized,
{
    async fn list_managers(&self) -> Result<Vec<Manager>, StoreError> {
        (**self).list_managers().await
    }

    async fn list_restaurants(&self, manager: ManagerId) -> Result<Vec<Restaurant>, StoreError> {
        (**self).list_restaurants(manager).await
    }
}
