//! Directory record shapes.
//!
//! These are read-only rows owned by the reference data store. Restaurants
//! relate to managers many-to-many; the relation itself lives in the store.

use serde::{Deserialize, Serialize};

use lossdesk_core::{ManagerId, RestaurantId};

/// A field manager able to report sales-loss incidents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manager {
    pub id: ManagerId,
    pub name: String,
}

impl Manager {
    pub fn new(id: ManagerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A restaurant a loss can be attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
}

impl Restaurant {
    pub fn new(id: RestaurantId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
