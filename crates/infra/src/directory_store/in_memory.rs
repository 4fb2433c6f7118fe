//! In-memory reference data.
//!
//! Intended for tests/dev. Populated up front, immutable afterwards.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;

use lossdesk_core::{ManagerId, RestaurantId};
use lossdesk_directory::{Manager, Restaurant};

use super::Directory;
use crate::error::StoreError;

#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    managers: BTreeMap<ManagerId, String>,
    restaurants: BTreeMap<RestaurantId, String>,
    assignments: BTreeMap<ManagerId, BTreeSet<RestaurantId>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_manager(&mut self, id: ManagerId, name: impl Into<String>) {
        self.managers.insert(id, name.into());
    }

    pub fn add_restaurant(&mut self, id: RestaurantId, name: impl Into<String>) {
        self.restaurants.insert(id, name.into());
    }

    /// Attach a restaurant to a manager (many-to-many).
    pub fn assign(&mut self, manager: ManagerId, restaurant: RestaurantId) {
        self.assignments.entry(manager).or_default().insert(restaurant);
    }

    pub fn manager_name(&self, id: ManagerId) -> Option<&str> {
        self.managers.get(&id).map(String::as_str)
    }

    pub fn restaurant_name(&self, id: RestaurantId) -> Option<&str> {
        self.restaurants.get(&id).map(String::as_str)
    }

    pub fn contains_manager(&self, id: ManagerId) -> bool {
        self.managers.contains_key(&id)
    }

    pub fn contains_restaurant(&self, id: RestaurantId) -> bool {
        self.restaurants.contains_key(&id)
    }
}

#[async_trait]
impl Directory for InMemoryDirectory {
    async fn list_managers(&self) -> Result<Vec<Manager>, StoreError> {
        let mut managers: Vec<Manager> = self
            .managers
            .iter()
            .map(|(id, name)| Manager::new(*id, name.clone()))
            .collect();
        managers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(managers)
    }

    async fn list_restaurants(&self, manager: ManagerId) -> Result<Vec<Restaurant>, StoreError> {
        let mut restaurants: Vec<Restaurant> = self
            .assignments
            .get(&manager)
            .into_iter()
            .flatten()
            .filter_map(|id| {
                self.restaurants
                    .get(id)
                    .map(|name| Restaurant::new(*id, name.clone()))
            })
            .collect();
        restaurants.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(restaurants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> InMemoryDirectory {
        let mut dir = InMemoryDirectory::new();
        dir.add_manager(ManagerId::new(1), "Ivanov");
        dir.add_manager(ManagerId::new(2), "Akhmetov");
        dir.add_restaurant(RestaurantId::new(10), "Restaurant-1");
        dir.add_restaurant(RestaurantId::new(11), "Airport");
        dir.assign(ManagerId::new(1), RestaurantId::new(10));
        dir.assign(ManagerId::new(1), RestaurantId::new(11));
        dir
    }

    #[tokio::test]
    async fn managers_are_ordered_by_name() {
        let names: Vec<String> = sample()
            .list_managers()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["Akhmetov", "Ivanov"]);
    }

    #[tokio::test]
    async fn restaurants_are_scoped_to_the_manager() {
        let dir = sample();
        let names: Vec<String> = dir
            .list_restaurants(ManagerId::new(1))
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["Airport", "Restaurant-1"]);

        assert!(dir
            .list_restaurants(ManagerId::new(2))
            .await
            .unwrap()
            .is_empty());
    }
}
