//! Menu Item Repository

use super::{BaseRepository, MENU_ITEMS, RESTAURANTS, RepoError, RepoResult, parse_record_id};
use crate::db::models::{MenuItem, MenuItemCreate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct MenuItemRepository {
    base: BaseRepository,
}

impl MenuItemRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Available items for a restaurant, ordered by category then name
    pub async fn find_available_by_restaurant(
        &self,
        restaurant_id: &str,
    ) -> RepoResult<Vec<MenuItem>> {
        let record = parse_record_id(restaurant_id, RESTAURANTS)?;
        let items: Vec<MenuItem> = self
            .base
            .db()
            .query(
                "SELECT * FROM menu_items \
                 WHERE restaurant_id = $restaurant AND available = true \
                 ORDER BY category, name",
            )
            .bind(("restaurant", record.to_string()))
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Seed a menu item (tests and ops tooling; no HTTP surface)
    pub async fn create(&self, data: MenuItemCreate) -> RepoResult<MenuItem> {
        let item = MenuItem {
            id: None,
            restaurant_id: data.restaurant_id,
            name: data.name,
            description: data.description,
            price: data.price,
            category: data.category,
            available: data.available.unwrap_or(true),
        };

        let created: Option<MenuItem> = self.base.db().create(MENU_ITEMS).content(item).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create menu item".to_string()))
    }
}
