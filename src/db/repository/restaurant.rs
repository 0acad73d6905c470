//! Restaurant Repository

use super::{BaseRepository, RESTAURANTS, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Restaurant, RestaurantCreate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct RestaurantRepository {
    base: BaseRepository,
}

impl RestaurantRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All restaurants, ordered by name
    pub async fn find_all(&self) -> RepoResult<Vec<Restaurant>> {
        let restaurants: Vec<Restaurant> = self
            .base
            .db()
            .query("SELECT * FROM restaurants ORDER BY name")
            .await?
            .take(0)?;
        Ok(restaurants)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Restaurant>> {
        let record = parse_record_id(id, RESTAURANTS)?;
        let restaurant: Option<Restaurant> = self.base.db().select(record).await?;
        Ok(restaurant)
    }

    /// Seed a restaurant (tests and ops tooling; no HTTP surface)
    pub async fn create(&self, data: RestaurantCreate) -> RepoResult<Restaurant> {
        let restaurant = Restaurant {
            id: None,
            name: data.name,
            address: data.address,
            category: data.category,
            logo_url: data.logo_url,
        };

        let created: Option<Restaurant> = self
            .base
            .db()
            .create(RESTAURANTS)
            .content(restaurant)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create restaurant".to_string()))
    }
}
