//! Restaurant API Handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::db::models::Restaurant;
use crate::db::repository::RestaurantRepository;
use crate::utils::AppResult;

/// GET /api/restaurants - all restaurants, ordered by name
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Restaurant>>> {
    let repo = RestaurantRepository::new(state.db.clone());
    let restaurants = repo.find_all().await?;
    Ok(Json(restaurants))
}
