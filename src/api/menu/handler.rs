//! Menu API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::MenuItem;
use crate::db::repository::MenuItemRepository;
use crate::utils::AppResult;

/// GET /api/menu/:restaurant_id - available items for one restaurant.
///
/// A restaurant without items yields an empty list, not a 404.
pub async fn list_for_restaurant(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<String>,
) -> AppResult<Json<Vec<MenuItem>>> {
    let repo = MenuItemRepository::new(state.db.clone());
    let items = repo.find_available_by_restaurant(&restaurant_id).await?;
    Ok(Json(items))
}
