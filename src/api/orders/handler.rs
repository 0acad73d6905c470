//! Order API Handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::db::models::{Order, OrderCreate};
use crate::utils::AppResult;

const RESOURCE: &str = "orders";

/// POST /api/orders - submit one participant's order
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    let order = state.sessions.submit_order(payload).await?;

    let session_key = order.session_id.to_string();
    let record_key = order
        .id
        .as_ref()
        .map(|r| r.to_string())
        .unwrap_or_default();
    state.broadcast_change(&session_key, RESOURCE, "created", &record_key);

    Ok(Json(order))
}
