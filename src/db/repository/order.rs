//! Order Repository

use super::{
    BaseRepository, GUARDED_INSERT_INDEX, OPEN_SESSION_GUARD, ORDERS, RepoError, RepoResult,
    SESSIONS, map_guard_error, parse_record_id,
};
use crate::db::models::Order;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Insert an order, guarded by the session still being open (same
    /// single-transaction guard as participant inserts).
    pub async fn create_in_open_session(&self, order: Order) -> RepoResult<Order> {
        let session = parse_record_id(&order.session_id.to_string(), SESSIONS)?;
        let query = format!("{OPEN_SESSION_GUARD} CREATE {ORDERS} CONTENT $data;");

        let response = self
            .base
            .db()
            .query(query)
            .bind(("sess", session))
            .bind(("data", order))
            .await?;

        let mut response = response.check().map_err(map_guard_error)?;
        let created: Option<Order> = response.take(GUARDED_INSERT_INDEX)?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Orders of a session, oldest first
    pub async fn find_by_session(&self, session_id: &str) -> RepoResult<Vec<Order>> {
        let session = parse_record_id(session_id, SESSIONS)?;
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM orders WHERE session_id = $sess ORDER BY created_at")
            .bind(("sess", session.to_string()))
            .await?
            .take(0)?;
        Ok(orders)
    }
}
