//! Repository Module
//!
//! CRUD operations for the SurrealDB tables.
//!
//! ID convention: record ids are "table:key" throughout. The record's own
//! `id` is a native record id; reference fields (`session_id`, ...) are
//! stored as "table:key" strings and compared as strings in queries.

pub mod menu_item;
pub mod order;
pub mod participant;
pub mod restaurant;
pub mod session;

pub use menu_item::MenuItemRepository;
pub use order::OrderRepository;
pub use participant::ParticipantRepository;
pub use restaurant::RestaurantRepository;
pub use session::SessionRepository;

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

// Table names
pub const RESTAURANTS: &str = "restaurants";
pub const MENU_ITEMS: &str = "menu_items";
pub const SESSIONS: &str = "sessions";
pub const PARTICIPANTS: &str = "participants";
pub const ORDERS: &str = "orders";

// Guard messages THROWn by session-status checks; mapped back to RepoError
const GUARD_NOT_FOUND: &str = "guard: session not found";
const GUARD_CLOSED: &str = "guard: session closed";

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// Parse a "table:key" id and check it points at the expected table
pub fn parse_record_id(id: &str, table: &str) -> RepoResult<RecordId> {
    let record: RecordId = id
        .parse()
        .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
    if record.table() != table {
        return Err(RepoError::Validation(format!(
            "Invalid {} ID: {}",
            table, id
        )));
    }
    Ok(record)
}

/// Map errors THROWn by the open-session guard back to repository errors
pub(crate) fn map_guard_error(err: surrealdb::Error) -> RepoError {
    let msg = err.to_string();
    if msg.contains(GUARD_NOT_FOUND) {
        RepoError::NotFound("Session not found".to_string())
    } else if msg.contains(GUARD_CLOSED) {
        RepoError::Conflict("Session is closed".to_string())
    } else {
        RepoError::Database(msg)
    }
}

/// Multi-statement prelude that asserts the target session is still open.
///
/// The whole query (prelude + insert) executes in a single SurrealDB
/// transaction, so "check open, then insert" cannot race with a concurrent
/// close. Statement indexes: 0 = LET, 1..=2 = IF, 3 = the insert.
pub(crate) const OPEN_SESSION_GUARD: &str = "
    LET $s = (SELECT status FROM $sess)[0];
    IF $s == NONE { THROW \"guard: session not found\" };
    IF $s.status != \"open\" { THROW \"guard: session closed\" };
";

/// Index of the insert statement following [`OPEN_SESSION_GUARD`]
pub(crate) const GUARDED_INSERT_INDEX: usize = 3;
