use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::core::Config;
use crate::db::DbService;
use crate::sessions::{SessionManager, SessionWatch};
use crate::utils::AppResult;

/// Shared application state
///
/// Held by every request handler through axum's `State` extractor. All
/// fields are cheap to clone: the database handle and the change feed share
/// their internals.
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | config | Config | Immutable configuration |
/// | db | Surreal<Db> | Embedded database |
/// | sessions | SessionManager | Session lifecycle operations |
/// | watch | SessionWatch | Per-session change feed |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub sessions: SessionManager,
    pub watch: SessionWatch,
}

impl ServerState {
    /// Initialize state for the server binary: ensures the work directory
    /// exists and opens the on-disk database.
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let db_dir = config.database_dir();
        std::fs::create_dir_all(&db_dir).map_err(|e| {
            crate::utils::AppError::internal(format!(
                "Failed to create {}: {e}",
                db_dir.display()
            ))
        })?;

        let db_service = DbService::new(&db_dir).await?;
        Ok(Self::from_db(config.clone(), db_service.db))
    }

    /// State over an in-memory database, for tests
    pub async fn in_memory(config: Config) -> AppResult<Self> {
        let db_service = DbService::memory().await?;
        Ok(Self::from_db(config, db_service.db))
    }

    fn from_db(config: Config, db: Surreal<Db>) -> Self {
        let watch = SessionWatch::new(config.event_channel_capacity);
        let sessions = SessionManager::new(db.clone());
        Self {
            config,
            db,
            sessions,
            watch,
        }
    }

    /// Publish a change event for a session; returns the new version.
    ///
    /// Called by API handlers after a committed write.
    pub fn broadcast_change(
        &self,
        session_id: &str,
        resource: &str,
        action: &str,
        record_id: &str,
    ) -> u64 {
        self.watch.publish(session_id, resource, action, record_id)
    }
}
