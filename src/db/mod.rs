//! Database Module
//!
//! Embedded SurrealDB storage: RocksDB on disk for the server binary,
//! in-memory engine for tests.

pub mod models;
pub mod repository;

use std::path::Path;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use crate::utils::AppError;

const NAMESPACE: &str = "comanda";
const DATABASE: &str = "comanda";

/// Idempotent schema: tables are schemaless, indexes cover the hot lookups
/// (code resolution and per-session fan-out reads).
const SCHEMA: &str = "
    DEFINE TABLE IF NOT EXISTS restaurants SCHEMALESS;
    DEFINE TABLE IF NOT EXISTS menu_items SCHEMALESS;
    DEFINE TABLE IF NOT EXISTS sessions SCHEMALESS;
    DEFINE TABLE IF NOT EXISTS participants SCHEMALESS;
    DEFINE TABLE IF NOT EXISTS orders SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS sessions_code ON TABLE sessions COLUMNS code;
    DEFINE INDEX IF NOT EXISTS participants_session ON TABLE participants COLUMNS session_id;
    DEFINE INDEX IF NOT EXISTS orders_session ON TABLE orders COLUMNS session_id;
    DEFINE INDEX IF NOT EXISTS menu_items_restaurant ON TABLE menu_items COLUMNS restaurant_id;
";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk database under `db_dir` and apply the schema
    pub async fn new(db_dir: &Path) -> Result<Self, AppError> {
        let db: Surreal<Db> = Surreal::new::<RocksDb>(db_dir)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        let service = Self { db };
        service.prepare().await?;
        tracing::info!("Database ready at {}", db_dir.display());
        Ok(service)
    }

    /// In-memory database, used by tests and demos
    pub async fn memory() -> Result<Self, AppError> {
        let db: Surreal<Db> = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;

        let service = Self { db };
        service.prepare().await?;
        Ok(service)
    }

    pub(crate) async fn prepare(&self) -> Result<(), AppError> {
        self.db
            .use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        self.db
            .query(SCHEMA)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply schema: {e}")))?
            .check()
            .map_err(|e| AppError::database(format!("Schema statement failed: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::RestaurantCreate;
    use crate::db::repository::RestaurantRepository;

    #[tokio::test]
    async fn schema_is_idempotent() {
        let service = DbService::memory().await.expect("memory db");
        service.prepare().await.expect("reapply schema");
    }

    #[tokio::test]
    async fn rocksdb_database_stores_rows() {
        let dir = tempfile::tempdir().expect("tempdir");
        let service = DbService::new(dir.path()).await.expect("open db");

        let repo = RestaurantRepository::new(service.db.clone());
        let created = repo
            .create(RestaurantCreate {
                name: "Kiosk".to_string(),
                address: None,
                category: None,
                logo_url: None,
            })
            .await
            .expect("create restaurant");

        let id = created.id.expect("id").to_string();
        let found = repo.find_by_id(&id).await.expect("lookup");
        assert_eq!(found.map(|r| r.name), Some("Kiosk".to_string()));
    }
}
