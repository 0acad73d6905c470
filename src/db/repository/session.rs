//! Session Repository

use super::{BaseRepository, RepoError, RepoResult, SESSIONS, parse_record_id};
use crate::db::models::Session;
use chrono::{DateTime, Utc};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct SessionRepository {
    base: BaseRepository,
}

impl SessionRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, session: Session) -> RepoResult<Session> {
        let created: Option<Session> = self.base.db().create(SESSIONS).content(session).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create session".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Session>> {
        let record = parse_record_id(id, SESSIONS)?;
        let session: Option<Session> = self.base.db().select(record).await?;
        Ok(session)
    }

    /// Resolve a join code. Open sessions only: a closed session's code is
    /// dead, and may be reused by a newer open session.
    pub async fn find_open_by_code(&self, code: &str) -> RepoResult<Option<Session>> {
        let sessions: Vec<Session> = self
            .base
            .db()
            .query("SELECT * FROM sessions WHERE code = $code AND status = \"open\" LIMIT 1")
            .bind(("code", code.to_string()))
            .await?
            .take(0)?;
        Ok(sessions.into_iter().next())
    }

    /// Whether any open session already uses this code (collision check)
    pub async fn open_code_exists(&self, code: &str) -> RepoResult<bool> {
        Ok(self.find_open_by_code(code).await?.is_some())
    }

    /// Close the session if, and only if, it is still open.
    ///
    /// Single conditional UPDATE, so a concurrent close cannot overwrite
    /// `closed_at`. Returns `None` when nothing matched (already closed, or
    /// no such session).
    pub async fn close_if_open(
        &self,
        id: &str,
        closed_at: DateTime<Utc>,
    ) -> RepoResult<Option<Session>> {
        let record = parse_record_id(id, SESSIONS)?;
        let updated: Vec<Session> = self
            .base
            .db()
            .query(
                "UPDATE $sess SET status = \"closed\", closed_at = $now \
                 WHERE status = \"open\"",
            )
            .bind(("sess", record))
            .bind(("now", closed_at))
            .await?
            .take(0)?;
        Ok(updated.into_iter().next())
    }

    /// Hard delete. Only used as compensating cleanup when the organizer
    /// participant insert fails mid-creation.
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let record = parse_record_id(id, SESSIONS)?;
        self.base
            .db()
            .query("DELETE $sess")
            .bind(("sess", record))
            .await?;
        Ok(())
    }
}
