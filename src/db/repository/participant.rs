//! Participant Repository

use super::{
    BaseRepository, GUARDED_INSERT_INDEX, OPEN_SESSION_GUARD, PARTICIPANTS, RepoError, RepoResult,
    SESSIONS, map_guard_error, parse_record_id,
};
use crate::db::models::Participant;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct ParticipantRepository {
    base: BaseRepository,
}

impl ParticipantRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Insert a participant, guarded by the session still being open.
    ///
    /// Guard and insert run in one transaction; a session closed in between
    /// surfaces as `RepoError::Conflict`.
    pub async fn create_in_open_session(&self, participant: Participant) -> RepoResult<Participant> {
        let session = parse_record_id(&participant.session_id.to_string(), SESSIONS)?;
        let query = format!("{OPEN_SESSION_GUARD} CREATE {PARTICIPANTS} CONTENT $data;");

        let response = self
            .base
            .db()
            .query(query)
            .bind(("sess", session))
            .bind(("data", participant))
            .await?;

        let mut response = response.check().map_err(map_guard_error)?;
        let created: Option<Participant> = response.take(GUARDED_INSERT_INDEX)?;
        created.ok_or_else(|| RepoError::Database("Failed to create participant".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Participant>> {
        let record = parse_record_id(id, PARTICIPANTS)?;
        let participant: Option<Participant> = self.base.db().select(record).await?;
        Ok(participant)
    }

    /// Participants of a session, in join order
    pub async fn find_by_session(&self, session_id: &str) -> RepoResult<Vec<Participant>> {
        let session = parse_record_id(session_id, SESSIONS)?;
        let participants: Vec<Participant> = self
            .base
            .db()
            .query("SELECT * FROM participants WHERE session_id = $sess ORDER BY joined_at")
            .bind(("sess", session.to_string()))
            .await?
            .take(0)?;
        Ok(participants)
    }
}
