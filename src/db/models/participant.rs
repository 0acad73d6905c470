//! Participant Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// A person attached to a session. Exactly one per session is the organizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Owning session reference
    #[serde(with = "serde_helpers::record_id")]
    pub session_id: RecordId,
    pub name: String,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_organizer: bool,
    pub joined_at: DateTime<Utc>,
}

/// Join session payload (API)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantJoin {
    pub name: String,
}
