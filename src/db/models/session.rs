//! Session Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use surrealdb::RecordId;

/// Session status. Transitions `Open -> Closed`, never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Open,
    Closed,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// One group-ordering event, scoped to one restaurant, identified by a short code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// 6-character join code, shared out of band
    pub code: String,
    pub organizer_name: String,
    /// Restaurant reference
    #[serde(with = "serde_helpers::record_id")]
    pub restaurant_id: RecordId,
    /// Display snapshot of the restaurant name
    pub restaurant_name: String,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    /// Set exactly once, when the session is closed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn is_open(&self) -> bool {
        self.status == SessionStatus::Open
    }
}

/// Create session payload (API)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCreate {
    pub organizer_name: String,
    /// Restaurant id as "restaurants:key"
    pub restaurant_id: String,
}

/// Session plus its participants, as returned by session creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionWithParticipants {
    #[serde(flatten)]
    pub session: Session,
    pub participants: Vec<super::Participant>,
}

/// Full session detail view: session, participants and orders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDetail {
    #[serde(flatten)]
    pub session: Session,
    pub participants: Vec<super::Participant>,
    pub orders: Vec<super::Order>,
}
