//! Order Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// One line of an order: a menu item snapshot with a quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

/// One participant's submitted set of items with a computed total
///
/// `participant_id` is the relational owner reference; `participant_name` is a
/// display snapshot that stays valid even if the referenced participant record
/// is unavailable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub session_id: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub participant_id: RecordId,
    pub participant_name: String,
    pub items: Vec<OrderItem>,
    pub total: f64,
    pub created_at: DateTime<Utc>,
}

/// Submit order payload (API)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    /// Session id as "sessions:key"
    pub session_id: String,
    /// Participant id as "participants:key"
    pub participant_id: String,
    pub participant_name: String,
    pub items: Vec<OrderItem>,
    pub total: f64,
}
