//! Order aggregation for the summary view
//!
//! Pure functions over already-fetched rows: group orders per participant,
//! concatenate their items, and compute the overall and per-person totals.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::db::models::{Order, OrderItem, Participant};
use crate::money::{to_decimal, to_f64};

/// All of one participant's orders, merged
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantOrders {
    pub participant_id: String,
    pub participant_name: String,
    pub items: Vec<OrderItem>,
    pub total: f64,
}

/// Aggregated view of a session's orders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Per-participant groups, in order of first submission
    pub by_participant: Vec<ParticipantOrders>,
    pub total: f64,
    pub participant_count: usize,
    /// total ÷ participant_count; absent when the session has no participants
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_person_share: Option<f64>,
}

/// Build the summary for one session.
///
/// Orders whose participant record is missing are still shown under their
/// denormalized `participant_name`. Participants who never ordered do not
/// appear in the grouping (they still count toward the per-person share).
pub fn summarize(orders: &[Order], participants: &[Participant]) -> SessionSummary {
    let mut groups: Vec<ParticipantOrders> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut totals: Vec<rust_decimal::Decimal> = Vec::new();

    for order in orders {
        let key = order.participant_id.to_string();
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(ParticipantOrders {
                participant_id: key,
                participant_name: order.participant_name.clone(),
                items: Vec::new(),
                total: 0.0,
            });
            totals.push(rust_decimal::Decimal::ZERO);
            groups.len() - 1
        });

        groups[slot].items.extend(order.items.iter().cloned());
        totals[slot] += to_decimal(order.total);
    }

    for (group, total) in groups.iter_mut().zip(&totals) {
        group.total = to_f64(*total);
    }

    let overall: rust_decimal::Decimal = totals.iter().copied().sum();
    let participant_count = participants.len();
    let per_person_share = if participant_count > 0 {
        Some(to_f64(
            overall / rust_decimal::Decimal::from(participant_count as u64),
        ))
    } else {
        None
    };

    SessionSummary {
        by_participant: groups,
        total: to_f64(overall),
        participant_count,
        per_person_share,
    }
}
