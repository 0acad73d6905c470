//! Session API Handlers

use std::convert::Infallible;

use axum::{
    Json,
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::Stream;

use crate::core::ServerState;
use crate::db::models::{
    Participant, ParticipantJoin, Session, SessionCreate, SessionDetail, SessionWithParticipants,
};
use crate::sessions::{SessionSummary, summarize};
use crate::utils::AppResult;

const SESSIONS: &str = "sessions";
const PARTICIPANTS: &str = "participants";

/// POST /api/sessions - create a session with its organizer participant
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<SessionCreate>,
) -> AppResult<Json<SessionWithParticipants>> {
    let created = state
        .sessions
        .create_session(&payload.organizer_name, &payload.restaurant_id)
        .await?;

    if let Some(id) = &created.session.id {
        let key = id.to_string();
        state.broadcast_change(&key, SESSIONS, "created", &key);
    }

    Ok(Json(created))
}

/// GET /api/sessions/:code - resolve an open session by its join code
pub async fn get_by_code(
    State(state): State<ServerState>,
    Path(code): Path<String>,
) -> AppResult<Json<Session>> {
    let session = state.sessions.get_by_code(&code).await?;
    Ok(Json(session))
}

/// GET /api/sessions/:id/details - session with participants and orders.
///
/// Works for closed sessions too, so the summary stays reachable.
pub async fn details(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<SessionDetail>> {
    let detail = state.sessions.get_details(&id).await?;
    Ok(Json(detail))
}

/// GET /api/sessions/:id/summary - aggregated per-participant totals
pub async fn summary(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<SessionSummary>> {
    let detail = state.sessions.get_details(&id).await?;
    Ok(Json(summarize(&detail.orders, &detail.participants)))
}

/// POST /api/sessions/:id/join - join an open session
pub async fn join(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ParticipantJoin>,
) -> AppResult<Json<Participant>> {
    let participant = state.sessions.join(&id, &payload.name).await?;

    let session_key = participant.session_id.to_string();
    let record_key = participant
        .id
        .as_ref()
        .map(|r| r.to_string())
        .unwrap_or_default();
    state.broadcast_change(&session_key, PARTICIPANTS, "created", &record_key);

    Ok(Json(participant))
}

/// POST /api/sessions/:id/close - close a session (idempotent)
pub async fn close(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Session>> {
    let session = state.sessions.close(&id).await?;

    if let Some(record) = &session.id {
        let key = record.to_string();
        state.broadcast_change(&key, SESSIONS, "updated", &key);
    }

    Ok(Json(session))
}

/// GET /api/sessions/:id/events - SSE feed of this session's changes.
///
/// Each event carries the change metadata only; clients refetch the detail
/// view on receipt.
pub async fn events(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    // Subscribe before the existence check: a write that lands while we
    // verify the session must still reach this subscriber.
    let subscription = state.watch.subscribe(&id);

    // 404 for unknown sessions instead of a silent empty stream
    state.sessions.get_details(&id).await?;
    let stream = futures::stream::unfold(subscription, |mut subscription| async move {
        let change = subscription.recv().await?;
        let event = Event::default().event("change").json_data(&change).ok()?;
        Some((Ok::<_, Infallible>(event), subscription))
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
