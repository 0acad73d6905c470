//! Session API module
//!
//! # Routes
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/sessions | POST | Create session (organizer + code) |
//! | /api/sessions/{code} | GET | Resolve an open session by join code |
//! | /api/sessions/{id}/details | GET | Session with participants and orders |
//! | /api/sessions/{id}/summary | GET | Aggregated per-participant totals |
//! | /api/sessions/{id}/join | POST | Join as participant |
//! | /api/sessions/{id}/close | POST | Close session (idempotent) |
//! | /api/sessions/{id}/events | GET | SSE change feed for one session |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    // The bare {id} route takes the share code, the nested ones a record id;
    // the placeholder name must match across routes at the same position.
    Router::new()
        .route("/api/sessions", post(handler::create))
        .route("/api/sessions/{id}", get(handler::get_by_code))
        .route("/api/sessions/{id}/details", get(handler::details))
        .route("/api/sessions/{id}/summary", get(handler::summary))
        .route("/api/sessions/{id}/join", post(handler::join))
        .route("/api/sessions/{id}/close", post(handler::close))
        .route("/api/sessions/{id}/events", get(handler::events))
}
