//! Session lifecycle manager
//!
//! Orchestrates creation, joining, closing and order submission on top of
//! the repository layer. All write paths validate input here; the
//! closed-session guards live in the repositories so check-and-insert stays
//! atomic.

use std::sync::Arc;

use chrono::Utc;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use crate::db::models::{
    Order, OrderCreate, Participant, Session, SessionDetail, SessionStatus,
    SessionWithParticipants,
};
use crate::db::repository::{
    OrderRepository, ParticipantRepository, RESTAURANTS, RestaurantRepository, SESSIONS,
    SessionRepository, parse_record_id,
};
use crate::money::{items_total, to_f64, totals_match, validate_order_item};
use crate::sessions::code::generate_code;
use crate::utils::validation::{MAX_ITEM_NAME_LEN, MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};

/// How many candidate codes to try before giving up on collisions
const MAX_CODE_ATTEMPTS: usize = 5;

/// Produces join-code candidates; swapped out in tests to force collisions
pub type CodeSource = Arc<dyn Fn() -> String + Send + Sync>;

#[derive(Clone)]
pub struct SessionManager {
    sessions: SessionRepository,
    participants: ParticipantRepository,
    orders: OrderRepository,
    restaurants: RestaurantRepository,
    code_source: CodeSource,
}

impl SessionManager {
    pub fn new(db: Surreal<Db>) -> Self {
        Self::with_code_source(db, Arc::new(generate_code))
    }

    /// Manager with a custom join-code source
    pub fn with_code_source(db: Surreal<Db>, code_source: CodeSource) -> Self {
        Self {
            sessions: SessionRepository::new(db.clone()),
            participants: ParticipantRepository::new(db.clone()),
            orders: OrderRepository::new(db.clone()),
            restaurants: RestaurantRepository::new(db),
            code_source,
        }
    }

    /// Create a session and its organizer participant.
    ///
    /// The two inserts are not one transaction; if the participant insert
    /// fails the session row is deleted again so no organizer-less session
    /// survives.
    pub async fn create_session(
        &self,
        organizer_name: &str,
        restaurant_id: &str,
    ) -> AppResult<SessionWithParticipants> {
        validate_required_text(organizer_name, "organizer_name", MAX_NAME_LEN)?;

        let restaurant_record = parse_record_id(restaurant_id, RESTAURANTS)
            .map_err(|_| AppError::validation(format!("Invalid restaurant id: {restaurant_id}")))?;
        let restaurant = self
            .restaurants
            .find_by_id(restaurant_id)
            .await?
            .ok_or_else(|| AppError::validation(format!("Unknown restaurant: {restaurant_id}")))?;

        let code = self.unique_code().await?;

        let session = self
            .sessions
            .create(Session {
                id: None,
                code,
                organizer_name: organizer_name.to_string(),
                restaurant_id: restaurant_record,
                restaurant_name: restaurant.name,
                status: SessionStatus::Open,
                created_at: Utc::now(),
                closed_at: None,
            })
            .await?;
        let session_id = record_id(&session.id)?;

        let organizer = Participant {
            id: None,
            session_id: session_id.clone(),
            name: organizer_name.to_string(),
            is_organizer: true,
            joined_at: Utc::now(),
        };

        let organizer = match self.participants.create_in_open_session(organizer).await {
            Ok(p) => p,
            Err(e) => {
                // Compensating cleanup; the cleanup error itself is only logged
                if let Err(del) = self.sessions.delete(&session_id.to_string()).await {
                    tracing::warn!(session = %session_id, error = %del, "cleanup after failed organizer insert failed");
                }
                return Err(e.into());
            }
        };

        tracing::info!(session = %session_id, code = %session.code, "session created");
        Ok(SessionWithParticipants {
            session,
            participants: vec![organizer],
        })
    }

    /// Resolve an open session by its join code (case-insensitive)
    pub async fn get_by_code(&self, code: &str) -> AppResult<Session> {
        let code = code.trim().to_uppercase();
        if code.is_empty() {
            return Err(AppError::validation("code must not be empty"));
        }
        self.sessions
            .find_open_by_code(&code)
            .await?
            .ok_or_else(|| AppError::not_found(format!("No open session with code {code}")))
    }

    /// Full detail view: session, participants, orders and the linked
    /// restaurant's current name. Works for closed sessions too.
    pub async fn get_details(&self, session_id: &str) -> AppResult<SessionDetail> {
        let mut session = self
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Session {session_id} not found")))?;

        let participants = self.participants.find_by_session(session_id).await?;
        let orders = self.orders.find_by_session(session_id).await?;

        // Prefer the live restaurant name over the stored snapshot
        if let Ok(Some(restaurant)) = self
            .restaurants
            .find_by_id(&session.restaurant_id.to_string())
            .await
        {
            session.restaurant_name = restaurant.name;
        }

        Ok(SessionDetail {
            session,
            participants,
            orders,
        })
    }

    /// Join an open session as a regular (non-organizer) participant
    pub async fn join(&self, session_id: &str, name: &str) -> AppResult<Participant> {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
        let session = parse_record_id(session_id, SESSIONS)?;

        let participant = self
            .participants
            .create_in_open_session(Participant {
                id: None,
                session_id: session,
                name: name.to_string(),
                is_organizer: false,
                joined_at: Utc::now(),
            })
            .await?;

        tracing::info!(session = %session_id, participant = %name, "participant joined");
        Ok(participant)
    }

    /// Close a session. Idempotent: closing an already-closed session
    /// returns it unchanged, `closed_at` keeps its original value.
    pub async fn close(&self, session_id: &str) -> AppResult<Session> {
        if let Some(session) = self.sessions.close_if_open(session_id, Utc::now()).await? {
            tracing::info!(session = %session_id, "session closed");
            return Ok(session);
        }

        // Nothing matched: either already closed (no-op) or unknown
        self.sessions
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Session {session_id} not found")))
    }

    /// Submit one participant's order.
    ///
    /// The submitted total must equal the recomputed item sum; the
    /// participant must belong to the session; the session must be open.
    pub async fn submit_order(&self, data: OrderCreate) -> AppResult<Order> {
        validate_required_text(&data.participant_name, "participant_name", MAX_NAME_LEN)?;
        if data.items.is_empty() {
            return Err(AppError::validation("items must not be empty"));
        }
        for item in &data.items {
            validate_required_text(&item.name, "item name", MAX_ITEM_NAME_LEN)?;
            validate_order_item(item)?;
        }
        if !data.total.is_finite() {
            return Err(AppError::validation("total must be a finite number"));
        }

        let computed = items_total(&data.items);
        if !totals_match(data.total, computed) {
            return Err(AppError::validation(format!(
                "total {} does not match item sum {}",
                data.total,
                to_f64(computed)
            )));
        }

        let session = parse_record_id(&data.session_id, SESSIONS)?;
        let participant = self
            .participants
            .find_by_id(&data.participant_id)
            .await?
            .ok_or_else(|| {
                AppError::validation(format!("Unknown participant: {}", data.participant_id))
            })?;
        if participant.session_id != session {
            return Err(AppError::validation(format!(
                "Participant {} does not belong to session {}",
                data.participant_id, data.session_id
            )));
        }
        let participant_id = record_id(&participant.id)?;

        let order = self
            .orders
            .create_in_open_session(Order {
                id: None,
                session_id: session,
                participant_id,
                participant_name: data.participant_name,
                items: data.items,
                total: data.total,
                created_at: Utc::now(),
            })
            .await?;

        tracing::info!(
            session = %data.session_id,
            participant = %order.participant_name,
            total = order.total,
            "order submitted"
        );
        Ok(order)
    }

    /// Generate a code no open session currently uses
    async fn unique_code(&self) -> AppResult<String> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = (self.code_source)();
            if !self.sessions.open_code_exists(&code).await? {
                return Ok(code);
            }
        }
        Err(AppError::conflict(
            "Could not generate a unique session code",
        ))
    }
}

/// Persisted records always carry an id; treat a missing one as a bug
fn record_id(id: &Option<RecordId>) -> AppResult<RecordId> {
    id.clone()
        .ok_or_else(|| AppError::internal("record is missing its id"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::models::{OrderItem, RestaurantCreate};
    use crate::sessions::code::CODE_ALPHABET;

    async fn seed_restaurant(db: &Surreal<Db>) -> String {
        let restaurants = RestaurantRepository::new(db.clone());
        let restaurant = restaurants
            .create(RestaurantCreate {
                name: "Bistro La Casona".to_string(),
                address: None,
                category: Some("Bistro".to_string()),
                logo_url: None,
            })
            .await
            .expect("seed restaurant");
        restaurant.id.expect("restaurant id").to_string()
    }

    async fn setup() -> (SessionManager, String) {
        let db = DbService::memory().await.expect("memory db");
        let restaurant_id = seed_restaurant(&db.db).await;
        (SessionManager::new(db.db), restaurant_id)
    }

    /// Manager whose code source replays `codes`, repeating the last one
    async fn setup_with_codes(codes: &'static [&'static str]) -> (SessionManager, String) {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let db = DbService::memory().await.expect("memory db");
        let restaurant_id = seed_restaurant(&db.db).await;

        let next = Arc::new(AtomicUsize::new(0));
        let source: CodeSource = Arc::new(move || {
            let i = next.fetch_add(1, Ordering::Relaxed);
            codes[i.min(codes.len() - 1)].to_string()
        });
        (SessionManager::with_code_source(db.db, source), restaurant_id)
    }

    fn pizza(quantity: u32) -> OrderItem {
        OrderItem {
            name: "Pizza".to_string(),
            price: 42.0,
            quantity,
        }
    }

    fn order_payload(session_id: &str, participant_id: &str, name: &str) -> OrderCreate {
        OrderCreate {
            session_id: session_id.to_string(),
            participant_id: participant_id.to_string(),
            participant_name: name.to_string(),
            items: vec![pizza(2)],
            total: 84.0,
        }
    }

    #[tokio::test]
    async fn create_session_has_open_status_code_and_organizer() {
        let (manager, restaurant_id) = setup().await;
        let created = manager.create_session("Ana", &restaurant_id).await.unwrap();

        assert_eq!(created.session.status, SessionStatus::Open);
        assert!(created.session.is_open());
        assert!(created.session.closed_at.is_none());
        assert_eq!(created.session.organizer_name, "Ana");
        assert_eq!(created.session.restaurant_name, "Bistro La Casona");

        assert_eq!(created.session.code.len(), 6);
        assert!(
            created
                .session
                .code
                .bytes()
                .all(|b| CODE_ALPHABET.contains(&b))
        );

        assert_eq!(created.participants.len(), 1);
        let organizer = &created.participants[0];
        assert!(organizer.is_organizer);
        assert_eq!(organizer.name, "Ana");
    }

    #[tokio::test]
    async fn create_session_rejects_bad_input() {
        let (manager, restaurant_id) = setup().await;

        let err = manager.create_session("", &restaurant_id).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = manager
            .create_session("Ana", "restaurants:does-not-exist")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = manager.create_session("Ana", "not-an-id").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn create_session_retries_codes_taken_by_open_sessions() {
        let (manager, restaurant_id) = setup_with_codes(&["AAAAAA", "AAAAAA", "BBBBBB"]).await;

        let first = manager.create_session("Ana", &restaurant_id).await.unwrap();
        assert_eq!(first.session.code, "AAAAAA");

        // Second candidate collides with the open session; the retry wins
        let second = manager.create_session("Eva", &restaurant_id).await.unwrap();
        assert_eq!(second.session.code, "BBBBBB");
    }

    #[tokio::test]
    async fn create_session_gives_up_after_bounded_code_attempts() {
        let (manager, restaurant_id) = setup_with_codes(&["CCCCCC"]).await;

        manager.create_session("Ana", &restaurant_id).await.unwrap();

        // Every candidate collides with the open session
        let err = manager.create_session("Eva", &restaurant_id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn closed_sessions_release_their_code() {
        let (manager, restaurant_id) = setup_with_codes(&["DDDDDD"]).await;

        let first = manager.create_session("Ana", &restaurant_id).await.unwrap();
        manager
            .close(&first.session.id.unwrap().to_string())
            .await
            .unwrap();

        // The code is free again once its session is closed
        let second = manager.create_session("Eva", &restaurant_id).await.unwrap();
        assert_eq!(second.session.code, "DDDDDD");
    }

    #[tokio::test]
    async fn get_by_code_finds_open_sessions_case_insensitively() {
        let (manager, restaurant_id) = setup().await;
        let created = manager.create_session("Ana", &restaurant_id).await.unwrap();

        let found = manager.get_by_code(&created.session.code).await.unwrap();
        assert_eq!(found.code, created.session.code);

        let found = manager
            .get_by_code(&created.session.code.to_lowercase())
            .await
            .unwrap();
        assert_eq!(found.code, created.session.code);

        let err = manager.get_by_code("ZZZZZZ").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn join_adds_non_organizer_participants() {
        let (manager, restaurant_id) = setup().await;
        let created = manager.create_session("Ana", &restaurant_id).await.unwrap();
        let session_id = created.session.id.unwrap().to_string();

        let luis = manager.join(&session_id, "Luis").await.unwrap();
        assert!(!luis.is_organizer);

        let details = manager.get_details(&session_id).await.unwrap();
        assert_eq!(details.participants.len(), 2);
        let organizers: Vec<_> = details
            .participants
            .iter()
            .filter(|p| p.is_organizer)
            .collect();
        assert_eq!(organizers.len(), 1);
        assert_eq!(organizers[0].name, "Ana");
    }

    #[tokio::test]
    async fn join_rejects_closed_and_unknown_sessions() {
        let (manager, restaurant_id) = setup().await;
        let created = manager.create_session("Ana", &restaurant_id).await.unwrap();
        let session_id = created.session.id.unwrap().to_string();

        manager.close(&session_id).await.unwrap();
        let err = manager.join(&session_id, "Luis").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let err = manager.join("sessions:missing", "Luis").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let (manager, restaurant_id) = setup().await;
        let created = manager.create_session("Ana", &restaurant_id).await.unwrap();
        let session_id = created.session.id.unwrap().to_string();

        let first = manager.close(&session_id).await.unwrap();
        assert_eq!(first.status, SessionStatus::Closed);
        let closed_at = first.closed_at.expect("closed_at set");

        let second = manager.close(&session_id).await.unwrap();
        assert_eq!(second.status, SessionStatus::Closed);
        assert_eq!(second.closed_at, Some(closed_at));

        let err = manager.close("sessions:missing").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn submit_order_validates_payload() {
        let (manager, restaurant_id) = setup().await;
        let created = manager.create_session("Ana", &restaurant_id).await.unwrap();
        let session_id = created.session.id.unwrap().to_string();
        let luis = manager.join(&session_id, "Luis").await.unwrap();
        let luis_id = luis.id.unwrap().to_string();

        // Empty items
        let mut payload = order_payload(&session_id, &luis_id, "Luis");
        payload.items.clear();
        let err = manager.submit_order(payload).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        // Total does not match the item sum
        let mut payload = order_payload(&session_id, &luis_id, "Luis");
        payload.total = 80.0;
        let err = manager.submit_order(payload).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        // Unknown participant
        let payload = order_payload(&session_id, "participants:ghost", "Ghost");
        let err = manager.submit_order(payload).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn submit_order_rejects_participants_of_other_sessions() {
        let (manager, restaurant_id) = setup().await;
        let first = manager.create_session("Ana", &restaurant_id).await.unwrap();
        let second = manager.create_session("Eva", &restaurant_id).await.unwrap();

        let first_id = first.session.id.unwrap().to_string();
        let eva = &second.participants[0];
        let eva_id = eva.id.clone().unwrap().to_string();

        let payload = order_payload(&first_id, &eva_id, "Eva");
        let err = manager.submit_order(payload).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn submit_order_rejects_closed_sessions() {
        let (manager, restaurant_id) = setup().await;
        let created = manager.create_session("Ana", &restaurant_id).await.unwrap();
        let session_id = created.session.id.unwrap().to_string();
        let luis = manager.join(&session_id, "Luis").await.unwrap();
        let luis_id = luis.id.unwrap().to_string();

        manager.close(&session_id).await.unwrap();

        let err = manager
            .submit_order(order_payload(&session_id, &luis_id, "Luis"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn stored_total_matches_recomputed_total() {
        let (manager, restaurant_id) = setup().await;
        let created = manager.create_session("Ana", &restaurant_id).await.unwrap();
        let session_id = created.session.id.unwrap().to_string();
        let ana_id = created.participants[0].id.clone().unwrap().to_string();

        let order = manager
            .submit_order(order_payload(&session_id, &ana_id, "Ana"))
            .await
            .unwrap();

        let details = manager.get_details(&session_id).await.unwrap();
        assert_eq!(details.orders.len(), 1);
        let stored = &details.orders[0];
        assert_eq!(stored.total, order.total);
        assert_eq!(to_f64(items_total(&stored.items)), stored.total);
    }

    #[tokio::test]
    async fn full_group_ordering_scenario() {
        let (manager, restaurant_id) = setup().await;

        // Ana organizes, Luis joins and orders two pizzas
        let created = manager.create_session("Ana", &restaurant_id).await.unwrap();
        let session_id = created.session.id.clone().unwrap().to_string();
        let code = created.session.code.clone();

        let luis = manager.join(&session_id, "Luis").await.unwrap();
        let luis_id = luis.id.unwrap().to_string();
        manager
            .submit_order(order_payload(&session_id, &luis_id, "Luis"))
            .await
            .unwrap();

        let details = manager.get_details(&session_id).await.unwrap();
        assert_eq!(details.orders.len(), 1);
        assert_eq!(details.orders[0].participant_name, "Luis");
        assert_eq!(details.orders[0].total, 84.0);

        // Close: the code stops resolving, the detail view still works
        let closed = manager.close(&session_id).await.unwrap();
        assert_eq!(closed.status, SessionStatus::Closed);

        let err = manager.get_by_code(&code).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let details = manager.get_details(&session_id).await.unwrap();
        assert_eq!(details.session.status, SessionStatus::Closed);
        assert_eq!(details.participants.len(), 2);
    }
}
