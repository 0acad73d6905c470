//! Database models
//!
//! Entities stored in SurrealDB plus the request payloads that create them.
//! Reference fields (`session_id`, `restaurant_id`, ...) are stored as
//! "table:key" strings; the record's own `id` is the native record id.

pub mod serde_helpers;

pub mod menu_item;
pub mod order;
pub mod participant;
pub mod restaurant;
pub mod session;

pub use menu_item::{MenuItem, MenuItemCreate};
pub use order::{Order, OrderCreate, OrderItem};
pub use participant::{Participant, ParticipantJoin};
pub use restaurant::{Restaurant, RestaurantCreate};
pub use session::{Session, SessionCreate, SessionDetail, SessionStatus, SessionWithParticipants};
