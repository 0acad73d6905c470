//! Group ordering sessions
//!
//! Everything above the raw tables: join-code generation, the lifecycle
//! manager, order aggregation and the change feed.

pub mod code;
pub mod manager;
pub mod summary;
pub mod watch;

pub use manager::SessionManager;
pub use summary::{ParticipantOrders, SessionSummary, summarize};
pub use watch::{SessionEvent, SessionSubscription, SessionWatch};
