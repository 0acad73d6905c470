//! Comanda - group food-ordering backend
//!
//! # Overview
//!
//! An organizer opens a session for a restaurant and receives a short share
//! code. Friends join with the code, submit their orders, and everyone sees
//! the running group summary. Closing the session freezes it; the detail and
//! summary views stay readable.
//!
//! # Module structure
//!
//! ```text
//! src/
//! ├── core/          # configuration, state, HTTP server
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # embedded SurrealDB, models, repositories
//! ├── sessions/      # code generation, lifecycle, summary, change feed
//! ├── money.rs       # decimal money math
//! └── utils/         # errors, logging, validation
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod money;
pub mod sessions;
pub mod utils;

// Re-export public types
pub use crate::core::{Config, Server, ServerState};
pub use crate::db::DbService;
pub use crate::sessions::{SessionManager, SessionSummary, SessionWatch};
pub use crate::utils::{AppError, AppResult};

// Re-export logger functions
pub use crate::utils::logger::init_logger_with_file;

/// Initialize logging from the config; called once at startup.
///
/// Development defaults to `debug`, everything else to `info` (`RUST_LOG`
/// still wins). Output goes to a daily file under `Config::log_dir()` when
/// that directory exists, stdout otherwise.
pub fn init_logging(config: &Config) {
    let default_level = if config.is_development() { "debug" } else { "info" };
    let log_dir = config.log_dir();
    init_logger_with_file(Some(default_level), log_dir.to_str());
}
