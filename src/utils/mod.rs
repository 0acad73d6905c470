//! Utility module - shared types and helpers
//!
//! - [`AppError`] - application error type
//! - [`AppResult`] - `Result<T, AppError>` alias used by handlers
//! - logging and validation helpers

pub mod error;
pub mod logger;
pub mod validation;

pub use error::{AppError, ErrorResponse};

/// Application-level Result type
///
/// Used in HTTP handlers and application logic
pub type AppResult<T> = Result<T, AppError>;
