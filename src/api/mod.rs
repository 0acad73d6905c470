//! API route modules
//!
//! # Structure
//!
//! - [`health`] - health checks
//! - [`restaurants`] - restaurant listing
//! - [`menu`] - menu lookup per restaurant
//! - [`sessions`] - session lifecycle, details, summary and change feed
//! - [`orders`] - order submission

pub mod health;
pub mod menu;
pub mod orders;
pub mod restaurants;
pub mod sessions;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
