//! Input validation helpers
//!
//! Centralized text length constants and validation functions. SurrealDB is
//! schemaless here, so length limits are enforced at this layer.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Person names: organizer, participant, denormalized snapshots
pub const MAX_NAME_LEN: usize = 100;

/// Menu item names inside an order payload
pub const MAX_ITEM_NAME_LEN: usize = 200;

/// Session join codes
pub const CODE_LEN: usize = 6;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_whitespace() {
        assert!(validate_required_text("", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("   ", "name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn rejects_over_limit() {
        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert!(validate_required_text(&long, "name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn accepts_normal_names() {
        assert!(validate_required_text("Ana", "name", MAX_NAME_LEN).is_ok());
    }
}
