//! Money calculation utilities using rust_decimal for precision
//!
//! Prices and totals are `f64` at rest (storage and JSON); every calculation
//! and comparison goes through `Decimal` to keep float noise out of the math.

use rust_decimal::prelude::*;

use crate::db::models::OrderItem;
use crate::utils::AppError;

/// Rounding for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Maximum allowed price per item
const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per item
const MAX_QUANTITY: u32 = 9999;

/// Convert f64 to Decimal; NaN/Infinity collapse to zero, so validate first
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

/// Convert Decimal back to f64, rounded to 2 decimal places
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// Validate one order line: finite non-negative bounded price, sane quantity
pub fn validate_order_item(item: &OrderItem) -> Result<(), AppError> {
    if !item.price.is_finite() {
        return Err(AppError::validation(format!(
            "price must be a finite number, got {}",
            item.price
        )));
    }
    if item.price < 0.0 {
        return Err(AppError::validation(format!(
            "price must be non-negative, got {}",
            item.price
        )));
    }
    if item.price > MAX_PRICE {
        return Err(AppError::validation(format!(
            "price exceeds maximum allowed ({MAX_PRICE}), got {}",
            item.price
        )));
    }
    if item.quantity == 0 {
        return Err(AppError::validation("quantity must be at least 1"));
    }
    if item.quantity > MAX_QUANTITY {
        return Err(AppError::validation(format!(
            "quantity exceeds maximum allowed ({MAX_QUANTITY}), got {}",
            item.quantity
        )));
    }
    Ok(())
}

/// Sum of price × quantity over the items, in Decimal
pub fn items_total(items: &[OrderItem]) -> Decimal {
    items
        .iter()
        .map(|item| to_decimal(item.price) * Decimal::from(item.quantity))
        .sum()
}

/// Whether a submitted total matches the computed one within tolerance
pub fn totals_match(submitted: f64, computed: Decimal) -> bool {
    (to_decimal(submitted) - computed).abs() <= MONEY_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: f64, quantity: u32) -> OrderItem {
        OrderItem {
            name: "Item".to_string(),
            price,
            quantity,
        }
    }

    #[test]
    fn test_decimal_precision() {
        // Classic floating point problem: 0.1 + 0.2 != 0.3
        let sum_f64 = 0.1_f64 + 0.2_f64;
        assert_ne!(sum_f64, 0.3);

        let sum_dec = to_decimal(0.1) + to_decimal(0.2);
        assert_eq!(to_f64(sum_dec), 0.3);
    }

    #[test]
    fn test_items_total() {
        let items = vec![item(42.0, 2), item(10.5, 1)];
        assert_eq!(to_f64(items_total(&items)), 94.5);
    }

    #[test]
    fn test_items_total_accumulation() {
        // 0.1 a hundred times is exactly 10
        let items = vec![item(0.1, 1); 100];
        assert_eq!(to_f64(items_total(&items)), 10.0);
    }

    #[test]
    fn test_totals_match_within_tolerance() {
        let computed = items_total(&[item(10.99, 3)]);
        assert!(totals_match(32.97, computed));
        assert!(totals_match(32.98, computed)); // one cent off is tolerated
        assert!(!totals_match(33.10, computed));
    }

    #[test]
    fn test_validate_order_item() {
        assert!(validate_order_item(&item(10.0, 1)).is_ok());
        assert!(validate_order_item(&item(-1.0, 1)).is_err());
        assert!(validate_order_item(&item(f64::NAN, 1)).is_err());
        assert!(validate_order_item(&item(f64::INFINITY, 1)).is_err());
        assert!(validate_order_item(&item(10.0, 0)).is_err());
        assert!(validate_order_item(&item(2_000_000.0, 1)).is_err());
    }
}
