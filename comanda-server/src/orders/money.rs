//! Money calculation utilities using rust_decimal for precision
//!
//! All calculations are done using `Decimal` internally, then converted to
//! `f64` for storage/serialization.

use crate::orders::traits::OrderError;
use rust_decimal::prelude::*;
use shared::order::{LineItemInput, LineItemSnapshot, OrderSnapshot};

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Service fee rate: fixed 10% surcharge on the subtotal
pub const SERVICE_FEE_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

/// Maximum allowed price per item
const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per line
const MAX_QUANTITY: u32 = 9999;

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
fn require_finite(value: f64, field_name: &str) -> Result<(), OrderError> {
    if !value.is_finite() {
        return Err(OrderError::InvalidOperation(format!(
            "{} must be a finite number, got {}",
            field_name, value
        )));
    }
    Ok(())
}

/// Validate a LineItemInput before processing
pub fn validate_line_item(item: &LineItemInput) -> Result<(), OrderError> {
    require_finite(item.price, "price")?;
    if item.price < 0.0 {
        return Err(OrderError::InvalidOperation(format!(
            "price must be non-negative, got {}",
            item.price
        )));
    }
    if item.price > MAX_PRICE {
        return Err(OrderError::InvalidOperation(format!(
            "price exceeds maximum allowed ({}), got {}",
            MAX_PRICE, item.price
        )));
    }
    if item.quantity < 1 {
        return Err(OrderError::InvalidQuantity(item.quantity));
    }
    if item.quantity > MAX_QUANTITY {
        return Err(OrderError::InvalidQuantity(item.quantity));
    }
    for addon in &item.addons {
        require_finite(addon.price, "addon price")?;
        if addon.price < 0.0 {
            return Err(OrderError::InvalidOperation(format!(
                "addon price must be non-negative, got {}",
                addon.price
            )));
        }
    }
    if item.name.trim().is_empty() {
        return Err(OrderError::InvalidOperation(
            "item name must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Convert f64 to Decimal
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal to f64, rounded to 2 decimal places
pub fn to_f64(value: Decimal) -> f64 {
    value.round_dp(DECIMAL_PLACES).to_f64().unwrap_or(0.0)
}

/// Unit price of a line: catalog base price plus selected add-ons
pub fn unit_price(input: &LineItemInput) -> Decimal {
    let addons: Decimal = input.addons.iter().map(|a| to_decimal(a.price)).sum();
    to_decimal(input.price) + addons
}

/// Line total: unit price x quantity
pub fn line_total(item: &LineItemSnapshot) -> Decimal {
    to_decimal(item.price) * Decimal::from(item.quantity)
}

/// Service fee on a subtotal, rounded half-up to cents
pub fn service_fee(subtotal: Decimal) -> Decimal {
    (subtotal * SERVICE_FEE_RATE).round_dp(DECIMAL_PLACES)
}

/// Recalculate `subtotal` / `service_fee` / `total` from the item list.
///
/// Invariant: `subtotal = Σ(price × quantity)`,
/// `service_fee = subtotal × 0.10`, `total = subtotal + service_fee`.
/// Only ever called while the order is OPEN; the checkout applier applies
/// the waive toggle when settling the final amounts.
pub fn recalculate_totals(snapshot: &mut OrderSnapshot) {
    let subtotal: Decimal = snapshot.items.iter().map(line_total).sum();
    let fee = service_fee(subtotal);
    snapshot.subtotal = to_f64(subtotal);
    snapshot.service_fee = to_f64(fee);
    snapshot.total = to_f64(subtotal + fee);
}

/// Settle final amounts at checkout, honoring the service-fee waiver.
pub fn settle_totals(snapshot: &mut OrderSnapshot, waive_service_fee: bool) {
    let subtotal: Decimal = snapshot.items.iter().map(line_total).sum();
    let fee = if waive_service_fee {
        Decimal::ZERO
    } else {
        service_fee(subtotal)
    };
    snapshot.subtotal = to_f64(subtotal);
    snapshot.service_fee = to_f64(fee);
    snapshot.total = to_f64(subtotal + fee);
}

/// Compare two amounts within the money tolerance
pub fn money_eq(a: f64, b: f64) -> bool {
    (to_decimal(a) - to_decimal(b)).abs() <= MONEY_TOLERANCE
}
