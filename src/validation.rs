// Validation utilities module
// Custom validation functions for listing payloads

use rust_decimal::Decimal;
use validator::ValidationError;

/// Prices are stored as NUMERIC(14, 2)
const PRICE_SCALE: u32 = 2;
/// Exclusive upper bound on a price
const PRICE_LIMIT: i64 = 1_000_000_000_000;

/// Validates that a price is strictly positive and fits the stored precision
pub fn validate_positive_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() || price.is_zero() {
        return Err(ValidationError::new("price_must_be_positive"));
    }
    if price.normalize().scale() > PRICE_SCALE {
        return Err(ValidationError::new("price_too_precise"));
    }
    if *price >= Decimal::from(PRICE_LIMIT) {
        return Err(ValidationError::new("price_too_large"));
    }
    Ok(())
}

/// Validates that a measurement (land size, bathrooms) is a finite positive number
pub fn validate_positive_number(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        Err(ValidationError::new("must_be_positive"))
    } else {
        Ok(())
    }
}
