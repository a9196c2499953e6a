use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

use crate::error::AppError;

/// Convert a major-unit amount (e.g. 45.99 GBP) into the minor units the processor expects.
pub fn to_minor_units(amount: Decimal) -> Result<i64, AppError> {
    if amount.is_sign_negative() {
        return Err(AppError::BadRequest("Amount cannot be negative".into()));
    }
    (amount * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or_else(|| AppError::BadRequest("Amount is too large".into()))
}

/// Round a price to two decimal places, the precision every money column stores.
pub fn round_price(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
