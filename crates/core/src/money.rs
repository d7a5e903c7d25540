//! Fixed-point money checks for budgets and expenses.
//!
//! Columns are `NUMERIC(12, 2)`: at most 12 significant digits, 2 of them
//! after the decimal point.

use rust_decimal::Decimal;

/// Total significant digits accepted by a money column.
pub const MONEY_MAX_DIGITS: u32 = 12;

/// Digits after the decimal point accepted by a money column.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Validate a money amount against the column precision.
///
/// Trailing zeros are ignored (`10.500` counts as two decimal places).
/// Negative amounts are rejected.
pub fn validate_money(value: Decimal) -> Result<(), String> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err("Amount cannot be negative.".to_string());
    }

    let normalized = value.normalize();
    if normalized.scale() > MONEY_DECIMAL_PLACES {
        return Err(format!(
            "Ensure that there are no more than {MONEY_DECIMAL_PLACES} decimal places."
        ));
    }

    let whole_digits = MONEY_MAX_DIGITS - MONEY_DECIMAL_PLACES;
    let limit = Decimal::from(10_i64.pow(whole_digits));
    if normalized.trunc() >= limit {
        return Err(format!(
            "Ensure that there are no more than {whole_digits} digits before the decimal point."
        ));
    }
    Ok(())
}
