//! Token Amount Scaling
//!
//! Converts human-readable token amounts ("10", "0.5") into raw base units for a
//! mint with the given decimals, and back. Uses `Decimal` so scaling is exact.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use thiserror::Error;

/// Largest scale a `Decimal` can carry
pub const MAX_DECIMALS: u8 = 28;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("Amount cannot be negative: {0}")]
    Negative(Decimal),
    #[error("Amount {amount} has more fractional digits than the mint's {decimals} decimals")]
    TooPrecise { amount: Decimal, decimals: u8 },
    #[error("Amount {0} overflows u64 base units")]
    Overflow(Decimal),
    #[error("Unsupported decimals: {0} (max {MAX_DECIMALS})")]
    UnsupportedDecimals(u8),
}

/// Scale a UI amount to base units: `ui * 10^decimals`
pub fn to_base_units(ui_amount: Decimal, decimals: u8) -> Result<u64, AmountError> {
    if decimals > MAX_DECIMALS {
        return Err(AmountError::UnsupportedDecimals(decimals));
    }
    if ui_amount.is_sign_negative() && !ui_amount.is_zero() {
        return Err(AmountError::Negative(ui_amount));
    }

    let mut scaled = ui_amount;
    for _ in 0..decimals {
        scaled = scaled
            .checked_mul(Decimal::TEN)
            .ok_or(AmountError::Overflow(ui_amount))?;
    }

    if !scaled.fract().is_zero() {
        return Err(AmountError::TooPrecise {
            amount: ui_amount,
            decimals,
        });
    }

    scaled.to_u64().ok_or(AmountError::Overflow(ui_amount))
}

/// Inverse of [`to_base_units`]
pub fn to_ui_amount(base_units: u64, decimals: u8) -> Result<Decimal, AmountError> {
    if decimals > MAX_DECIMALS {
        return Err(AmountError::UnsupportedDecimals(decimals));
    }
    Ok(Decimal::from_i128_with_scale(base_units as i128, decimals as u32).normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_whole_tokens_with_ten_decimals() {
        // 10 tokens on a 10-decimal mint
        assert_eq!(to_base_units(dec!(10), 10).unwrap(), 100_000_000_000);
    }

    #[test]
    fn test_fractional_amount() {
        assert_eq!(to_base_units(dec!(0.5), 6).unwrap(), 500_000);
        assert_eq!(to_base_units(dec!(1.000001), 6).unwrap(), 1_000_001);
    }

    #[test]
    fn test_zero_decimals() {
        assert_eq!(to_base_units(dec!(42), 0).unwrap(), 42);
    }

    #[test]
    fn test_too_precise() {
        let err = to_base_units(dec!(0.0000001), 6).unwrap_err();
        assert!(matches!(err, AmountError::TooPrecise { decimals: 6, .. }));
    }

    #[test]
    fn test_negative_rejected() {
        assert!(matches!(
            to_base_units(dec!(-1), 9),
            Err(AmountError::Negative(_))
        ));
    }

    #[test]
    fn test_overflow() {
        // 2 * 10^19 base units does not fit in u64
        assert!(matches!(
            to_base_units(dec!(2000000000), 10),
            Err(AmountError::Overflow(_))
        ));
    }

    #[test]
    fn test_unsupported_decimals() {
        assert_eq!(
            to_base_units(dec!(1), 29),
            Err(AmountError::UnsupportedDecimals(29))
        );
    }

    #[test]
    fn test_to_ui_amount() {
        assert_eq!(to_ui_amount(100_000_000_000, 10).unwrap(), dec!(10));
        assert_eq!(to_ui_amount(1, 10).unwrap(), dec!(0.0000000001));
    }
}
