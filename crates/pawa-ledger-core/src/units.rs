//! Fixed-point token amounts.
//!
//! An [`Amount`] is an unsigned 256-bit integer counting the smallest
//! indivisible unit. With [`DECIMALS`] = 18, one whole token is 10^18 units.

use crate::error::UnitsError;

/// Token amount in base units.
pub type Amount = alloy_primitives::U256;

/// Number of implied fractional decimal digits.
pub const DECIMALS: u8 = 18;

/// Largest decimals value whose scale factor fits in 256 bits.
pub const MAX_DECIMALS: u8 = 77;

/// Compute 10^decimals.
pub fn scale(decimals: u8) -> Result<Amount, UnitsError> {
    if decimals > MAX_DECIMALS {
        return Err(UnitsError::DecimalsOutOfRange(decimals));
    }
    let ten = Amount::from(10u8);
    let mut factor = Amount::from(1u8);
    for _ in 0..decimals {
        factor = factor.checked_mul(ten).ok_or(UnitsError::Overflow)?;
    }
    Ok(factor)
}

/// Whole tokens in base units, at the default 18 decimals.
pub fn whole(tokens: u64) -> Amount {
    // u64::MAX * 10^18 < 2^128, so this cannot overflow.
    Amount::from(tokens) * Amount::from(1_000_000_000_000_000_000u64)
}

/// Parse a decimal string such as `"21000"` or `"0.5"` into base units.
///
/// Trailing fractional zeros beyond `decimals` are accepted; any other
/// excess precision is rejected rather than rounded.
pub fn parse_units(value: &str, decimals: u8) -> Result<Amount, UnitsError> {
    let factor = scale(decimals)?;
    let value = value.trim();
    let invalid = || UnitsError::InvalidFormat(value.to_string());

    let (int_part, frac_part) = match value.split_once('.') {
        Some((i, f)) => (i, f),
        None => (value, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(invalid());
    }
    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(int_part) || !is_digits(frac_part) {
        return Err(invalid());
    }

    let frac_part = frac_part.trim_end_matches('0');
    if frac_part.len() > decimals as usize {
        return Err(UnitsError::TooManyDecimals {
            max: decimals,
            got: frac_part.len(),
        });
    }

    let int_value = if int_part.is_empty() {
        Amount::ZERO
    } else {
        Amount::from_str_radix(int_part, 10).map_err(|_| UnitsError::Overflow)?
    };
    let mut total = int_value.checked_mul(factor).ok_or(UnitsError::Overflow)?;

    if !frac_part.is_empty() {
        let frac_value = Amount::from_str_radix(frac_part, 10).map_err(|_| invalid())?;
        let frac_scale = scale(decimals - frac_part.len() as u8)?;
        let frac_units = frac_value
            .checked_mul(frac_scale)
            .ok_or(UnitsError::Overflow)?;
        total = total.checked_add(frac_units).ok_or(UnitsError::Overflow)?;
    }

    Ok(total)
}

/// Format base units as a decimal string, e.g. `"1000.0"` or `"0.25"`.
pub fn format_units(amount: Amount, decimals: u8) -> Result<String, UnitsError> {
    let factor = scale(decimals)?;
    let int_value = amount / factor;
    let frac_value = amount % factor;

    if decimals == 0 {
        return Ok(int_value.to_string());
    }

    let frac = format!("{:0>width$}", frac_value.to_string(), width = decimals as usize);
    let frac = frac.trim_end_matches('0');
    let frac = if frac.is_empty() { "0" } else { frac };
    Ok(format!("{int_value}.{frac}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_whole_matches_parse() {
        assert_eq!(whole(21_000), parse_units("21000", DECIMALS).unwrap());
        assert_eq!(whole(0), Amount::ZERO);
    }

    #[test]
    fn test_parse_fractional() {
        assert_eq!(
            parse_units("0.5", DECIMALS).unwrap(),
            Amount::from(500_000_000_000_000_000u64)
        );
        assert_eq!(parse_units(".000000000000000001", DECIMALS).unwrap(), Amount::from(1u8));
        assert_eq!(parse_units("1.", 2).unwrap(), Amount::from(100u8));
        assert_eq!(parse_units("1.2300", 2).unwrap(), Amount::from(123u8));
    }

    #[test]
    fn test_parse_rejects_excess_precision() {
        assert_eq!(
            parse_units("0.001", 2),
            Err(UnitsError::TooManyDecimals { max: 2, got: 3 })
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse_units("", 18), Err(UnitsError::InvalidFormat(_))));
        assert!(matches!(parse_units(".", 18), Err(UnitsError::InvalidFormat(_))));
        assert!(matches!(parse_units("-1", 18), Err(UnitsError::InvalidFormat(_))));
        assert!(matches!(parse_units("1e18", 18), Err(UnitsError::InvalidFormat(_))));
        assert!(matches!(parse_units("1.2.3", 18), Err(UnitsError::InvalidFormat(_))));
    }

    #[test]
    fn test_parse_overflow() {
        let huge = "9".repeat(80);
        assert_eq!(parse_units(&huge, 18), Err(UnitsError::Overflow));
    }

    #[test]
    fn test_scale_bounds() {
        assert_eq!(scale(0).unwrap(), Amount::from(1u8));
        assert!(scale(MAX_DECIMALS).is_ok());
        assert_eq!(scale(78), Err(UnitsError::DecimalsOutOfRange(78)));
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(whole(1000), DECIMALS).unwrap(), "1000.0");
        assert_eq!(
            format_units(parse_units("0.25", DECIMALS).unwrap(), DECIMALS).unwrap(),
            "0.25"
        );
        assert_eq!(format_units(Amount::from(1u8), DECIMALS).unwrap(), "0.000000000000000001");
        assert_eq!(format_units(Amount::from(42u8), 0).unwrap(), "42");
    }

    proptest! {
        #[test]
        fn test_format_then_parse_is_identity(raw in any::<u128>(), decimals in 0u8..=36) {
            let amount = Amount::from(raw);
            let text = format_units(amount, decimals).unwrap();
            prop_assert_eq!(parse_units(&text, decimals).unwrap(), amount);
        }

        #[test]
        fn test_parse_rejects_non_digits(s in "[0-9]{0,4}[a-z_-][0-9]{0,4}") {
            let parsed = parse_units(&s, DECIMALS);
            prop_assert!(matches!(parsed, Err(UnitsError::InvalidFormat(_))));
        }
    }
}
