use alloy::primitives::U256;
use num_bigint::{BigInt, Sign};
use num_traits::{Signed, Zero};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountParseError {
    #[error("'{0}' is not a decimal integer")]
    NotDecimal(String),

    #[error("'{0}' is negative")]
    Negative(String),
}

/// Parses a decimal integer of arbitrary size.
pub fn parse_amount(value: &str) -> Result<BigInt, AmountParseError> {
    let trimmed = value.trim();
    let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(AmountParseError::NotDecimal(value.to_string()));
    }
    BigInt::parse_bytes(trimmed.as_bytes(), 10)
        .ok_or_else(|| AmountParseError::NotDecimal(value.to_string()))
}

pub fn parse_non_negative_amount(value: &str) -> Result<BigInt, AmountParseError> {
    let amount = parse_amount(value)?;
    if amount.is_negative() {
        return Err(AmountParseError::Negative(value.to_string()));
    }
    Ok(amount)
}

/// Big-endian magnitude without leading zeros; zero encodes as no bytes.
pub fn minimal_be_bytes(value: &BigInt) -> Vec<u8> {
    if value.is_zero() {
        return Vec::new();
    }
    value.magnitude().to_bytes_be()
}

pub fn amount_from_u256(value: U256) -> BigInt {
    BigInt::from_bytes_be(Sign::Plus, &value.to_be_bytes::<32>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_values_beyond_u128() {
        let value = "340282366920938463463374607431768211456000";
        assert_eq!(parse_amount(value).unwrap().to_string(), value);
    }

    #[test]
    fn rejects_non_decimal_text() {
        assert!(matches!(parse_amount("12a"), Err(AmountParseError::NotDecimal(_))));
        assert!(matches!(parse_amount(""), Err(AmountParseError::NotDecimal(_))));
        assert!(matches!(parse_amount("+5"), Err(AmountParseError::NotDecimal(_))));
    }

    #[test]
    fn non_negative_rejects_negative() {
        assert!(matches!(
            parse_non_negative_amount("-1"),
            Err(AmountParseError::Negative(_))
        ));
    }

    #[test]
    fn minimal_bytes_strip_leading_zeros() {
        assert!(minimal_be_bytes(&BigInt::zero()).is_empty());
        assert_eq!(minimal_be_bytes(&BigInt::from(256)), vec![1, 0]);
    }

    #[test]
    fn u256_conversion_keeps_full_width() {
        let value = amount_from_u256(U256::MAX);
        assert_eq!(value.to_string(), U256::MAX.to_string());
    }
}
