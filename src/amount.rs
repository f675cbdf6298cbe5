use std::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive as _;
use serde::Deserialize;
use serde::Deserializer;

/// Decimal places of the staked token.
pub const TOKEN_DECIMALS: u32 = 18;

const UNITS_PER_TOKEN: u128 = 10_u128.pow(TOKEN_DECIMALS);

/// Amount expressed in the token's smallest unit.
///
/// Unsigned by construction so stakes never need a negativity check once parsed.
#[derive(Debug, Copy, Clone, Default, Hash, PartialEq, Eq, Ord, PartialOrd)]
pub struct TokenAmount(u128);

#[derive(thiserror::Error, Debug)]
pub enum AmountError {
    #[error("amount must not be negative value={value}")]
    Negative { value: Decimal },
    #[error("amount finer than the smallest token unit value={value}")]
    TooPrecise { value: Decimal },
    #[error("amount overflow value={value}")]
    Overflow { value: Decimal },
}

impl TokenAmount {
    pub const ZERO: Self = Self(0);

    pub const fn from_units(units: u128) -> Self {
        Self(units)
    }

    /// Scales a token-denominated decimal (e.g. `2.5`) into smallest units.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `tokens` is negative ([`AmountError::Negative`]).
    /// - `tokens` has more precision than one smallest unit ([`AmountError::TooPrecise`]).
    /// - The scaled value does not fit ([`AmountError::Overflow`]).
    pub fn from_tokens(tokens: Decimal) -> Result<Self, AmountError> {
        if tokens.is_sign_negative() && !tokens.is_zero() {
            return Err(AmountError::Negative { value: tokens });
        }
        let units = tokens
            .checked_mul(Decimal::from(UNITS_PER_TOKEN as u64))
            .ok_or(AmountError::Overflow { value: tokens })?;
        if !units.fract().is_zero() {
            return Err(AmountError::TooPrecise { value: tokens });
        }
        units
            .to_u128()
            .map(Self)
            .ok_or(AmountError::Overflow { value: tokens })
    }

    pub const fn as_units(&self) -> u128 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Both stakes pooled together.
    pub const fn checked_double(&self) -> Option<Self> {
        match self.0.checked_mul(2) {
            Some(units) => Some(Self(units)),
            None => None,
        }
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / UNITS_PER_TOKEN;
        let fraction = self.0 % UNITS_PER_TOKEN;
        if fraction == 0 {
            return write!(f, "{whole}");
        }
        let digits = format!("{fraction:0width$}", width = TOKEN_DECIMALS as usize);
        write!(f, "{whole}.{}", digits.trim_end_matches('0'))
    }
}

impl<'de> Deserialize<'de> for TokenAmount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tokens = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::try_from(tokens).map_err(|error| serde::de::Error::custom(error.to_string()))
    }
}

impl TryFrom<Decimal> for TokenAmount {
    type Error = AmountError;

    fn try_from(tokens: Decimal) -> Result<Self, Self::Error> {
        Self::from_tokens(tokens)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("10", 10 * UNITS_PER_TOKEN)]
    #[case("2.5", 25 * UNITS_PER_TOKEN / 10)]
    #[case("0.000000000000000001", 1)]
    #[case("0", 0)]
    fn from_tokens_scales_to_smallest_units(#[case] tokens: &str, #[case] expected_units: u128) {
        assert2::let_assert!(Ok(amount) = TokenAmount::from_tokens(dec(tokens)));
        assert_eq!(expected_units, amount.as_units());
    }

    #[test]
    fn from_tokens_rejects_negative_amounts() {
        assert2::let_assert!(Err(AmountError::Negative { .. }) = TokenAmount::from_tokens(dec("-1")));
    }

    #[test]
    fn from_tokens_rejects_sub_unit_precision() {
        assert2::let_assert!(
            Err(AmountError::TooPrecise { .. }) = TokenAmount::from_tokens(dec("0.0000000000000000001"))
        );
    }

    #[test]
    fn from_tokens_rejects_amounts_that_do_not_fit_a_decimal_once_scaled() {
        assert2::let_assert!(Err(AmountError::Overflow { .. }) = TokenAmount::from_tokens(Decimal::MAX));
    }

    #[rstest]
    #[case(20 * UNITS_PER_TOKEN, "20")]
    #[case(25 * UNITS_PER_TOKEN / 10, "2.5")]
    #[case(1, "0.000000000000000001")]
    #[case(0, "0")]
    fn display_renders_token_denominated_value(#[case] units: u128, #[case] expected: &str) {
        assert_eq!(expected, TokenAmount::from_units(units).to_string());
    }

    #[test]
    fn checked_double_pools_both_stakes_and_detects_overflow() {
        assert_eq!(
            Some(TokenAmount::from_units(20)),
            TokenAmount::from_units(10).checked_double()
        );
        assert_eq!(None, TokenAmount::from_units(u128::MAX).checked_double());
    }

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }
}
