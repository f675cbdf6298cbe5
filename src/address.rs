use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

const ADDRESS_LEN: usize = 20;

/// Account identifier of a match party.
///
/// Accepts an optional `0x`/`0X` prefix followed by exactly 40 hex characters in any case, and
/// always renders as lowercase `0x`-prefixed hex so that equal addresses print equally.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, Ord, PartialOrd)]
pub struct Address([u8; ADDRESS_LEN]);

#[derive(thiserror::Error, Debug)]
#[error("invalid address value={value:?}")]
pub struct AddressError {
    value: String,
}

impl Address {
    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || AddressError {
            value: value.to_owned(),
        };

        let digits = value
            .strip_prefix("0x")
            .or_else(|| value.strip_prefix("0X"))
            .unwrap_or(value);
        if digits.len() != ADDRESS_LEN * 2 {
            return Err(invalid());
        }

        let mut bytes = [0; ADDRESS_LEN];
        hex::decode_to_slice(digits, &mut bytes).map_err(|_| invalid())?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(|error: AddressError| serde::de::Error::custom(error.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("0x1111111111111111111111111111111111111111", [0x11; ADDRESS_LEN])]
    #[case("0XABABABABABABABABABABABABABABABABABABABAB", [0xab; ADDRESS_LEN])]
    #[case("cdcdcdcdcdcdcdcdcdcdcdcdCDCDCDCDCDCDCDCD", [0xcd; ADDRESS_LEN])]
    fn address_from_str_accepts_hex_with_or_without_prefix(#[case] input: &str, #[case] expected: [u8; ADDRESS_LEN]) {
        assert2::let_assert!(Ok(address) = input.parse::<Address>());
        assert_eq!(Address::new(expected), address);
    }

    #[rstest]
    #[case("")]
    #[case("0x")]
    #[case("0x111111111111111111111111111111111111111")]
    #[case("0x11111111111111111111111111111111111111111")]
    #[case("0x111111111111111111111111111111111111111g")]
    #[case("1x1111111111111111111111111111111111111111")]
    fn address_from_str_rejects_malformed_input(#[case] input: &str) {
        assert2::let_assert!(Err(error) = input.parse::<Address>());
        assert!(error.to_string().contains("invalid address"), "error={error:?}");
    }

    #[test]
    fn address_display_is_lowercase_and_prefixed() {
        let address: Address = "0XABCDEF0123456789ABCDEF0123456789ABCDEF01".parse().unwrap();
        assert_eq!("0xabcdef0123456789abcdef0123456789abcdef01", address.to_string());
    }
}
