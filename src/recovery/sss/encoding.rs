//! Text encodings shared by secrets and shares.
//!
//! - big integers as base-36 text (compact, case-insensitive alphabet)
//! - URL-safe base64 without embedded newlines; padding is written on
//!   encode and optional on decode
//! - big integers as raw JSON numbers, so structured shares stay readable
//!   by tools that parse arbitrary-precision JSON

use std::str::FromStr;

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use num_bigint::BigUint;
use num_traits::Num;

use super::error::{Result, SecretSharingError};

const URL_SAFE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

pub(crate) fn urlsafe_encode64(bytes: &[u8]) -> String {
    URL_SAFE.encode(bytes)
}

pub(crate) fn urlsafe_decode64(input: &str) -> Result<Vec<u8>> {
    URL_SAFE
        .decode(input)
        .map_err(|e| SecretSharingError::InvalidEncoding(format!("base64: {e}")))
}

pub(crate) fn to_base36(value: &BigUint) -> String {
    value.to_str_radix(36)
}

pub(crate) fn from_base36(input: &str) -> Result<BigUint> {
    if input.is_empty() {
        return Err(SecretSharingError::InvalidEncoding(
            "base36: empty input".into(),
        ));
    }

    // from_str_radix would also take a leading '+' and '_' separators.
    if !input.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(SecretSharingError::InvalidEncoding(
            "base36: non-alphanumeric character".into(),
        ));
    }

    BigUint::from_str_radix(input, 36)
        .map_err(|e| SecretSharingError::InvalidEncoding(format!("base36: {e}")))
}

/// Serde adapter writing a [`BigUint`] as a bare JSON integer.
///
/// Relies on `serde_json`'s `arbitrary_precision` feature. Decimal strings
/// are accepted on input as well.
pub(crate) mod json_biguint {
    use super::*;

    use serde::de::Error as _;
    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::{Number, Value};

    pub(crate) fn serialize<S: Serializer>(
        value: &BigUint,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        let number = Number::from_str(&value.to_str_radix(10)).map_err(S::Error::custom)?;
        number.serialize(serializer)
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<BigUint, D::Error> {
        let digits = match Value::deserialize(deserializer)? {
            Value::Number(number) => number.to_string(),
            Value::String(digits) => digits,
            other => {
                return Err(D::Error::custom(format!(
                    "expected a non-negative integer, found {other}"
                )));
            }
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(D::Error::custom(format!(
                "expected a non-negative integer, found {digits}"
            )));
        }

        BigUint::from_str(&digits)
            .map_err(|_| D::Error::custom(format!("expected a non-negative integer, found {digits}")))
    }
}
