//! The secret being shared.
//!
//! A [`Secret`] wraps an arbitrary-precision non-negative integer of at most
//! [`MAX_BITLENGTH`] bits together with an integrity tag derived from it.
//! The tag is copied into every share of a split and is what lets a
//! combiner tell a correct reconstruction from a wrong one.
//!
//! ## Integrity tag
//!
//! ```text
//! digest = SHA-512(decimal(value))          64 bytes
//! tag    = HMAC-SHA-256(key = digest[..32], msg = digest[32..])
//! ```
//!
//! hex-encoded in lowercase.
//!
//! ## Text form
//!
//! `value` is written in base 36 and wrapped in URL-safe base64.

use std::fmt;
use std::str::FromStr;

use hmac::{Hmac, Mac};
use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha256, Sha512};
use subtle::ConstantTimeEq;

use super::encoding::{from_base36, to_base36, urlsafe_decode64, urlsafe_encode64};
use super::error::{Result, SecretSharingError};
use super::params::{DEFAULT_SECRET_BITLENGTH, MAX_BITLENGTH};
use super::prime::random_number;
use crate::rng::Csprng;

type HmacSha256 = Hmac<Sha256>;

/// A secret integer and its integrity tag.
///
/// Equality compares the values in constant time. `Debug` output only
/// shows the bit length.
#[derive(Clone)]
pub struct Secret {
    value: BigUint,
    bit_length: u64,
    integrity_tag: String,
}

impl Secret {
    /// Wraps `value`, computing its bit length and integrity tag.
    ///
    /// # Errors
    ///
    /// Returns [`SecretSharingError::SecretTooLarge`] if `value` needs more
    /// than [`MAX_BITLENGTH`] bits.
    pub fn new(value: BigUint) -> Result<Self> {
        let bit_length = check_bit_length(&value)?;
        let integrity_tag = integrity_tag_for(&value)?;

        Ok(Self {
            value,
            bit_length,
            integrity_tag,
        })
    }

    /// Generates a random secret of [`DEFAULT_SECRET_BITLENGTH`] bits using
    /// an OS-seeded generator.
    pub fn generate() -> Result<Self> {
        Self::generate_with_rng(DEFAULT_SECRET_BITLENGTH, &mut Csprng::new())
    }

    /// Generates a random secret of exactly `bit_length` bits.
    ///
    /// # Errors
    ///
    /// Returns [`SecretSharingError::InvalidBitLength`] for zero and
    /// [`SecretSharingError::SecretTooLarge`] above [`MAX_BITLENGTH`].
    pub fn generate_with_rng<R: RngCore + CryptoRng>(bit_length: u64, rng: &mut R) -> Result<Self> {
        if bit_length > MAX_BITLENGTH {
            return Err(SecretSharingError::SecretTooLarge {
                bit_length,
                max: MAX_BITLENGTH,
            });
        }

        Self::new(random_number(bit_length, rng)?)
    }

    /// Wraps a reconstructed value while keeping the tag the shares carried.
    ///
    /// The result is only trustworthy once
    /// [`has_valid_integrity_tag`](Self::has_valid_integrity_tag) returns
    /// `true`.
    pub(crate) fn with_integrity_tag(value: BigUint, integrity_tag: String) -> Result<Self> {
        let bit_length = check_bit_length(&value)?;

        Ok(Self {
            value,
            bit_length,
            integrity_tag,
        })
    }

    /// The secret integer.
    pub fn value(&self) -> &BigUint {
        &self.value
    }

    /// Replaces the secret integer and recomputes the integrity tag.
    ///
    /// On error the secret is left unchanged.
    pub fn set_value(&mut self, value: BigUint) -> Result<()> {
        let bit_length = check_bit_length(&value)?;
        let integrity_tag = integrity_tag_for(&value)?;

        self.value = value;
        self.bit_length = bit_length;
        self.integrity_tag = integrity_tag;

        Ok(())
    }

    /// Minimal number of bits needed to represent the value (0 for zero).
    pub fn bit_length(&self) -> u64 {
        self.bit_length
    }

    /// The stored integrity tag, lowercase hex.
    pub fn integrity_tag(&self) -> &str {
        &self.integrity_tag
    }

    /// Derives the integrity tag of the current value.
    pub fn compute_integrity_tag(&self) -> Result<String> {
        integrity_tag_for(&self.value)
    }

    /// Checks the stored tag against the one derived from the value.
    ///
    /// The comparison runs in constant time. An empty or non-hex stored tag
    /// yields `false`.
    pub fn has_valid_integrity_tag(&self) -> bool {
        match integrity_tag_for(&self.value) {
            Ok(expected) => tags_match(&expected, &self.integrity_tag),
            Err(_) => false,
        }
    }
}

impl PartialEq for Secret {
    fn eq(&self, other: &Self) -> bool {
        let a = self.value.to_bytes_be();
        let b = other.value.to_bytes_be();
        let width = a.len().max(b.len());

        left_pad(&a, width).ct_eq(&left_pad(&b, width)).into()
    }
}

impl Eq for Secret {}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secret")
            .field("bit_length", &self.bit_length)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&urlsafe_encode64(to_base36(&self.value).as_bytes()))
    }
}

impl FromStr for Secret {
    type Err = SecretSharingError;

    fn from_str(s: &str) -> Result<Self> {
        let decoded = urlsafe_decode64(s)?;
        let digits = String::from_utf8(decoded)
            .map_err(|_| SecretSharingError::InvalidEncoding("secret is not base36 text".into()))?;

        Self::new(from_base36(&digits)?)
    }
}

impl TryFrom<BigUint> for Secret {
    type Error = SecretSharingError;

    fn try_from(value: BigUint) -> Result<Self> {
        Self::new(value)
    }
}

/// Constant-time comparison of two hex-encoded tags.
pub(crate) fn tags_match(expected: &str, found: &str) -> bool {
    let (Ok(expected), Ok(found)) = (hex::decode(expected), hex::decode(found)) else {
        return false;
    };

    if found.is_empty() || expected.len() != found.len() {
        return false;
    }

    expected.ct_eq(&found).into()
}

fn check_bit_length(value: &BigUint) -> Result<u64> {
    let bit_length = value.bits();

    if bit_length > MAX_BITLENGTH {
        return Err(SecretSharingError::SecretTooLarge {
            bit_length,
            max: MAX_BITLENGTH,
        });
    }

    Ok(bit_length)
}

fn integrity_tag_for(value: &BigUint) -> Result<String> {
    let digest = Sha512::digest(value.to_str_radix(10).as_bytes());
    let (key, message) = digest.split_at(32);

    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| SecretSharingError::InvalidConfig(format!("hmac key: {e}")))?;
    mac.update(message);

    Ok(hex::encode(mac.finalize().into_bytes()))
}

fn left_pad(bytes: &[u8], width: usize) -> Vec<u8> {
    let mut padded = vec![0u8; width - bytes.len()];
    padded.extend_from_slice(bytes);
    padded
}
