//! Fixed-width hexadecimal share format (version 0).
//!
//! The oldest share encoding, kept so that printed or archived shares stay
//! readable. It is an uppercase hex string:
//!
//! ```text
//! V XX YYYY…YYYY CCCC PP
//! │ │  │         │    └─ (prime_bit_length - 1) / 4, two hex digits
//! │ │  │         └────── first four hex digits of SHA-1(Y hex)
//! │ │  └──────────────── y, variable length
//! │ └─────────────────── x, two hex digits
//! └───────────────────── format version, always 0
//! ```
//!
//! The prime itself is not transmitted. It is re-derived as the smallest
//! prime above `2^prime_bit_length`, which ties old shares to that exact
//! search. The format also carries neither threshold, share count nor
//! integrity tag; [`LegacyShare::into_share`] attaches them so a legacy
//! share can still go through the integrity-checked combine path.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use num_traits::Num;
use sha1::{Digest, Sha1};

use super::error::{Result, SecretSharingError};
use super::params::{
    DEFAULT_MAX_PRIME_CANDIDATES, LEGACY_MILLER_RABIN_ROUNDS, LEGACY_SHARE_FORMAT_VERSION,
};
use super::prime::smallest_prime_of_bitlength;
use super::share::{Share, ShareParts};
use crate::rng::Csprng;

/// version + x + at least one y digit + checksum + prime nibbles
const MIN_LENGTH: usize = 1 + 2 + 1 + 4 + 2;

/// A share in the fixed-width hex format.
#[derive(Clone, Debug)]
pub struct LegacyShare {
    x: u8,
    y: BigUint,
    prime: BigUint,
    prime_bit_length: u64,
}

impl LegacyShare {
    /// Builds a legacy share.
    ///
    /// # Errors
    ///
    /// - [`SecretSharingError::InvalidShare`] if `x` is zero or `y` is not
    ///   reduced modulo `prime`
    /// - [`SecretSharingError::LegacyIncompatible`] if `prime_bit_length`
    ///   cannot be written as a nibble count
    pub fn new(x: u8, y: BigUint, prime: BigUint, prime_bit_length: u64) -> Result<Self> {
        prime_nibbles(prime_bit_length)?;

        if x == 0 {
            return Err(SecretSharingError::InvalidShare("x must be non-zero".into()));
        }

        if y >= prime {
            return Err(SecretSharingError::InvalidShare(
                "y is not reduced modulo the prime".into(),
            ));
        }

        Ok(Self {
            x,
            y,
            prime,
            prime_bit_length,
        })
    }

    pub fn x(&self) -> u8 {
        self.x
    }

    pub fn y(&self) -> &BigUint {
        &self.y
    }

    pub fn prime(&self) -> &BigUint {
        &self.prime
    }

    pub fn prime_bit_length(&self) -> u64 {
        self.prime_bit_length
    }

    /// Attaches batch metadata, producing a structured share.
    pub fn into_share(self, k: u16, n: u16, integrity_tag: impl Into<String>) -> Result<Share> {
        Share::new(ShareParts {
            x: u16::from(self.x),
            y: self.y,
            prime: self.prime,
            prime_bit_length: self.prime_bit_length,
            k,
            n,
            integrity_tag: integrity_tag.into(),
        })
    }
}

/// Encodes `prime_bit_length` as the two-digit nibble count of the format.
pub(crate) fn prime_nibbles(prime_bit_length: u64) -> Result<u8> {
    if prime_bit_length == 0 || (prime_bit_length - 1) % 4 != 0 {
        return Err(SecretSharingError::LegacyIncompatible(format!(
            "prime bit length {prime_bit_length} is not 4·m + 1"
        )));
    }

    u8::try_from((prime_bit_length - 1) / 4).map_err(|_| {
        SecretSharingError::LegacyIncompatible(format!(
            "prime bit length {prime_bit_length} is too large"
        ))
    })
}

fn checksum(y_hex: &str) -> String {
    let digest = hex::encode_upper(Sha1::digest(y_hex.as_bytes()));
    digest[..4].to_owned()
}

fn parse_hex_u8(digits: &str) -> Result<u8> {
    u8::from_str_radix(digits, 16)
        .map_err(|_| SecretSharingError::InvalidShare(format!("'{digits}' is not hex")))
}

impl PartialEq for LegacyShare {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for LegacyShare {}

impl fmt::Display for LegacyShare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nibbles = prime_nibbles(self.prime_bit_length).map_err(|_| fmt::Error)?;
        let y_hex = self.y.to_str_radix(16).to_uppercase();

        write!(
            f,
            "{:X}{:02X}{}{}{:02X}",
            LEGACY_SHARE_FORMAT_VERSION,
            self.x,
            y_hex,
            checksum(&y_hex),
            nibbles
        )
    }
}

impl FromStr for LegacyShare {
    type Err = SecretSharingError;

    /// Parses and validates a legacy share, re-deriving its prime.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();

        if !s.bytes().all(|b| b.is_ascii_hexdigit()) || s.len() < MIN_LENGTH {
            return Err(SecretSharingError::InvalidShare(format!(
                "legacy share must be at least {MIN_LENGTH} hex characters"
            )));
        }

        let version = u8::from_str_radix(&s[..1], 16)
            .map_err(|_| SecretSharingError::InvalidShare("missing version nibble".into()))?;

        if version != LEGACY_SHARE_FORMAT_VERSION {
            return Err(SecretSharingError::UnsupportedVersion {
                found: version,
                expected: LEGACY_SHARE_FORMAT_VERSION,
            });
        }

        let len = s.len();
        let y_hex = &s[3..len - 6];
        let found = &s[len - 6..len - 2];
        let expected = checksum(y_hex);

        if found != expected {
            return Err(SecretSharingError::ChecksumMismatch {
                expected,
                found: found.to_owned(),
            });
        }

        let x = parse_hex_u8(&s[1..3])?;
        let y = BigUint::from_str_radix(y_hex, 16)
            .map_err(|_| SecretSharingError::InvalidShare("y is not hex".into()))?;
        let prime_bit_length = 4 * u64::from(parse_hex_u8(&s[len - 2..])?) + 1;

        let prime = smallest_prime_of_bitlength(
            prime_bit_length,
            LEGACY_MILLER_RABIN_ROUNDS,
            DEFAULT_MAX_PRIME_CANDIDATES,
            &mut Csprng::new(),
        )?;

        Self::new(x, y, prime, prime_bit_length)
    }
}
