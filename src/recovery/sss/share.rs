//! A single share of a split secret.
//!
//! A [`Share`] is a point `(x, y)` on the secret's polynomial over `Z/pZ`,
//! plus everything a combiner needs to use it without outside state: the
//! prime, the threshold `k`, the share count `n` and the integrity tag of
//! the originating secret.
//!
//! ## Wire format (version 1)
//!
//! A JSON object with the keys
//!
//! ```text
//! version, hmac, k, n, x, y, prime, prime_bitlength
//! ```
//!
//! in that order. `hmac` is a hex string; every other value is an integer
//! written as a bare JSON number, however large. The JSON text is wrapped
//! in URL-safe base64.
//!
//! Two shares are equal exactly when their wire strings are equal.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use super::encoding::{json_biguint, urlsafe_decode64, urlsafe_encode64};
use super::error::{Result, SecretSharingError};
use super::legacy::{prime_nibbles, LegacyShare};
use super::params::{
    DEFAULT_MAX_PRIME_CANDIDATES, LEGACY_MILLER_RABIN_ROUNDS, MAX_SHARES, MIN_SHARES,
    SHARE_FORMAT_VERSION,
};
use super::prime::smallest_prime_of_bitlength;
use crate::rng::Csprng;

/// All fields of a share, used to build or take apart a [`Share`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareParts {
    pub x: u16,
    pub y: BigUint,
    pub prime: BigUint,
    pub prime_bit_length: u64,
    pub k: u16,
    pub n: u16,
    pub integrity_tag: String,
}

/// A validated Shamir share.
#[derive(Clone, Debug)]
pub struct Share {
    x: u16,
    y: BigUint,
    prime: BigUint,
    prime_bit_length: u64,
    k: u16,
    n: u16,
    integrity_tag: String,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ShareWire {
    version: u8,
    hmac: String,
    k: u16,
    n: u16,
    x: u16,
    #[serde(with = "json_biguint")]
    y: BigUint,
    #[serde(with = "json_biguint")]
    prime: BigUint,
    prime_bitlength: u64,
}

impl Share {
    /// Builds a share from its fields.
    ///
    /// # Errors
    ///
    /// Returns [`SecretSharingError::InvalidShare`] if:
    /// - `k` or `n` break `2 <= k <= n <= 512`
    /// - `x` is zero or greater than `n`
    /// - `prime` does not exceed `n`
    /// - `y` is not reduced modulo `prime`
    /// - `prime` is narrower than `prime_bit_length + 1` bits
    /// - the integrity tag is empty or not hex
    pub fn new(parts: ShareParts) -> Result<Self> {
        let ShareParts {
            x,
            y,
            prime,
            prime_bit_length,
            k,
            n,
            integrity_tag,
        } = parts;

        if k < MIN_SHARES || k > n || n > MAX_SHARES {
            return Err(invalid(format!("k = {k}, n = {n} out of range")));
        }

        if x == 0 || x > n {
            return Err(invalid(format!("x = {x} must be in 1..={n}")));
        }

        if prime <= BigUint::from(n) {
            return Err(invalid(format!("prime must exceed n = {n}")));
        }

        if prime.bits() <= prime_bit_length {
            return Err(invalid(format!(
                "prime has {} bits, expected more than {prime_bit_length}",
                prime.bits()
            )));
        }

        if y >= prime {
            return Err(invalid("y is not reduced modulo the prime".into()));
        }

        if integrity_tag.is_empty() || hex::decode(&integrity_tag).is_err() {
            return Err(invalid("integrity tag must be non-empty hex".into()));
        }

        Ok(Self {
            x,
            y,
            prime,
            prime_bit_length,
            k,
            n,
            integrity_tag,
        })
    }

    pub fn x(&self) -> u16 {
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

    pub fn k(&self) -> u16 {
        self.k
    }

    pub fn n(&self) -> u16 {
        self.n
    }

    pub fn integrity_tag(&self) -> &str {
        &self.integrity_tag
    }

    /// Format version written by [`fmt::Display`].
    pub fn version(&self) -> u8 {
        SHARE_FORMAT_VERSION
    }

    /// Copies the fields out, e.g. to build a modified share.
    pub fn to_parts(&self) -> ShareParts {
        ShareParts {
            x: self.x,
            y: self.y.clone(),
            prime: self.prime.clone(),
            prime_bit_length: self.prime_bit_length,
            k: self.k,
            n: self.n,
            integrity_tag: self.integrity_tag.clone(),
        }
    }

    /// The JSON document wrapped by the string form.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.to_wire())
            .map_err(|e| SecretSharingError::InvalidEncoding(format!("json: {e}")))
    }

    /// Parses the JSON document form.
    pub fn from_json(input: &str) -> Result<Self> {
        let wire: ShareWire = serde_json::from_str(input).map_err(|e| invalid(e.to_string()))?;

        if wire.version != SHARE_FORMAT_VERSION {
            return Err(SecretSharingError::UnsupportedVersion {
                found: wire.version,
                expected: SHARE_FORMAT_VERSION,
            });
        }

        Self::new(ShareParts {
            x: wire.x,
            y: wire.y,
            prime: wire.prime,
            prime_bit_length: wire.prime_bitlength,
            k: wire.k,
            n: wire.n,
            integrity_tag: wire.hmac,
        })
    }

    /// Checks that `other` could come from the same split as `self`.
    ///
    /// # Errors
    ///
    /// Returns [`SecretSharingError::InconsistentShares`] naming the first
    /// field that differs.
    pub fn check_same_batch(&self, other: &Share) -> Result<()> {
        let mismatch = if self.integrity_tag != other.integrity_tag {
            Some("integrity tags differ")
        } else if self.prime != other.prime || self.prime_bit_length != other.prime_bit_length {
            Some("primes differ")
        } else if self.k != other.k || self.n != other.n {
            Some("thresholds differ")
        } else {
            None
        };

        match mismatch {
            Some(reason) => Err(SecretSharingError::InconsistentShares(reason.into())),
            None => Ok(()),
        }
    }

    /// Converts to the fixed-width hex format.
    ///
    /// That format only carries `x`, `y` and the prime's size, and expects
    /// the prime to be re-derivable from that size.
    ///
    /// # Errors
    ///
    /// Returns [`SecretSharingError::LegacyIncompatible`] if `x` does not
    /// fit in a byte, the prime bit length is not `4·m + 1` with `m < 256`,
    /// or the prime is not the smallest one above `2^prime_bit_length`.
    pub fn to_legacy(&self) -> Result<LegacyShare> {
        let x = u8::try_from(self.x).map_err(|_| {
            SecretSharingError::LegacyIncompatible(format!("x = {} does not fit in a byte", self.x))
        })?;
        prime_nibbles(self.prime_bit_length)?;

        let expected = smallest_prime_of_bitlength(
            self.prime_bit_length,
            LEGACY_MILLER_RABIN_ROUNDS,
            DEFAULT_MAX_PRIME_CANDIDATES,
            &mut Csprng::new(),
        )?;

        if expected != self.prime {
            return Err(SecretSharingError::LegacyIncompatible(
                "prime is not derivable from its bit length".into(),
            ));
        }

        LegacyShare::new(x, self.y.clone(), self.prime.clone(), self.prime_bit_length)
    }

    fn to_wire(&self) -> ShareWire {
        ShareWire {
            version: SHARE_FORMAT_VERSION,
            hmac: self.integrity_tag.clone(),
            k: self.k,
            n: self.n,
            x: self.x,
            y: self.y.clone(),
            prime: self.prime.clone(),
            prime_bitlength: self.prime_bit_length,
        }
    }
}

impl PartialEq for Share {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for Share {}

impl fmt::Display for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = self.to_json().map_err(|_| fmt::Error)?;
        f.write_str(&urlsafe_encode64(json.as_bytes()))
    }
}

impl FromStr for Share {
    type Err = SecretSharingError;

    fn from_str(s: &str) -> Result<Self> {
        let decoded = urlsafe_decode64(s.trim())?;
        let json = String::from_utf8(decoded)
            .map_err(|_| SecretSharingError::InvalidEncoding("share is not utf-8 json".into()))?;

        Self::from_json(&json)
    }
}

impl TryFrom<ShareParts> for Share {
    type Error = SecretSharingError;

    fn try_from(parts: ShareParts) -> Result<Self> {
        Self::new(parts)
    }
}

fn invalid(reason: String) -> SecretSharingError {
    SecretSharingError::InvalidShare(reason)
}
