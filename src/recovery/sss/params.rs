//! Parameter definitions and validation for Shamir secret sharing.
//!
//! This module holds the constants that bound the scheme and the
//! [`ContainerParams`] configuration record used to build a
//! [`Container`](super::container::Container).

use serde::Deserialize;

use super::error::{Result, SecretSharingError};

/// Minimum number of shares (and minimum threshold).
pub const MIN_SHARES: u16 = 2;

/// Maximum number of shares a single split may produce.
pub const MAX_SHARES: u16 = 512;

/// Bit length of randomly generated secrets.
pub const DEFAULT_SECRET_BITLENGTH: u64 = 256;

/// Largest secret, in bits, that may be shared.
pub const MAX_BITLENGTH: u64 = 4096;

/// Largest prime search request, in bits.
///
/// A secret of [`MAX_BITLENGTH`] bits is rounded up to the next nibble and
/// widened by one bit, which lands exactly here.
pub const MAX_PRIME_BITLENGTH: u64 = MAX_BITLENGTH + 5;

/// Default Miller–Rabin round count.
///
/// Far beyond what primes of this size require (40 to 64 rounds is the
/// usual practice); kept as a tunable default.
pub const DEFAULT_MILLER_RABIN_ROUNDS: u32 = 1000;

/// Round count used when re-deriving primes for legacy shares.
pub const LEGACY_MILLER_RABIN_ROUNDS: u32 = 20;

/// Default bound on the number of candidates tried by a prime search.
pub const DEFAULT_MAX_PRIME_CANDIDATES: u64 = 1_000_000;

/// Version tag written into structured shares.
pub const SHARE_FORMAT_VERSION: u8 = 1;

/// Version nibble of the fixed-width hex share format.
pub const LEGACY_SHARE_FORMAT_VERSION: u8 = 0;

/// How a container picks its field prime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimeSearch {
    /// Random odd candidate of the target size, stepped by two.
    #[default]
    Random,

    /// Smallest prime above `2^bits`.
    ///
    /// Deterministic, which is what the legacy share format relies on to
    /// re-derive the prime from its bit length.
    Smallest,
}

/// Configuration of a [`Container`](super::container::Container).
///
/// `n` and `k` are fixed for the lifetime of the container. The remaining
/// fields tune prime generation and have sensible defaults.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContainerParams {
    /// Total number of shares.
    pub n: u16,
    /// Number of shares required to reconstruct the secret.
    pub k: u16,
    /// Miller–Rabin rounds used when testing prime candidates.
    #[serde(default = "default_rounds")]
    pub miller_rabin_rounds: u32,
    /// Prime search strategy.
    #[serde(default)]
    pub prime_search: PrimeSearch,
    /// Upper bound on candidates tried before the search gives up.
    #[serde(default = "default_max_candidates")]
    pub max_prime_candidates: u64,
}

fn default_rounds() -> u32 {
    DEFAULT_MILLER_RABIN_ROUNDS
}

fn default_max_candidates() -> u64 {
    DEFAULT_MAX_PRIME_CANDIDATES
}

impl ContainerParams {
    /// Parameters for a `k`-of-`n` split with default prime settings.
    pub fn new(n: u16, k: u16) -> Self {
        Self {
            n,
            k,
            miller_rabin_rounds: DEFAULT_MILLER_RABIN_ROUNDS,
            prime_search: PrimeSearch::default(),
            max_prime_candidates: DEFAULT_MAX_PRIME_CANDIDATES,
        }
    }

    /// Sets the Miller–Rabin round count.
    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.miller_rabin_rounds = rounds;
        self
    }

    /// Sets the prime search strategy.
    pub fn with_prime_search(mut self, prime_search: PrimeSearch) -> Self {
        self.prime_search = prime_search;
        self
    }

    /// Parses parameters from JSON and validates them.
    ///
    /// Unknown keys are rejected.
    pub fn from_json(input: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(input)
            .map_err(|e| SecretSharingError::InvalidConfig(e.to_string()))?;
        params.validate()?;

        Ok(params)
    }

    /// Checks the parameters against the scheme's bounds.
    pub fn validate(&self) -> Result<()> {
        if self.k < MIN_SHARES || self.k > self.n || self.n > MAX_SHARES {
            return Err(SecretSharingError::InvalidThreshold {
                k: self.k,
                n: self.n,
                min: MIN_SHARES,
                max: MAX_SHARES,
            });
        }

        if self.miller_rabin_rounds == 0 {
            return Err(SecretSharingError::InvalidConfig(
                "miller_rabin_rounds must be at least 1".into(),
            ));
        }

        if self.max_prime_candidates == 0 {
            return Err(SecretSharingError::InvalidConfig(
                "max_prime_candidates must be at least 1".into(),
            ));
        }

        Ok(())
    }
}

/// Bit length requested for the field prime of a secret of `bit_length`
/// bits split into `n` shares.
///
/// The width is the larger of the secret's and `n`'s bit lengths, rounded
/// up to the next nibble boundary (always moving forward, so 256 becomes
/// 260) plus one bit. The prime then exceeds both the secret and every
/// share abscissa `1..=n`, so no two shares collide modulo the prime and
/// none lands on `x ≡ 0`.
pub fn prime_bit_length_for(bit_length: u64, n: u16) -> u64 {
    let width = bit_length.max(u64::from(u16::BITS - n.leading_zeros()));

    width + (4 - width % 4) + 1
}
