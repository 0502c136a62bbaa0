//! Primality testing and prime generation.
//!
//! The field modulus of every split is a freshly searched prime slightly
//! wider than the secret. This module provides:
//!
//! - [`random_number`]: exact-width random integers from a secure source
//! - [`is_probably_prime`]: the Miller–Rabin probabilistic test
//! - [`find_prime_at_least`]: random-start prime search
//! - [`smallest_prime_of_bitlength`]: deterministic prime search, used by
//!   the legacy share format to re-derive a prime from its bit length
//!
//! Both searches walk odd candidates upwards in steps of two, discard those
//! with a small factor by trial division and only then run Miller–Rabin.
//! They give up after a caller-provided number of candidates.

use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};
use tracing::trace;

use super::error::{Result, SecretSharingError};
use super::params::MAX_PRIME_BITLENGTH;

/// Odd primes below 256, used to reject most composites cheaply.
const SMALL_PRIMES: [u32; 53] = [
    3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193,
    197, 199, 211, 223, 227, 229, 233, 239, 241, 251,
];

/// Returns a random integer of exactly `bit_length` bits.
///
/// `ceil(bit_length / 8)` bytes are drawn from `rng` and read as a
/// big-endian integer, masked down to `bit_length` bits, and the highest
/// bit is forced to one.
///
/// # Errors
///
/// Returns [`SecretSharingError::InvalidBitLength`] for a zero bit length.
pub fn random_number<R: RngCore + CryptoRng>(bit_length: u64, rng: &mut R) -> Result<BigUint> {
    if bit_length == 0 {
        return Err(SecretSharingError::InvalidBitLength(bit_length));
    }

    let byte_length = bit_length.div_ceil(8) as usize;
    let mut bytes = vec![0u8; byte_length];
    rng.fill_bytes(&mut bytes);

    let top = BigUint::one() << (bit_length - 1);
    let mask = (&top << 1u32) - 1u32;

    let mut value = BigUint::from_bytes_be(&bytes) & mask;
    value |= top;

    bytes.fill(0);

    Ok(value)
}

/// Miller–Rabin probabilistic primality test.
///
/// Writes `n - 1 = 2^s · d` with `d` odd and, for each of `rounds`
/// witnesses `a` drawn uniformly from `[2, n - 2]`, checks that `a^d` is
/// `1` or `n - 1`, or reaches `n - 1` within `s - 1` squarings.
///
/// A composite passes a single round with probability at most 1/4.
/// Numbers below 4 and even numbers are decided directly.
pub fn is_probably_prime<R: RngCore + CryptoRng>(n: &BigUint, rounds: u32, rng: &mut R) -> bool {
    let two = BigUint::from(2u32);

    if *n < two {
        return false;
    }

    if *n == two || *n == BigUint::from(3u32) {
        return true;
    }

    if n.is_even() {
        return false;
    }

    let n_minus_one = n - 1u32;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;

    'witness: for _ in 0..rounds {
        // Upper bound is exclusive: a is in [2, n - 2].
        let a = rng.gen_biguint_range(&two, &n_minus_one);
        let mut x = a.modpow(&d, n);

        if x.is_one() || x == n_minus_one {
            continue;
        }

        for _ in 1..s {
            x = (&x * &x) % n;

            if x == n_minus_one {
                continue 'witness;
            }
        }

        return false;
    }

    true
}

/// Finds a probable prime with at least `bit_length + 1` bits.
///
/// The search starts at a random odd number of `bit_length + 1` bits (the
/// top bit is set, so the start is at least `2^bit_length`) and walks
/// upwards by two.
///
/// # Errors
///
/// - [`SecretSharingError::InvalidBitLength`] if `bit_length` is zero or
///   larger than the widest prime the crate ever needs
/// - [`SecretSharingError::PrimeSearchExhausted`] if no prime was found
///   among `max_candidates` candidates
pub fn find_prime_at_least<R: RngCore + CryptoRng>(
    bit_length: u64,
    rounds: u32,
    max_candidates: u64,
    rng: &mut R,
) -> Result<BigUint> {
    check_bit_length(bit_length)?;

    let mut start = random_number(bit_length + 1, rng)?;
    start |= BigUint::one();

    search_upwards(start, bit_length, rounds, max_candidates, rng)
}

/// Finds the smallest probable prime greater than `2^bit_length`.
///
/// Given enough Miller–Rabin rounds the answer depends only on
/// `bit_length`, which lets a prime be re-derived instead of transmitted.
///
/// # Errors
///
/// Same as [`find_prime_at_least`].
pub fn smallest_prime_of_bitlength<R: RngCore + CryptoRng>(
    bit_length: u64,
    rounds: u32,
    max_candidates: u64,
    rng: &mut R,
) -> Result<BigUint> {
    check_bit_length(bit_length)?;

    let start = (BigUint::one() << bit_length) + 1u32;

    search_upwards(start, bit_length, rounds, max_candidates, rng)
}

fn check_bit_length(bit_length: u64) -> Result<()> {
    if bit_length == 0 || bit_length > MAX_PRIME_BITLENGTH {
        return Err(SecretSharingError::InvalidBitLength(bit_length));
    }

    Ok(())
}

fn search_upwards<R: RngCore + CryptoRng>(
    mut candidate: BigUint,
    bit_length: u64,
    rounds: u32,
    max_candidates: u64,
    rng: &mut R,
) -> Result<BigUint> {
    for tried in 1..=max_candidates {
        if !has_small_factor(&candidate) && is_probably_prime(&candidate, rounds, rng) {
            trace!(bit_length, candidates = tried, "prime search finished");
            return Ok(candidate);
        }

        candidate += 2u32;
    }

    Err(SecretSharingError::PrimeSearchExhausted {
        bit_length,
        candidates: max_candidates,
    })
}

/// True if `n` is divisible by one of [`SMALL_PRIMES`] other than itself.
fn has_small_factor(n: &BigUint) -> bool {
    SMALL_PRIMES.iter().any(|&p| {
        let p = BigUint::from(p);
        *n != p && (n % &p).is_zero()
    })
}
