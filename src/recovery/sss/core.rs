//! One-shot Shamir Secret Sharing API.
//!
//! These functions wrap [`Container`] for callers that hold all inputs at
//! once:
//!
//! - [`split`]
//!   Split a secret into `share_count` shares with threshold `threshold`.
//!
//! - [`combine`]
//!   Reconstruct and verify the secret from at least `threshold` shares.
//!
//! - [`refresh`]
//!   Re-randomize a set of shares without reconstructing the secret.
//!
//! All three keep the integrity tag flowing: shares carry the tag of the
//! secret they came from, and [`combine`] refuses to return a value that
//! does not match it.

use std::collections::BTreeSet;

use num_bigint::BigUint;
use num_traits::Zero;
use rand::{CryptoRng, RngCore};

use super::container::Container;
use super::error::{Result, SecretSharingError};
use super::field::PrimeField;
use super::secret::Secret;
use super::share::{Share, ShareParts};
use crate::rng::Csprng;

/// Splits a secret into `share_count` shares, any `threshold` of which
/// recover it.
///
/// # Errors
///
/// Returns [`SecretSharingError::InvalidThreshold`] unless
/// `2 <= threshold <= share_count <= 512`, or a prime search error.
pub fn split(secret: &Secret, threshold: u16, share_count: u16) -> Result<Vec<Share>> {
    let mut container = Container::new(share_count, threshold)?;

    Ok(container.set_secret(secret.clone())?.to_vec())
}

/// Reconstructs a secret from a set of shares.
///
/// The first `k` shares (as declared by the shares themselves) are used;
/// any further shares are ignored.
///
/// # Errors
///
/// - [`SecretSharingError::NotEnoughShares`] if fewer than `k` are given
/// - any error [`Container::add_share`] reports: duplicates, mixed
///   batches, or a failed integrity check
pub fn combine(shares: &[Share]) -> Result<Secret> {
    let first = shares.first().ok_or(SecretSharingError::NotEnoughShares { have: 0, need: 2 })?;
    let threshold = usize::from(first.k());

    if shares.len() < threshold {
        return Err(SecretSharingError::NotEnoughShares {
            have: shares.len(),
            need: threshold,
        });
    }

    let mut container = Container::new(first.n(), first.k())?;

    for share in shares.iter().take(threshold) {
        container.add_share(share)?;
    }

    container
        .secret()
        .cloned()
        .ok_or(SecretSharingError::NotEnoughShares {
            have: container.shares().len(),
            need: threshold,
        })
}

/// Refreshes a set of shares without reconstructing the secret.
///
/// See [`refresh_with_rng`].
pub fn refresh(shares: &[Share]) -> Result<Vec<Share>> {
    refresh_with_rng(shares, &mut Csprng::new())
}

/// Refreshes a set of shares, drawing randomness from `rng`.
///
/// A random polynomial `g` of the same degree with `g(0) = 0` is added to
/// every share:
///
/// ```text
/// y' = y + g(x)   (mod p)
/// ```
///
/// The secret, prime, threshold and integrity tag are unchanged, while
/// every `y` is renewed. Old and refreshed shares lie on different
/// polynomials and cannot be mixed.
///
/// # Errors
///
/// - [`SecretSharingError::NotEnoughShares`] if `shares` is empty
/// - [`SecretSharingError::DuplicateShareId`] if two shares share an `x`
/// - [`SecretSharingError::InconsistentShares`] if the shares come from
///   different splits
pub fn refresh_with_rng<R: RngCore + CryptoRng>(shares: &[Share], rng: &mut R) -> Result<Vec<Share>> {
    let first = shares.first().ok_or(SecretSharingError::NotEnoughShares { have: 0, need: 1 })?;

    let mut seen = BTreeSet::new();
    for share in shares {
        if !seen.insert(share.x()) {
            return Err(SecretSharingError::DuplicateShareId { x: share.x() });
        }

        first.check_same_batch(share)?;
    }

    let field = PrimeField::new(first.prime().clone())?;
    let coefficients = field.random_coefficients(first.k(), &BigUint::zero(), rng);

    shares
        .iter()
        .map(|share| {
            let delta = field.evaluate(&BigUint::from(share.x()), &coefficients);

            Share::new(ShareParts {
                y: field.add(share.y(), &delta),
                ..share.to_parts()
            })
        })
        .collect()
}
