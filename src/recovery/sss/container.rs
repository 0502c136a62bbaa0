//! Splitting and combining state machine.
//!
//! A [`Container`] is configured with `n` (shares produced) and `k`
//! (shares needed) and is then used for exactly one role:
//!
//! ```text
//! Empty ──set_secret──────────────▶ SecretSet         (splitting)
//! Empty ──add_share──▶ Accumulating ──k-th share──▶ Recovered   (combining)
//! ```
//!
//! Splitting picks a field prime wider than the secret, builds a random
//! polynomial whose constant term is the secret and evaluates it at
//! `x = 1..=n`.
//!
//! Combining accepts shares one at a time. Once `k` consistent shares are
//! present the secret is interpolated at zero and only exposed if it
//! matches the integrity tag carried by the shares. A share that fails any
//! check is not kept, and the container stays usable.
//!
//! ## Concurrency
//!
//! A container is a plain mutable value: every mutation takes `&mut self`
//! and no internal locking is done. Callers that feed shares from several
//! threads must serialize access themselves (for example with a `Mutex`).

use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};
use tracing::{debug, warn};

use super::error::{Result, SecretSharingError};
use super::field::PrimeField;
use super::params::{ContainerParams, PrimeSearch, prime_bit_length_for};
use super::prime::{find_prime_at_least, smallest_prime_of_bitlength};
use super::secret::Secret;
use super::share::{Share, ShareParts};
use crate::rng::Csprng;

/// Lifecycle of a [`Container`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContainerState {
    /// Freshly constructed.
    Empty,
    /// A secret was assigned and split into shares.
    SecretSet,
    /// Some shares were added, fewer than `k`.
    Accumulating,
    /// `k` shares were combined into a verified secret.
    Recovered,
}

/// Anything [`Container::add_share`] accepts: shares or their string form.
pub trait IntoShare {
    fn into_share(self) -> Result<Share>;
}

impl IntoShare for Share {
    fn into_share(self) -> Result<Share> {
        Ok(self)
    }
}

impl IntoShare for &Share {
    fn into_share(self) -> Result<Share> {
        Ok(self.clone())
    }
}

impl IntoShare for &str {
    fn into_share(self) -> Result<Share> {
        self.parse()
    }
}

impl IntoShare for String {
    fn into_share(self) -> Result<Share> {
        self.parse()
    }
}

impl IntoShare for &String {
    fn into_share(self) -> Result<Share> {
        self.parse()
    }
}

/// Holds one secret and its shares, in either the splitting or the
/// combining role.
#[derive(Debug)]
pub struct Container {
    params: ContainerParams,
    secret: Option<Secret>,
    shares: Vec<Share>,
    state: ContainerState,
}

impl Container {
    /// A `k`-of-`n` container with default prime settings.
    ///
    /// # Errors
    ///
    /// Returns [`SecretSharingError::InvalidThreshold`] unless
    /// `2 <= k <= n <= 512`.
    pub fn new(n: u16, k: u16) -> Result<Self> {
        Self::with_params(ContainerParams::new(n, k))
    }

    /// A container that needs all `n` shares to recover the secret.
    pub fn all_of(n: u16) -> Result<Self> {
        Self::new(n, n)
    }

    /// A container with explicit parameters.
    pub fn with_params(params: ContainerParams) -> Result<Self> {
        params.validate()?;

        Ok(Self {
            params,
            secret: None,
            shares: Vec::new(),
            state: ContainerState::Empty,
        })
    }

    pub fn n(&self) -> u16 {
        self.params.n
    }

    pub fn k(&self) -> u16 {
        self.params.k
    }

    pub fn params(&self) -> &ContainerParams {
        &self.params
    }

    pub fn state(&self) -> ContainerState {
        self.state
    }

    /// The secret, once assigned or recovered. `None` while accumulating.
    pub fn secret(&self) -> Option<&Secret> {
        self.secret.as_ref()
    }

    pub fn has_secret(&self) -> bool {
        self.secret.is_some()
    }

    /// Shares produced by a split (ordered by `x`) or accumulated so far.
    pub fn shares(&self) -> &[Share] {
        &self.shares
    }

    /// Assigns the secret and splits it into `n` shares.
    pub fn set_secret(&mut self, secret: Secret) -> Result<&[Share]> {
        self.set_secret_with_rng(secret, &mut Csprng::new())
    }

    /// Generates a random default-length secret and splits it.
    ///
    /// The generated secret is available through [`secret`](Self::secret).
    pub fn generate_secret(&mut self) -> Result<&[Share]> {
        self.set_secret(Secret::generate()?)
    }

    /// Assigns the secret and splits it, drawing randomness from `rng`.
    ///
    /// # Errors
    ///
    /// - [`SecretSharingError::SecretAlreadySet`] if a secret is present
    /// - [`SecretSharingError::CombiningContainer`] if shares were added
    /// - prime search errors
    ///
    /// The container is unchanged on error.
    pub fn set_secret_with_rng<R: RngCore + CryptoRng>(
        &mut self,
        secret: Secret,
        rng: &mut R,
    ) -> Result<&[Share]> {
        match self.state {
            ContainerState::Empty => {}
            ContainerState::Accumulating => return Err(SecretSharingError::CombiningContainer),
            ContainerState::SecretSet | ContainerState::Recovered => {
                return Err(SecretSharingError::SecretAlreadySet);
            }
        }

        let shares = self.split(&secret, rng)?;

        self.secret = Some(secret);
        self.shares = shares;
        self.state = ContainerState::SecretSet;

        Ok(&self.shares)
    }

    /// Adds a share (or its string form) towards recovering the secret.
    ///
    /// Returns the recovered secret once the `k`-th share is accepted, and
    /// `None` before that.
    ///
    /// # Errors
    ///
    /// - [`SecretSharingError::TooManyShares`] once `n` shares are held
    /// - [`SecretSharingError::AlreadyRecovered`] after recovery
    /// - [`SecretSharingError::SplittingContainer`] on a splitting container
    /// - format errors if a string does not parse
    /// - [`SecretSharingError::DuplicateShare`] for a share already added
    /// - [`SecretSharingError::DuplicateShareId`] for a different share
    ///   with an `x` already in use
    /// - [`SecretSharingError::InconsistentShares`] if the share does not
    ///   belong to this container's batch
    /// - [`SecretSharingError::IntegrityCheckFailed`] if the `k` shares
    ///   interpolate to a value that does not match their integrity tag
    ///
    /// A rejected share is not kept.
    ///
    /// # Limitations
    ///
    /// An integrity failure is attributed to the `k`-th share, which is the
    /// one removed again. Shares accepted earlier are never revisited: if one
    /// of the first `k - 1` is corrupt, every later `k`-th share fails the
    /// same way and this container cannot recover. Individual shares carry
    /// nothing that identifies the corrupt one, so the caller has to retry
    /// other subsets in fresh containers.
    pub fn add_share<S: IntoShare>(&mut self, share: S) -> Result<Option<&Secret>> {
        if self.state == ContainerState::SecretSet {
            return Err(SecretSharingError::SplittingContainer);
        }

        if self.shares.len() >= usize::from(self.params.n) {
            return Err(SecretSharingError::TooManyShares { n: self.params.n });
        }

        if self.state == ContainerState::Recovered {
            return Err(SecretSharingError::AlreadyRecovered);
        }

        let share = share.into_share()?;
        self.check_incoming(&share)?;

        self.shares.push(share);
        self.state = ContainerState::Accumulating;

        if self.shares.len() < usize::from(self.params.k) {
            return Ok(None);
        }

        match self.recover() {
            Ok(secret) => {
                debug!(
                    n = self.params.n,
                    k = self.params.k,
                    bit_length = secret.bit_length(),
                    "secret recovered"
                );

                self.secret = Some(secret);
                self.state = ContainerState::Recovered;

                Ok(self.secret.as_ref())
            }
            Err(e) => {
                self.shares.pop();

                if self.shares.is_empty() {
                    self.state = ContainerState::Empty;
                }

                Err(e)
            }
        }
    }

    fn split<R: RngCore + CryptoRng>(&self, secret: &Secret, rng: &mut R) -> Result<Vec<Share>> {
        let prime_bit_length = prime_bit_length_for(secret.bit_length(), self.params.n);
        let rounds = self.params.miller_rabin_rounds;
        let max_candidates = self.params.max_prime_candidates;

        let prime = match self.params.prime_search {
            PrimeSearch::Random => {
                find_prime_at_least(prime_bit_length, rounds, max_candidates, rng)?
            }
            PrimeSearch::Smallest => {
                smallest_prime_of_bitlength(prime_bit_length, rounds, max_candidates, rng)?
            }
        };

        let field = PrimeField::new(prime)?;
        let coefficients = field.random_coefficients(self.params.k, secret.value(), rng);

        let shares = (1..=self.params.n)
            .map(|x| {
                Share::new(ShareParts {
                    x,
                    y: field.evaluate(&BigUint::from(x), &coefficients),
                    prime: field.prime().clone(),
                    prime_bit_length,
                    k: self.params.k,
                    n: self.params.n,
                    integrity_tag: secret.integrity_tag().to_owned(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            n = self.params.n,
            k = self.params.k,
            prime_bit_length,
            "secret split into shares"
        );

        Ok(shares)
    }

    fn check_incoming(&self, share: &Share) -> Result<()> {
        if share.k() != self.params.k || share.n() != self.params.n {
            return Err(SecretSharingError::InconsistentShares(format!(
                "share is {}-of-{}, container is {}-of-{}",
                share.k(),
                share.n(),
                self.params.k,
                self.params.n
            )));
        }

        for existing in &self.shares {
            if existing == share {
                return Err(SecretSharingError::DuplicateShare { x: share.x() });
            }

            if existing.x() == share.x() {
                return Err(SecretSharingError::DuplicateShareId { x: share.x() });
            }
        }

        if let Some(first) = self.shares.first() {
            if let Err(e) = first.check_same_batch(share) {
                warn!(x = share.x(), "rejected share from a different batch");
                return Err(e);
            }
        }

        Ok(())
    }

    /// Interpolates the accumulated shares and verifies the result.
    fn recover(&self) -> Result<Secret> {
        let first = self.shares.first().ok_or(SecretSharingError::NotEnoughShares {
            have: 0,
            need: usize::from(self.params.k),
        })?;

        let field = PrimeField::new(first.prime().clone())?;
        let points: Vec<(BigUint, BigUint)> = self
            .shares
            .iter()
            .map(|s| (BigUint::from(s.x()), s.y().clone()))
            .collect();

        let value = field.interpolate_at_zero(&points)?;

        let secret = match Secret::with_integrity_tag(value, first.integrity_tag().to_owned()) {
            Ok(secret) => secret,
            Err(SecretSharingError::SecretTooLarge { .. }) => {
                warn!("reconstructed value is wider than any valid secret");
                return Err(SecretSharingError::IntegrityCheckFailed);
            }
            Err(e) => return Err(e),
        };

        if !secret.has_valid_integrity_tag() {
            warn!(
                shares = self.shares.len(),
                "reconstructed secret does not match the shares' integrity tag"
            );
            return Err(SecretSharingError::IntegrityCheckFailed);
        }

        Ok(secret)
    }
}
