//! Threshold secret sharing for distributed custody of sensitive values.
//!
//! This crate implements **Shamir's secret sharing** over prime fields: a
//! secret integer of up to 4096 bits is split into `n` shares such that any
//! `k` of them reconstruct it exactly, while any `k - 1` reveal nothing
//! about it.
//!
//! # Module overview
//!
//! - `rng`
//!   Cryptographically secure randomness. Every operation that consumes
//!   randomness accepts any `RngCore + CryptoRng` generator and defaults to
//!   an OS-seeded [`rng::Csprng`].
//!
//! - `recovery`
//!   The secret sharing scheme itself: primality testing and prime search,
//!   polynomial arithmetic modulo a prime, the [`Secret`] and [`Share`]
//!   data model with its integrity tag and string formats, and the
//!   [`Container`] that splits and combines.
//!
//! # Example
//!
//! ```no_run
//! use secretsharing::{Container, Secret};
//! use num_bigint::BigUint;
//!
//! let secret = Secret::new(BigUint::from(1234567890u64))?;
//!
//! let mut dealer = Container::new(5, 3)?;
//! let shares: Vec<String> = dealer
//!     .set_secret(secret.clone())?
//!     .iter()
//!     .map(|s| s.to_string())
//!     .collect();
//!
//! let mut combiner = Container::new(5, 3)?;
//! combiner.add_share(shares[0].as_str())?;
//! combiner.add_share(shares[2].as_str())?;
//! let recovered = combiner.add_share(shares[4].as_str())?;
//!
//! assert_eq!(recovered, Some(&secret));
//! # Ok::<(), secretsharing::SecretSharingError>(())
//! ```
//!
//! # Design goals
//!
//! - Typed errors for every failure, grouped by kind
//! - No silent wrong answers: reconstruction is always integrity-checked
//! - Explicit, stable string formats
//!
//! Logging goes through `tracing`; the crate never installs a subscriber.

pub mod recovery;
pub mod rng;

pub use recovery::{
    Container, ContainerParams, ContainerState, ErrorKind, IntoShare, LegacyShare, PrimeSearch,
    Result, Secret, SecretSharingError, Share, ShareParts,
};
