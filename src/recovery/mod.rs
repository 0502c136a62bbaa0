//! Cryptographic recovery primitives.
//!
//! This module provides mechanisms designed to protect and recover
//! sensitive material (keys, passwords) without relying on a single
//! custodian.
//!
//! # Shamir Secret Sharing (SSS)
//!
//! The [`sss`] submodule provides an implementation of **Shamir Secret
//! Sharing**, a threshold-based secret distribution scheme.
//!
//! A secret integer is split into `n` shares such that:
//!
//! - Any subset of at least `k` shares reconstructs the original secret.
//! - Any subset of fewer than `k` shares reveals no information about it.
//!
//! ## Provided functionality
//!
//! - **Splitting**
//!   - A [`Secret`] is split into `n` [`Share`]s over a prime field chosen
//!     to be wider than the secret.
//!
//! - **Combining**
//!   - Shares are fed to a [`Container`] one at a time (as values or as
//!     strings). Once `k` are present the secret is reconstructed by
//!     Lagrange interpolation at zero and checked against the integrity
//!     tag every share carries.
//!
//! - **Refreshing**
//!   - Existing shares can be re-randomized without reconstructing the
//!     secret.
//!
//! - **Serialization**
//!   - Secrets and shares have compact, URL-safe string forms. The
//!     fixed-width hex format of early share versions is supported through
//!     [`LegacyShare`].
//!
//! ## Security properties
//!
//! - All arithmetic is performed in `Z/pZ` for a per-secret prime `p`.
//! - Polynomial coefficients are uniform over the field.
//! - A reconstruction from corrupt or foreign shares is reported as an
//!   error and never returned as a secret.
//!
//! This module does not perform any storage, networking, or policy
//! decisions.

pub mod sss;

pub use sss::container::{Container, ContainerState, IntoShare};
pub use sss::core as shamirsecretsharing;
pub use sss::error::{ErrorKind, Result, SecretSharingError};
pub use sss::legacy::LegacyShare;
pub use sss::params::{ContainerParams, PrimeSearch};
pub use sss::secret::Secret;
pub use sss::share::{Share, ShareParts};
