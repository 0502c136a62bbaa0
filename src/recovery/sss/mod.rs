//! Shamir Secret Sharing (SSS) implementation.
//!
//! This module implements **Shamir Secret Sharing** over prime fields
//! sized to the secret, with an integrity tag that binds every share to the
//! secret it came from.
//!
//! The implementation is split by concern:
//!
//! - [`prime`]
//!   Miller–Rabin testing and prime search. Each split gets a fresh prime
//!   slightly wider than the secret.
//!
//! - [`field`]
//!   Arithmetic in `Z/pZ`: random polynomials, evaluation, modular
//!   inversion and Lagrange interpolation at zero.
//!
//! - [`secret`]
//!   The secret integer, its integrity tag and its text form.
//!
//! - [`share`] and [`legacy`]
//!   A point on the polynomial plus batch metadata, in the structured
//!   (version 1) and fixed-width hex (version 0) formats.
//!
//! - [`container`]
//!   The splitting/combining state machine.
//!
//! - [`core`]
//!   One-shot `split`, `combine` and `refresh`.
//!
//! - [`params`] and [`error`]
//!   Constants, configuration and the error type.
//!
//! ## Security scope
//!
//! Any `k - 1` shares are uniformly distributed and reveal nothing about
//! the secret. The integrity tag detects corrupt or foreign shares at
//! reconstruction time. This module does not provide:
//! - verifiable secret sharing against a malicious dealer
//! - share transport, storage or revocation
//!
//! Those concerns must be handled by higher layers of the system.

pub mod container;
pub mod core;
pub(crate) mod encoding;
pub mod error;
pub mod field;
pub mod legacy;
pub mod params;
pub mod prime;
pub mod secret;
pub mod share;
