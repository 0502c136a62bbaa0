//! Random number generation module
//!
//! This module provides the cryptographically secure randomness used by
//! the secret sharing code: random secrets, polynomial coefficients,
//! prime candidates and Miller–Rabin witnesses.
//!
//! Every operation that consumes randomness is generic over
//! `R: RngCore + CryptoRng`. [`Csprng`] is the default source and can be
//! seeded deterministically for reproducible tests and benchmarks.

mod csprng;

/// Cryptographically secure pseudorandom number generator.
///
/// This type is the primary entry point for generating secure randomness
/// within the crate.
pub use csprng::Csprng;
