//! ChaCha-based CSPRNG
//!
//! This module wraps the ChaCha stream generator shipped with `rand`
//! (`StdRng`) behind a small, explicit API:
//! - seeding from operating system entropy
//! - deterministic seeding from a caller-provided 32-byte seed
//! - filling arbitrary byte buffers
//!
//! The generator implements [`RngCore`] and [`CryptoRng`] so it can be
//! handed to any function in the crate that needs secure randomness,
//! including the big-integer sampling helpers of `num-bigint`.

use rand::rngs::StdRng;
use rand::{CryptoRng, RngCore, SeedableRng};

/// Cryptographically secure pseudorandom number generator.
///
/// The generator is initialized from OS-provided entropy (or an explicit
/// seed) and then expands randomness with the ChaCha block function.
pub struct Csprng {
    inner: StdRng,
}

impl Csprng {
    /// Creates a new CSPRNG seeded from the operating system.
    ///
    /// This is equivalent to calling [`Csprng::from_os`].
    pub fn new() -> Self {
        Self::from_os()
    }

    /// Creates a new CSPRNG using entropy provided by the operating system.
    pub fn from_os() -> Self {
        Self {
            inner: StdRng::from_entropy(),
        }
    }

    /// Creates a new CSPRNG from a user-provided seed.
    ///
    /// Two generators built from the same seed produce the same stream.
    /// The seed must be uniformly random and unpredictable for anything
    /// other than tests. The seed is copied into the generator; wiping the
    /// caller's buffer is the caller's responsibility.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            inner: StdRng::from_seed(seed),
        }
    }

    /// Fills the provided buffer with cryptographically secure random bytes.
    pub fn fill_bytes(&mut self, out: &mut [u8]) {
        self.inner.fill_bytes(out);
    }
}

impl Default for Csprng {
    /// Creates a default CSPRNG instance seeded from the operating system.
    fn default() -> Self {
        Self::new()
    }
}

impl RngCore for Csprng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}

impl CryptoRng for Csprng {}
