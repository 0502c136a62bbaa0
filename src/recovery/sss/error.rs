//! Errors produced by the Shamir secret sharing implementation.
//!
//! Every failure is reported through [`SecretSharingError`]. Variants are
//! grouped into broad categories by [`ErrorKind`] so callers can react to
//! a whole class of failures (for example, any malformed input) without
//! matching every variant.

use thiserror::Error;

/// Convenience alias used throughout the `sss` module.
pub type Result<T> = std::result::Result<T, SecretSharingError>;

/// Broad category of a [`SecretSharingError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid parameters, rejected before any state is created.
    Configuration,
    /// The operation is not allowed in the current container state.
    State,
    /// Unparseable or inconsistent serialized input.
    Format,
    /// A reconstructed secret or a batch of shares failed verification.
    Integrity,
    /// A field invariant was violated during computation.
    Arithmetic,
}

/// Errors that may occur during Shamir Secret Sharing operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SecretSharingError {
    /// The threshold or share count is outside `2 <= k <= n <= 512`.
    #[error("invalid threshold: k = {k}, n = {n} (expected {min} <= k <= n <= {max})")]
    InvalidThreshold { k: u16, n: u16, min: u16, max: u16 },

    /// A secret is wider than the supported maximum.
    #[error("secret bit length {bit_length} exceeds the maximum of {max}")]
    SecretTooLarge { bit_length: u64, max: u64 },

    /// A requested bit length cannot be served (zero or too large).
    #[error("invalid bit length: {0}")]
    InvalidBitLength(u64),

    /// Configuration that is structurally valid but semantically wrong,
    /// or that carries unknown options.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A secret was already assigned to this container.
    #[error("a secret has already been set on this container")]
    SecretAlreadySet,

    /// The container already holds `n` shares.
    #[error("cannot add more than {n} shares")]
    TooManyShares { n: u16 },

    /// The exact same share was already added.
    #[error("share {x} has already been added")]
    DuplicateShare { x: u16 },

    /// Two different shares carry the same identifier.
    #[error("two different shares use the identifier x = {x}")]
    DuplicateShareId { x: u16 },

    /// The secret has already been recovered; the container is sealed.
    #[error("the secret has already been recovered")]
    AlreadyRecovered,

    /// The container was used for splitting and cannot accept shares.
    #[error("this container holds a split secret and cannot combine shares")]
    SplittingContainer,

    /// The container is combining shares and cannot take a secret.
    #[error("this container is combining shares and cannot accept a secret")]
    CombiningContainer,

    /// Fewer shares than the threshold were supplied.
    #[error("not enough shares: have {have}, need {need}")]
    NotEnoughShares { have: usize, need: usize },

    /// Input is not valid base64, base36, hex or JSON.
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    /// A share is malformed or carries out-of-range fields.
    #[error("invalid share: {0}")]
    InvalidShare(String),

    /// The share format version is not understood.
    #[error("unsupported share format version {found}, expected {expected}")]
    UnsupportedVersion { found: u8, expected: u8 },

    /// The checksum embedded in a legacy share does not match its payload.
    #[error("invalid checksum: expected {expected}, found {found}")]
    ChecksumMismatch { expected: String, found: String },

    /// A structured share cannot be expressed in the legacy format.
    #[error("share is not representable in the legacy format: {0}")]
    LegacyIncompatible(String),

    /// Shares disagree on prime, threshold, count or integrity tag.
    #[error("shares do not belong to the same batch: {0}")]
    InconsistentShares(String),

    /// The reconstructed secret does not match the shares' integrity tag.
    #[error("secret recovery failed: the reconstructed secret does not match the integrity tag")]
    IntegrityCheckFailed,

    /// An element has no inverse modulo the field prime.
    #[error("element is not invertible modulo the field prime")]
    NotInvertible,

    /// The prime search gave up before finding a prime.
    #[error("no prime of {bit_length} bits found after {candidates} candidates")]
    PrimeSearchExhausted { bit_length: u64, candidates: u64 },
}

impl SecretSharingError {
    /// Returns the category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        use SecretSharingError::*;

        match self {
            InvalidThreshold { .. } | SecretTooLarge { .. } | InvalidBitLength(_) | InvalidConfig(_) => {
                ErrorKind::Configuration
            }
            SecretAlreadySet
            | TooManyShares { .. }
            | DuplicateShare { .. }
            | DuplicateShareId { .. }
            | AlreadyRecovered
            | SplittingContainer
            | CombiningContainer
            | NotEnoughShares { .. } => ErrorKind::State,
            InvalidEncoding(_)
            | InvalidShare(_)
            | UnsupportedVersion { .. }
            | ChecksumMismatch { .. }
            | LegacyIncompatible(_) => ErrorKind::Format,
            InconsistentShares(_) | IntegrityCheckFailed => ErrorKind::Integrity,
            NotInvertible | PrimeSearchExhausted { .. } => ErrorKind::Arithmetic,
        }
    }
}
