//! Finite field arithmetic for Shamir Secret Sharing.
//!
//! This module implements arithmetic over the prime field `Z/pZ`, which is
//! the mathematical foundation of the Shamir scheme implemented by this
//! crate. The prime is chosen per secret (see [`prime`](super::prime)) so
//! that the field is strictly larger than the secret space.
//!
//! ## Provided operations
//!
//! - reduction, addition, subtraction, negation and multiplication mod `p`
//! - multiplicative inversion via the extended Euclidean algorithm
//! - random polynomial construction with a fixed constant term
//! - polynomial evaluation
//! - Lagrange basis coefficients and interpolation at zero
//!
//! All results are normalized into `[0, p)`.

use std::mem;

use num_bigint::{BigInt, BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};

use super::error::{Result, SecretSharingError};

/// The prime field `Z/pZ`.
///
/// Elements are plain [`BigUint`] values; the field only carries the
/// modulus and guarantees that every result it returns is reduced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrimeField {
    prime: BigUint,
}

impl PrimeField {
    /// Creates the field of integers modulo `prime`.
    ///
    /// Primality is not checked here; callers obtain `prime` from the
    /// prime search or from a share that carries it.
    ///
    /// # Errors
    ///
    /// Returns [`SecretSharingError::InvalidConfig`] if `prime < 2`.
    pub fn new(prime: BigUint) -> Result<Self> {
        if prime < BigUint::from(2u32) {
            return Err(SecretSharingError::InvalidConfig(
                "field modulus must be at least 2".into(),
            ));
        }

        Ok(Self { prime })
    }

    /// The field modulus.
    pub fn prime(&self) -> &BigUint {
        &self.prime
    }

    pub fn reduce(&self, a: &BigUint) -> BigUint {
        a % &self.prime
    }

    pub fn add(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a + b) % &self.prime
    }

    pub fn sub(&self, a: &BigUint, b: &BigUint) -> BigUint {
        self.add(a, &self.neg(b))
    }

    pub fn neg(&self, a: &BigUint) -> BigUint {
        let a = self.reduce(a);

        if a.is_zero() {
            a
        } else {
            &self.prime - a
        }
    }

    pub fn mul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a * b) % &self.prime
    }

    /// Computes the multiplicative inverse of `a`.
    ///
    /// # Errors
    ///
    /// Returns [`SecretSharingError::NotInvertible`] if `gcd(a, p) != 1`.
    /// With a genuine prime this only happens for `a ≡ 0`, which in turn
    /// means two interpolation points share the same `x`.
    pub fn invert(&self, a: &BigUint) -> Result<BigUint> {
        let a = BigInt::from(self.reduce(a));
        let m = BigInt::from(self.prime.clone());

        let (gcd, x) = extended_gcd(a, m.clone());

        if !gcd.is_one() {
            return Err(SecretSharingError::NotInvertible);
        }

        Ok(x.mod_floor(&m).magnitude().clone())
    }

    /// Builds `k` polynomial coefficients with `constant` as `f(0)`.
    ///
    /// Coefficients `1..k` are drawn uniformly from `[0, p)`, so any `k - 1`
    /// evaluations at non-zero points are uniformly distributed and carry
    /// no information about the constant term.
    pub fn random_coefficients<R: RngCore + CryptoRng>(
        &self,
        k: u16,
        constant: &BigUint,
        rng: &mut R,
    ) -> Vec<BigUint> {
        let mut coefficients = Vec::with_capacity(k as usize);
        coefficients.push(constant.clone());

        for _ in 1..k {
            coefficients.push(rng.gen_biguint_below(&self.prime));
        }

        coefficients
    }

    /// Evaluates a polynomial at `x`.
    ///
    /// The polynomial is provided as coefficients in increasing degree
    /// order:
    ///
    /// ```text
    /// f(x) = coeffs[0] + coeffs[1]·x + coeffs[2]·x² + ...   (mod p)
    /// ```
    ///
    /// Each term and the running sum are reduced as they are formed.
    pub fn evaluate(&self, x: &BigUint, coefficients: &[BigUint]) -> BigUint {
        let x = self.reduce(x);

        let mut result = BigUint::zero();
        let mut power = BigUint::one();

        for coefficient in coefficients {
            result = (result + coefficient * &power) % &self.prime;
            power = self.mul(&power, &x);
        }

        result
    }

    /// Lagrange basis polynomial of the point `xs[index]`, evaluated at zero:
    ///
    /// ```text
    /// L_i(0) = ∏_{j ≠ i} (-x_j) · (x_i - x_j)⁻¹   (mod p)
    /// ```
    ///
    /// Only the point at `index` is skipped.
    ///
    /// # Errors
    ///
    /// - [`SecretSharingError::NotInvertible`] if an abscissa appears twice
    /// - [`SecretSharingError::InvalidConfig`] if `index` is out of bounds
    pub fn lagrange_coefficient(&self, index: usize, xs: &[BigUint]) -> Result<BigUint> {
        let x = xs.get(index).ok_or_else(|| {
            SecretSharingError::InvalidConfig(format!(
                "point {index} out of range for {} points",
                xs.len()
            ))
        })?;

        let mut result = BigUint::one();

        for (_, xj) in xs.iter().enumerate().filter(|(j, _)| *j != index) {
            let numerator = self.neg(xj);
            let denominator = self.invert(&self.sub(x, xj))?;

            result = self.mul(&result, &self.mul(&numerator, &denominator));
        }

        Ok(result)
    }

    /// Recovers `f(0)` from `(x, y)` points without rebuilding `f`.
    ///
    /// # Preconditions
    ///
    /// There must be at least as many points as the polynomial has
    /// coefficients; otherwise the result is an unrelated field element.
    ///
    /// # Errors
    ///
    /// Returns [`SecretSharingError::NotInvertible`] if two `x` are equal
    /// modulo `p`.
    pub fn interpolate_at_zero(&self, points: &[(BigUint, BigUint)]) -> Result<BigUint> {
        let xs: Vec<BigUint> = points.iter().map(|(x, _)| x.clone()).collect();

        let mut acc = BigUint::zero();

        for (i, (_, y)) in points.iter().enumerate() {
            let l = self.lagrange_coefficient(i, &xs)?;
            let summand = self.mul(y, &l);

            acc = self.add(&acc, &summand);
        }

        Ok(acc)
    }
}

/// Iterative extended Euclid: returns `(gcd(a, b), s)` with `a·s ≡ gcd (mod b)`.
fn extended_gcd(a: BigInt, b: BigInt) -> (BigInt, BigInt) {
    let (mut r_last, mut r) = (a, b);
    let (mut s_last, mut s) = (BigInt::one(), BigInt::zero());

    while !r.is_zero() {
        let quotient = &r_last / &r;

        r_last -= &quotient * &r;
        s_last -= &quotient * &s;

        mem::swap(&mut r, &mut r_last);
        mem::swap(&mut s, &mut s_last);
    }

    (r_last, s_last)
}
