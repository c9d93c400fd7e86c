//! BLS12-377 scalar field element (Fr).
//!
//! Wraps `ark_bls12_377::Fr` with validation on construction to ensure
//! canonical representation.

use crate::error::{PoseidonError, PoseidonResult};
use ark_bls12_377::Fr as ArkFr;
use ark_ff::{BigInt, BigInteger, Field, PrimeField};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

/// A BLS12-377 scalar field element.
///
/// This is a newtype wrapper around `ark_bls12_377::Fr` that enforces
/// canonical encoding on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fr(ArkFr);

impl Fr {
    /// The additive identity (zero).
    pub const ZERO: Fr = Fr(<ArkFr as Field>::ZERO);

    /// The multiplicative identity (one).
    pub const ONE: Fr = Fr(<ArkFr as Field>::ONE);

    /// Create an Fr from a u64 value.
    pub fn from_u64(val: u64) -> Fr {
        Fr(ArkFr::from(val))
    }

    /// Create an Fr from limbs already in Montgomery form.
    ///
    /// Only used by the generated parameter tables, whose limbs are
    /// produced (and range-checked) by the build script.
    pub(crate) const fn from_montgomery_limbs(limbs: [u64; 4]) -> Fr {
        Fr(ArkFr::new_unchecked(BigInt::new(limbs)))
    }

    /// Create an Fr from raw bytes (little-endian).
    ///
    /// Returns an error if the bytes do not represent a canonical field element
    /// (i.e., the value is >= the field modulus).
    pub fn from_bytes_le(bytes: &[u8; 32]) -> PoseidonResult<Fr> {
        let mut limbs = [0u64; 4];
        for (limb, chunk) in limbs.iter_mut().zip(bytes.chunks(8)) {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(chunk);
            *limb = u64::from_le_bytes(buf);
        }

        ArkFr::from_bigint(BigInt::new(limbs))
            .map(Fr)
            .ok_or_else(|| PoseidonError::NonCanonicalElement(hex::encode(bytes)))
    }

    /// Reduce an arbitrary-length little-endian byte string modulo the field.
    ///
    /// Never fails; this is how domain separators are derived from labels.
    pub fn from_le_bytes_mod_order(bytes: &[u8]) -> Fr {
        Fr(ArkFr::from_le_bytes_mod_order(bytes))
    }

    /// Create an Fr from a hex string (64 hex chars, LE encoding).
    pub fn from_hex(hex_str: &str) -> PoseidonResult<Fr> {
        if hex_str.len() != 64 {
            return Err(PoseidonError::WrongLength {
                expected: 64,
                got: hex_str.len(),
            });
        }

        let bytes = hex::decode(hex_str).map_err(|_| PoseidonError::InvalidHex)?;

        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Self::from_bytes_le(&arr)
    }

    /// Parse a canonical decimal string.
    ///
    /// Rejects leading zeros, signs, and values >= the modulus.
    pub fn from_decimal(s: &str) -> PoseidonResult<Fr> {
        // arkworks reduces out-of-range decimals instead of rejecting them.
        let parsed = ArkFr::from_str(s)
            .map(Fr)
            .map_err(|_| PoseidonError::NonCanonicalElement(s.to_string()))?;
        if parsed.to_decimal() != s {
            return Err(PoseidonError::NonCanonicalElement(s.to_string()));
        }
        Ok(parsed)
    }

    /// Convert to canonical 32-byte little-endian representation.
    pub fn to_bytes_le(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        let bytes = self.0.into_bigint().to_bytes_le();
        out[..bytes.len()].copy_from_slice(&bytes);
        out
    }

    /// Convert to 64-character lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes_le())
    }

    /// Convert to decimal string representation.
    pub fn to_decimal(&self) -> String {
        self.0.into_bigint().to_string()
    }

    /// Get the underlying arkworks element.
    pub fn inner(&self) -> &ArkFr {
        &self.0
    }

    /// Unwrap into the underlying arkworks element.
    pub fn into_inner(self) -> ArkFr {
        self.0
    }

    /// Square the field element.
    pub fn square(&self) -> Fr {
        Fr(self.0.square())
    }

    /// Compute x^17 (the Poseidon377 S-box).
    pub fn pow17(&self) -> Fr {
        let x2 = self.0.square();
        let x4 = x2.square();
        let x8 = x4.square();
        let x16 = x8.square();
        Fr(x16 * self.0)
    }
}

impl Default for Fr {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<u64> for Fr {
    fn from(val: u64) -> Self {
        Fr::from_u64(val)
    }
}

impl From<ArkFr> for Fr {
    fn from(val: ArkFr) -> Self {
        Fr(val)
    }
}

impl From<Fr> for ArkFr {
    fn from(val: Fr) -> Self {
        val.0
    }
}

impl FromStr for Fr {
    type Err = PoseidonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Fr::from_decimal(s)
    }
}

impl Add for Fr {
    type Output = Fr;
    fn add(self, rhs: Fr) -> Fr {
        Fr(self.0 + rhs.0)
    }
}

impl Sub for Fr {
    type Output = Fr;
    fn sub(self, rhs: Fr) -> Fr {
        Fr(self.0 - rhs.0)
    }
}

impl Mul for Fr {
    type Output = Fr;
    fn mul(self, rhs: Fr) -> Fr {
        Fr(self.0 * rhs.0)
    }
}

impl Neg for Fr {
    type Output = Fr;
    fn neg(self) -> Fr {
        Fr(-self.0)
    }
}

impl fmt::Display for Fr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}
