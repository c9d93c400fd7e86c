//! Poseidon377 hash function.
//!
//! Poseidon over the BLS12-377 scalar field with Penumbra's optimized
//! parameter schedule, for rates 1 through 7.
//!
//! The native functions re-exported here work on [`Fr`] values. The
//! [`circuit`] and [`emulated`] modules expose the same hashes over R1CS
//! wires; all three are instances of one generic [`Permutation`].

pub mod circuit;
pub mod emulated;
mod multihash;
mod permute;
mod sponge;

pub use multihash::{multi_hash, multi_hash_with};
pub use permute::{permute, permute_with_trace, Permutation};
pub use sponge::{hash, hash_1, hash_2, hash_3, hash_4, hash_5, hash_6, hash_7, hash_with};

use crate::field::Fr;

/// Derive a domain separator from a label.
///
/// The bytes are read as a little-endian integer and reduced mod the field,
/// the same way decaf377 derives its domain separators.
pub fn domain_from_bytes(bytes: &[u8]) -> Fr {
    Fr::from_le_bytes_mod_order(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_from_bytes_test_vector_label() {
        assert_eq!(
            domain_from_bytes(b"Penumbra_TestVec").to_decimal(),
            "132119747078824730781760890905599829328"
        );
    }

    #[test]
    fn test_domain_from_bytes_is_little_endian() {
        assert_eq!(domain_from_bytes(&[1, 0]), Fr::ONE);
        assert_eq!(domain_from_bytes(&[0, 1]), Fr::from_u64(256));
    }
}
