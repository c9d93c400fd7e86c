//! Chunked multi-hash for up to 256 inputs.
//!
//! While more than seven elements remain, the list is split left to right
//! into groups of seven (the last group may be shorter), each group is
//! hashed under the same domain, and the digests replace the list. The
//! final list of at most seven elements is hashed once more. The grouping
//! never depends on input values, so 16 inputs always hash as 7 + 7 + 2 and
//! then 3.

use super::sponge::hash_with;
use crate::arith::{Arithmetic, Native};
use crate::error::{PoseidonError, PoseidonResult};
use crate::field::Fr;
use crate::params::{MAX_MULTI_HASH_INPUTS, MAX_RATE};
use tracing::debug;

/// Multi-hash substrate elements under `domain`.
pub fn multi_hash_with<A: Arithmetic>(
    arith: &A,
    domain: &A::Elem,
    inputs: &[A::Elem],
) -> PoseidonResult<A::Elem> {
    if inputs.is_empty() {
        return Err(PoseidonError::NoInputs);
    }
    if inputs.len() > MAX_MULTI_HASH_INPUTS {
        return Err(PoseidonError::TooManyInputs {
            got: inputs.len(),
            max: MAX_MULTI_HASH_INPUTS,
        });
    }

    let mut current = inputs.to_vec();
    let mut level = 0;
    while current.len() > MAX_RATE {
        current = current
            .chunks(MAX_RATE)
            .map(|group| hash_with(arith, domain, group))
            .collect::<PoseidonResult<Vec<_>>>()?;
        debug!(
            substrate = arith.name(),
            level,
            groups = current.len(),
            "multi-hash level"
        );
        level += 1;
    }

    hash_with(arith, domain, &current)
}

/// Multi-hash 1..=256 field elements under `domain`.
pub fn multi_hash(domain: Fr, inputs: &[Fr]) -> PoseidonResult<Fr> {
    multi_hash_with(&Native, &domain, inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poseidon::hash;

    fn counting(n: u64) -> Vec<Fr> {
        (1..=n).map(Fr::from_u64).collect()
    }

    #[test]
    fn test_short_lists_are_a_single_hash() {
        let domain = Fr::from_u64(3);
        for n in 1..=7 {
            let inputs = counting(n);
            assert_eq!(
                multi_hash(domain, &inputs).unwrap(),
                hash(domain, &inputs).unwrap()
            );
        }
    }

    #[test]
    fn test_sixteen_groups_as_7_7_2() {
        let domain = Fr::from_u64(3);
        let inputs = counting(16);
        let g0 = hash(domain, &inputs[0..7]).unwrap();
        let g1 = hash(domain, &inputs[7..14]).unwrap();
        let g2 = hash(domain, &inputs[14..16]).unwrap();
        assert_eq!(
            multi_hash(domain, &inputs).unwrap(),
            hash(domain, &[g0, g1, g2]).unwrap()
        );
    }

    #[test]
    fn test_fifty_takes_two_levels() {
        // 50 -> 8 digests -> 2 digests -> 1
        let domain = Fr::ZERO;
        let inputs = counting(50);
        let level1: Vec<Fr> = inputs
            .chunks(7)
            .map(|g| hash(domain, g).unwrap())
            .collect();
        assert_eq!(level1.len(), 8);
        let level2: Vec<Fr> = level1
            .chunks(7)
            .map(|g| hash(domain, g).unwrap())
            .collect();
        assert_eq!(
            multi_hash(domain, &inputs).unwrap(),
            hash(domain, &level2).unwrap()
        );
    }

    #[test]
    fn test_input_bounds() {
        assert_eq!(
            multi_hash(Fr::ZERO, &[]).unwrap_err(),
            PoseidonError::NoInputs
        );
        assert_eq!(
            multi_hash(Fr::ZERO, &counting(257)).unwrap_err(),
            PoseidonError::TooManyInputs { got: 257, max: 256 }
        );
        assert!(multi_hash(Fr::ZERO, &counting(256)).is_ok());
    }
}
