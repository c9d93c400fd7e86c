//! Poseidon377 over emulated BLS12-377 scalars inside an R1CS system over
//! BLS12-377 Fq.
//!
//! Every digest (including each intermediate multi-hash digest) is reduced
//! to its canonical limb form before it is returned.

use super::multihash::multi_hash_with;
use super::sponge::hash_with;
use crate::arith::{Emulated, EmulatedVar};
use crate::error::PoseidonResult;
use ark_bls12_377::Fq;
use ark_relations::r1cs::ConstraintSystemRef;

/// Constrain and return the canonical hash of 1..=7 emulated values.
pub fn hash(
    cs: &ConstraintSystemRef<Fq>,
    domain: &EmulatedVar,
    inputs: &[EmulatedVar],
) -> PoseidonResult<EmulatedVar> {
    hash_with(&Emulated::new(cs), domain, inputs)
}

/// Constrain and return the canonical multi-hash of 1..=256 emulated values.
pub fn multi_hash(
    cs: &ConstraintSystemRef<Fq>,
    domain: &EmulatedVar,
    inputs: &[EmulatedVar],
) -> PoseidonResult<EmulatedVar> {
    multi_hash_with(&Emulated::new(cs), domain, inputs)
}
