//! Poseidon377 as R1CS constraints over the BLS12-377 scalar field.
//!
//! Same schedule and tables as the native hash; the caller owns the
//! constraint system and allocates the domain and inputs.

use super::multihash::multi_hash_with;
use super::sponge::hash_with;
use crate::arith::Circuit;
use crate::error::PoseidonResult;
use ark_bls12_377::Fr as ArkFr;
use ark_r1cs_std::fields::fp::FpVar;
use ark_relations::r1cs::ConstraintSystemRef;

/// Constrain and return the hash of 1..=7 wires under `domain`.
pub fn hash(
    cs: &ConstraintSystemRef<ArkFr>,
    domain: &FpVar<ArkFr>,
    inputs: &[FpVar<ArkFr>],
) -> PoseidonResult<FpVar<ArkFr>> {
    hash_with(&Circuit::new(cs), domain, inputs)
}

/// Constrain and return the multi-hash of 1..=256 wires under `domain`.
pub fn multi_hash(
    cs: &ConstraintSystemRef<ArkFr>,
    domain: &FpVar<ArkFr>,
    inputs: &[FpVar<ArkFr>],
) -> PoseidonResult<FpVar<ArkFr>> {
    multi_hash_with(&Circuit::new(cs), domain, inputs)
}
