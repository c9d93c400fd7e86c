//! R1CS arithmetic over the BLS12-377 scalar field.

use super::{synthesis_error, Arithmetic};
use crate::error::PoseidonResult;
use crate::field::Fr;
use ark_bls12_377::Fr as ArkFr;
use ark_r1cs_std::alloc::AllocVar;
use ark_r1cs_std::eq::EqGadget;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::fields::FieldVar;
use ark_r1cs_std::R1CSVar;
use ark_relations::r1cs::ConstraintSystemRef;

/// Constraint-emitting arithmetic over a caller-owned constraint system.
///
/// Constants stay symbolic (`FpVar::Constant`), so multiplying a wire by a
/// round constant or matrix entry costs no constraint.
#[derive(Debug, Clone, Copy)]
pub struct Circuit<'cs> {
    cs: &'cs ConstraintSystemRef<ArkFr>,
}

impl<'cs> Circuit<'cs> {
    /// Wrap a constraint system for the duration of a borrow.
    pub fn new(cs: &'cs ConstraintSystemRef<ArkFr>) -> Self {
        Self { cs }
    }

    /// Allocate a private witness.
    pub fn witness(&self, value: &Fr) -> PoseidonResult<FpVar<ArkFr>> {
        let value = value.into_inner();
        FpVar::new_witness(self.cs.clone(), || Ok(value)).map_err(synthesis_error)
    }

    /// Allocate a public input.
    pub fn input(&self, value: &Fr) -> PoseidonResult<FpVar<ArkFr>> {
        let value = value.into_inner();
        FpVar::new_input(self.cs.clone(), || Ok(value)).map_err(synthesis_error)
    }

    /// Read back the value assigned to `elem`.
    pub fn value(elem: &FpVar<ArkFr>) -> PoseidonResult<Fr> {
        elem.value().map(Fr::from).map_err(synthesis_error)
    }
}

impl Arithmetic for Circuit<'_> {
    type Elem = FpVar<ArkFr>;

    fn name(&self) -> &'static str {
        "circuit"
    }

    fn zero(&self) -> FpVar<ArkFr> {
        FpVar::zero()
    }

    fn constant(&self, value: &Fr) -> FpVar<ArkFr> {
        FpVar::constant(value.into_inner())
    }

    fn add(&self, a: &FpVar<ArkFr>, b: &FpVar<ArkFr>) -> PoseidonResult<FpVar<ArkFr>> {
        Ok(a + b)
    }

    fn mul(&self, a: &FpVar<ArkFr>, b: &FpVar<ArkFr>) -> PoseidonResult<FpVar<ArkFr>> {
        Ok(a * b)
    }

    fn mul_constant(&self, c: &Fr, a: &FpVar<ArkFr>) -> PoseidonResult<FpVar<ArkFr>> {
        Ok(a * c.into_inner())
    }

    fn assert_equal(&self, a: &FpVar<ArkFr>, b: &FpVar<ArkFr>) -> PoseidonResult<()> {
        a.enforce_equal(b).map_err(synthesis_error)
    }
}
