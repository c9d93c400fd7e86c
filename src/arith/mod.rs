//! Arithmetic substrates for the permutation engine.
//!
//! The permutation is written once against [`Arithmetic`] and runs over:
//!
//! - [`Native`] - plain BLS12-377 scalar arithmetic
//! - [`Circuit`] - R1CS wires over the same field (`FpVar<Fr>`)
//! - [`Emulated`] - BLS12-377 scalars emulated as limbs inside an R1CS
//!   system over BLS12-377 Fq (the scalar field of BW6-761)
//!
//! Circuit substrates borrow the caller's constraint system for as long as
//! the substrate value lives. Nothing in this crate keeps a handle to it
//! after a hash returns.

mod circuit;
mod emulated;
mod native;

pub use circuit::Circuit;
pub use emulated::{Emulated, EmulatedVar};
pub use native::Native;

use crate::error::{PoseidonError, PoseidonResult};
use crate::field::Fr;
use ark_relations::r1cs::SynthesisError;

/// Operations the permutation needs from its execution substrate.
///
/// Every operation is total over the field; the `Result`s only carry
/// failures of the underlying constraint system.
pub trait Arithmetic {
    /// Element type (a field value, a wire, or an emulated value).
    type Elem: Clone;

    /// Short substrate name used in logs and reports.
    fn name(&self) -> &'static str;

    /// The additive identity.
    fn zero(&self) -> Self::Elem;

    /// Inject a known scalar.
    fn constant(&self, value: &Fr) -> Self::Elem;

    /// `a + b`.
    fn add(&self, a: &Self::Elem, b: &Self::Elem) -> PoseidonResult<Self::Elem>;

    /// `a * b`.
    fn mul(&self, a: &Self::Elem, b: &Self::Elem) -> PoseidonResult<Self::Elem>;

    /// `c * a` for a known scalar `c`.
    fn mul_constant(&self, c: &Fr, a: &Self::Elem) -> PoseidonResult<Self::Elem> {
        self.mul(&self.constant(c), a)
    }

    /// `sum_i coeffs[i] * xs[i]`, over the shorter of the two slices.
    ///
    /// Matrix rows go through here, so substrates with expensive
    /// reductions can defer them to once per output.
    fn inner_product(&self, coeffs: &[Fr], xs: &[Self::Elem]) -> PoseidonResult<Self::Elem> {
        let mut acc = self.zero();
        for (c, x) in coeffs.iter().zip(xs) {
            acc = self.add(&acc, &self.mul_constant(c, x)?)?;
        }
        Ok(acc)
    }

    /// Require `a == b`. A no-op for native arithmetic, a constraint otherwise.
    fn assert_equal(&self, a: &Self::Elem, b: &Self::Elem) -> PoseidonResult<()>;

    /// Bring `a` into canonical form. Only the emulated substrate has
    /// non-unique representations.
    fn reduce(&self, a: &Self::Elem) -> PoseidonResult<Self::Elem> {
        Ok(a.clone())
    }
}

/// Map a constraint-system error, keeping missing assignments distinct.
pub(crate) fn synthesis_error(err: SynthesisError) -> PoseidonError {
    match err {
        SynthesisError::AssignmentMissing => PoseidonError::MissingWitness,
        other => PoseidonError::Synthesis(other),
    }
}
