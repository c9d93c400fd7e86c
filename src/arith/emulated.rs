//! BLS12-377 scalar arithmetic emulated inside an R1CS system over
//! BLS12-377 Fq.
//!
//! Limb arithmetic is delegated to `ark_r1cs_std`'s non-native field
//! gadget. Its operator overloads unwrap internally, so this module calls
//! the fallible methods of the allocated representation directly and lets
//! synthesis errors propagate.

use super::{synthesis_error, Arithmetic};
use crate::error::PoseidonResult;
use crate::field::Fr;
use ark_bls12_377::{Fq, Fr as ArkFr};
use ark_r1cs_std::alloc::AllocVar;
use ark_r1cs_std::eq::EqGadget;
use ark_r1cs_std::fields::nonnative::{
    AllocatedNonNativeFieldMulResultVar, AllocatedNonNativeFieldVar, NonNativeFieldVar,
};
use ark_r1cs_std::{R1CSVar, ToBitsGadget};
use ark_relations::r1cs::ConstraintSystemRef;

/// An emulated BLS12-377 scalar.
pub type EmulatedVar = NonNativeFieldVar<ArkFr, Fq>;

type Allocated = AllocatedNonNativeFieldVar<ArkFr, Fq>;

/// Require the limbs of `var` to encode an integer no larger than `p - 1`.
///
/// Each limb must already be range-checked to its width; the comparison
/// works on the concatenated limb bits.
fn enforce_below_modulus(var: &Allocated) -> PoseidonResult<()> {
    let mut normal = var.clone();
    normal.is_in_the_normal_form = true;
    normal.to_bits_le().map_err(synthesis_error)?;
    Ok(())
}

/// Emulated-field arithmetic over a caller-owned constraint system.
#[derive(Debug, Clone, Copy)]
pub struct Emulated<'cs> {
    cs: &'cs ConstraintSystemRef<Fq>,
}

impl<'cs> Emulated<'cs> {
    /// Wrap a constraint system for the duration of a borrow.
    pub fn new(cs: &'cs ConstraintSystemRef<Fq>) -> Self {
        Self { cs }
    }

    /// Allocate a private witness. Limbs are range-checked on allocation.
    pub fn witness(&self, value: &Fr) -> PoseidonResult<EmulatedVar> {
        let value = value.into_inner();
        EmulatedVar::new_witness(self.cs.clone(), || Ok(value)).map_err(synthesis_error)
    }

    /// Allocate a public input.
    pub fn input(&self, value: &Fr) -> PoseidonResult<EmulatedVar> {
        let value = value.into_inner();
        EmulatedVar::new_input(self.cs.clone(), || Ok(value)).map_err(synthesis_error)
    }

    /// Read back the value represented by `elem`, reduced mod the scalar field.
    pub fn value(elem: &EmulatedVar) -> PoseidonResult<Fr> {
        elem.value().map(Fr::from).map_err(synthesis_error)
    }
}

impl Arithmetic for Emulated<'_> {
    type Elem = EmulatedVar;

    fn name(&self) -> &'static str {
        "emulated"
    }

    fn zero(&self) -> EmulatedVar {
        NonNativeFieldVar::Constant(Fr::ZERO.into_inner())
    }

    fn constant(&self, value: &Fr) -> EmulatedVar {
        NonNativeFieldVar::Constant(value.into_inner())
    }

    fn add(&self, a: &EmulatedVar, b: &EmulatedVar) -> PoseidonResult<EmulatedVar> {
        use NonNativeFieldVar::{Constant, Var};
        let sum = match (a, b) {
            (Constant(x), Constant(y)) => Constant(*x + y),
            (Constant(c), Var(v)) | (Var(v), Constant(c)) => {
                Var(v.add_constant(c).map_err(synthesis_error)?)
            }
            (Var(x), Var(y)) => Var(x.add(y).map_err(synthesis_error)?),
        };
        Ok(sum)
    }

    fn mul(&self, a: &EmulatedVar, b: &EmulatedVar) -> PoseidonResult<EmulatedVar> {
        use NonNativeFieldVar::{Constant, Var};
        let product = match (a, b) {
            (Constant(x), Constant(y)) => Constant(*x * y),
            (Constant(c), Var(v)) | (Var(v), Constant(c)) => {
                Var(v.mul_constant(c).map_err(synthesis_error)?)
            }
            (Var(x), Var(y)) => Var(x.mul(y).map_err(synthesis_error)?),
        };
        Ok(product)
    }

    /// Products are kept unreduced and summed limb-wise, then reduced once.
    /// Constant terms are folded natively and added after the reduction.
    fn inner_product(&self, coeffs: &[Fr], xs: &[EmulatedVar]) -> PoseidonResult<EmulatedVar> {
        let mut constant_part = Fr::ZERO;
        let mut unreduced: Option<AllocatedNonNativeFieldMulResultVar<ArkFr, Fq>> = None;
        for (c, x) in coeffs.iter().zip(xs) {
            match x {
                NonNativeFieldVar::Constant(v) => constant_part = constant_part + *c * Fr::from(*v),
                NonNativeFieldVar::Var(v) => {
                    let coeff = Allocated::constant(self.cs.clone(), c.into_inner())
                        .map_err(synthesis_error)?;
                    let term = v.mul_without_reduce(&coeff).map_err(synthesis_error)?;
                    unreduced = Some(match unreduced {
                        Some(acc) => acc.add(&term).map_err(synthesis_error)?,
                        None => term,
                    });
                }
            }
        }
        let Some(unreduced) = unreduced else {
            return Ok(NonNativeFieldVar::Constant(constant_part.into_inner()));
        };
        let mut sum = unreduced.reduce().map_err(synthesis_error)?;
        if constant_part != Fr::ZERO {
            sum = sum
                .add_constant(&constant_part.into_inner())
                .map_err(synthesis_error)?;
        }
        Ok(NonNativeFieldVar::Var(sum))
    }

    fn assert_equal(&self, a: &EmulatedVar, b: &EmulatedVar) -> PoseidonResult<()> {
        a.enforce_equal(b).map_err(synthesis_error)
    }

    /// Allocate a fresh witness in `[0, p)` and tie it to `a`.
    ///
    /// Limbs are range-checked and their concatenation is bounded by
    /// `p - 1`, so the result has a unique limb decomposition and can be
    /// compared or exported limb-wise.
    fn reduce(&self, a: &EmulatedVar) -> PoseidonResult<EmulatedVar> {
        let value = match a {
            NonNativeFieldVar::Constant(_) => return Ok(a.clone()),
            NonNativeFieldVar::Var(v) => v.value(),
        };
        let (mut canonical, _bits) = Allocated::new_witness_with_le_bits(self.cs.clone(), || value)
            .map_err(synthesis_error)?;
        enforce_below_modulus(&canonical)?;
        canonical.is_in_the_normal_form = true;
        canonical.num_of_additions_over_normal_form = Fq::from(0u64);
        let canonical = NonNativeFieldVar::Var(canonical);
        canonical.enforce_equal(a).map_err(synthesis_error)?;
        Ok(canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::{BigInt, BigInteger, PrimeField};
    use ark_r1cs_std::fields::fp::FpVar;
    use ark_r1cs_std::fields::nonnative::params::OptimizationType;
    use ark_relations::r1cs::ConstraintSystem;
    use std::marker::PhantomData;

    /// Witness raw limbs for the integer `value`, which may exceed `p`.
    fn raw_limbs(cs: &ConstraintSystemRef<Fq>, value: &BigInt<4>) -> Allocated {
        let limbs = Allocated::get_limbs_representations_from_big_integer(
            value,
            OptimizationType::Constraints,
        )
        .unwrap()
        .into_iter()
        .map(|limb| FpVar::new_witness(cs.clone(), || Ok(limb)).unwrap())
        .collect();
        Allocated {
            cs: cs.clone(),
            limbs,
            num_of_additions_over_normal_form: Fq::from(0u64),
            is_in_the_normal_form: true,
            target_phantom: PhantomData,
        }
    }

    fn modulus_plus(d: u64) -> BigInt<4> {
        let mut value = ArkFr::MODULUS;
        assert!(!value.add_with_carry(&BigInt::from(d)));
        value
    }

    #[test]
    fn test_add_mul_match_native() {
        let cs = ConstraintSystem::<Fq>::new_ref();
        let emulated = Emulated::new(&cs);
        let a = Fr::from_u64(123_456_789);
        let b = -Fr::from_u64(987_654_321);
        let x = emulated.witness(&a).unwrap();
        let y = emulated.witness(&b).unwrap();

        let sum = emulated.add(&x, &y).unwrap();
        let product = emulated.mul(&x, &y).unwrap();
        let scaled = emulated.mul_constant(&b, &x).unwrap();

        assert_eq!(Emulated::value(&sum).unwrap(), a + b);
        assert_eq!(Emulated::value(&product).unwrap(), a * b);
        assert_eq!(Emulated::value(&scaled).unwrap(), a * b);
        assert!(cs.is_satisfied().unwrap());
    }

    #[test]
    fn test_reduce_keeps_value() {
        let cs = ConstraintSystem::<Fq>::new_ref();
        let emulated = Emulated::new(&cs);
        let a = -Fr::ONE;
        let x = emulated.witness(&a).unwrap();
        let doubled = emulated.add(&x, &x).unwrap();
        let reduced = emulated.reduce(&doubled).unwrap();
        assert_eq!(Emulated::value(&reduced).unwrap(), a + a);
        assert!(cs.is_satisfied().unwrap());
    }

    #[test]
    fn test_reduce_passes_constants_through() {
        let cs = ConstraintSystem::<Fq>::new_ref();
        let emulated = Emulated::new(&cs);
        let c = emulated.constant(&Fr::from_u64(9));
        let reduced = emulated.reduce(&c).unwrap();
        assert!(matches!(reduced, NonNativeFieldVar::Constant(_)));
        assert_eq!(cs.num_constraints(), 0);
    }

    #[test]
    fn test_reduce_bounds_by_modulus() {
        let limb_checks_only = {
            let cs = ConstraintSystem::<Fq>::new_ref();
            let before = cs.num_constraints();
            Allocated::new_witness_with_le_bits(cs.clone(), || Ok(-ArkFr::from(2u64))).unwrap();
            cs.num_constraints() - before
        };

        let cs = ConstraintSystem::<Fq>::new_ref();
        let emulated = Emulated::new(&cs);
        let x = emulated.witness(&-Fr::ONE).unwrap();
        let doubled = emulated.add(&x, &x).unwrap();
        let before = cs.num_constraints();
        let reduced = emulated.reduce(&doubled).unwrap();
        assert_eq!(Emulated::value(&reduced).unwrap(), -Fr::from_u64(2));
        assert!(cs.is_satisfied().unwrap());
        // Range checks, the modulus comparison and the equality on top.
        assert!(cs.num_constraints() - before > 2 * limb_checks_only);
    }

    #[test]
    fn test_below_modulus_accepts_p_minus_one() {
        let cs = ConstraintSystem::<Fq>::new_ref();
        let mut value = ArkFr::MODULUS;
        assert!(!value.sub_with_borrow(&BigInt::from(1u64)));
        enforce_below_modulus(&raw_limbs(&cs, &value)).unwrap();
        assert!(cs.is_satisfied().unwrap());
    }

    #[test]
    fn test_below_modulus_rejects_aliases() {
        for d in [0u64, 5, 1 << 40] {
            let cs = ConstraintSystem::<Fq>::new_ref();
            let alias = raw_limbs(&cs, &modulus_plus(d));
            // Same residue as `d`, so only the bound can reject it.
            assert_eq!(alias.value().unwrap(), ArkFr::from(d));
            enforce_below_modulus(&alias).unwrap();
            assert!(!cs.is_satisfied().unwrap(), "p + {d} accepted as canonical");
        }
    }

    #[test]
    fn test_inner_product_matches_native() {
        let cs = ConstraintSystem::<Fq>::new_ref();
        let emulated = Emulated::new(&cs);
        let coeffs: Vec<Fr> = (1..=8u64).map(|i| -Fr::from_u64(i * 1_000_003)).collect();
        let values: Vec<Fr> = (1..=8u64).map(|i| Fr::from_u64(i).pow17()).collect();
        let mut xs: Vec<EmulatedVar> = values.iter().map(|v| emulated.witness(v).unwrap()).collect();
        xs[3] = emulated.constant(&values[3]);

        let got = emulated.inner_product(&coeffs, &xs).unwrap();
        let expected = coeffs
            .iter()
            .zip(&values)
            .fold(Fr::ZERO, |acc, (c, v)| acc + *c * *v);
        assert_eq!(Emulated::value(&got).unwrap(), expected);
        assert!(cs.is_satisfied().unwrap());
    }

    #[test]
    fn test_inner_product_all_constants_is_free() {
        let cs = ConstraintSystem::<Fq>::new_ref();
        let emulated = Emulated::new(&cs);
        let coeffs = [Fr::from_u64(2), Fr::from_u64(3)];
        let xs = [emulated.constant(&Fr::from_u64(5)), emulated.constant(&Fr::from_u64(7))];
        let got = emulated.inner_product(&coeffs, &xs).unwrap();
        assert!(matches!(got, NonNativeFieldVar::Constant(_)));
        assert_eq!(Emulated::value(&got).unwrap(), Fr::from_u64(31));
        assert_eq!(cs.num_constraints(), 0);
    }

    #[test]
    fn test_inner_product_reduces_once() {
        let coeffs: Vec<Fr> = (1..=8u64).map(Fr::from_u64).collect();
        let count = |fold: bool| {
            let cs = ConstraintSystem::<Fq>::new_ref();
            let emulated = Emulated::new(&cs);
            let xs: Vec<EmulatedVar> = (10..18u64)
                .map(|i| emulated.witness(&Fr::from_u64(i)).unwrap())
                .collect();
            let start = cs.num_constraints();
            let row = if fold {
                let mut acc = emulated.zero();
                for (c, x) in coeffs.iter().zip(&xs) {
                    acc = emulated.add(&acc, &emulated.mul_constant(c, x).unwrap()).unwrap();
                }
                acc
            } else {
                emulated.inner_product(&coeffs, &xs).unwrap()
            };
            assert!(cs.is_satisfied().unwrap());
            assert_eq!(Emulated::value(&row).unwrap(), Fr::from_u64(528));
            cs.num_constraints() - start
        };
        let folded = count(true);
        let deferred = count(false);
        assert!(
            deferred * 3 < folded,
            "one reduction per row: {deferred} constraints vs {folded} folded"
        );
    }

    #[test]
    fn test_assert_equal_detects_mismatch() {
        let cs = ConstraintSystem::<Fq>::new_ref();
        let emulated = Emulated::new(&cs);
        let x = emulated.witness(&Fr::from_u64(1)).unwrap();
        let y = emulated.witness(&Fr::from_u64(2)).unwrap();
        emulated.assert_equal(&x, &y).unwrap();
        assert!(!cs.is_satisfied().unwrap());
    }
}
