//! Substrate runners for differential testing.

use crate::arith::{synthesis_error, Arithmetic, Circuit, Emulated, EmulatedVar};
use crate::error::{PoseidonError, PoseidonResult};
use crate::field::Fr;
use crate::poseidon;
use ark_bls12_377::{Fq, Fr as ArkFr};
use ark_r1cs_std::fields::fp::FpVar;
use ark_relations::r1cs::{ConstraintSystem, ConstraintSystemRef, SynthesisError};
use serde::Serialize;
use tracing::debug;

/// Result from a runner, comparable across substrates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RunnerOutput {
    /// Successful computation with decimal digest.
    Ok(String),
    /// Error with its name.
    Err(String),
}

impl RunnerOutput {
    /// Convert a hash result.
    pub fn from_result(result: PoseidonResult<Fr>) -> Self {
        match result {
            Ok(digest) => Self::Ok(digest.to_decimal()),
            Err(e) => Self::Err(e.name().to_string()),
        }
    }

    /// Check if this is an Ok result.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    /// Check if this is an Err result.
    pub fn is_err(&self) -> bool {
        matches!(self, Self::Err(_))
    }

    /// Get the value as a string (either the digest or the error name).
    pub fn as_string(&self) -> &str {
        match self {
            Self::Ok(s) => s,
            Self::Err(s) => s,
        }
    }
}

/// A substrate that can evaluate the public hash operations on field values.
pub trait SubstrateRunner {
    /// Get the runner name for reporting.
    fn name(&self) -> &str;

    /// Hash 1..=7 inputs under `domain`.
    fn hash(&self, domain: Fr, inputs: &[Fr]) -> PoseidonResult<Fr>;

    /// Multi-hash 1..=256 inputs under `domain`.
    fn multi_hash(&self, domain: Fr, inputs: &[Fr]) -> PoseidonResult<Fr>;
}

/// Plain field arithmetic; the reference every other runner is compared to.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeRunner;

impl SubstrateRunner for NativeRunner {
    fn name(&self) -> &str {
        "native"
    }

    fn hash(&self, domain: Fr, inputs: &[Fr]) -> PoseidonResult<Fr> {
        poseidon::hash(domain, inputs)
    }

    fn multi_hash(&self, domain: Fr, inputs: &[Fr]) -> PoseidonResult<Fr> {
        poseidon::multi_hash(domain, inputs)
    }
}

type CircuitHasher = fn(
    &ConstraintSystemRef<ArkFr>,
    &FpVar<ArkFr>,
    &[FpVar<ArkFr>],
) -> PoseidonResult<FpVar<ArkFr>>;

type EmulatedHasher =
    fn(&ConstraintSystemRef<Fq>, &EmulatedVar, &[EmulatedVar]) -> PoseidonResult<EmulatedVar>;

fn unsatisfied() -> PoseidonError {
    PoseidonError::Synthesis(SynthesisError::Unsatisfiable)
}

/// Synthesizes each hash as R1CS over BLS12-377 Fr with witness inputs and
/// the digest exposed as a public input.
#[derive(Debug, Default, Clone, Copy)]
pub struct CircuitRunner;

impl CircuitRunner {
    fn run(&self, domain: Fr, inputs: &[Fr], hasher: CircuitHasher) -> PoseidonResult<Fr> {
        let cs = ConstraintSystem::<ArkFr>::new_ref();
        let circuit = Circuit::new(&cs);

        let domain = circuit.witness(&domain)?;
        let inputs = inputs
            .iter()
            .map(|v| circuit.witness(v))
            .collect::<PoseidonResult<Vec<_>>>()?;

        let digest = hasher(&cs, &domain, &inputs)?;
        let value = Circuit::value(&digest)?;
        let exposed = circuit.input(&value)?;
        circuit.assert_equal(&digest, &exposed)?;

        let satisfied = cs.is_satisfied().map_err(synthesis_error)?;
        debug!(
            constraints = cs.num_constraints(),
            satisfied, "circuit runner synthesized"
        );
        if !satisfied {
            return Err(unsatisfied());
        }
        Ok(value)
    }
}

impl SubstrateRunner for CircuitRunner {
    fn name(&self) -> &str {
        "circuit"
    }

    fn hash(&self, domain: Fr, inputs: &[Fr]) -> PoseidonResult<Fr> {
        self.run(domain, inputs, poseidon::circuit::hash)
    }

    fn multi_hash(&self, domain: Fr, inputs: &[Fr]) -> PoseidonResult<Fr> {
        self.run(domain, inputs, poseidon::circuit::multi_hash)
    }
}

/// Synthesizes each hash over emulated scalars inside R1CS over BLS12-377 Fq.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmulatedRunner;

impl EmulatedRunner {
    fn run(&self, domain: Fr, inputs: &[Fr], hasher: EmulatedHasher) -> PoseidonResult<Fr> {
        let cs = ConstraintSystem::<Fq>::new_ref();
        let emulated = Emulated::new(&cs);

        let domain = emulated.witness(&domain)?;
        let inputs = inputs
            .iter()
            .map(|v| emulated.witness(v))
            .collect::<PoseidonResult<Vec<_>>>()?;

        let digest = hasher(&cs, &domain, &inputs)?;
        let value = Emulated::value(&digest)?;
        let exposed = emulated.input(&value)?;
        emulated.assert_equal(&digest, &exposed)?;

        let satisfied = cs.is_satisfied().map_err(synthesis_error)?;
        debug!(
            constraints = cs.num_constraints(),
            satisfied, "emulated runner synthesized"
        );
        if !satisfied {
            return Err(unsatisfied());
        }
        Ok(value)
    }
}

impl SubstrateRunner for EmulatedRunner {
    fn name(&self) -> &str {
        "emulated"
    }

    fn hash(&self, domain: Fr, inputs: &[Fr]) -> PoseidonResult<Fr> {
        self.run(domain, inputs, poseidon::emulated::hash)
    }

    fn multi_hash(&self, domain: Fr, inputs: &[Fr]) -> PoseidonResult<Fr> {
        self.run(domain, inputs, poseidon::emulated::multi_hash)
    }
}
