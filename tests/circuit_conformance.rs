//! R1CS substrate conformance.
//!
//! Every rate is synthesized with witness inputs; the system must be
//! satisfied and the digest wire must carry the native digest. A digest
//! bound to a wrong public value must leave the system unsatisfied.

use ark_bls12_377::Fr as ArkFr;
use ark_r1cs_std::fields::fp::FpVar;
use ark_relations::r1cs::{ConstraintSystem, ConstraintSystemRef};
use poseidon377::arith::{Arithmetic, Circuit};
use poseidon377::conformance::{CorpusRunner, DiffTestHarness, Operation, DEFAULT_CORPUS_PATH};
use poseidon377::poseidon::circuit;
use poseidon377::{domain_from_bytes, hash, multi_hash, Fr, PoseidonError};

fn counting(n: u64) -> Vec<Fr> {
    (1..=n).map(Fr::from_u64).collect()
}

fn synthesize_hash<'a>(
    cs: &'a ConstraintSystemRef<ArkFr>,
    domain: Fr,
    inputs: &[Fr],
) -> (Circuit<'a>, FpVar<ArkFr>) {
    let c = Circuit::new(cs);
    let d = c.witness(&domain).unwrap();
    let xs: Vec<_> = inputs.iter().map(|x| c.witness(x).unwrap()).collect();
    let digest = circuit::hash(cs, &d, &xs).unwrap();
    (c, digest)
}

// =============================================================================
// Satisfiability
// =============================================================================

#[test]
fn every_rate_is_satisfied_and_matches_native() {
    let domain = domain_from_bytes(b"Penumbra_TestVec");
    for rate in 1..=7u64 {
        let inputs = counting(rate);
        let cs = ConstraintSystem::<ArkFr>::new_ref();
        let (_, digest) = synthesize_hash(&cs, domain, &inputs);

        assert!(cs.is_satisfied().unwrap(), "rate {} must be satisfied", rate);
        assert_eq!(
            Circuit::value(&digest).unwrap(),
            hash(domain, &inputs).unwrap(),
            "rate {} digest wire",
            rate
        );
    }
}

#[test]
fn constraint_count_grows_with_rate() {
    let mut previous = 0;
    for rate in 1..=7u64 {
        let cs = ConstraintSystem::<ArkFr>::new_ref();
        let _ = synthesize_hash(&cs, Fr::ZERO, &counting(rate));
        let count = cs.num_constraints();
        assert!(
            count > previous,
            "rate {} should need more constraints than rate {}",
            rate,
            rate - 1
        );
        previous = count;
    }
}

#[test]
fn constant_inputs_need_no_constraints() {
    let cs = ConstraintSystem::<ArkFr>::new_ref();
    let c = Circuit::new(&cs);
    let d = c.constant(&Fr::ZERO);
    let xs = vec![c.constant(&Fr::ONE), c.constant(&Fr::from_u64(2))];
    let digest = circuit::hash(&cs, &d, &xs).unwrap();

    assert_eq!(cs.num_constraints(), 0, "Constant folding must not emit constraints");
    assert_eq!(
        Circuit::value(&digest).unwrap(),
        hash(Fr::ZERO, &[Fr::ONE, Fr::from_u64(2)]).unwrap()
    );
}

#[test]
fn multi_hash_is_satisfied() {
    let domain = Fr::ZERO;
    let inputs = counting(20);
    let cs = ConstraintSystem::<ArkFr>::new_ref();
    let c = Circuit::new(&cs);
    let d = c.witness(&domain).unwrap();
    let xs: Vec<_> = inputs.iter().map(|x| c.witness(x).unwrap()).collect();
    let digest = circuit::multi_hash(&cs, &d, &xs).unwrap();

    assert!(cs.is_satisfied().unwrap());
    assert_eq!(
        Circuit::value(&digest).unwrap(),
        multi_hash(domain, &inputs).unwrap()
    );
}

// =============================================================================
// Soundness
// =============================================================================

#[test]
fn wrong_public_digest_is_unsatisfied() {
    for rate in 1..=7u64 {
        let inputs = counting(rate);
        let cs = ConstraintSystem::<ArkFr>::new_ref();
        let (c, digest) = synthesize_hash(&cs, Fr::ZERO, &inputs);

        let wrong = hash(Fr::ZERO, &inputs).unwrap() + Fr::ONE;
        let public = c.input(&wrong).unwrap();
        c.assert_equal(&digest, &public).unwrap();

        assert!(
            !cs.is_satisfied().unwrap(),
            "rate {} accepted a wrong digest",
            rate
        );
    }
}

#[test]
fn correct_public_digest_is_satisfied() {
    let inputs = counting(3);
    let cs = ConstraintSystem::<ArkFr>::new_ref();
    let (c, digest) = synthesize_hash(&cs, Fr::ONE, &inputs);

    let public = c.input(&hash(Fr::ONE, &inputs).unwrap()).unwrap();
    c.assert_equal(&digest, &public).unwrap();
    assert!(cs.is_satisfied().unwrap());
}

#[test]
fn shape_errors_match_native() {
    let cs = ConstraintSystem::<ArkFr>::new_ref();
    let c = Circuit::new(&cs);
    let d = c.zero();
    let eight: Vec<_> = (0..8).map(|_| c.zero()).collect();

    assert_eq!(
        circuit::hash(&cs, &d, &eight).unwrap_err(),
        PoseidonError::UnsupportedRate(8)
    );
    assert_eq!(
        circuit::multi_hash(&cs, &d, &[]).unwrap_err(),
        PoseidonError::NoInputs
    );
}

// =============================================================================
// Harness and Corpus
// =============================================================================

#[test]
fn harness_batch_agrees_with_native() {
    let harness = DiffTestHarness::circuit();
    let inputs: Vec<Vec<Fr>> = (1..=7).map(counting).collect();
    let names: Vec<String> = (1..=7).map(|r| format!("rate_{}", r)).collect();
    let cases = names
        .iter()
        .zip(&inputs)
        .map(|(n, xs)| (n.as_str(), Operation::Hash, Fr::from_u64(5), xs.as_slice()));

    let result = harness.run_batch(cases);
    assert!(result.all_passed(), "{}", result.summary());
    assert_eq!(result.passed, 7);
}

#[test]
fn corpus_passes_on_circuit() {
    let runner = CorpusRunner::load(DEFAULT_CORPUS_PATH).unwrap();
    let results = runner.run_all(&poseidon377::conformance::CircuitRunner);
    assert!(results.all_passed(), "{}", results.summary());
    assert_eq!(results.passed, runner.vector_count());
}
