//! Differential test harness comparing a substrate against the native hash.

use super::repro::ReproBundle;
use super::runner::{
    CircuitRunner, EmulatedRunner, NativeRunner, RunnerOutput, SubstrateRunner,
};
use crate::field::Fr;
use serde::Serialize;
use tracing::warn;

/// Public hash operation under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Single-permutation hash of 1..=7 inputs.
    Hash,
    /// Tree hash of 1..=256 inputs.
    MultiHash,
}

impl Operation {
    /// Parse a corpus operation tag.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "hash" => Some(Self::Hash),
            "multi_hash" => Some(Self::MultiHash),
            _ => None,
        }
    }

    /// The corpus tag for this operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hash => "hash",
            Self::MultiHash => "multi_hash",
        }
    }

    /// Evaluate this operation on `runner`.
    pub fn run(&self, runner: &dyn SubstrateRunner, domain: Fr, inputs: &[Fr]) -> RunnerOutput {
        let result = match self {
            Self::Hash => runner.hash(domain, inputs),
            Self::MultiHash => runner.multi_hash(domain, inputs),
        };
        RunnerOutput::from_result(result)
    }
}

/// Result of a differential test.
#[derive(Debug)]
pub enum DiffResult {
    /// Both substrates produced the same output.
    Match {
        /// The matching output value.
        value: String,
    },
    /// Substrates produced different outputs.
    Mismatch {
        /// Native output.
        reference: RunnerOutput,
        /// Candidate substrate output.
        candidate: RunnerOutput,
        /// Repro bundle for debugging.
        repro: ReproBundle,
    },
}

impl DiffResult {
    /// Check if the result is a match.
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match { .. })
    }

    /// Check if the result is a mismatch.
    pub fn is_mismatch(&self) -> bool {
        matches!(self, Self::Mismatch { .. })
    }
}

/// Runs every case on the native reference and on one candidate substrate.
pub struct DiffTestHarness {
    reference: NativeRunner,
    candidate: Box<dyn SubstrateRunner>,
}

impl DiffTestHarness {
    /// Create a harness for an arbitrary candidate.
    pub fn new(candidate: Box<dyn SubstrateRunner>) -> Self {
        Self {
            reference: NativeRunner,
            candidate,
        }
    }

    /// Harness for the R1CS substrate.
    pub fn circuit() -> Self {
        Self::new(Box::new(CircuitRunner))
    }

    /// Harness for the emulated-field substrate.
    pub fn emulated() -> Self {
        Self::new(Box::new(EmulatedRunner))
    }

    /// Name of the substrate under test.
    pub fn candidate_name(&self) -> &str {
        self.candidate.name()
    }

    /// Compare one operation between the reference and the candidate.
    ///
    /// Errors are compared by name, so a candidate that rejects the same
    /// malformed call as the reference still matches.
    pub fn compare(&self, test_name: &str, op: Operation, domain: Fr, inputs: &[Fr]) -> DiffResult {
        let reference = op.run(&self.reference, domain, inputs);
        let candidate = op.run(self.candidate.as_ref(), domain, inputs);

        if reference == candidate {
            return DiffResult::Match {
                value: reference.as_string().to_string(),
            };
        }

        warn!(
            test = test_name,
            operation = op.as_str(),
            substrate = self.candidate.name(),
            reference = reference.as_string(),
            candidate = candidate.as_string(),
            "substrate disagrees with native hash"
        );
        let repro = ReproBundle::new(
            test_name.to_string(),
            op,
            self.candidate.name().to_string(),
            domain,
            inputs,
            reference.clone(),
            candidate.clone(),
        );
        DiffResult::Mismatch {
            reference,
            candidate,
            repro,
        }
    }

    /// Compare [`Operation::Hash`].
    pub fn compare_hash(&self, test_name: &str, domain: Fr, inputs: &[Fr]) -> DiffResult {
        self.compare(test_name, Operation::Hash, domain, inputs)
    }

    /// Compare [`Operation::MultiHash`].
    pub fn compare_multi_hash(&self, test_name: &str, domain: Fr, inputs: &[Fr]) -> DiffResult {
        self.compare(test_name, Operation::MultiHash, domain, inputs)
    }

    /// Run a batch of differential tests.
    pub fn run_batch<'a>(
        &self,
        tests: impl Iterator<Item = (&'a str, Operation, Fr, &'a [Fr])>,
    ) -> BatchResult {
        let mut results = BatchResult::new();

        for (name, op, domain, inputs) in tests {
            match self.compare(name, op, domain, inputs) {
                DiffResult::Match { .. } => results.record_pass(),
                DiffResult::Mismatch {
                    reference,
                    candidate,
                    repro,
                } => results.record_fail(name, reference, candidate, repro),
            }
        }

        results
    }
}

/// Results from running a batch of differential tests.
#[derive(Debug, Default)]
pub struct BatchResult {
    /// Number of tests that passed.
    pub passed: usize,
    /// Number of tests that failed.
    pub failed: usize,
    /// Details of failures.
    pub failures: Vec<FailureDetail>,
}

/// Details about a test failure.
#[derive(Debug)]
pub struct FailureDetail {
    /// Test name.
    pub name: String,
    /// Native output.
    pub reference: RunnerOutput,
    /// Candidate output.
    pub candidate: RunnerOutput,
    /// Repro bundle.
    pub repro: ReproBundle,
}

impl BatchResult {
    /// Create a new empty batch result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a passing test.
    pub fn record_pass(&mut self) {
        self.passed += 1;
    }

    /// Record a failing test.
    pub fn record_fail(
        &mut self,
        name: &str,
        reference: RunnerOutput,
        candidate: RunnerOutput,
        repro: ReproBundle,
    ) {
        self.failed += 1;
        self.failures.push(FailureDetail {
            name: name.to_string(),
            reference,
            candidate,
            repro,
        });
    }

    /// Check if all tests passed.
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Get total number of tests run.
    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    /// Format a summary string.
    pub fn summary(&self) -> String {
        format!(
            "{} passed, {} failed (total: {})",
            self.passed,
            self.failed,
            self.total()
        )
    }
}
