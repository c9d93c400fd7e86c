//! Corpus-based conformance testing.
//!
//! Loads the golden vectors from `vectors/poseidon377.json` and runs them
//! against any [`SubstrateRunner`]. A vector's `expected` field holds either
//! the decimal digest or the name of the error the call must fail with.

use super::harness::Operation;
use super::runner::{RunnerOutput, SubstrateRunner};
use super::{ConformanceError, ConformanceResult};
use crate::error::PoseidonResult;
use crate::field::Fr;
use crate::poseidon::domain_from_bytes;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Location of the shipped golden vectors.
pub const DEFAULT_CORPUS_PATH: &str =
    concat!(env!("CARGO_MANIFEST_DIR"), "/vectors/poseidon377.json");

const CORPUS_VERSION: &str = "1";

/// A corpus containing test vectors.
#[derive(Debug, Deserialize)]
pub struct Corpus {
    /// Corpus format version.
    pub version: String,
    /// List of test vectors.
    pub vectors: Vec<TestVector>,
}

/// How a vector states its domain separator.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainSpec {
    /// A label, read as a little-endian integer.
    Bytes(String),
    /// A canonical decimal field element.
    Decimal(String),
}

impl DomainSpec {
    /// Resolve to a field element.
    pub fn resolve(&self) -> PoseidonResult<Fr> {
        match self {
            Self::Bytes(label) => Ok(domain_from_bytes(label.as_bytes())),
            Self::Decimal(s) => Fr::from_decimal(s),
        }
    }
}

/// A single test vector.
#[derive(Debug, Clone, Deserialize)]
pub struct TestVector {
    /// Unique identifier for the test.
    pub name: String,
    /// Operation to test (`hash` or `multi_hash`).
    pub op: String,
    /// Domain separator.
    pub domain: DomainSpec,
    /// Inputs as decimal strings.
    pub inputs: Vec<String>,
    /// Expected digest, or expected error name.
    pub expected: String,
}

impl TestVector {
    /// The operation, if this crate knows it.
    pub fn operation(&self) -> Option<Operation> {
        Operation::parse(&self.op)
    }

    /// Decode the domain and inputs.
    pub fn decode(&self) -> ConformanceResult<(Fr, Vec<Fr>)> {
        let invalid = |reason: String| ConformanceError::InvalidVector {
            name: self.name.clone(),
            reason,
        };
        let domain = self
            .domain
            .resolve()
            .map_err(|e| invalid(format!("domain: {}", e)))?;
        let inputs = self
            .inputs
            .iter()
            .map(|s| Fr::from_decimal(s))
            .collect::<PoseidonResult<Vec<_>>>()
            .map_err(|e| invalid(format!("inputs: {}", e)))?;
        Ok((domain, inputs))
    }
}

impl Corpus {
    /// Parse a corpus from JSON text.
    pub fn from_json(content: &str) -> ConformanceResult<Self> {
        let corpus: Corpus =
            serde_json::from_str(content).map_err(|e| ConformanceError::Parse(e.to_string()))?;
        if corpus.version != CORPUS_VERSION {
            warn!(
                version = %corpus.version,
                expected = CORPUS_VERSION,
                "unexpected corpus version"
            );
        }
        Ok(corpus)
    }

    /// Load a corpus from a file path.
    pub fn load<P: AsRef<Path>>(path: P) -> ConformanceResult<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| ConformanceError::Io(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::from_json(&content)
    }

    /// Load the shipped golden vectors.
    pub fn load_default() -> ConformanceResult<Self> {
        Self::load(DEFAULT_CORPUS_PATH)
    }
}

/// Result of running a single test vector.
#[derive(Debug)]
pub enum TestResult {
    /// Test passed.
    Pass,
    /// Test failed with mismatch.
    Fail {
        /// Expected result from the corpus.
        expected: String,
        /// Actual result from the runner.
        actual: String,
    },
    /// Test was skipped (operation not implemented).
    Skip {
        /// Reason for skipping.
        reason: String,
    },
    /// The vector itself could not be decoded.
    Error {
        /// Error message.
        message: String,
    },
}

impl TestResult {
    /// Returns true if this is a passing result.
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Returns true if this is a failing result.
    pub fn is_fail(&self) -> bool {
        matches!(self, Self::Fail { .. })
    }
}

/// Results from running the corpus.
#[derive(Debug, Default)]
pub struct CorpusResults {
    /// Number of tests that passed.
    pub passed: usize,
    /// Number of tests that failed.
    pub failed: usize,
    /// Number of tests that were skipped.
    pub skipped: usize,
    /// Number of tests that errored.
    pub errors: usize,
    /// Detailed results for each test.
    pub details: Vec<(String, TestResult)>,
}

impl CorpusResults {
    /// Create a new empty results container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a test result.
    pub fn record(&mut self, name: &str, result: TestResult) {
        match &result {
            TestResult::Pass => self.passed += 1,
            TestResult::Fail { .. } => self.failed += 1,
            TestResult::Skip { .. } => self.skipped += 1,
            TestResult::Error { .. } => self.errors += 1,
        }
        self.details.push((name.to_string(), result));
    }

    /// Get total number of tests run.
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped + self.errors
    }

    /// Returns true if all tests passed (no failures or errors).
    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }

    /// Get a summary string of the results.
    pub fn summary(&self) -> String {
        format!(
            "{} passed, {} failed, {} skipped, {} errors (total: {})",
            self.passed,
            self.failed,
            self.skipped,
            self.errors,
            self.total()
        )
    }

    /// Get failures only.
    pub fn failures(&self) -> Vec<&(String, TestResult)> {
        self.details
            .iter()
            .filter(|(_, r)| r.is_fail())
            .collect()
    }

    /// Get errors only.
    pub fn error_details(&self) -> Vec<&(String, TestResult)> {
        self.details
            .iter()
            .filter(|(_, r)| matches!(r, TestResult::Error { .. }))
            .collect()
    }
}

/// Corpus runner that executes test vectors on a substrate.
pub struct CorpusRunner {
    corpus: Corpus,
}

impl CorpusRunner {
    /// Wrap a loaded corpus.
    pub fn new(corpus: Corpus) -> Self {
        Self { corpus }
    }

    /// Load corpus from a file path.
    pub fn load<P: AsRef<Path>>(path: P) -> ConformanceResult<Self> {
        Corpus::load(path).map(Self::new)
    }

    /// Get the number of test vectors.
    pub fn vector_count(&self) -> usize {
        self.corpus.vectors.len()
    }

    /// The loaded vectors.
    pub fn vectors(&self) -> &[TestVector] {
        &self.corpus.vectors
    }

    /// Run all test vectors and return results.
    pub fn run_all(&self, runner: &dyn SubstrateRunner) -> CorpusResults {
        self.run_filtered(runner, |_| true)
    }

    /// Run the vectors accepted by `filter`; the rest are not recorded.
    pub fn run_filtered(
        &self,
        runner: &dyn SubstrateRunner,
        filter: impl Fn(&TestVector) -> bool,
    ) -> CorpusResults {
        let mut results = CorpusResults::new();

        for vector in self.corpus.vectors.iter().filter(|v| filter(v)) {
            let result = Self::run_vector(runner, vector);
            debug!(
                vector = %vector.name,
                substrate = runner.name(),
                pass = result.is_pass(),
                "ran corpus vector"
            );
            results.record(&vector.name, result);
        }

        results
    }

    fn run_vector(runner: &dyn SubstrateRunner, vector: &TestVector) -> TestResult {
        let Some(op) = vector.operation() else {
            return TestResult::Skip {
                reason: format!("unknown operation '{}'", vector.op),
            };
        };
        let (domain, inputs) = match vector.decode() {
            Ok(decoded) => decoded,
            Err(e) => {
                return TestResult::Error {
                    message: e.to_string(),
                }
            }
        };

        let actual = op.run(runner, domain, &inputs);
        let matches = match &actual {
            RunnerOutput::Ok(digest) => *digest == vector.expected,
            RunnerOutput::Err(name) => *name == vector.expected,
        };
        if matches {
            TestResult::Pass
        } else {
            TestResult::Fail {
                expected: vector.expected.clone(),
                actual: actual.as_string().to_string(),
            }
        }
    }
}
