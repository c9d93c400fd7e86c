//! Differential testing harness across arithmetic substrates.
//!
//! The native hash is the reference. Circuit and emulated runners synthesize
//! a fresh constraint system per call, require it to be satisfied, and report
//! the value assigned to the digest. The harness compares those against the
//! reference and emits a repro bundle on mismatch; the corpus runner checks
//! any substrate against the golden vectors in `vectors/poseidon377.json`.

pub mod corpus;
mod harness;
mod repro;
mod runner;

pub use corpus::{
    Corpus, CorpusResults, CorpusRunner, DomainSpec, TestResult, TestVector, DEFAULT_CORPUS_PATH,
};
pub use harness::{BatchResult, DiffResult, DiffTestHarness, FailureDetail, Operation};
pub use repro::ReproBundle;
pub use runner::{CircuitRunner, EmulatedRunner, NativeRunner, RunnerOutput, SubstrateRunner};

use thiserror::Error;

/// Result type for conformance operations.
pub type ConformanceResult<T> = Result<T, ConformanceError>;

/// Errors that can occur while loading or running a corpus.
#[derive(Debug, Error)]
pub enum ConformanceError {
    /// The corpus file could not be read.
    #[error("I/O error: {0}")]
    Io(String),
    /// The corpus file is not valid JSON of the expected shape.
    #[error("failed to parse corpus: {0}")]
    Parse(String),
    /// A vector holds values that do not decode.
    #[error("invalid vector '{name}': {reason}")]
    InvalidVector {
        /// Vector name.
        name: String,
        /// What was wrong with it.
        reason: String,
    },
}
