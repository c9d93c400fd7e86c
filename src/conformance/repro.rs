//! Reproduction bundle for debugging substrate mismatches.

use super::harness::Operation;
use super::runner::RunnerOutput;
use crate::field::Fr;
use serde::Serialize;
use std::path::Path;

/// Everything needed to replay one mismatching call.
#[derive(Debug, Clone, Serialize)]
pub struct ReproBundle {
    /// Test name that failed.
    pub test_name: String,
    /// Operation that was being tested.
    pub operation: Operation,
    /// Substrate that disagreed with the native hash.
    pub substrate: String,
    /// Domain separator as a decimal string.
    pub domain: String,
    /// Inputs as decimal strings.
    pub inputs: Vec<String>,
    /// Native output.
    pub reference_output: RunnerOutput,
    /// Candidate output.
    pub candidate_output: RunnerOutput,
}

impl ReproBundle {
    /// Create a new repro bundle.
    pub fn new(
        test_name: String,
        operation: Operation,
        substrate: String,
        domain: Fr,
        inputs: &[Fr],
        reference_output: RunnerOutput,
        candidate_output: RunnerOutput,
    ) -> Self {
        Self {
            test_name,
            operation,
            substrate,
            domain: domain.to_decimal(),
            inputs: inputs.iter().map(Fr::to_decimal).collect(),
            reference_output,
            candidate_output,
        }
    }

    /// Format as a human-readable report.
    pub fn to_report(&self) -> String {
        format!(
            r#"=== Substrate Mismatch Report ===
Test: {}
Operation: {}
Substrate: {}
Domain: {}
Inputs: [{}]

Native Output: {:?}
{} Output: {:?}

To reproduce:
  cargo test {} -- --nocapture
"#,
            self.test_name,
            self.operation.as_str(),
            self.substrate,
            self.domain,
            self.inputs.join(", "),
            self.reference_output,
            self.substrate,
            self.candidate_output,
            self.test_name,
        )
    }

    /// Save the report to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        std::fs::write(path, self.to_report())
    }

    /// Format as JSON for machine parsing.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
