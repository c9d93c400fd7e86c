//! Error handling for the Poseidon377 hash.
//!
//! Shape and configuration problems (unsupported rate, malformed parameter
//! table, empty or oversized input lists, bad encodings) surface as typed
//! errors. Each variant carries a stable numeric code so callers and test
//! corpora can match on it without parsing messages.
//!
//! An inverse S-box exponent reaching the permutation is not represented
//! here: it can only come from a corrupted table and aborts instead.

use ark_relations::r1cs::SynthesisError;
use thiserror::Error;

/// All errors produced by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoseidonError {
    /// No parameter set exists for the requested rate (code 100).
    #[error("unsupported rate {0}")]
    UnsupportedRate(usize),

    /// The parameter set for a rate does not have `state_size == rate + 1` (code 101).
    #[error("inconsistent parameter set for rate {rate} (state size {state_size})")]
    InvalidRateShape {
        /// Requested rate.
        rate: usize,
        /// State size recorded in the table or supplied by the caller.
        state_size: usize,
    },

    /// A parameter set failed structural validation (code 102).
    #[error("parameter validation failed: {0}")]
    ParameterValidationFailed(String),

    /// A hash was requested over zero inputs (code 200).
    #[error("need at least 1 input")]
    NoInputs,

    /// A multi-hash was requested over more inputs than supported (code 201).
    #[error("too many inputs ({got} > {max})")]
    TooManyInputs {
        /// Number of inputs supplied.
        got: usize,
        /// Maximum number of inputs accepted.
        max: usize,
    },

    /// Input does not encode a canonical field element (code 300).
    #[error("non-canonical field element: {0}")]
    NonCanonicalElement(String),

    /// Input is not valid hex (code 301).
    #[error("invalid hex")]
    InvalidHex,

    /// Input has the wrong length (code 302).
    #[error("wrong length: expected {expected}, got {got}")]
    WrongLength {
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// The constraint system rejected an operation (code 400).
    #[error("constraint synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),

    /// A circuit value was requested but no assignment is available (code 401).
    #[error("no witness assignment available")]
    MissingWitness,
}

impl PoseidonError {
    /// Get the numeric error code.
    pub fn code(&self) -> u32 {
        match self {
            PoseidonError::UnsupportedRate(_) => 100,
            PoseidonError::InvalidRateShape { .. } => 101,
            PoseidonError::ParameterValidationFailed(_) => 102,
            PoseidonError::NoInputs => 200,
            PoseidonError::TooManyInputs { .. } => 201,
            PoseidonError::NonCanonicalElement(_) => 300,
            PoseidonError::InvalidHex => 301,
            PoseidonError::WrongLength { .. } => 302,
            PoseidonError::Synthesis(_) => 400,
            PoseidonError::MissingWitness => 401,
        }
    }

    /// Get the error name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            PoseidonError::UnsupportedRate(_) => "UnsupportedRate",
            PoseidonError::InvalidRateShape { .. } => "InvalidRateShape",
            PoseidonError::ParameterValidationFailed(_) => "ParameterValidationFailed",
            PoseidonError::NoInputs => "NoInputs",
            PoseidonError::TooManyInputs { .. } => "TooManyInputs",
            PoseidonError::NonCanonicalElement(_) => "NonCanonicalElement",
            PoseidonError::InvalidHex => "InvalidHex",
            PoseidonError::WrongLength { .. } => "WrongLength",
            PoseidonError::Synthesis(_) => "Synthesis",
            PoseidonError::MissingWitness => "MissingWitness",
        }
    }
}

/// Result type for Poseidon operations.
pub type PoseidonResult<T> = Result<T, PoseidonError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let all = [
            PoseidonError::UnsupportedRate(8),
            PoseidonError::InvalidRateShape {
                rate: 2,
                state_size: 4,
            },
            PoseidonError::ParameterValidationFailed("x".to_string()),
            PoseidonError::NoInputs,
            PoseidonError::TooManyInputs { got: 257, max: 256 },
            PoseidonError::NonCanonicalElement("x".to_string()),
            PoseidonError::InvalidHex,
            PoseidonError::WrongLength {
                expected: 64,
                got: 3,
            },
            PoseidonError::Synthesis(SynthesisError::Unsatisfiable),
            PoseidonError::MissingWitness,
        ];
        let mut codes: Vec<u32> = all.iter().map(|e| e.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }

    #[test]
    fn test_synthesis_error_converts() {
        let err: PoseidonError = SynthesisError::AssignmentMissing.into();
        assert_eq!(err.name(), "Synthesis");
        assert_eq!(err.code(), 400);
    }

    #[test]
    fn test_messages() {
        let err = PoseidonError::TooManyInputs { got: 257, max: 256 };
        assert_eq!(err.to_string(), "too many inputs (257 > 256)");
        assert_eq!(PoseidonError::UnsupportedRate(9).to_string(), "unsupported rate 9");
    }
}
