//! Poseidon377 parameter sets.
//!
//! One parameter set per rate 1..=7, taken from Penumbra's poseidon377
//! (128-bit security, alpha = 17, 8 full rounds, 31 partial rounds). The
//! constants are compiled in by `build.rs` from `params/poseidon377.json`
//! and copied once into owned [`Parameters`] values on first use.
//!
//! Only `arc`, `optimized_arc`, `mds`, `m_i`, `m_00`, `v_collection` and
//! `w_hat_collection` are read by the permutation. The remaining matrices
//! are the intermediate products of the sparse-matrix factorization and are
//! kept so the tables can be audited.

mod validate;

pub use validate::validate;

use crate::error::{PoseidonError, PoseidonResult};
use crate::field::Fr;
use std::sync::OnceLock;
use tracing::debug;

/// Largest rate with a dedicated parameter set.
pub const MAX_RATE: usize = 7;

/// Largest input list accepted by multi-hash.
pub const MAX_MULTI_HASH_INPUTS: usize = 256;

/// The only S-box exponent the permutation implements.
pub const ALPHA: u64 = 17;

/// S-box exponent. `inverse` selects `x^(1/exponent)`, which no
/// Poseidon377 parameter set uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alpha {
    /// Exponent applied by the S-box.
    pub exponent: u64,
    /// Whether the inverse power is used.
    pub inverse: bool,
}

/// Matrices of the optimized (sparse partial round) schedule.
///
/// All matrices are flattened row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizedMds {
    /// `(t-1) x (t-1)` lower-right block of the MDS matrix.
    pub m_hat: Vec<Fr>,
    /// First column of the MDS matrix below `M[0][0]`.
    pub v: Vec<Fr>,
    /// First row of the MDS matrix right of `M[0][0]`.
    pub w: Vec<Fr>,
    /// Dense factor of the MDS matrix.
    pub m_prime: Vec<Fr>,
    /// Sparse factor of the MDS matrix.
    pub m_double_prime: Vec<Fr>,
    /// Inverse of the MDS matrix.
    pub m_inverse: Vec<Fr>,
    /// Inverse of `m_hat`.
    pub m_hat_inverse: Vec<Fr>,
    /// `M[0][0]`, shared by every sparse matrix.
    pub m_00: Fr,
    /// Dense matrix applied in the transitional round.
    pub m_i: Vec<Fr>,
    /// Sparse-matrix column vectors, `partial_rounds` rows of `t-1`.
    pub v_collection: Vec<Fr>,
    /// Sparse-matrix row vectors, `partial_rounds` rows of `t-1`.
    pub w_hat_collection: Vec<Fr>,
}

/// A complete Poseidon377 parameter set for one rate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameters {
    /// Number of absorbed inputs.
    pub rate: usize,
    /// Permutation width `t = rate + 1`.
    pub state_size: usize,
    /// Targeted security level in bits.
    pub security_level: usize,
    /// Total number of full rounds (split evenly around the partial rounds).
    pub full_rounds: usize,
    /// Number of partial rounds.
    pub partial_rounds: usize,
    /// S-box exponent.
    pub alpha: Alpha,
    /// Unoptimized round constants, one row of `t` per round.
    pub arc: Vec<Fr>,
    /// Round constants of the optimized schedule, one row of `t` per round.
    pub optimized_arc: Vec<Fr>,
    /// Dense `t x t` MDS matrix.
    pub mds: Vec<Fr>,
    /// Sparse-schedule matrices.
    pub optimized_mds: OptimizedMds,
}

impl Parameters {
    /// Total number of rounds.
    pub fn rounds(&self) -> usize {
        self.full_rounds + self.partial_rounds
    }

    /// Number of full rounds on each side of the partial rounds.
    pub fn half_full_rounds(&self) -> usize {
        self.full_rounds / 2
    }
}

/// Compiled-in parameter set, as emitted by `build.rs`.
pub(crate) struct RawParameters {
    rate: usize,
    state_size: usize,
    security_level: usize,
    full_rounds: usize,
    partial_rounds: usize,
    alpha_exponent: u64,
    alpha_inverse: bool,
    arc: &'static [Fr],
    optimized_arc: &'static [Fr],
    mds: &'static [Fr],
    m_hat: &'static [Fr],
    v: &'static [Fr],
    w: &'static [Fr],
    m_prime: &'static [Fr],
    m_double_prime: &'static [Fr],
    m_inverse: &'static [Fr],
    m_hat_inverse: &'static [Fr],
    m_i: &'static [Fr],
    v_collection: &'static [Fr],
    w_hat_collection: &'static [Fr],
    m_00: Fr,
}

impl RawParameters {
    fn to_parameters(&self) -> Parameters {
        Parameters {
            rate: self.rate,
            state_size: self.state_size,
            security_level: self.security_level,
            full_rounds: self.full_rounds,
            partial_rounds: self.partial_rounds,
            alpha: Alpha {
                exponent: self.alpha_exponent,
                inverse: self.alpha_inverse,
            },
            arc: self.arc.to_vec(),
            optimized_arc: self.optimized_arc.to_vec(),
            mds: self.mds.to_vec(),
            optimized_mds: OptimizedMds {
                m_hat: self.m_hat.to_vec(),
                v: self.v.to_vec(),
                w: self.w.to_vec(),
                m_prime: self.m_prime.to_vec(),
                m_double_prime: self.m_double_prime.to_vec(),
                m_inverse: self.m_inverse.to_vec(),
                m_hat_inverse: self.m_hat_inverse.to_vec(),
                m_00: self.m_00,
                m_i: self.m_i.to_vec(),
                v_collection: self.v_collection.to_vec(),
                w_hat_collection: self.w_hat_collection.to_vec(),
            },
        }
    }
}

// Include generated parameter tables
include!(concat!(env!("OUT_DIR"), "/params_generated.rs"));

/// All parameter sets, in ascending rate order (lazily initialized).
pub fn parameter_table() -> &'static [Parameters] {
    static TABLE: OnceLock<Vec<Parameters>> = OnceLock::new();
    TABLE.get_or_init(|| RAW_PARAMETERS.iter().map(RawParameters::to_parameters).collect())
}

/// Validation outcome for each entry of [`parameter_table`], computed once.
fn table_checks() -> &'static [PoseidonResult<()>] {
    static CHECKS: OnceLock<Vec<PoseidonResult<()>>> = OnceLock::new();
    CHECKS.get_or_init(|| {
        parameter_table()
            .iter()
            .map(|params| {
                validate(params)?;
                debug!(
                    rate = params.rate,
                    state_size = params.state_size,
                    full_rounds = params.full_rounds,
                    partial_rounds = params.partial_rounds,
                    "loaded poseidon377 parameters"
                );
                Ok(())
            })
            .collect()
    })
}

/// Look up the validated parameter set for `rate`.
///
/// Fails with `UnsupportedRate` when no set exists, `InvalidRateShape` when
/// the set's width is not `rate + 1`, and `ParameterValidationFailed` when
/// the set is malformed. Each set is validated on the first lookup only.
pub fn parameters(rate: usize) -> PoseidonResult<&'static Parameters> {
    let (params, check) = parameter_table()
        .iter()
        .zip(table_checks())
        .find(|(p, _)| p.rate == rate)
        .ok_or(PoseidonError::UnsupportedRate(rate))?;

    if params.state_size != rate + 1 {
        return Err(PoseidonError::InvalidRateShape {
            rate,
            state_size: params.state_size,
        });
    }
    check.clone()?;
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_covers_rates_1_to_7() {
        let rates: Vec<usize> = parameter_table().iter().map(|p| p.rate).collect();
        assert_eq!(rates, (1..=MAX_RATE).collect::<Vec<_>>());
    }

    #[test]
    fn test_every_set_is_valid() {
        for rate in 1..=MAX_RATE {
            let params = parameters(rate).unwrap();
            assert_eq!(params.state_size, rate + 1);
            assert_eq!(params.full_rounds, 8);
            assert_eq!(params.partial_rounds, 31);
            assert_eq!(params.security_level, 128);
            assert_eq!(
                params.alpha,
                Alpha {
                    exponent: ALPHA,
                    inverse: false
                }
            );
        }
    }

    #[test]
    fn test_validation_runs_once_per_set() {
        for rate in 1..=MAX_RATE {
            parameters(rate).unwrap();
        }
        let checks = table_checks();
        assert_eq!(checks.len(), parameter_table().len());
        assert!(checks.iter().all(Result::is_ok));
        assert!(std::ptr::eq(checks, table_checks()));
    }

    #[test]
    fn test_unsupported_rates() {
        assert_eq!(
            parameters(0).unwrap_err(),
            PoseidonError::UnsupportedRate(0)
        );
        assert_eq!(
            parameters(MAX_RATE + 1).unwrap_err(),
            PoseidonError::UnsupportedRate(8)
        );
    }

    #[test]
    fn test_table_is_shared() {
        let a = parameters(3).unwrap() as *const Parameters;
        let b = parameters(3).unwrap() as *const Parameters;
        assert_eq!(a, b);
    }

    #[test]
    fn test_first_round_constant() {
        // First entry of Penumbra's rate-1 ARC.
        let arc0 = Fr::from_montgomery_limbs([
            6258896775460530561,
            1267570262938364784,
            10583705394133388288,
            4331270346116315,
        ]);
        assert_eq!(parameters(1).unwrap().arc[0], arc0);
    }
}
