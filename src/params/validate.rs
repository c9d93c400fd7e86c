//! Structural validation of parameter sets.
//!
//! Runs once per lookup, before any arithmetic, so a malformed table fails
//! fast instead of producing a wrong digest.

use super::{Parameters, ALPHA};
use crate::error::{PoseidonError, PoseidonResult};
use tracing::warn;

fn fail(reason: String) -> PoseidonResult<()> {
    warn!(%reason, "rejecting poseidon377 parameter set");
    Err(PoseidonError::ParameterValidationFailed(reason))
}

fn check_len(name: &str, got: usize, want: usize) -> PoseidonResult<()> {
    if got != want {
        return fail(format!("{} has length {}, expected {}", name, got, want));
    }
    Ok(())
}

/// Check that every table in `params` has the shape the permutation reads.
///
/// Rejects an odd number of full rounds, a schedule without partial rounds,
/// any mis-sized constant array or matrix, an exponent other than 17, and
/// the inverse S-box.
pub fn validate(params: &Parameters) -> PoseidonResult<()> {
    if params.alpha.inverse {
        return fail("inverse alpha is not supported".to_string());
    }
    if params.alpha.exponent != ALPHA {
        return fail(format!(
            "alpha exponent {} is not supported, expected {}",
            params.alpha.exponent, ALPHA
        ));
    }
    if params.full_rounds % 2 != 0 {
        return fail(format!("full rounds {} must be even", params.full_rounds));
    }
    if params.partial_rounds == 0 {
        return fail("at least one partial round is required".to_string());
    }
    if params.state_size < 2 {
        return fail(format!(
            "state size {} leaves no room for inputs",
            params.state_size
        ));
    }

    let t = params.state_size;
    let sub = t - 1;
    let rounds = params.rounds();
    let opt = &params.optimized_mds;

    check_len("arc", params.arc.len(), rounds * t)?;
    check_len("optimized_arc", params.optimized_arc.len(), rounds * t)?;
    check_len("mds", params.mds.len(), t * t)?;
    check_len("m_i", opt.m_i.len(), t * t)?;
    check_len("m_prime", opt.m_prime.len(), t * t)?;
    check_len("m_double_prime", opt.m_double_prime.len(), t * t)?;
    check_len("m_inverse", opt.m_inverse.len(), t * t)?;
    check_len("m_hat", opt.m_hat.len(), sub * sub)?;
    check_len("m_hat_inverse", opt.m_hat_inverse.len(), sub * sub)?;
    check_len("v", opt.v.len(), sub)?;
    check_len("w", opt.w.len(), sub)?;
    check_len(
        "v_collection",
        opt.v_collection.len(),
        params.partial_rounds * sub,
    )?;
    check_len(
        "w_hat_collection",
        opt.w_hat_collection.len(),
        params.partial_rounds * sub,
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::parameters;

    fn reason(params: &Parameters) -> String {
        match validate(params) {
            Err(PoseidonError::ParameterValidationFailed(reason)) => reason,
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_accepts_shipped_sets() {
        for rate in 1..=7 {
            assert!(validate(parameters(rate).unwrap()).is_ok());
        }
    }

    #[test]
    fn test_rejects_odd_full_rounds() {
        let mut params = parameters(2).unwrap().clone();
        params.full_rounds = 7;
        assert!(reason(&params).contains("even"));
    }

    #[test]
    fn test_rejects_inverse_alpha() {
        let mut params = parameters(2).unwrap().clone();
        params.alpha.inverse = true;
        assert!(reason(&params).contains("inverse"));
    }

    #[test]
    fn test_rejects_other_exponent() {
        let mut params = parameters(2).unwrap().clone();
        params.alpha.exponent = 5;
        assert!(reason(&params).contains("exponent"));
    }

    #[test]
    fn test_rejects_short_sparse_vectors() {
        let mut params = parameters(4).unwrap().clone();
        params.optimized_mds.w_hat_collection.pop();
        assert!(reason(&params).contains("w_hat_collection"));
    }

    #[test]
    fn test_rejects_missing_partial_rounds() {
        let mut params = parameters(3).unwrap().clone();
        params.partial_rounds = 0;
        assert!(reason(&params).contains("partial round"));
    }

    #[test]
    fn test_rejects_degenerate_state() {
        let mut params = parameters(1).unwrap().clone();
        params.state_size = 1;
        assert!(reason(&params).contains("state size"));
    }
}
