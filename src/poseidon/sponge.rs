//! Single-permutation sponge hash.
//!
//! The state is `[domain, inputs...]` with one permutation and no padding:
//! the number of inputs selects the parameter set, and the digest is the
//! element right after the domain slot.

use super::permute::Permutation;
use crate::arith::{Arithmetic, Native};
use crate::error::{PoseidonError, PoseidonResult};
use crate::field::Fr;
use crate::params::{parameters, MAX_RATE};

/// Hash 1..=7 substrate elements under `domain`.
///
/// The digest is passed through [`Arithmetic::reduce`], so emulated digests
/// come back in canonical form.
pub fn hash_with<A: Arithmetic>(
    arith: &A,
    domain: &A::Elem,
    inputs: &[A::Elem],
) -> PoseidonResult<A::Elem> {
    let rate = inputs.len();
    if rate == 0 || rate > MAX_RATE {
        return Err(PoseidonError::UnsupportedRate(rate));
    }
    let params = parameters(rate)?;

    let mut state = Vec::with_capacity(params.state_size);
    state.push(domain.clone());
    state.extend_from_slice(inputs);

    Permutation::from_table(arith, params).permute(&mut state)?;
    arith.reduce(&state[1])
}

/// Hash 1..=7 field elements under `domain`.
pub fn hash(domain: Fr, inputs: &[Fr]) -> PoseidonResult<Fr> {
    hash_with(&Native, &domain, inputs)
}

/// Hash one element.
pub fn hash_1(domain: Fr, a: Fr) -> PoseidonResult<Fr> {
    hash(domain, &[a])
}

/// Hash two elements.
pub fn hash_2(domain: Fr, a: Fr, b: Fr) -> PoseidonResult<Fr> {
    hash(domain, &[a, b])
}

/// Hash three elements.
pub fn hash_3(domain: Fr, a: Fr, b: Fr, c: Fr) -> PoseidonResult<Fr> {
    hash(domain, &[a, b, c])
}

/// Hash four elements.
pub fn hash_4(domain: Fr, a: Fr, b: Fr, c: Fr, d: Fr) -> PoseidonResult<Fr> {
    hash(domain, &[a, b, c, d])
}

/// Hash five elements.
pub fn hash_5(domain: Fr, a: Fr, b: Fr, c: Fr, d: Fr, e: Fr) -> PoseidonResult<Fr> {
    hash(domain, &[a, b, c, d, e])
}

/// Hash six elements.
pub fn hash_6(domain: Fr, a: Fr, b: Fr, c: Fr, d: Fr, e: Fr, f: Fr) -> PoseidonResult<Fr> {
    hash(domain, &[a, b, c, d, e, f])
}

/// Hash seven elements.
#[allow(clippy::too_many_arguments)]
pub fn hash_7(domain: Fr, a: Fr, b: Fr, c: Fr, d: Fr, e: Fr, f: Fr, g: Fr) -> PoseidonResult<Fr> {
    hash(domain, &[a, b, c, d, e, f, g])
}
