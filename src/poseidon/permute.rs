//! Poseidon377 permutation (optimized Penumbra schedule).
//!
//! With `rF = full_rounds / 2` the schedule is:
//!
//! 1. `rF` full rounds: add constant row, S-box on every element, dense MDS
//! 2. one transitional step: add constant row `rF`, dense mix with `M_i`
//! 3. `partial_rounds - 1` partial rounds: S-box on element 0, add the
//!    row's first constant to element 0, sparse mix
//! 4. one final partial round: S-box on element 0, sparse mix with index 0
//! 5. `rF` full rounds, continuing the constant row counter
//!
//! The sparse matrix index counts down from `partial_rounds - 1` while the
//! round counter counts up. The published tables are laid out that way and
//! reversing either order changes every digest.
//!
//! The S-box is `x^17` computed as four squarings and one multiply.

use crate::arith::{Arithmetic, Native};
use crate::error::{PoseidonError, PoseidonResult};
use crate::field::Fr;
use crate::params::{parameters, validate, Parameters};
use std::mem;
use tracing::trace;

/// The permutation for one parameter set, over one arithmetic substrate.
pub struct Permutation<'a, A: Arithmetic> {
    arith: &'a A,
    params: &'a Parameters,
}

impl<'a, A: Arithmetic> Permutation<'a, A> {
    /// Bind a validated parameter set to a substrate.
    ///
    /// # Panics
    ///
    /// Panics if `params` selects the inverse S-box. No Poseidon377 table
    /// does, so reaching this means the table itself is corrupted.
    pub fn new(arith: &'a A, params: &'a Parameters) -> PoseidonResult<Self> {
        assert!(
            !params.alpha.inverse,
            "poseidon377: inverse alpha is not supported"
        );
        validate(params)?;
        Ok(Self::from_table(arith, params))
    }

    /// Bind a set returned by [`parameters`], which validated it on first
    /// lookup.
    pub(crate) fn from_table(arith: &'a A, params: &'a Parameters) -> Self {
        Self { arith, params }
    }

    /// The parameter set this permutation runs.
    pub fn params(&self) -> &Parameters {
        self.params
    }

    /// Permute `state` in place. `state` must hold exactly `state_size` elements.
    pub fn permute(&self, state: &mut [A::Elem]) -> PoseidonResult<()> {
        self.permute_observed(state, |_| {})
    }

    /// Permute `state` in place, calling `on_round` with the state after each
    /// of the `full_rounds + partial_rounds` rounds. The transitional step is
    /// folded into the first partial round.
    pub fn permute_observed(
        &self,
        state: &mut [A::Elem],
        mut on_round: impl FnMut(&[A::Elem]),
    ) -> PoseidonResult<()> {
        let p = self.params;
        let t = p.state_size;
        if state.len() != t {
            return Err(PoseidonError::InvalidRateShape {
                rate: p.rate,
                state_size: state.len(),
            });
        }
        trace!(substrate = self.arith.name(), state_size = t, "poseidon377 permutation");

        let rf = p.half_full_rounds();
        let mut cur = state.to_vec();
        let mut next = state.to_vec();
        let mut row = 0;

        for _ in 0..rf {
            self.full_round(&mut cur, &mut next, row)?;
            mem::swap(&mut cur, &mut next);
            on_round(&cur);
            row += 1;
        }

        // Transitional step: constants then M_i, no S-box.
        self.add_row(&mut cur, row)?;
        self.dense_mix(&p.optimized_mds.m_i, &cur, &mut next)?;
        mem::swap(&mut cur, &mut next);
        row += 1;

        for r in 0..p.partial_rounds - 1 {
            cur[0] = self.sbox(&cur[0])?;
            let c = self.arith.constant(&p.optimized_arc[row * t]);
            cur[0] = self.arith.add(&cur[0], &c)?;
            self.sparse_mix(p.partial_rounds - 1 - r, &cur, &mut next)?;
            mem::swap(&mut cur, &mut next);
            on_round(&cur);
            row += 1;
        }

        cur[0] = self.sbox(&cur[0])?;
        self.sparse_mix(0, &cur, &mut next)?;
        mem::swap(&mut cur, &mut next);
        on_round(&cur);

        for _ in 0..rf {
            self.full_round(&mut cur, &mut next, row)?;
            mem::swap(&mut cur, &mut next);
            on_round(&cur);
            row += 1;
        }

        state.clone_from_slice(&cur);
        Ok(())
    }

    /// Constants, S-box on every element, dense MDS. Result lands in `next`.
    fn full_round(&self, cur: &mut [A::Elem], next: &mut [A::Elem], row: usize) -> PoseidonResult<()> {
        self.add_row(cur, row)?;
        for x in cur.iter_mut() {
            *x = self.sbox(x)?;
        }
        self.dense_mix(&self.params.mds, cur, next)
    }

    fn sbox(&self, x: &A::Elem) -> PoseidonResult<A::Elem> {
        let a = self.arith;
        let x2 = a.mul(x, x)?;
        let x4 = a.mul(&x2, &x2)?;
        let x8 = a.mul(&x4, &x4)?;
        let x16 = a.mul(&x8, &x8)?;
        a.mul(&x16, x)
    }

    fn add_row(&self, state: &mut [A::Elem], row: usize) -> PoseidonResult<()> {
        let t = self.params.state_size;
        let constants = &self.params.optimized_arc[row * t..(row + 1) * t];
        for (x, c) in state.iter_mut().zip(constants) {
            *x = self.arith.add(x, &self.arith.constant(c))?;
        }
        Ok(())
    }

    /// `dst[i] = sum_j matrix[i][j] * src[j]`.
    fn dense_mix(&self, matrix: &[Fr], src: &[A::Elem], dst: &mut [A::Elem]) -> PoseidonResult<()> {
        let t = src.len();
        for (out, row) in dst.iter_mut().zip(matrix.chunks_exact(t)) {
            *out = self.arith.inner_product(row, src)?;
        }
        Ok(())
    }

    /// Sparse matrix `k`:
    ///
    /// ```text
    /// dst[0]   = M00 * src[0] + sum_i w_hat[i] * src[i+1]
    /// dst[i+1] = v[i] * src[0] + src[i+1]
    /// ```
    fn sparse_mix(&self, k: usize, src: &[A::Elem], dst: &mut [A::Elem]) -> PoseidonResult<()> {
        let a = self.arith;
        let opt = &self.params.optimized_mds;
        let sub = src.len() - 1;
        let v = &opt.v_collection[k * sub..(k + 1) * sub];
        let w_hat = &opt.w_hat_collection[k * sub..(k + 1) * sub];

        let first_row: Vec<Fr> = std::iter::once(opt.m_00).chain(w_hat.iter().copied()).collect();
        dst[0] = a.inner_product(&first_row, src)?;

        for (i, vi) in v.iter().enumerate() {
            dst[i + 1] = a.add(&a.mul_constant(vi, &src[0])?, &src[i + 1])?;
        }
        Ok(())
    }
}

/// Run the native permutation for a `state.len() - 1` rate parameter set.
pub fn permute(state: &[Fr]) -> PoseidonResult<Vec<Fr>> {
    let rate = state.len().saturating_sub(1);
    let params = parameters(rate)?;
    let mut out = state.to_vec();
    Permutation::from_table(&Native, params).permute(&mut out)?;
    Ok(out)
}

/// Native permutation with trace output for debugging.
///
/// Returns `(final_state, round_traces)` where each trace entry is the state
/// after that round.
pub fn permute_with_trace(state: &[Fr]) -> PoseidonResult<(Vec<Fr>, Vec<Vec<Fr>>)> {
    let rate = state.len().saturating_sub(1);
    let params = parameters(rate)?;
    let mut out = state.to_vec();
    let mut traces = Vec::with_capacity(params.rounds());
    Permutation::from_table(&Native, params).permute_observed(&mut out, |s| traces.push(s.to_vec()))?;
    Ok((out, traces))
}
