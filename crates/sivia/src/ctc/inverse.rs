//! Contractor for the preimage `f⁻¹(Y)` of a box under a black-box function.
//!
//! Model
//! - Natural test: `f(x) ∩ Y = ∅` proves `x` infeasible.
//! - Centered form: for `m = mid(x)` and `J ⊇ f'(x)`,
//!   `f(x) ⊆ f(m) + J (x - m)`, so every feasible `x` satisfies
//!   `Σ_j J_ij (x_j - m_j) ∈ Y_i - f_i(m)`; each row is used as an interval
//!   linear constraint on every coordinate.
//! - Without a usable Jacobian (absent, unbounded, or an unbounded box) only
//!   the natural test runs.

use super::{check_size, Ctc};
use crate::function::VectorFn;
use crate::interval::{is_bounded_matrix, Interval, IntervalMatrix, IntervalVector};

pub struct CtcInverse<F> {
    f: F,
    y: IntervalVector,
}

impl<F: VectorFn> CtcInverse<F> {
    pub fn new(f: F, y: IntervalVector) -> Self {
        assert_eq!(f.output_size(), y.size(), "target box does not match function output");
        Self { f, y }
    }

    pub fn function(&self) -> &F {
        &self.f
    }

    pub fn target(&self) -> &IntervalVector {
        &self.y
    }

    fn centered(&self, x: &mut IntervalVector, j: &IntervalMatrix) {
        let m = x.mid();
        let fm = self.f.eval(&IntervalVector::from_dvector(&m));
        if fm.is_empty() || fm.is_unbounded() {
            return;
        }
        let n = x.size();
        for i in 0..self.y.size() {
            let target = self.y[i] - fm[i];
            for col in 0..n {
                let a = j[(i, col)];
                if a.contains(0.0) {
                    continue;
                }
                let mut rest = Interval::zero();
                for k in (0..n).filter(|&k| k != col) {
                    rest = rest + j[(i, k)] * (x[k] - m[k]);
                }
                let d = (target - rest) / a;
                x.set(col, x[col] & (d + m[col]));
                if x.is_empty() {
                    return;
                }
            }
        }
    }
}

impl<F: VectorFn> Ctc for CtcInverse<F> {
    fn size(&self) -> usize {
        self.f.input_size()
    }

    fn contract(&self, x: &mut IntervalVector) {
        check_size(self.size(), x);
        if x.is_empty() {
            return;
        }
        let fx = self.f.eval(x);
        if !fx.intersects(&self.y) {
            x.set_empty();
            return;
        }
        if x.is_unbounded() {
            return;
        }
        let Some(j) = self.f.diff(x) else {
            return;
        };
        if j.nrows() != self.y.size() || j.ncols() != x.size() || !is_bounded_matrix(&j) {
            return;
        }
        self.centered(x, &j);
    }
}
