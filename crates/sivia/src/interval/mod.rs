//! Interval primitives: scalars, boxes, four-valued booleans and interval
//! matrices.
//!
//! Arithmetic rounds outward: every result encloses the exact real result,
//! and results that are exact in floating point are not widened.

mod boolean;
mod round;
mod scalar;
mod vector;


pub use boolean::BoolInterval;
pub use scalar::Interval;
pub use vector::{hull_all, IntervalVector};

use nalgebra::{DMatrix, DVector};

/// Interval matrix, e.g. a Jacobian enclosure.
pub type IntervalMatrix = DMatrix<Interval>;

/// Degenerate interval matrix `{m}`.
pub fn imatrix(m: &DMatrix<f64>) -> IntervalMatrix {
    m.map(Interval::point)
}

/// Enclosure of `m · x`.
pub fn mat_vec(m: &IntervalMatrix, x: &IntervalVector) -> IntervalVector {
    assert_eq!(m.ncols(), x.size(), "matrix/box dimension mismatch");
    if x.is_empty() {
        return IntervalVector::empty(m.nrows());
    }
    (0..m.nrows())
        .map(|i| {
            (0..m.ncols()).fold(Interval::zero(), |acc, j| acc + m[(i, j)] * x[j])
        })
        .collect()
}

/// Enclosure of `row · x` for a real row.
pub fn dot(row: &DVector<f64>, x: &IntervalVector) -> Interval {
    assert_eq!(row.len(), x.size(), "row/box dimension mismatch");
    if x.is_empty() {
        return Interval::empty();
    }
    row.iter()
        .zip(x.iter())
        .fold(Interval::zero(), |acc, (&a, xi)| acc + a * *xi)
}

/// Enclosure of `row · p` for a real row and a real point.
pub fn dot_point(row: &DVector<f64>, p: &DVector<f64>) -> Interval {
    row.iter()
        .zip(p.iter())
        .fold(Interval::zero(), |acc, (&a, &b)| acc + Interval::point(a) * b)
}

/// Returns `true` when every entry of `m` is bounded and non-empty.
pub fn is_bounded_matrix(m: &IntervalMatrix) -> bool {
    m.iter().all(|e| !e.is_empty() && !e.is_unbounded())
}
