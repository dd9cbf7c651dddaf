//! Half-spaces `row · x <= rhs` in Rⁿ.

use nalgebra::DVector;

use crate::interval::{dot, dot_point, Interval, IntervalVector};

/// Closed half-space `row · x <= rhs`.
///
/// Invariants:
/// - `row` is not normalized unless built through [`Facet::normalized`].
/// - Membership of real points uses `<= rhs + tol`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Facet {
    pub row: DVector<f64>,
    pub rhs: f64,
}

impl Facet {
    #[inline]
    pub fn new(row: DVector<f64>, rhs: f64) -> Self {
        Self { row, rhs }
    }

    /// `e_i · x <= ub` (`upper`) or `-e_i · x <= -lb`.
    pub fn axis(dim: usize, i: usize, upper: bool, bound: f64) -> Self {
        let mut row = DVector::zeros(dim);
        if upper {
            row[i] = 1.0;
            Self { row, rhs: bound }
        } else {
            row[i] = -1.0;
            Self { row, rhs: -bound }
        }
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.row.len()
    }

    pub fn is_finite(&self) -> bool {
        self.rhs.is_finite() && self.row.iter().all(|a| a.is_finite())
    }

    pub fn is_zero_row(&self) -> bool {
        self.row.iter().all(|&a| a == 0.0)
    }

    /// Enclosure of `row · x - rhs` over a box.
    pub fn eval_box(&self, x: &IntervalVector) -> Interval {
        dot(&self.row, x) - Interval::point(self.rhs)
    }

    /// Enclosure of `row · p - rhs` at a point.
    pub fn eval_point(&self, p: &DVector<f64>) -> Interval {
        dot_point(&self.row, p) - Interval::point(self.rhs)
    }

    #[inline]
    pub fn satisfies(&self, p: &DVector<f64>, tol: f64) -> bool {
        self.row.dot(p) <= self.rhs + tol
    }

    /// Reversed inequality `-row · x <= -rhs` (the closed complement).
    pub fn reversed(&self) -> Self {
        Self {
            row: -&self.row,
            rhs: -self.rhs,
        }
    }

    /// Rescales so that `max |row_i|` lies in `[1, 2)`.
    ///
    /// Scaling is by a power of two, so the represented half-space is
    /// unchanged bit for bit.
    pub fn normalized(&self) -> Self {
        let m = self.row.amax();
        if m == 0.0 || !m.is_finite() {
            return self.clone();
        }
        let scale = (-(m.log2().floor())).exp2();
        Self {
            row: &self.row * scale,
            rhs: self.rhs * scale,
        }
    }

    /// Upper bound of `‖row‖₁`.
    pub fn row_norm1(&self) -> f64 {
        self.row
            .iter()
            .fold(Interval::zero(), |acc, a| acc + Interval::point(a.abs()))
            .ub()
    }
}
