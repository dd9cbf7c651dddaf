//! Hyperoctahedral symmetries: signed permutations of coordinates.
//!
//! `OctaSym(s)` maps `x` to `y` with `y[i] = sign(s[i]) · x[|s[i]| - 1]`.
//! Entries are 1-based so that the sign of every entry is meaningful.

use std::fmt;

use nalgebra::{DMatrix, DVector};
use thiserror::Error;

use crate::interval::IntervalVector;

/// Invalid signed permutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// Entry `0` has no sign and no target coordinate.
    #[error("entry {index} is zero")]
    ZeroEntry { index: usize },
    /// `|s[i]|` exceeds the dimension.
    #[error("entry {index} = {value} is out of range for dimension {dim}")]
    OutOfRange { index: usize, value: i32, dim: usize },
    /// Two entries address the same coordinate.
    #[error("coordinate {coord} is used twice")]
    Duplicate { coord: usize },
}

/// Signed permutation of `n` coordinates.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OctaSym {
    s: Vec<i32>,
}

impl OctaSym {
    /// Validates that `|s|` is a permutation of `1..=n`.
    pub fn new(s: Vec<i32>) -> Result<Self, ActionError> {
        let n = s.len();
        let mut seen = vec![false; n];
        for (index, &value) in s.iter().enumerate() {
            if value == 0 {
                return Err(ActionError::ZeroEntry { index });
            }
            let coord = value.unsigned_abs() as usize;
            if coord > n {
                return Err(ActionError::OutOfRange {
                    index,
                    value,
                    dim: n,
                });
            }
            if std::mem::replace(&mut seen[coord - 1], true) {
                return Err(ActionError::Duplicate { coord });
            }
        }
        Ok(Self { s })
    }

    /// The identity on `n` coordinates.
    pub fn identity(n: usize) -> Self {
        Self {
            s: (1..=n as i32).collect(),
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.s.len()
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.s
    }

    #[inline]
    fn source(&self, i: usize) -> (usize, bool) {
        let e = self.s[i];
        (e.unsigned_abs() as usize - 1, e < 0)
    }

    pub fn invert(&self) -> Self {
        let mut inv = vec![0; self.size()];
        for (i, &e) in self.s.iter().enumerate() {
            inv[e.unsigned_abs() as usize - 1] = e.signum() * (i as i32 + 1);
        }
        Self { s: inv }
    }

    /// Composition: `(self * other)(x) == self(other(x))`.
    pub fn compose(&self, other: &OctaSym) -> Self {
        assert_eq!(self.size(), other.size(), "symmetry dimension mismatch");
        let s = (0..self.size())
            .map(|i| {
                let (j, neg) = self.source(i);
                if neg {
                    -other.s[j]
                } else {
                    other.s[j]
                }
            })
            .collect();
        Self { s }
    }

    /// Signed permutation matrix `P` with `P · x == self(x)`.
    pub fn permutation_matrix(&self) -> DMatrix<f64> {
        let n = self.size();
        let mut m = DMatrix::zeros(n, n);
        for i in 0..n {
            let (j, neg) = self.source(i);
            m[(i, j)] = if neg { -1.0 } else { 1.0 };
        }
        m
    }

    pub fn apply(&self, x: &IntervalVector) -> IntervalVector {
        assert_eq!(self.size(), x.size(), "symmetry dimension mismatch");
        if x.is_empty() {
            return x.clone();
        }
        (0..self.size())
            .map(|i| {
                let (j, neg) = self.source(i);
                if neg {
                    -x[j]
                } else {
                    x[j]
                }
            })
            .collect()
    }

    pub fn apply_point(&self, x: &DVector<f64>) -> DVector<f64> {
        assert_eq!(self.size(), x.len(), "symmetry dimension mismatch");
        DVector::from_iterator(
            self.size(),
            (0..self.size()).map(|i| {
                let (j, neg) = self.source(i);
                if neg {
                    -x[j]
                } else {
                    x[j]
                }
            }),
        )
    }
}

impl std::ops::Mul for &OctaSym {
    type Output = OctaSym;
    fn mul(self, rhs: &OctaSym) -> OctaSym {
        self.compose(rhs)
    }
}

impl fmt::Display for OctaSym {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, e) in self.s.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{e}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(s: &[i32]) -> OctaSym {
        OctaSym::new(s.to_vec()).unwrap()
    }

    #[test]
    fn invert_and_apply() {
        let a = sym(&[-2, 1]);
        assert_eq!(a.invert(), sym(&[2, -1]));
        let x = IntervalVector::from_bounds(&[(-1.0, 1.0), (5.0, 6.0)]);
        assert_eq!(a.apply(&x), IntervalVector::from_bounds(&[(-6.0, -5.0), (-1.0, 1.0)]));
        assert_eq!(a.invert().apply(&a.apply(&x)), x);
    }

    #[test]
    fn composition() {
        let b = sym(&[2, -1]);
        assert_eq!(b.invert(), sym(&[-2, 1]));
        assert_eq!(&b * &b, sym(&[-1, -2]));
        let x = IntervalVector::from_bounds(&[(1.0, 2.0), (3.0, 4.0)]);
        assert_eq!((&b * &b).apply(&x), b.apply(&b.apply(&x)));
        assert_eq!(&b * &b.invert(), OctaSym::identity(2));
    }

    #[test]
    fn permutation_matrix_matches_action() {
        let c = sym(&[-2, 1, 3]);
        let expected =
            DMatrix::from_row_slice(3, 3, &[0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
        assert_eq!(c.permutation_matrix(), expected);
        let p = DVector::from_vec(vec![1.0, 2.0, 3.0]);
        assert_eq!(c.permutation_matrix() * &p, c.apply_point(&p));
    }

    #[test]
    fn rejects_invalid_entries() {
        assert_eq!(OctaSym::new(vec![0, 1]), Err(ActionError::ZeroEntry { index: 0 }));
        assert!(matches!(
            OctaSym::new(vec![1, 3]),
            Err(ActionError::OutOfRange { index: 1, .. })
        ));
        assert_eq!(
            OctaSym::new(vec![1, -1]),
            Err(ActionError::Duplicate { coord: 1 })
        );
    }

    #[test]
    fn empty_box_stays_empty() {
        let a = sym(&[3, 1, -2]);
        assert!(a.apply(&IntervalVector::empty(3)).is_empty());
        assert_eq!(a.apply(&IntervalVector::new(3)), IntervalVector::new(3));
    }
}
