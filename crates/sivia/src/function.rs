//! Black-box vector functions `Rⁿ → Rᵐ` evaluated over boxes.
//!
//! The crate does not build or differentiate expressions itself; callers
//! provide an inclusion function (and optionally a Jacobian enclosure) through
//! [`VectorFn`].

use std::sync::Arc;

use nalgebra::{DMatrix, DVector};

use crate::interval::{imatrix, mat_vec, Interval, IntervalMatrix, IntervalVector};

/// Inclusion function of `f: Rⁿ → Rᵐ`.
///
/// Invariants expected from implementors:
/// - `eval(x) ⊇ { f(p) : p ∈ x }`, and `eval` of an empty box is empty.
/// - `diff(x)`, when provided, encloses the Jacobian over `x` (`m × n`).
pub trait VectorFn {
    fn input_size(&self) -> usize;
    fn output_size(&self) -> usize;
    fn eval(&self, x: &IntervalVector) -> IntervalVector;
    /// Jacobian enclosure; `None` when unavailable.
    fn diff(&self, _x: &IntervalVector) -> Option<IntervalMatrix> {
        None
    }
}

impl<F: VectorFn + ?Sized> VectorFn for &F {
    fn input_size(&self) -> usize {
        (**self).input_size()
    }
    fn output_size(&self) -> usize {
        (**self).output_size()
    }
    fn eval(&self, x: &IntervalVector) -> IntervalVector {
        (**self).eval(x)
    }
    fn diff(&self, x: &IntervalVector) -> Option<IntervalMatrix> {
        (**self).diff(x)
    }
}

impl<F: VectorFn + ?Sized> VectorFn for Arc<F> {
    fn input_size(&self) -> usize {
        (**self).input_size()
    }
    fn output_size(&self) -> usize {
        (**self).output_size()
    }
    fn eval(&self, x: &IntervalVector) -> IntervalVector {
        (**self).eval(x)
    }
    fn diff(&self, x: &IntervalVector) -> Option<IntervalMatrix> {
        (**self).diff(x)
    }
}

type JacobianFn = Box<dyn Fn(&IntervalVector) -> IntervalMatrix + Send + Sync>;

/// [`VectorFn`] from closures.
///
/// ```
/// use sivia::prelude::*;
/// let sq = ClosureFn::new(2, 1, |x: &IntervalVector| {
///     IntervalVector::from_intervals(vec![x[0].sqr() + x[1].sqr()])
/// });
/// let y = sq.eval(&IntervalVector::from_bounds(&[(1.0, 2.0), (0.0, 1.0)]));
/// assert_eq!(y[0], Interval::new(1.0, 5.0));
/// ```
pub struct ClosureFn<E> {
    n: usize,
    m: usize,
    eval: E,
    jacobian: Option<JacobianFn>,
}

impl<E> ClosureFn<E>
where
    E: Fn(&IntervalVector) -> IntervalVector,
{
    pub fn new(n: usize, m: usize, eval: E) -> Self {
        Self {
            n,
            m,
            eval,
            jacobian: None,
        }
    }

    /// Attaches a Jacobian enclosure (`m × n`).
    pub fn with_jacobian<J>(mut self, jacobian: J) -> Self
    where
        J: Fn(&IntervalVector) -> IntervalMatrix + Send + Sync + 'static,
    {
        self.jacobian = Some(Box::new(jacobian));
        self
    }
}

impl<E> VectorFn for ClosureFn<E>
where
    E: Fn(&IntervalVector) -> IntervalVector,
{
    fn input_size(&self) -> usize {
        self.n
    }
    fn output_size(&self) -> usize {
        self.m
    }
    fn eval(&self, x: &IntervalVector) -> IntervalVector {
        assert_eq!(x.size(), self.n, "function input dimension mismatch");
        if x.is_empty() {
            return IntervalVector::empty(self.m);
        }
        let y = (self.eval)(x);
        assert_eq!(y.size(), self.m, "function output dimension mismatch");
        y
    }
    fn diff(&self, x: &IntervalVector) -> Option<IntervalMatrix> {
        let jacobian = self.jacobian.as_ref()?;
        let j = jacobian(x);
        assert_eq!(j.shape(), (self.m, self.n), "jacobian shape mismatch");
        Some(j)
    }
}

/// Affine map `x ↦ M x + t` in Rⁿ → Rᵐ.
#[derive(Clone, Debug, PartialEq)]
pub struct AffineMap {
    pub m: DMatrix<f64>,
    pub t: DVector<f64>,
}

impl AffineMap {
    pub fn new(m: DMatrix<f64>, t: DVector<f64>) -> Self {
        assert_eq!(m.nrows(), t.len(), "affine map shape mismatch");
        Self { m, t }
    }

    pub fn identity(n: usize) -> Self {
        Self {
            m: DMatrix::identity(n, n),
            t: DVector::zeros(n),
        }
    }

    /// Linear map (zero translation).
    pub fn linear(m: DMatrix<f64>) -> Self {
        let t = DVector::zeros(m.nrows());
        Self { m, t }
    }

    /// `x ↦ x + t`.
    pub fn translation(t: DVector<f64>) -> Self {
        Self {
            m: DMatrix::identity(t.len(), t.len()),
            t,
        }
    }

    /// Floating-point inverse; `None` if `M` is not square or singular.
    pub fn inverse(&self) -> Option<Self> {
        if !self.m.is_square() {
            return None;
        }
        self.m.clone().try_inverse().map(|minv| {
            let t = -(&minv * &self.t);
            Self { m: minv, t }
        })
    }

    /// `self ∘ other`.
    pub fn compose(&self, other: &AffineMap) -> Self {
        Self {
            m: &self.m * &other.m,
            t: &self.m * &other.t + &self.t,
        }
    }

    pub fn apply_point(&self, p: &DVector<f64>) -> DVector<f64> {
        &self.m * p + &self.t
    }
}

impl VectorFn for AffineMap {
    fn input_size(&self) -> usize {
        self.m.ncols()
    }
    fn output_size(&self) -> usize {
        self.m.nrows()
    }
    fn eval(&self, x: &IntervalVector) -> IntervalVector {
        let y = mat_vec(&imatrix(&self.m), x);
        if y.is_empty() {
            return y;
        }
        y.iter()
            .zip(self.t.iter())
            .map(|(yi, &ti)| *yi + Interval::point(ti))
            .collect()
    }
    fn diff(&self, _x: &IntervalVector) -> Option<IntervalMatrix> {
        Some(imatrix(&self.m))
    }
}
