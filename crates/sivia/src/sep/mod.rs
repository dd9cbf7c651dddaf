//! Separators: split a box into a part that may be outside the set and a
//! part that may be inside it.
//!
//! Convention
//! - `separate(x)` returns [`BoxPair`] `{ inner, outer }` with both boxes in
//!   `x`. Points of `x \ inner` are certainly inside the set; points of
//!   `x \ outer` are certainly outside.
//! - Every point of `x` lies in `inner` or in `outer`; their intersection is
//!   the undetermined part.
//! - `inner` empty: `x` is inside. `outer` empty: `x` is outside.

mod action;
mod boundary;
mod inverse;
mod polytope;
mod qinter;
mod transform;

#[cfg(test)]
mod tests;

pub use action::SepAction;
pub use boundary::SepBoundary;
pub use inverse::SepInverse;
pub use polytope::SepPolytope;
pub use qinter::SepQInter;
pub use transform::SepTransform;

use std::sync::Arc;

use crate::ctc::{check_size, Ctc};
use crate::interval::{hull_all, IntervalVector};

/// Result of a separator call.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoxPair {
    pub inner: IntervalVector,
    pub outer: IntervalVector,
}

impl BoxPair {
    pub fn new(inner: IntervalVector, outer: IntervalVector) -> Self {
        assert_eq!(inner.size(), outer.size(), "box pair dimension mismatch");
        Self { inner, outer }
    }

    /// `x` certainly inside the set.
    pub fn is_inside(&self) -> bool {
        self.inner.is_empty()
    }

    /// `x` certainly outside the set.
    pub fn is_outside(&self) -> bool {
        self.outer.is_empty()
    }

    /// Part of the box left undetermined.
    pub fn boundary(&self) -> IntervalVector {
        &self.inner & &self.outer
    }

    /// The pair for the complement of the set.
    pub fn swapped(self) -> Self {
        Self {
            inner: self.outer,
            outer: self.inner,
        }
    }
}

pub trait Sep {
    fn size(&self) -> usize;
    fn separate(&self, x: &IntervalVector) -> BoxPair;
}

impl<S: Sep + ?Sized> Sep for &S {
    fn size(&self) -> usize {
        (**self).size()
    }
    fn separate(&self, x: &IntervalVector) -> BoxPair {
        (**self).separate(x)
    }
}

impl<S: Sep + ?Sized> Sep for Box<S> {
    fn size(&self) -> usize {
        (**self).size()
    }
    fn separate(&self, x: &IntervalVector) -> BoxPair {
        (**self).separate(x)
    }
}

impl<S: Sep + ?Sized> Sep for Arc<S> {
    fn size(&self) -> usize {
        (**self).size()
    }
    fn separate(&self, x: &IntervalVector) -> BoxPair {
        (**self).separate(x)
    }
}

/// Separator for a fixed box `y`.
#[derive(Clone, Debug)]
pub struct SepWrapper {
    y: IntervalVector,
}

impl SepWrapper {
    pub fn new(y: IntervalVector) -> Self {
        Self { y }
    }
}

impl Sep for SepWrapper {
    fn size(&self) -> usize {
        self.y.size()
    }
    fn separate(&self, x: &IntervalVector) -> BoxPair {
        check_size(self.y.size(), x);
        let outer = x & &self.y;
        let inner = hull_all(x.size(), &x.diff(&self.y));
        BoxPair { inner, outer }
    }
}

/// Separator from two contractors: `ctc_in` for the complement of the set
/// and `ctc_out` for the set itself.
pub struct SepCtcPair<A, B> {
    ctc_in: A,
    ctc_out: B,
}

impl<A: Ctc, B: Ctc> SepCtcPair<A, B> {
    pub fn new(ctc_in: A, ctc_out: B) -> Self {
        assert_eq!(ctc_in.size(), ctc_out.size(), "contractor pair differs in dimension");
        Self { ctc_in, ctc_out }
    }
}

impl<A: Ctc, B: Ctc> Sep for SepCtcPair<A, B> {
    fn size(&self) -> usize {
        self.ctc_in.size()
    }
    fn separate(&self, x: &IntervalVector) -> BoxPair {
        check_size(self.size(), x);
        let mut inner = x.clone();
        let mut outer = x.clone();
        self.ctc_in.contract(&mut inner);
        self.ctc_out.contract(&mut outer);
        BoxPair { inner, outer }
    }
}

/// Separator for `S_a ∩ S_b`.
pub struct SepInter<A, B> {
    a: A,
    b: B,
}

impl<A: Sep, B: Sep> SepInter<A, B> {
    pub fn new(a: A, b: B) -> Self {
        assert_eq!(a.size(), b.size(), "intersected separators differ in dimension");
        Self { a, b }
    }
}

impl<A: Sep, B: Sep> Sep for SepInter<A, B> {
    fn size(&self) -> usize {
        self.a.size()
    }
    fn separate(&self, x: &IntervalVector) -> BoxPair {
        check_size(self.size(), x);
        let p = self.a.separate(x);
        let q = self.b.separate(x);
        BoxPair {
            inner: &p.inner | &q.inner,
            outer: &p.outer & &q.outer,
        }
    }
}

/// Separator for `S_a ∪ S_b`.
pub struct SepUnion<A, B> {
    a: A,
    b: B,
}

impl<A: Sep, B: Sep> SepUnion<A, B> {
    pub fn new(a: A, b: B) -> Self {
        assert_eq!(a.size(), b.size(), "united separators differ in dimension");
        Self { a, b }
    }
}

impl<A: Sep, B: Sep> Sep for SepUnion<A, B> {
    fn size(&self) -> usize {
        self.a.size()
    }
    fn separate(&self, x: &IntervalVector) -> BoxPair {
        check_size(self.size(), x);
        let p = self.a.separate(x);
        let q = self.b.separate(x);
        BoxPair {
            inner: &p.inner & &q.inner,
            outer: &p.outer | &q.outer,
        }
    }
}

/// Separator for the complement.
pub struct SepNot<S> {
    s: S,
}

impl<S: Sep> SepNot<S> {
    pub fn new(s: S) -> Self {
        Self { s }
    }
}

impl<S: Sep> Sep for SepNot<S> {
    fn size(&self) -> usize {
        self.s.size()
    }
    fn separate(&self, x: &IntervalVector) -> BoxPair {
        self.s.separate(x).swapped()
    }
}

/// Combinator syntax: `s1.and(s2)`, `s1.or(s2)`, `s.not()`.
pub trait SepExt: Sep + Sized {
    fn and<B: Sep>(self, other: B) -> SepInter<Self, B> {
        SepInter::new(self, other)
    }
    fn or<B: Sep>(self, other: B) -> SepUnion<Self, B> {
        SepUnion::new(self, other)
    }
    fn not(self) -> SepNot<Self> {
        SepNot::new(self)
    }
}

impl<S: Sep> SepExt for S {}
