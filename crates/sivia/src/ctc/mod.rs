//! Contractors: operators narrowing a box without losing feasible points.
//!
//! Model
//! - A contractor `C` for a set `S` maps a box `x` to `C(x) ⊆ x` with
//!   `x ∩ S ⊆ C(x)`. Contraction happens in place.
//! - Composite contractors own their children; `&C`, `Box<C>` and `Arc<C>`
//!   are contractors too, so shared or borrowed children work the same way.
//! - Feeding a box of the wrong dimension panics.
//!
//! Building blocks
//! - [`CtcWrapper`], [`CtcInter`], [`CtcUnion`] and their n-ary forms.
//! - [`CtcQInter`] (q-relaxed intersection), [`CtcBoundary`] (contractor
//!   refined by a point test), [`CtcPolytope`], [`CtcInverse`], [`CtcAction`].

mod action;
mod boundary;
mod inverse;
mod polytope;
mod qinter;

#[cfg(test)]
mod tests;

pub use action::CtcAction;
pub(crate) use boundary::{classify, sampler};
pub use boundary::{BoundaryCfg, CtcBoundary};
pub use inverse::CtcInverse;
pub(crate) use polytope::contract_facet;
pub use polytope::{CtcPolytope, CtcPolytopeCfg};
pub use qinter::{qinter, CtcQInter};

use std::sync::Arc;

use crate::interval::{hull_all, IntervalVector};

pub trait Ctc {
    /// Dimension of the boxes this contractor accepts.
    fn size(&self) -> usize;
    fn contract(&self, x: &mut IntervalVector);
}

impl<C: Ctc + ?Sized> Ctc for &C {
    fn size(&self) -> usize {
        (**self).size()
    }
    fn contract(&self, x: &mut IntervalVector) {
        (**self).contract(x)
    }
}

impl<C: Ctc + ?Sized> Ctc for Box<C> {
    fn size(&self) -> usize {
        (**self).size()
    }
    fn contract(&self, x: &mut IntervalVector) {
        (**self).contract(x)
    }
}

impl<C: Ctc + ?Sized> Ctc for Arc<C> {
    fn size(&self) -> usize {
        (**self).size()
    }
    fn contract(&self, x: &mut IntervalVector) {
        (**self).contract(x)
    }
}

#[inline]
pub(crate) fn check_size(expected: usize, x: &IntervalVector) {
    assert_eq!(
        x.size(),
        expected,
        "box dimension {} does not match operator dimension {}",
        x.size(),
        expected
    );
}

/// Contracts toward a fixed box: `x ↦ x ∩ y`.
#[derive(Clone, Debug)]
pub struct CtcWrapper {
    y: IntervalVector,
}

impl CtcWrapper {
    pub fn new(y: IntervalVector) -> Self {
        Self { y }
    }
    pub fn target(&self) -> &IntervalVector {
        &self.y
    }
}

impl Ctc for CtcWrapper {
    fn size(&self) -> usize {
        self.y.size()
    }
    fn contract(&self, x: &mut IntervalVector) {
        check_size(self.y.size(), x);
        x.intersect_with(&self.y);
    }
}

/// `a` then `b`: a contractor for `S_a ∩ S_b`.
#[derive(Clone, Debug)]
pub struct CtcInter<A, B> {
    a: A,
    b: B,
}

impl<A: Ctc, B: Ctc> CtcInter<A, B> {
    pub fn new(a: A, b: B) -> Self {
        assert_eq!(a.size(), b.size(), "intersected contractors differ in dimension");
        Self { a, b }
    }
}

impl<A: Ctc, B: Ctc> Ctc for CtcInter<A, B> {
    fn size(&self) -> usize {
        self.a.size()
    }
    fn contract(&self, x: &mut IntervalVector) {
        check_size(self.size(), x);
        self.a.contract(x);
        if !x.is_empty() {
            self.b.contract(x);
        }
    }
}

/// Sequential application of a list of contractors.
pub struct CtcInterList<C = Box<dyn Ctc>> {
    n: usize,
    list: Vec<C>,
}

impl<C: Ctc> CtcInterList<C> {
    /// Panics on an empty list or mixed dimensions.
    pub fn new(list: Vec<C>) -> Self {
        let n = common_size(&list);
        Self { n, list }
    }
    pub fn len(&self) -> usize {
        self.list.len()
    }
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

impl<C: Ctc> Ctc for CtcInterList<C> {
    fn size(&self) -> usize {
        self.n
    }
    fn contract(&self, x: &mut IntervalVector) {
        check_size(self.n, x);
        for c in &self.list {
            if x.is_empty() {
                return;
            }
            c.contract(x);
        }
    }
}

/// Hull of `a(x)` and `b(x)`: a contractor for `S_a ∪ S_b`.
#[derive(Clone, Debug)]
pub struct CtcUnion<A, B> {
    a: A,
    b: B,
}

impl<A: Ctc, B: Ctc> CtcUnion<A, B> {
    pub fn new(a: A, b: B) -> Self {
        assert_eq!(a.size(), b.size(), "united contractors differ in dimension");
        Self { a, b }
    }
}

impl<A: Ctc, B: Ctc> Ctc for CtcUnion<A, B> {
    fn size(&self) -> usize {
        self.a.size()
    }
    fn contract(&self, x: &mut IntervalVector) {
        check_size(self.size(), x);
        let mut other = x.clone();
        self.a.contract(x);
        self.b.contract(&mut other);
        x.hull_with(&other);
    }
}

/// Hull of the contractions of copies of the box, one per contractor.
pub struct CtcUnionList<C = Box<dyn Ctc>> {
    n: usize,
    list: Vec<C>,
}

impl<C: Ctc> CtcUnionList<C> {
    /// Panics on an empty list or mixed dimensions.
    pub fn new(list: Vec<C>) -> Self {
        let n = common_size(&list);
        Self { n, list }
    }
}

impl<C: Ctc> Ctc for CtcUnionList<C> {
    fn size(&self) -> usize {
        self.n
    }
    fn contract(&self, x: &mut IntervalVector) {
        check_size(self.n, x);
        let pieces: Vec<IntervalVector> = self
            .list
            .iter()
            .map(|c| {
                let mut y = x.clone();
                c.contract(&mut y);
                y
            })
            .collect();
        *x = hull_all(self.n, &pieces);
    }
}

pub(crate) fn common_size<C: Ctc>(list: &[C]) -> usize {
    let first = list.first().map(Ctc::size);
    let Some(n) = first else {
        panic!("contractor list must not be empty");
    };
    assert!(
        list.iter().all(|c| c.size() == n),
        "contractors in a list differ in dimension"
    );
    n
}

/// Combinator syntax: `c1.and(c2)`, `c1.or(c2)`.
pub trait CtcExt: Ctc + Sized {
    fn and<B: Ctc>(self, other: B) -> CtcInter<Self, B> {
        CtcInter::new(self, other)
    }
    fn or<B: Ctc>(self, other: B) -> CtcUnion<Self, B> {
        CtcUnion::new(self, other)
    }
}

impl<C: Ctc> CtcExt for C {}
