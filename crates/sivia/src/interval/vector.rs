//! Boxes: ordered tuples of intervals.

use std::fmt;
use std::ops::{BitAnd, BitOr, Index, IndexMut};

use nalgebra::DVector;
use rand::Rng;

use super::Interval;

/// Axis-aligned box in Rⁿ.
///
/// Invariants:
/// - Empty iff some component is empty; an empty box has every component
///   empty, so two empty boxes of the same dimension compare equal.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntervalVector {
    v: Vec<Interval>,
}

impl IntervalVector {
    /// The entire space Rⁿ.
    pub fn new(n: usize) -> Self {
        Self {
            v: vec![Interval::entire(); n],
        }
    }

    pub fn empty(n: usize) -> Self {
        Self {
            v: vec![Interval::empty(); n],
        }
    }

    /// Box from its components; normalized if any component is empty.
    pub fn from_intervals(v: Vec<Interval>) -> Self {
        let mut x = Self { v };
        x.normalize();
        x
    }

    /// `[lb_i, ub_i]` per dimension.
    pub fn from_bounds(bounds: &[(f64, f64)]) -> Self {
        Self::from_intervals(bounds.iter().map(|&b| Interval::from(b)).collect())
    }

    /// Degenerate box `{p}`.
    pub fn from_point(p: &[f64]) -> Self {
        Self::from_intervals(p.iter().map(|&x| Interval::point(x)).collect())
    }

    pub fn from_dvector(p: &DVector<f64>) -> Self {
        Self::from_point(p.as_slice())
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.v.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Interval> {
        self.v.iter()
    }

    pub fn as_slice(&self) -> &[Interval] {
        &self.v
    }

    fn normalize(&mut self) {
        if self.v.iter().any(Interval::is_empty) {
            self.set_empty();
        }
    }

    pub fn set_empty(&mut self) {
        for xi in &mut self.v {
            *xi = Interval::empty();
        }
    }

    /// Assigns component `i`; the box becomes empty when `value` is empty.
    pub fn set(&mut self, i: usize, value: Interval) {
        self.v[i] = value;
        if value.is_empty() {
            self.set_empty();
        }
    }

    /// In-place intersection with `other`.
    pub fn intersect_with(&mut self, other: &IntervalVector) {
        assert_eq!(self.size(), other.size(), "box dimension mismatch");
        for (a, b) in self.v.iter_mut().zip(other.v.iter()) {
            *a = *a & *b;
        }
        self.normalize();
    }

    /// In-place hull with `other`.
    pub fn hull_with(&mut self, other: &IntervalVector) {
        assert_eq!(self.size(), other.size(), "box dimension mismatch");
        for (a, b) in self.v.iter_mut().zip(other.v.iter()) {
            *a = *a | *b;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.v.first().is_some_and(Interval::is_empty)
    }

    pub fn is_unbounded(&self) -> bool {
        self.v.iter().any(Interval::is_unbounded)
    }

    pub fn is_subset(&self, other: &IntervalVector) -> bool {
        assert_eq!(self.size(), other.size(), "box dimension mismatch");
        self.is_empty() || self.v.iter().zip(other.v.iter()).all(|(a, b)| a.is_subset(b))
    }

    pub fn is_strict_subset(&self, other: &IntervalVector) -> bool {
        self.is_subset(other) && self != other
    }

    pub fn intersects(&self, other: &IntervalVector) -> bool {
        !(self & other).is_empty()
    }

    /// Point membership (closed box).
    pub fn contains(&self, p: &[f64]) -> bool {
        assert_eq!(self.size(), p.len(), "box dimension mismatch");
        !self.is_empty() && self.v.iter().zip(p).all(|(xi, &pi)| xi.contains(pi))
    }

    pub fn interior_contains(&self, p: &[f64]) -> bool {
        assert_eq!(self.size(), p.len(), "box dimension mismatch");
        !self.is_empty() && self.v.iter().zip(p).all(|(xi, &pi)| xi.interior_contains(pi))
    }

    pub fn lb(&self) -> DVector<f64> {
        DVector::from_iterator(self.size(), self.v.iter().map(Interval::lb))
    }
    pub fn ub(&self) -> DVector<f64> {
        DVector::from_iterator(self.size(), self.v.iter().map(Interval::ub))
    }
    pub fn mid(&self) -> DVector<f64> {
        DVector::from_iterator(self.size(), self.v.iter().map(Interval::mid))
    }
    pub fn rad(&self) -> DVector<f64> {
        DVector::from_iterator(self.size(), self.v.iter().map(Interval::rad))
    }
    pub fn diam(&self) -> DVector<f64> {
        DVector::from_iterator(self.size(), self.v.iter().map(Interval::diam))
    }

    /// Largest component width (`0` for the empty box).
    pub fn max_diam(&self) -> f64 {
        self.v.iter().map(Interval::diam).fold(0.0, f64::max)
    }

    /// Index of the widest component (first on ties).
    pub fn argmax_diam(&self) -> usize {
        let mut best = 0;
        let mut best_d = f64::NEG_INFINITY;
        for (i, xi) in self.v.iter().enumerate() {
            let d = xi.diam();
            if d > best_d {
                best = i;
                best_d = d;
            }
        }
        best
    }

    /// Product of widths; `0` for the empty box, `∞` when unbounded.
    pub fn volume(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.v.iter().map(Interval::diam).product()
    }

    /// Every component inflated by `r`.
    pub fn inflate(&self, r: f64) -> Self {
        Self {
            v: self.v.iter().map(|xi| xi.inflate(r)).collect(),
        }
    }

    /// Every component inflated by its own radius entry in `r`.
    pub fn inflate_by(&self, r: &DVector<f64>) -> Self {
        assert_eq!(self.size(), r.len(), "box dimension mismatch");
        Self {
            v: self.v.iter().zip(r.iter()).map(|(xi, &ri)| xi.inflate(ri)).collect(),
        }
    }

    /// Splits along dimension `i`; both halves share the cut hyperplane.
    pub fn bisect(&self, i: usize, ratio: f64) -> (IntervalVector, IntervalVector) {
        let (a, b) = self.v[i].bisect(ratio);
        let mut left = self.clone();
        let mut right = self.clone();
        left.v[i] = a;
        right.v[i] = b;
        (left, right)
    }

    pub fn bisect_largest(&self, ratio: f64) -> (IntervalVector, IntervalVector) {
        self.bisect(self.argmax_diam(), ratio)
    }

    /// `self \ other` as sub-boxes with pairwise disjoint interiors.
    ///
    /// Returns `[self]` when the boxes do not intersect and no box when
    /// `self ⊆ other`. Pieces are cut one dimension at a time; after
    /// dimension `i` the remaining core is restricted to `self ∩ other` on `i`.
    pub fn diff(&self, other: &IntervalVector) -> Vec<IntervalVector> {
        assert_eq!(self.size(), other.size(), "box dimension mismatch");
        if self.is_empty() {
            return Vec::new();
        }
        let z = self & other;
        if z.is_empty() {
            return vec![self.clone()];
        }
        let mut out = Vec::new();
        let mut core = self.clone();
        for i in 0..self.size() {
            for piece in self.v[i].diff(&z.v[i]) {
                let mut b = core.clone();
                b.v[i] = piece;
                out.push(b);
            }
            core.v[i] = z.v[i];
        }
        out
    }

    /// Uniform random point of the box.
    pub fn rand<R: Rng + ?Sized>(&self, rng: &mut R) -> DVector<f64> {
        DVector::from_iterator(self.size(), self.v.iter().map(|xi| xi.rand(rng)))
    }
}

impl Index<usize> for IntervalVector {
    type Output = Interval;
    fn index(&self, i: usize) -> &Interval {
        &self.v[i]
    }
}

/// Direct component access; callers must keep the empty-box normalization
/// (prefer [`IntervalVector::set`] when the value may be empty).
impl IndexMut<usize> for IntervalVector {
    fn index_mut(&mut self, i: usize) -> &mut Interval {
        &mut self.v[i]
    }
}

impl<'a> IntoIterator for &'a IntervalVector {
    type Item = &'a Interval;
    type IntoIter = std::slice::Iter<'a, Interval>;
    fn into_iter(self) -> Self::IntoIter {
        self.v.iter()
    }
}

impl FromIterator<Interval> for IntervalVector {
    fn from_iter<T: IntoIterator<Item = Interval>>(iter: T) -> Self {
        Self::from_intervals(iter.into_iter().collect())
    }
}

impl BitAnd for &IntervalVector {
    type Output = IntervalVector;
    fn bitand(self, rhs: &IntervalVector) -> IntervalVector {
        let mut out = self.clone();
        out.intersect_with(rhs);
        out
    }
}

impl BitOr for &IntervalVector {
    type Output = IntervalVector;
    fn bitor(self, rhs: &IntervalVector) -> IntervalVector {
        let mut out = self.clone();
        out.hull_with(rhs);
        out
    }
}

impl fmt::Display for IntervalVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "( empty )");
        }
        write!(f, "(")?;
        for (i, xi) in self.v.iter().enumerate() {
            if i > 0 {
                write!(f, " ; ")?;
            }
            write!(f, "{xi}")?;
        }
        write!(f, ")")
    }
}

/// Hull of a list of boxes (empty box of dimension `n` for an empty list).
pub fn hull_all<'a, I>(n: usize, boxes: I) -> IntervalVector
where
    I: IntoIterator<Item = &'a IntervalVector>,
{
    let mut h = IntervalVector::empty(n);
    for b in boxes {
        h.hull_with(b);
    }
    h
}
