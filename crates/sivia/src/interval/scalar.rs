//! Closed real intervals with outward-rounded arithmetic.

use std::fmt;
use std::ops::{Add, BitAnd, BitOr, Div, Mul, Neg, Sub};

use rand::Rng;

use super::round;

/// Closed interval `[lb, ub]`, possibly unbounded.
///
/// Invariants:
/// - The empty set is stored as `[+∞, -∞]`; every constructor normalizes to it.
/// - A non-empty interval has `lb <= ub`, `lb < +∞` and `ub > -∞`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interval {
    lb: f64,
    ub: f64,
}

impl Default for Interval {
    fn default() -> Self {
        Self::entire()
    }
}

impl Interval {
    /// `[lb, ub]`; empty when `lb > ub` or a bound is NaN.
    #[inline]
    pub fn new(lb: f64, ub: f64) -> Self {
        if lb.is_nan() || ub.is_nan() || lb > ub || lb == f64::INFINITY || ub == f64::NEG_INFINITY
        {
            return Self::empty();
        }
        Self { lb, ub }
    }
    #[inline]
    pub fn point(x: f64) -> Self {
        Self::new(x, x)
    }
    #[inline]
    pub fn entire() -> Self {
        Self {
            lb: f64::NEG_INFINITY,
            ub: f64::INFINITY,
        }
    }
    #[inline]
    pub fn empty() -> Self {
        Self {
            lb: f64::INFINITY,
            ub: f64::NEG_INFINITY,
        }
    }
    /// `[0, 0]`.
    #[inline]
    pub fn zero() -> Self {
        Self { lb: 0.0, ub: 0.0 }
    }

    #[inline]
    pub fn lb(&self) -> f64 {
        self.lb
    }
    #[inline]
    pub fn ub(&self) -> f64 {
        self.ub
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lb > self.ub
    }
    #[inline]
    pub fn is_unbounded(&self) -> bool {
        !self.is_empty() && (self.lb == f64::NEG_INFINITY || self.ub == f64::INFINITY)
    }
    #[inline]
    pub fn is_degenerated(&self) -> bool {
        self.is_empty() || self.lb == self.ub
    }
    #[inline]
    pub fn is_entire(&self) -> bool {
        self.lb == f64::NEG_INFINITY && self.ub == f64::INFINITY
    }

    /// Finite midpoint: `0` for the entire line, `±f64::MAX` for half-lines,
    /// NaN for the empty set.
    pub fn mid(&self) -> f64 {
        if self.is_empty() {
            return f64::NAN;
        }
        match (self.lb == f64::NEG_INFINITY, self.ub == f64::INFINITY) {
            (true, true) => 0.0,
            (true, false) => -f64::MAX,
            (false, true) => f64::MAX,
            (false, false) => {
                let m = 0.5 * self.lb + 0.5 * self.ub;
                m.clamp(self.lb, self.ub)
            }
        }
    }

    /// Upper bound of the width (`0` for the empty set, `∞` when unbounded).
    pub fn diam(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        round::sub_up(self.ub, self.lb)
    }

    /// Upper bound of the radius.
    pub fn rad(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let d = self.diam();
        if d.is_finite() {
            round::mul_up(d, 0.5)
        } else {
            d
        }
    }

    /// Mignitude: smallest absolute value of the elements.
    pub fn mig(&self) -> f64 {
        if self.is_empty() {
            return f64::NAN;
        }
        if self.lb > 0.0 {
            self.lb
        } else if self.ub < 0.0 {
            -self.ub
        } else {
            0.0
        }
    }

    /// Magnitude: largest absolute value of the elements.
    pub fn mag(&self) -> f64 {
        if self.is_empty() {
            return f64::NAN;
        }
        self.lb.abs().max(self.ub.abs())
    }

    #[inline]
    pub fn contains(&self, x: f64) -> bool {
        self.lb <= x && x <= self.ub
    }
    #[inline]
    pub fn interior_contains(&self, x: f64) -> bool {
        self.lb < x && x < self.ub
    }

    /// `self ⊆ other` (the empty set is a subset of everything).
    pub fn is_subset(&self, other: &Interval) -> bool {
        self.is_empty() || (other.lb <= self.lb && self.ub <= other.ub)
    }

    pub fn is_strict_subset(&self, other: &Interval) -> bool {
        self.is_subset(other) && self != other
    }

    pub fn intersects(&self, other: &Interval) -> bool {
        !(*self & *other).is_empty()
    }

    /// `[lb - r, ub + r]` for `r >= 0`.
    pub fn inflate(&self, r: f64) -> Self {
        debug_assert!(r >= 0.0);
        if self.is_empty() {
            return *self;
        }
        Self::new(round::sub_down(self.lb, r), round::add_up(self.ub, r))
    }

    /// Splits at `lb + ratio·(ub - lb)` (the finite midpoint when unbounded).
    ///
    /// Both halves share the split point.
    pub fn bisect(&self, ratio: f64) -> (Interval, Interval) {
        debug_assert!(ratio > 0.0 && ratio < 1.0);
        assert!(!self.is_degenerated(), "cannot bisect a degenerate interval");
        let m = if self.is_unbounded() {
            self.mid()
        } else {
            let p = self.lb + ratio * (self.ub - self.lb);
            if p.is_finite() {
                p.clamp(self.lb, self.ub)
            } else {
                self.mid()
            }
        };
        // Keep both halves non-degenerate when the split lands on a bound.
        let m = if m <= self.lb || m >= self.ub {
            self.lb.max(-f64::MAX).midpoint(self.ub.min(f64::MAX))
        } else {
            m
        };
        (Self::new(self.lb, m), Self::new(m, self.ub))
    }

    /// `self \ other` as at most two closed pieces (shared bounds kept).
    pub fn diff(&self, other: &Interval) -> Vec<Interval> {
        let z = *self & *other;
        if z.is_empty() {
            return if self.is_empty() { vec![] } else { vec![*self] };
        }
        let mut out = Vec::with_capacity(2);
        if self.lb < z.lb {
            out.push(Self::new(self.lb, z.lb));
        }
        if z.ub < self.ub {
            out.push(Self::new(z.ub, self.ub));
        }
        out
    }

    /// Uniform sample; unbounded sides are clamped to a finite window around
    /// the midpoint.
    pub fn rand<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        assert!(!self.is_empty(), "cannot sample the empty interval");
        if self.is_degenerated() {
            return self.lb;
        }
        const WINDOW: f64 = 1e12;
        let lo = if self.lb.is_finite() {
            self.lb
        } else {
            self.ub.min(0.0) - WINDOW
        };
        let hi = if self.ub.is_finite() {
            self.ub
        } else {
            self.lb.max(0.0) + WINDOW
        };
        let t: f64 = rng.gen();
        (lo + t * (hi - lo)).clamp(lo, hi)
    }

    pub fn sqr(&self) -> Self {
        if self.is_empty() {
            return *self;
        }
        if self.lb >= 0.0 {
            Self::new(round::mul_down(self.lb, self.lb), round::mul_up(self.ub, self.ub))
        } else if self.ub <= 0.0 {
            Self::new(round::mul_down(self.ub, self.ub), round::mul_up(self.lb, self.lb))
        } else {
            let m = self.mag();
            Self::new(0.0, round::mul_up(m, m))
        }
    }

    /// Square root of the non-negative part (empty when `self < 0`).
    pub fn sqrt(&self) -> Self {
        let x = *self & Self::new(0.0, f64::INFINITY);
        if x.is_empty() {
            return x;
        }
        Self::new(round::sqrt_down(x.lb), round::sqrt_up(x.ub))
    }

    pub fn abs(&self) -> Self {
        if self.is_empty() {
            return *self;
        }
        Self::new(self.mig(), self.mag())
    }

    /// Interval hull of `{ x·y : x ∈ self, y ∈ other }` via the four corners.
    fn mul_interval(&self, other: &Interval) -> Self {
        if self.is_empty() || other.is_empty() {
            return Self::empty();
        }
        let corners = [
            (self.lb, other.lb),
            (self.lb, other.ub),
            (self.ub, other.lb),
            (self.ub, other.ub),
        ];
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for (a, b) in corners {
            lo = lo.min(round::mul_down(a, b));
            hi = hi.max(round::mul_up(a, b));
        }
        Self::new(lo, hi)
    }

    /// Hull of `self / other`; the entire line when `0 ∈ other` (and `other`
    /// is not `[0,0]`, which gives the empty set).
    fn div_interval(&self, other: &Interval) -> Self {
        if self.is_empty() || other.is_empty() {
            return Self::empty();
        }
        if other.lb == 0.0 && other.ub == 0.0 {
            return Self::empty();
        }
        if other.contains(0.0) {
            if other.lb == 0.0 && self.lb >= 0.0 {
                return Self::new(round::div_down(self.lb, other.ub), f64::INFINITY);
            }
            if other.ub == 0.0 && self.lb >= 0.0 {
                return Self::new(f64::NEG_INFINITY, round::div_up(self.lb, other.lb));
            }
            return Self::entire();
        }
        let corners = [
            (self.lb, other.lb),
            (self.lb, other.ub),
            (self.ub, other.lb),
            (self.ub, other.ub),
        ];
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for (a, b) in corners {
            if a.is_infinite() && b.is_infinite() {
                // ±∞/±∞ only occurs at a corner whose hull is already covered
                // by the other corners of an unbounded interval.
                continue;
            }
            lo = lo.min(round::div_down(a, b));
            hi = hi.max(round::div_up(a, b));
        }
        Self::new(lo, hi)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "[ empty ]")
        } else {
            write!(f, "[{}, {}]", self.lb, self.ub)
        }
    }
}

impl From<f64> for Interval {
    fn from(x: f64) -> Self {
        Self::point(x)
    }
}

impl From<(f64, f64)> for Interval {
    fn from((lb, ub): (f64, f64)) -> Self {
        Self::new(lb, ub)
    }
}

/// Intersection.
impl BitAnd for Interval {
    type Output = Interval;
    fn bitand(self, rhs: Interval) -> Interval {
        if self.is_empty() || rhs.is_empty() {
            return Interval::empty();
        }
        Interval::new(self.lb.max(rhs.lb), self.ub.min(rhs.ub))
    }
}

/// Hull of the union.
impl BitOr for Interval {
    type Output = Interval;
    fn bitor(self, rhs: Interval) -> Interval {
        if self.is_empty() {
            return rhs;
        }
        if rhs.is_empty() {
            return self;
        }
        Interval::new(self.lb.min(rhs.lb), self.ub.max(rhs.ub))
    }
}

impl Neg for Interval {
    type Output = Interval;
    fn neg(self) -> Interval {
        if self.is_empty() {
            return self;
        }
        Interval {
            lb: -self.ub,
            ub: -self.lb,
        }
    }
}

impl Add for Interval {
    type Output = Interval;
    fn add(self, rhs: Interval) -> Interval {
        if self.is_empty() || rhs.is_empty() {
            return Interval::empty();
        }
        Interval::new(round::add_down(self.lb, rhs.lb), round::add_up(self.ub, rhs.ub))
    }
}

impl Sub for Interval {
    type Output = Interval;
    fn sub(self, rhs: Interval) -> Interval {
        self + (-rhs)
    }
}

impl Mul for Interval {
    type Output = Interval;
    fn mul(self, rhs: Interval) -> Interval {
        self.mul_interval(&rhs)
    }
}

impl Div for Interval {
    type Output = Interval;
    fn div(self, rhs: Interval) -> Interval {
        self.div_interval(&rhs)
    }
}

macro_rules! scalar_ops {
    ($($tr:ident $f:ident),*) => {$(
        impl $tr<f64> for Interval {
            type Output = Interval;
            #[inline]
            fn $f(self, rhs: f64) -> Interval {
                $tr::$f(self, Interval::point(rhs))
            }
        }
        impl $tr<Interval> for f64 {
            type Output = Interval;
            #[inline]
            fn $f(self, rhs: Interval) -> Interval {
                $tr::$f(Interval::point(self), rhs)
            }
        }
    )*};
}

scalar_ops!(Add add, Sub sub, Mul mul, Div div);

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn empty_is_normalized() {
        assert_eq!(Interval::new(2.0, 1.0), Interval::empty());
        assert_eq!(Interval::new(f64::NAN, 1.0), Interval::empty());
        assert!((Interval::new(0.0, 1.0) & Interval::new(2.0, 3.0)).is_empty());
    }

    #[test]
    fn arithmetic_encloses_reals() {
        let a = Interval::new(1.0, 2.0);
        let b = Interval::new(-3.0, 4.0);
        assert_eq!(a + b, Interval::new(-2.0, 6.0));
        assert_eq!(a - b, Interval::new(-3.0, 5.0));
        assert_eq!(a * b, Interval::new(-6.0, 8.0));
        assert_eq!(b.sqr(), Interval::new(0.0, 16.0));
        let third = Interval::point(1.0) / 3.0;
        assert!(third.contains(1.0 / 3.0));
        assert!(third.diam() > 0.0);
        assert_eq!(Interval::new(4.0, 9.0).sqrt(), Interval::new(2.0, 3.0));
        assert!(Interval::new(-2.0, -1.0).sqrt().is_empty());
    }

    #[test]
    fn division_by_interval_containing_zero() {
        let a = Interval::new(1.0, 2.0);
        assert_eq!(a / Interval::new(0.0, 2.0), Interval::new(0.5, f64::INFINITY));
        assert!((a / Interval::new(-1.0, 1.0)).is_entire());
        assert!((a / Interval::zero()).is_empty());
    }

    #[test]
    fn unbounded_arithmetic_is_nan_free() {
        let e = Interval::entire();
        let r = e - e;
        assert!(r.is_entire());
        let z = Interval::zero() * e;
        assert_eq!(z, Interval::zero());
        let h = Interval::new(f64::NEG_INFINITY, 3.0) - Interval::new(1.0, 2.0);
        assert_eq!(h, Interval::new(f64::NEG_INFINITY, 2.0));
    }

    #[test]
    fn mid_of_unbounded() {
        assert_eq!(Interval::entire().mid(), 0.0);
        assert_eq!(Interval::new(1.0, f64::INFINITY).mid(), f64::MAX);
        assert_eq!(Interval::new(f64::NEG_INFINITY, 1.0).mid(), -f64::MAX);
    }

    #[test]
    fn bisect_and_diff() {
        let (l, r) = Interval::new(0.0, 10.0).bisect(0.5);
        assert_eq!(l, Interval::new(0.0, 5.0));
        assert_eq!(r, Interval::new(5.0, 10.0));
        let d = Interval::new(0.0, 10.0).diff(&Interval::new(2.0, 3.0));
        assert_eq!(d, vec![Interval::new(0.0, 2.0), Interval::new(3.0, 10.0)]);
        assert!(Interval::new(2.0, 3.0).diff(&Interval::new(0.0, 10.0)).is_empty());
    }

    #[test]
    fn rand_stays_inside() {
        let mut rng = StdRng::seed_from_u64(7);
        let x = Interval::new(-1.0, 3.0);
        for _ in 0..100 {
            assert!(x.contains(x.rand(&mut rng)));
        }
        let h = Interval::new(2.0, f64::INFINITY);
        for _ in 0..10 {
            let v = h.rand(&mut rng);
            assert!(v.is_finite() && v >= 2.0);
        }
    }
}
