//! Directed rounding on top of round-to-nearest hardware arithmetic.
//!
//! Each helper computes the nearest result and, using an error-free
//! transformation (TwoSum / FMA residual), moves it by one ulp only when the
//! exact result lies on the wrong side. Exact results are returned unchanged.

#[inline]
fn up(x: f64) -> f64 {
    if x.is_finite() {
        x.next_up()
    } else {
        x
    }
}

#[inline]
fn down(x: f64) -> f64 {
    if x.is_finite() {
        x.next_down()
    } else {
        x
    }
}

/// A lower bound overflowing to `+∞` from finite operands is `f64::MAX`.
#[inline]
fn overflow_down(x: f64, finite_operands: bool) -> f64 {
    if finite_operands && x == f64::INFINITY {
        f64::MAX
    } else {
        x
    }
}

#[inline]
fn overflow_up(x: f64, finite_operands: bool) -> f64 {
    if finite_operands && x == f64::NEG_INFINITY {
        -f64::MAX
    } else {
        x
    }
}

/// Knuth's TwoSum: `a + b = s + e` exactly (finite inputs).
#[inline]
fn two_sum_err(a: f64, b: f64, s: f64) -> f64 {
    let bb = s - a;
    (a - (s - bb)) + (b - bb)
}

pub(crate) fn add_down(a: f64, b: f64) -> f64 {
    let s = a + b;
    if !s.is_finite() {
        return overflow_down(s, a.is_finite() && b.is_finite());
    }
    if two_sum_err(a, b, s) < 0.0 {
        down(s)
    } else {
        s
    }
}

pub(crate) fn add_up(a: f64, b: f64) -> f64 {
    let s = a + b;
    if !s.is_finite() {
        return overflow_up(s, a.is_finite() && b.is_finite());
    }
    if two_sum_err(a, b, s) > 0.0 {
        up(s)
    } else {
        s
    }
}

pub(crate) fn sub_down(a: f64, b: f64) -> f64 {
    add_down(a, -b)
}

pub(crate) fn sub_up(a: f64, b: f64) -> f64 {
    add_up(a, -b)
}

/// Product with the convention `0 · ∞ = 0` (interval arithmetic).
#[inline]
fn mul_raw(a: f64, b: f64) -> f64 {
    if a == 0.0 || b == 0.0 {
        0.0
    } else {
        a * b
    }
}

pub(crate) fn mul_down(a: f64, b: f64) -> f64 {
    let p = mul_raw(a, b);
    if !p.is_finite() {
        return overflow_down(p, a.is_finite() && b.is_finite());
    }
    if a == 0.0 || b == 0.0 {
        return p;
    }
    let e = a.mul_add(b, -p);
    // Gradual underflow makes the residual unreliable; widen unconditionally.
    if p.abs() < f64::MIN_POSITIVE {
        return down(p);
    }
    if e < 0.0 {
        down(p)
    } else {
        p
    }
}

pub(crate) fn mul_up(a: f64, b: f64) -> f64 {
    let p = mul_raw(a, b);
    if !p.is_finite() {
        return overflow_up(p, a.is_finite() && b.is_finite());
    }
    if a == 0.0 || b == 0.0 {
        return p;
    }
    let e = a.mul_add(b, -p);
    if p.abs() < f64::MIN_POSITIVE {
        return up(p);
    }
    if e > 0.0 {
        up(p)
    } else {
        p
    }
}

/// Sign of the exact quotient error `a/b - q`.
#[inline]
fn div_err_sign(a: f64, b: f64, q: f64) -> f64 {
    // r = a - q·b exactly; a/b - q = r / b
    let r = (-q).mul_add(b, a);
    if r == 0.0 {
        0.0
    } else if (r > 0.0) == (b > 0.0) {
        1.0
    } else {
        -1.0
    }
}

pub(crate) fn div_down(a: f64, b: f64) -> f64 {
    let q = a / b;
    if !q.is_finite() {
        return overflow_down(q, a.is_finite() && b != 0.0);
    }
    if !b.is_finite() {
        return q;
    }
    if q.abs() < f64::MIN_POSITIVE && q != 0.0 {
        return down(q);
    }
    if div_err_sign(a, b, q) < 0.0 {
        down(q)
    } else {
        q
    }
}

pub(crate) fn div_up(a: f64, b: f64) -> f64 {
    let q = a / b;
    if !q.is_finite() {
        return overflow_up(q, a.is_finite() && b != 0.0);
    }
    if !b.is_finite() {
        return q;
    }
    if q.abs() < f64::MIN_POSITIVE && q != 0.0 {
        return up(q);
    }
    if div_err_sign(a, b, q) > 0.0 {
        up(q)
    } else {
        q
    }
}

pub(crate) fn sqrt_down(x: f64) -> f64 {
    let s = x.sqrt();
    if !s.is_finite() || s == 0.0 {
        return s;
    }
    // x - s² > 0 means the exact root is above s
    if (-s).mul_add(s, x) < 0.0 {
        down(s)
    } else {
        s
    }
}

pub(crate) fn sqrt_up(x: f64) -> f64 {
    let s = x.sqrt();
    if !s.is_finite() {
        return s;
    }
    if (-s).mul_add(s, x) > 0.0 {
        up(s)
    } else {
        s
    }
}
