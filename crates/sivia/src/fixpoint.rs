//! Repeat a narrowing step until the monitored volume stops changing.

use tracing::debug;

use crate::interval::IntervalVector;
use crate::polytope::Polytope;
use crate::sep::BoxPair;

/// Size measure of the objects a fixpoint loop monitors.
pub trait Volume {
    fn volume(&self) -> f64;
}

#[inline]
fn finite(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

impl Volume for IntervalVector {
    fn volume(&self) -> f64 {
        IntervalVector::volume(self)
    }
}

impl Volume for Polytope {
    fn volume(&self) -> f64 {
        Polytope::volume(self)
    }
}

impl Volume for BoxPair {
    fn volume(&self) -> f64 {
        finite(self.inner.volume()) + finite(self.outer.volume())
    }
}

impl<T: Volume + ?Sized> Volume for &T {
    fn volume(&self) -> f64 {
        (**self).volume()
    }
}

impl<T: Volume + ?Sized> Volume for &mut T {
    fn volume(&self) -> f64 {
        (**self).volume()
    }
}

impl<T: Volume> Volume for [T] {
    fn volume(&self) -> f64 {
        self.iter().map(|x| finite(x.volume())).sum()
    }
}

impl<T: Volume> Volume for Vec<T> {
    fn volume(&self) -> f64 {
        self.as_slice().volume()
    }
}

macro_rules! tuple_volume {
    ($($t:ident . $i:tt),+) => {
        impl<$($t: Volume),+> Volume for ($($t,)+) {
            fn volume(&self) -> f64 {
                0.0 $(+ finite(self.$i.volume()))+
            }
        }
    };
}

tuple_volume!(A.0, B.1);
tuple_volume!(A.0, B.1, C.2);
tuple_volume!(A.0, B.1, C.2, D.3);

/// When two consecutive volumes count as unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopRule {
    /// Bitwise equal floating-point sums.
    #[default]
    Exact,
    /// `|v - prev| <= tol * |prev|`.
    Relative(f64),
}

impl StopRule {
    fn settled(&self, prev: f64, v: f64) -> bool {
        match *self {
            StopRule::Exact => v == prev,
            StopRule::Relative(tol) => v == prev || (v - prev).abs() <= tol * prev.abs(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FixpointCfg {
    pub rule: StopRule,
    /// `None` iterates until the rule is met.
    pub max_iterations: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixpointReport {
    /// Number of `step` calls.
    pub iterations: usize,
    /// Finite volume after the last step.
    pub volume: f64,
    /// `false` when the iteration cap stopped the loop first.
    pub converged: bool,
}

/// [`fixpoint_with`] under the exact rule and no cap.
pub fn fixpoint<S, F>(state: &mut S, step: F) -> FixpointReport
where
    S: Volume + ?Sized,
    F: FnMut(&mut S),
{
    fixpoint_with(state, FixpointCfg::default(), step)
}

/// Applies `step` until the volume of `state` settles under `cfg.rule`.
pub fn fixpoint_with<S, F>(state: &mut S, cfg: FixpointCfg, mut step: F) -> FixpointReport
where
    S: Volume + ?Sized,
    F: FnMut(&mut S),
{
    let mut prev = finite(state.volume());
    let mut iterations = 0;
    loop {
        step(state);
        iterations += 1;
        let v = finite(state.volume());
        if cfg.rule.settled(prev, v) {
            debug!(iterations, volume = v, "fixpoint reached");
            return FixpointReport {
                iterations,
                volume: v,
                converged: true,
            };
        }
        if cfg.max_iterations.is_some_and(|m| iterations >= m) {
            debug!(iterations, volume = v, "fixpoint cap reached");
            return FixpointReport {
                iterations,
                volume: v,
                converged: false,
            };
        }
        prev = v;
    }
}
