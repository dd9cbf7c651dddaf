//! Contractor refined by a point membership test.
//!
//! Model
//! - The wrapped contractor only contracts toward the boundary of the set;
//!   the sub-boxes it removed are either entirely inside or entirely outside.
//! - Each removed sub-box is classified by testing one point near the
//!   contracted box, with a few uniform random retries on `Unknown`.
//! - Determinism uses [`BoundaryCfg::seed`]: a fixed seed reseeds the RNG on
//!   every call, so repeated calls give identical results.

use nalgebra::DVector;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::trace;

use super::{check_size, Ctc};
use crate::interval::{BoolInterval, IntervalVector};

/// Sampling configuration for boundary-based contractors and separators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundaryCfg {
    /// Random points tried after an `Unknown` answer on the first point.
    pub attempts: usize,
    /// `Some(seed)`: reproducible draws; `None`: fresh entropy per call.
    pub seed: Option<u64>,
}

impl Default for BoundaryCfg {
    fn default() -> Self {
        Self {
            attempts: 5,
            seed: None,
        }
    }
}

pub(crate) fn sampler(cfg: &BoundaryCfg) -> StdRng {
    match cfg.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

/// Classifies `sub`, a piece of `prev \ contracted`.
///
/// The first point is the midpoint of `sub ∩ inflate(contracted, rad)`, or of
/// `sub` when that is empty. Panics if the test answers `Empty`.
pub(crate) fn classify<T>(
    sub: &IntervalVector,
    contracted: &IntervalVector,
    test: &T,
    cfg: &BoundaryCfg,
    rng: &mut StdRng,
) -> BoolInterval
where
    T: Fn(&DVector<f64>) -> BoolInterval + ?Sized,
{
    let near = if contracted.is_empty() {
        IntervalVector::empty(sub.size())
    } else {
        sub & &contracted.inflate_by(&contracted.rad())
    };
    let p = if near.is_empty() { sub.mid() } else { near.mid() };
    let mut r = test(&p);
    let mut tries = 0;
    while r == BoolInterval::Unknown && tries < cfg.attempts {
        r = test(&sub.rand(rng));
        tries += 1;
    }
    assert_ne!(r, BoolInterval::Empty, "inside test returned an empty answer");
    trace!(?r, tries, "classified removed sub-box");
    r
}

/// `ctc` followed by re-adding the removed pieces that sample inside.
pub struct CtcBoundary<C, T> {
    ctc: C,
    inside: T,
    cfg: BoundaryCfg,
}

impl<C, T> CtcBoundary<C, T>
where
    C: Ctc,
    T: Fn(&DVector<f64>) -> BoolInterval,
{
    pub fn new(ctc: C, inside: T) -> Self {
        Self::with_cfg(ctc, inside, BoundaryCfg::default())
    }

    pub fn with_cfg(ctc: C, inside: T, cfg: BoundaryCfg) -> Self {
        Self { ctc, inside, cfg }
    }

    pub fn cfg(&self) -> &BoundaryCfg {
        &self.cfg
    }
}

impl<C, T> Ctc for CtcBoundary<C, T>
where
    C: Ctc,
    T: Fn(&DVector<f64>) -> BoolInterval,
{
    fn size(&self) -> usize {
        self.ctc.size()
    }

    fn contract(&self, x: &mut IntervalVector) {
        check_size(self.size(), x);
        if x.is_empty() {
            return;
        }
        let prev = x.clone();
        self.ctc.contract(x);
        let mut rng = sampler(&self.cfg);
        let mut out = x.clone();
        for sub in prev.diff(x) {
            match classify(&sub, x, &self.inside, &self.cfg, &mut rng) {
                BoolInterval::False => {}
                _ => out.hull_with(&sub),
            }
        }
        *x = out;
    }
}
