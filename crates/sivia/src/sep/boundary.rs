//! Separator from a boundary contractor and a point membership test.

use nalgebra::DVector;

use super::{BoxPair, Sep};
use crate::ctc::{check_size, classify, sampler, BoundaryCfg, Ctc};
use crate::interval::{BoolInterval, IntervalVector};

/// `ctc` contracts toward the boundary of the set; the pieces it removes are
/// classified with `inside` (see [`crate::ctc::CtcBoundary`] for sampling).
pub struct SepBoundary<C, T> {
    ctc: C,
    inside: T,
    cfg: BoundaryCfg,
}

impl<C, T> SepBoundary<C, T>
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
}

impl<C, T> Sep for SepBoundary<C, T>
where
    C: Ctc,
    T: Fn(&DVector<f64>) -> BoolInterval,
{
    fn size(&self) -> usize {
        self.ctc.size()
    }

    fn separate(&self, x: &IntervalVector) -> BoxPair {
        check_size(self.size(), x);
        let mut xb = x.clone();
        self.ctc.contract(&mut xb);
        let mut inner = xb.clone();
        let mut outer = xb.clone();
        let mut rng = sampler(&self.cfg);
        for sub in x.diff(&xb) {
            match classify(&sub, &xb, &self.inside, &self.cfg, &mut rng) {
                BoolInterval::True => outer.hull_with(&sub),
                BoolInterval::False => inner.hull_with(&sub),
                _ => {
                    inner.hull_with(&sub);
                    outer.hull_with(&sub);
                }
            }
        }
        assert_eq!(&(&inner | &outer), x, "boundary separator lost part of the box");
        BoxPair { inner, outer }
    }
}
