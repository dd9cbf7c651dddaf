use super::{BoxPair, Sep};
use crate::ctc::{check_size, contract_facet, Ctc, CtcPolytope, CtcPolytopeCfg};
use crate::interval::{hull_all, IntervalVector};
use crate::polytope::Polytope;

/// Separator for a convex polytope.
///
/// `outer` is the polytope contraction of `x`. `inner` is the hull of the
/// parts of `x` violating some facet (each facet reversed and applied as a
/// contraction) together with the parts of `x` outside the bounding box.
#[derive(Clone, Debug)]
pub struct SepPolytope {
    ctc: CtcPolytope,
}

impl SepPolytope {
    pub fn new(p: Polytope) -> Self {
        Self::with_cfg(p, CtcPolytopeCfg::default())
    }

    pub fn with_cfg(p: Polytope, cfg: CtcPolytopeCfg) -> Self {
        Self {
            ctc: CtcPolytope::with_cfg(p, cfg),
        }
    }

    pub fn polytope(&self) -> &Polytope {
        self.ctc.polytope()
    }
}

impl Sep for SepPolytope {
    fn size(&self) -> usize {
        self.ctc.size()
    }

    fn separate(&self, x: &IntervalVector) -> BoxPair {
        check_size(self.size(), x);
        let p = self.ctc.polytope();
        if p.is_empty() || x.is_empty() {
            return BoxPair::new(x.clone(), IntervalVector::empty(x.size()));
        }
        let mut outer = x.clone();
        self.ctc.contract(&mut outer);
        let mut inner = hull_all(x.size(), &x.diff(p.bbox()));
        for f in p.facets() {
            let mut y = x.clone();
            contract_facet(&f.reversed(), &mut y);
            inner.hull_with(&y);
        }
        BoxPair { inner, outer }
    }
}
