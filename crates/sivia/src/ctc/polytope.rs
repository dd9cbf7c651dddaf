//! Contractor for a convex polytope.

use tracing::trace;

use super::{check_size, Ctc};
use crate::interval::{Interval, IntervalVector};
use crate::polytope::{Facet, Polytope};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CtcPolytopeCfg {
    /// Upper bound on the sweeps over all facets.
    pub max_passes: usize,
}

impl Default for CtcPolytopeCfg {
    fn default() -> Self {
        Self { max_passes: 20 }
    }
}

/// `x ∩ bbox(P)`, then each facet as an interval linear inequality, swept
/// until the box stops changing.
#[derive(Clone, Debug)]
pub struct CtcPolytope {
    p: Polytope,
    cfg: CtcPolytopeCfg,
}

impl CtcPolytope {
    pub fn new(p: Polytope) -> Self {
        Self::with_cfg(p, CtcPolytopeCfg::default())
    }

    pub fn with_cfg(p: Polytope, cfg: CtcPolytopeCfg) -> Self {
        Self { p, cfg }
    }

    pub fn polytope(&self) -> &Polytope {
        &self.p
    }
}

/// Narrows `x` with `row · x <= rhs`: per coordinate `j`,
/// `x_j ⊆ ((-∞, rhs] - Σ_{k≠j} a_k x_k) / a_j`.
pub(crate) fn contract_facet(f: &Facet, x: &mut IntervalVector) {
    let n = x.size();
    for j in 0..n {
        let a = f.row[j];
        if a == 0.0 {
            continue;
        }
        let mut rest = Interval::zero();
        for k in (0..n).filter(|&k| k != j && f.row[k] != 0.0) {
            rest = rest + x[k] * f.row[k];
        }
        let bound = (Interval::new(f64::NEG_INFINITY, f.rhs) - rest) / a;
        x.set(j, x[j] & bound);
        if x.is_empty() {
            return;
        }
    }
}

impl Ctc for CtcPolytope {
    fn size(&self) -> usize {
        self.p.dim()
    }

    fn contract(&self, x: &mut IntervalVector) {
        check_size(self.p.dim(), x);
        if x.is_empty() {
            return;
        }
        if self.p.is_empty() {
            x.set_empty();
            return;
        }
        x.intersect_with(self.p.bbox());
        for pass in 0..self.cfg.max_passes {
            if x.is_empty() {
                return;
            }
            let prev = x.clone();
            for f in self.p.facets() {
                contract_facet(f, x);
                if x.is_empty() {
                    trace!(pass, "polytope contraction emptied the box");
                    return;
                }
            }
            if *x == prev {
                break;
            }
        }
    }
}
