//! Facet→vertex builder.

use nalgebra::DVector;
use tracing::{debug, trace};

use super::{common, insert_sorted, new_links, side_of, Candidate, DdOutcome, Side};
use crate::interval::{Interval, IntervalVector};
use crate::polytope::{DdCfg, Facet, PolytopeError};

#[derive(Clone, Debug)]
struct DdVertex {
    v: IntervalVector,
    /// Sorted ids of the facets this vertex lies on.
    fcts: Vec<usize>,
    links: Vec<usize>,
}

/// Incremental F2V construction inside a bounded box.
///
/// Facet ids `0..n` are the lower bounds of the box and id `n` is an
/// artificial facet `Σ x_i <= Σ lb_i + D` closing the initial simplex; it is
/// never reported. The box upper bounds are then inserted as ordinary facets
/// (ids `n+1..=2n`), so user facets start at id `2n + 1`.
///
/// Vertices are interval vectors enclosing the exact vertices.
#[derive(Clone, Debug)]
pub struct F2vBuilder {
    dim: usize,
    cfg: DdCfg,
    facets: Vec<Facet>,
    vertices: Vec<Option<DdVertex>>,
    emptied: bool,
}

impl F2vBuilder {
    /// Starts from the (bounded, non-empty) box `bbox`.
    pub fn new(bbox: &IntervalVector, cfg: DdCfg) -> Result<Self, PolytopeError> {
        let n = bbox.size();
        if n == 0 {
            return Err(PolytopeError::ZeroDimension);
        }
        if bbox.is_empty() {
            return Err(PolytopeError::EmptyBox);
        }
        if bbox.is_unbounded() {
            return Err(PolytopeError::UnboundedBox);
        }
        let lb = bbox.lb();
        let mut facets = Vec::with_capacity(2 * n + 1);
        for i in 0..n {
            facets.push(Facet::axis(n, i, false, lb[i]));
        }
        let width = bbox
            .iter()
            .fold(Interval::zero(), |acc, xi| acc + Interval::point(xi.diam()));
        let d = (2.0 * width + 1.0).ub();
        let sum_lb = lb.iter().fold(Interval::zero(), |acc, &l| acc + l);
        facets.push(Facet::new(DVector::from_element(n, 1.0), (sum_lb + d).ub()));

        let mut vertices = Vec::with_capacity(n + 1);
        vertices.push(Some(DdVertex {
            v: IntervalVector::from_dvector(&lb),
            fcts: (0..n).collect(),
            links: (1..=n).collect(),
        }));
        for i in 0..n {
            let mut v = IntervalVector::from_dvector(&lb);
            v[i] = Interval::point(lb[i]) + d;
            let fcts = (0..=n).filter(|&f| f != i).collect();
            let links = (0..=n).filter(|&k| k != i + 1).collect();
            vertices.push(Some(DdVertex { v, fcts, links }));
        }

        let mut builder = Self {
            dim: n,
            cfg,
            facets,
            vertices,
            emptied: false,
        };
        for (i, xi) in bbox.iter().enumerate() {
            builder.add_facet(Facet::axis(n, i, true, xi.ub()));
        }
        debug!(dim = n, vertices = builder.vertex_count(), "f2v builder initialised");
        Ok(builder)
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn is_empty(&self) -> bool {
        self.emptied
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.iter().flatten().count()
    }

    /// Intersects with `facet` (assumed finite, non-zero row).
    pub fn add_facet(&mut self, facet: Facet) -> DdOutcome {
        assert_eq!(facet.dim(), self.dim, "facet dimension mismatch");
        if self.emptied {
            return DdOutcome::Emptied;
        }
        let facet = facet.normalized();
        let id = self.facets.len();
        let tol = self.cfg.tolerance;

        let mut sides: Vec<Option<Side>> = Vec::with_capacity(self.vertices.len());
        let mut lams: Vec<Interval> = Vec::with_capacity(self.vertices.len());
        for slot in &self.vertices {
            let lam = slot
                .as_ref()
                .map_or_else(Interval::empty, |d| facet.eval_box(&d.v));
            sides.push(slot.as_ref().map(|_| side_of(lam, tol)));
            lams.push(lam);
        }
        self.facets.push(facet);

        let any = |s: Side| sides.iter().any(|x| *x == Some(s));
        if !any(Side::Out) {
            for (k, slot) in self.vertices.iter_mut().enumerate() {
                if let (Some(d), Some(Side::On)) = (slot.as_mut(), sides[k]) {
                    insert_sorted(&mut d.fcts, id);
                }
            }
            trace!(facet = id, "redundant facet");
            return DdOutcome::Redundant;
        }
        if !any(Side::In) && !any(Side::On) {
            self.vertices.clear();
            self.emptied = true;
            debug!(facet = id, "polytope emptied");
            return DdOutcome::Emptied;
        }

        let first_new = self.vertices.len();
        let mut removed = 0;
        for p in 0..first_new {
            if sides[p] != Some(Side::Out) {
                continue;
            }
            let Some(dp) = self.vertices[p].take() else {
                continue;
            };
            removed += 1;
            for &q in &dp.links {
                match sides[q] {
                    Some(Side::In) => {
                        let Some(dq) = self.vertices[q].as_ref() else {
                            continue;
                        };
                        let child = child_vertex(&dp, dq, q, lams[p], lams[q], id);
                        let cid = self.vertices.len();
                        self.vertices.push(Some(child));
                        if let Some(dq) = self.vertices[q].as_mut() {
                            for l in dq.links.iter_mut() {
                                if *l == p {
                                    *l = cid;
                                }
                            }
                        }
                    }
                    Some(Side::On) => {
                        if let Some(dq) = self.vertices[q].as_mut() {
                            dq.links.retain(|&l| l != p);
                        }
                    }
                    _ => {}
                }
            }
        }

        let mut cand_ids = Vec::new();
        for k in 0..self.vertices.len() {
            let on = k < first_new && sides[k] == Some(Side::On);
            if on {
                if let Some(d) = self.vertices[k].as_mut() {
                    insert_sorted(&mut d.fcts, id);
                }
            }
            if (on || k >= first_new) && self.vertices[k].is_some() {
                cand_ids.push(k);
            }
        }
        self.link_candidates(&cand_ids);

        let created = self.vertices.len() - first_new;
        trace!(facet = id, removed, created, "facet cut");
        DdOutcome::Cut { removed, created }
    }

    fn link_candidates(&mut self, ids: &[usize]) {
        let pairs = {
            let cands: Vec<Candidate<'_>> = ids
                .iter()
                .filter_map(|&k| {
                    self.vertices[k].as_ref().map(|d| Candidate {
                        id: k,
                        incidence: &d.fcts,
                        links: &d.links,
                    })
                })
                .collect();
            new_links(&cands, self.dim)
        };
        for (a, b) in pairs {
            if let Some(d) = self.vertices[a].as_mut() {
                d.links.push(b);
            }
            if let Some(d) = self.vertices[b].as_mut() {
                d.links.push(a);
            }
        }
    }

    /// Current vertices (interval enclosures).
    pub fn vertices(&self) -> Vec<IntervalVector> {
        self.vertices.iter().flatten().map(|d| d.v.clone()).collect()
    }

    /// Non-redundant facets: at least `n` incident vertices, artificial facet
    /// excluded.
    pub fn facets(&self) -> Vec<Facet> {
        let mut count = vec![0usize; self.facets.len()];
        for d in self.vertices.iter().flatten() {
            for &f in &d.fcts {
                count[f] += 1;
            }
        }
        self.facets
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != self.dim && count[i] >= self.dim)
            .map(|(_, f)| f.clone())
            .collect()
    }

    /// Adjacent vertex pairs (each edge once), as positions in [`Self::vertices`].
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let mut pos = vec![usize::MAX; self.vertices.len()];
        for (i, k) in self
            .vertices
            .iter()
            .enumerate()
            .filter_map(|(k, s)| s.as_ref().map(|_| k))
            .enumerate()
        {
            pos[k] = i;
        }
        let mut out = Vec::new();
        for (k, slot) in self.vertices.iter().enumerate() {
            if let Some(d) = slot {
                for &l in &d.links {
                    if k < l && pos[l] != usize::MAX {
                        out.push((pos[k], pos[l]));
                    }
                }
            }
        }
        out
    }
}

/// Vertex on the segment `[p, q]` where the facet `id` is tight.
fn child_vertex(
    dp: &DdVertex,
    dq: &DdVertex,
    q: usize,
    lp: Interval,
    lq: Interval,
    id: usize,
) -> DdVertex {
    // row·(p + t(q - p)) = rhs  <=>  t = lp / (lp - lq)
    let t = (lp / (lp - lq)) & Interval::new(0.0, 1.0);
    let t = if t.is_empty() { Interval::new(0.0, 1.0) } else { t };
    let v: IntervalVector = dp
        .v
        .iter()
        .zip(dq.v.iter())
        .map(|(a, b)| *a + t * (*b - *a))
        .collect();
    let tight = &v & &(&dp.v | &dq.v);
    let mut fcts = common(&dp.fcts, &dq.fcts);
    insert_sorted(&mut fcts, id);
    DdVertex {
        v: if tight.is_empty() { v } else { tight },
        fcts,
        links: vec![q],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bx(b: &[(f64, f64)]) -> IntervalVector {
        IntervalVector::from_bounds(b)
    }

    fn contains_point(vs: &[IntervalVector], p: &[f64]) -> bool {
        vs.iter().any(|v| v.contains(p))
    }

    #[test]
    fn box_only_gives_corners() {
        let b = F2vBuilder::new(&bx(&[(0.0, 1.0), (0.0, 2.0)]), DdCfg::default()).unwrap();
        let vs = b.vertices();
        assert_eq!(vs.len(), 4);
        for p in [[0.0, 0.0], [1.0, 0.0], [0.0, 2.0], [1.0, 2.0]] {
            assert!(contains_point(&vs, &p), "missing corner {p:?}");
        }
        assert_eq!(b.facets().len(), 4);
        assert_eq!(b.edges().len(), 4);
    }

    #[test]
    fn diagonal_cut_of_square() {
        let mut b = F2vBuilder::new(&bx(&[(0.0, 1.0), (0.0, 1.0)]), DdCfg::default()).unwrap();
        let out = b.add_facet(Facet::new(DVector::from_vec(vec![1.0, 1.0]), 1.0));
        assert_eq!(out, DdOutcome::Cut { removed: 1, created: 0 });
        let vs = b.vertices();
        assert_eq!(vs.len(), 3);
        for p in [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]] {
            assert!(contains_point(&vs, &p));
        }
        // the two upper-bound facets now touch a single vertex each
        assert_eq!(b.facets().len(), 3);
    }

    #[test]
    fn corner_cut_creates_two_vertices() {
        let mut b = F2vBuilder::new(&bx(&[(0.0, 2.0), (0.0, 2.0)]), DdCfg::default()).unwrap();
        let out = b.add_facet(Facet::new(DVector::from_vec(vec![1.0, 1.0]), 3.0));
        assert_eq!(out, DdOutcome::Cut { removed: 1, created: 2 });
        let vs = b.vertices();
        assert_eq!(vs.len(), 5);
        assert!(contains_point(&vs, &[2.0, 1.0]));
        assert!(contains_point(&vs, &[1.0, 2.0]));
        assert_eq!(b.edges().len(), 5);
    }

    #[test]
    fn redundant_and_emptying_facets() {
        let mut b = F2vBuilder::new(&bx(&[(0.0, 1.0), (0.0, 1.0)]), DdCfg::default()).unwrap();
        let r = b.add_facet(Facet::new(DVector::from_vec(vec![1.0, 0.0]), 5.0));
        assert_eq!(r, DdOutcome::Redundant);
        let e = b.add_facet(Facet::new(DVector::from_vec(vec![1.0, 1.0]), -1.0));
        assert_eq!(e, DdOutcome::Emptied);
        assert!(b.is_empty());
        assert!(b.vertices().is_empty());
    }

    #[test]
    fn cube_truncation_in_3d() {
        let mut b = F2vBuilder::new(
            &bx(&[(-1.0, 1.0), (-1.0, 1.0), (-1.0, 1.0)]),
            DdCfg::default(),
        )
        .unwrap();
        assert_eq!(b.vertex_count(), 8);
        b.add_facet(Facet::new(DVector::from_vec(vec![1.0, 1.0, 1.0]), 2.0));
        // corner (1,1,1) replaced by a triangle
        assert_eq!(b.vertex_count(), 10);
        assert_eq!(b.facets().len(), 7);
        assert_eq!(b.edges().len(), 15);
    }

    #[test]
    fn rejects_invalid_boxes() {
        assert_eq!(
            F2vBuilder::new(&IntervalVector::new(2), DdCfg::default()).err(),
            Some(PolytopeError::UnboundedBox)
        );
        assert_eq!(
            F2vBuilder::new(&IntervalVector::empty(2), DdCfg::default()).err(),
            Some(PolytopeError::EmptyBox)
        );
    }
}
