//! Vertex→facet builder (dual of [`super::F2vBuilder`]).

use nalgebra::{DMatrix, DVector};
use tracing::{debug, trace};

use super::{common, insert_sorted, new_links, Candidate, DdOutcome, Side};
use crate::interval::{dot, hull_all, IntervalVector};
use crate::polytope::cfg::RANK_EPS;
use crate::polytope::{DdCfg, Facet};

#[derive(Clone, Debug)]
struct DdFacet {
    f: Facet,
    /// Sorted ids of the vertices lying on this facet.
    vtx: Vec<usize>,
    links: Vec<usize>,
}

/// Incremental V2F construction.
///
/// Vertices may be boxes; the combinatorics run on their midpoints and the
/// reported right-hand sides are padded so that every input box satisfies
/// every facet. Until `n + 1` affinely independent vertices are known the
/// builder is pending and reports the bounding box facets of the vertices.
#[derive(Clone, Debug)]
pub struct V2fBuilder {
    dim: usize,
    cfg: DdCfg,
    vertices: Vec<IntervalVector>,
    mids: Vec<DVector<f64>>,
    basis: Vec<usize>,
    facets: Vec<Option<DdFacet>>,
    started: bool,
}

impl V2fBuilder {
    pub fn new(dim: usize, cfg: DdCfg) -> Self {
        assert!(dim > 0, "zero-dimensional vertex builder");
        Self {
            dim,
            cfg,
            vertices: Vec::new(),
            mids: Vec::new(),
            basis: Vec::new(),
            facets: Vec::new(),
            started: false,
        }
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// `false` while fewer than `n + 1` affinely independent vertices are known.
    pub fn is_full_dimensional(&self) -> bool {
        self.started
    }

    pub fn add_point(&mut self, p: &DVector<f64>) -> DdOutcome {
        self.add_vertex(IntervalVector::from_dvector(p))
    }

    /// Adds a (non-empty, bounded) vertex box.
    pub fn add_vertex(&mut self, v: IntervalVector) -> DdOutcome {
        assert_eq!(v.size(), self.dim, "vertex dimension mismatch");
        assert!(!v.is_empty() && !v.is_unbounded(), "vertex must be a bounded box");
        let id = self.vertices.len();
        self.mids.push(v.mid());
        self.vertices.push(v);
        if self.started {
            return self.insert(id);
        }
        if self.extends_basis(id) {
            self.basis.push(id);
        }
        if self.basis.len() <= self.dim {
            return DdOutcome::Pending;
        }
        self.build_simplex();
        self.started = true;
        for k in 0..self.vertices.len() {
            if !self.basis.contains(&k) {
                self.insert(k);
            }
        }
        let created = self.facets.iter().flatten().count();
        debug!(dim = self.dim, facets = created, "v2f builder left pending state");
        DdOutcome::Cut {
            removed: 0,
            created,
        }
    }

    /// Does vertex `id` increase the affine rank of the basis?
    fn extends_basis(&self, id: usize) -> bool {
        let Some(&origin) = self.basis.first() else {
            return true;
        };
        let o = &self.mids[origin];
        let cols: Vec<DVector<f64>> = self.basis[1..]
            .iter()
            .chain(std::iter::once(&id))
            .map(|&k| &self.mids[k] - o)
            .collect();
        let m = DMatrix::from_columns(&cols);
        let scale = m.amax().max(f64::MIN_POSITIVE);
        m.rank(RANK_EPS * scale) == cols.len()
    }

    fn build_simplex(&mut self) {
        let n = self.dim;
        let pts: Vec<DVector<f64>> = self.basis.iter().map(|&k| self.mids[k].clone()).collect();
        for k in 0..=n {
            let others: Vec<usize> = (0..=n).filter(|&j| j != k).collect();
            let r = others[0];
            let row = if n == 1 {
                DVector::from_element(1, 1.0)
            } else {
                let diffs =
                    DMatrix::from_fn(n - 1, n, |i, j| pts[others[i + 1]][j] - pts[r][j]);
                cofactor_normal(&diffs)
            };
            let mut f = Facet::new(row.clone(), row.dot(&pts[r]));
            if row.dot(&pts[k]) > f.rhs {
                f = f.reversed();
            }
            self.facets.push(Some(DdFacet {
                f: f.normalized(),
                vtx: others.iter().map(|&j| self.basis[j]).collect(),
                links: (0..=n).filter(|&j| j != k).collect(),
            }));
        }
    }

    /// Dual update: inserts vertex `id` into the current facet set.
    fn insert(&mut self, id: usize) -> DdOutcome {
        let m = self.mids[id].clone();
        let tol = self.cfg.tolerance;
        let lams: Vec<f64> = self
            .facets
            .iter()
            .map(|slot| slot.as_ref().map_or(0.0, |d| d.f.row.dot(&m) - d.f.rhs))
            .collect();
        let sides: Vec<Option<Side>> = self
            .facets
            .iter()
            .zip(&lams)
            .map(|(slot, &l)| {
                slot.as_ref().map(|_| {
                    if l < -tol {
                        Side::In
                    } else if l > tol {
                        Side::Out
                    } else {
                        Side::On
                    }
                })
            })
            .collect();

        if !sides.iter().any(|s| *s == Some(Side::Out)) {
            for (k, slot) in self.facets.iter_mut().enumerate() {
                if let (Some(d), Some(Side::On)) = (slot.as_mut(), sides[k]) {
                    insert_sorted(&mut d.vtx, id);
                }
            }
            trace!(vertex = id, "redundant vertex");
            return DdOutcome::Redundant;
        }

        let first_new = self.facets.len();
        let mut removed = 0;
        for f in 0..first_new {
            if sides[f] != Some(Side::Out) {
                continue;
            }
            let Some(df) = self.facets[f].take() else {
                continue;
            };
            removed += 1;
            for &g in &df.links {
                match sides[g] {
                    Some(Side::In) => {
                        let Some(dg) = self.facets[g].as_ref() else {
                            continue;
                        };
                        let child = child_facet(&df, dg, g, lams[f], lams[g], id);
                        let cid = self.facets.len();
                        self.facets.push(Some(child));
                        if let Some(dg) = self.facets[g].as_mut() {
                            for l in dg.links.iter_mut() {
                                if *l == f {
                                    *l = cid;
                                }
                            }
                        }
                    }
                    Some(Side::On) => {
                        if let Some(dg) = self.facets[g].as_mut() {
                            dg.links.retain(|&l| l != f);
                        }
                    }
                    _ => {}
                }
            }
        }

        let mut cand_ids = Vec::new();
        for k in 0..self.facets.len() {
            let on = k < first_new && sides[k] == Some(Side::On);
            if on {
                if let Some(d) = self.facets[k].as_mut() {
                    insert_sorted(&mut d.vtx, id);
                }
            }
            if (on || k >= first_new) && self.facets[k].is_some() {
                cand_ids.push(k);
            }
        }
        let pairs = {
            let cands: Vec<Candidate<'_>> = cand_ids
                .iter()
                .filter_map(|&k| {
                    self.facets[k].as_ref().map(|d| Candidate {
                        id: k,
                        incidence: &d.vtx,
                        links: &d.links,
                    })
                })
                .collect();
            new_links(&cands, self.dim)
        };
        for (a, b) in pairs {
            if let Some(d) = self.facets[a].as_mut() {
                d.links.push(b);
            }
            if let Some(d) = self.facets[b].as_mut() {
                d.links.push(a);
            }
        }

        let created = self.facets.len() - first_new;
        trace!(vertex = id, removed, created, "vertex added");
        DdOutcome::Cut { removed, created }
    }

    /// Facets enclosing every vertex box.
    pub fn facets(&self) -> Vec<Facet> {
        if self.vertices.is_empty() {
            return Vec::new();
        }
        if !self.started {
            let h = hull_all(self.dim, &self.vertices);
            let mut out = Vec::with_capacity(2 * self.dim);
            for (i, xi) in h.iter().enumerate() {
                out.push(Facet::axis(self.dim, i, false, xi.lb()));
                out.push(Facet::axis(self.dim, i, true, xi.ub()));
            }
            return out;
        }
        self.facets
            .iter()
            .flatten()
            .map(|d| {
                let rhs = self
                    .vertices
                    .iter()
                    .map(|v| dot(&d.f.row, v).ub())
                    .fold(d.f.rhs, f64::max);
                Facet::new(d.f.row.clone(), rhs)
            })
            .collect()
    }

    /// Vertices lying on at least `n` facets (all vertices while pending).
    pub fn extreme_vertices(&self) -> Vec<IntervalVector> {
        if !self.started {
            return self.vertices.clone();
        }
        let mut count = vec![0usize; self.vertices.len()];
        for d in self.facets.iter().flatten() {
            for &v in &d.vtx {
                count[v] += 1;
            }
        }
        self.vertices
            .iter()
            .zip(count)
            .filter(|(_, c)| *c >= self.dim)
            .map(|(v, _)| v.clone())
            .collect()
    }

    pub fn bbox(&self) -> IntervalVector {
        hull_all(self.dim, &self.vertices)
    }
}

/// Positive combination of an `Out` facet `f` (`lf > 0`) and an `In` facet
/// `g` (`lg < 0`) passing through the new vertex.
fn child_facet(df: &DdFacet, dg: &DdFacet, g: usize, lf: f64, lg: f64, id: usize) -> DdFacet {
    let row = &df.f.row * (-lg) + &dg.f.row * lf;
    let rhs = df.f.rhs * (-lg) + dg.f.rhs * lf;
    let mut vtx = common(&df.vtx, &dg.vtx);
    insert_sorted(&mut vtx, id);
    DdFacet {
        f: Facet::new(row, rhs).normalized(),
        vtx,
        links: vec![g],
    }
}

/// Normal to the rows of an `(n-1) × n` matrix via signed minors.
fn cofactor_normal(m: &DMatrix<f64>) -> DVector<f64> {
    let n = m.ncols();
    DVector::from_fn(n, |i, _| {
        let minor = m.clone().remove_column(i);
        let det = minor.determinant();
        if i % 2 == 0 {
            det
        } else {
            -det
        }
    })
}
