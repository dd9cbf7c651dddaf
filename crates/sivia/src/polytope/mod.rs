//! Convex polytopes with dual (facet / vertex) representation.
//!
//! Why this design (short)
//! - Keep both representations materialized: contractors read facets, bounding
//!   boxes and hulls read vertices.
//! - The builder from [`dd`] that produced the current representation is kept,
//!   so `add_facet` / `add_vertex` extend it one element at a time. Switching
//!   between the two kinds of update rebuilds the other builder once.
//! - Vertices are interval vectors enclosing the exact vertices, so the
//!   vertex representation stays an outer approximation under rounding.
//! - A bounding box is always carried; facet sets may omit the box bounds.
//!
//! Conventions
//! - Half-spaces use `row · x <= rhs` ([`Facet`]).
//! - Classification tolerance is [`DdCfg::tolerance`] (`1e-9` by default).

pub mod cfg;
pub mod dd;
mod facet;
mod faces3d;
pub(crate) mod util;
mod volume;


use cfg::DD_EPS;
pub use cfg::DdCfg;
pub use dd::{DdOutcome, F2vBuilder, V2fBuilder};
pub use facet::Facet;

use std::mem;

use nalgebra::DVector;
use thiserror::Error;
use tracing::debug;

use crate::function::{AffineMap, VectorFn};
use crate::interval::{dot, hull_all, BoolInterval, Interval, IntervalVector};

/// Invalid polytope construction input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolytopeError {
    #[error("polytopes need at least one dimension")]
    ZeroDimension,
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
    /// The facet-based builders start from a bounded box.
    #[error("bounding box must be bounded")]
    UnboundedBox,
    #[error("bounding box is empty")]
    EmptyBox,
    #[error("facet {index} has a non-finite coefficient")]
    NonFiniteFacet { index: usize },
    #[error("vertex {index} is empty or unbounded")]
    InvalidVertex { index: usize },
    /// The dimension of an empty vertex list is unknown.
    #[error("no vertices given")]
    NoVertices,
}

/// Bounded convex polytope.
///
/// Invariants:
/// - Empty iff `bbox` is empty (then `facets` and `vertices` are empty).
/// - Every vertex satisfies every facet up to the tolerance, and lies in `bbox`.
/// - `bbox` is the tight hull of the vertices.
#[derive(Clone, Debug)]
pub struct Polytope {
    dim: usize,
    cfg: DdCfg,
    bbox: IntervalVector,
    facets: Vec<Facet>,
    vertices: Vec<IntervalVector>,
    dd: DdState,
}

/// Builder the cached representations were read from.
#[derive(Clone, Debug)]
enum DdState {
    None,
    Facets(Box<F2vBuilder>),
    Vertices(Box<V2fBuilder>),
}

impl Polytope {
    pub fn empty(dim: usize) -> Self {
        Self::empty_with(dim, DdCfg::default())
    }

    fn empty_with(dim: usize, cfg: DdCfg) -> Self {
        Self {
            dim,
            cfg,
            bbox: IntervalVector::empty(dim),
            facets: Vec::new(),
            vertices: Vec::new(),
            dd: DdState::None,
        }
    }

    /// The box itself; an empty box gives the empty polytope.
    pub fn from_box(b: &IntervalVector) -> Result<Self, PolytopeError> {
        Self::from_facets(b, &[])
    }

    /// `bbox ∩ { x : row · x <= rhs for every facet }`.
    pub fn from_facets(bbox: &IntervalVector, facets: &[Facet]) -> Result<Self, PolytopeError> {
        Self::from_facets_with(bbox, facets, DdCfg::default())
    }

    pub fn from_facets_with(
        bbox: &IntervalVector,
        facets: &[Facet],
        cfg: DdCfg,
    ) -> Result<Self, PolytopeError> {
        let dim = bbox.size();
        if dim == 0 {
            return Err(PolytopeError::ZeroDimension);
        }
        for (index, f) in facets.iter().enumerate() {
            if f.dim() != dim {
                return Err(PolytopeError::DimensionMismatch {
                    expected: dim,
                    found: f.dim(),
                });
            }
            if !f.is_finite() {
                return Err(PolytopeError::NonFiniteFacet { index });
            }
        }
        if bbox.is_empty() {
            return Ok(Self::empty_with(dim, cfg));
        }
        let mut b = F2vBuilder::new(bbox, cfg)?;
        for f in facets {
            if f.is_zero_row() {
                if f.rhs < 0.0 {
                    return Ok(Self::empty_with(dim, cfg));
                }
                continue;
            }
            if b.add_facet(f.clone()) == DdOutcome::Emptied {
                debug!(dim, "facets describe an empty polytope");
                return Ok(Self::empty_with(dim, cfg));
            }
        }
        let mut p = Self::empty_with(dim, cfg);
        p.bbox = bbox.clone();
        p.read_facet_builder(Box::new(b));
        Ok(p)
    }

    /// Convex hull of real points.
    pub fn from_vertices(points: &[DVector<f64>]) -> Result<Self, PolytopeError> {
        let boxes: Vec<IntervalVector> = points.iter().map(IntervalVector::from_dvector).collect();
        Self::from_interval_vertices(&boxes)
    }

    /// Polytope enclosing the convex hull of every box in `points`.
    pub fn from_interval_vertices(points: &[IntervalVector]) -> Result<Self, PolytopeError> {
        Self::from_interval_vertices_with(points, DdCfg::default())
    }

    pub fn from_interval_vertices_with(
        points: &[IntervalVector],
        cfg: DdCfg,
    ) -> Result<Self, PolytopeError> {
        let Some(first) = points.first() else {
            return Err(PolytopeError::NoVertices);
        };
        let dim = first.size();
        if dim == 0 {
            return Err(PolytopeError::ZeroDimension);
        }
        for (index, p) in points.iter().enumerate() {
            if p.size() != dim {
                return Err(PolytopeError::DimensionMismatch {
                    expected: dim,
                    found: p.size(),
                });
            }
            if p.is_empty() || p.is_unbounded() {
                return Err(PolytopeError::InvalidVertex { index });
            }
        }
        let mut b = V2fBuilder::new(dim, cfg);
        for p in points {
            b.add_vertex(p.clone());
        }
        let mut p = Self::empty_with(dim, cfg);
        p.read_vertex_builder(Box::new(b));
        Ok(p)
    }

    /// Refreshes the caches from an F2V builder. `self.bbox` must enclose
    /// the builder's region.
    fn read_facet_builder(&mut self, b: Box<F2vBuilder>) {
        let vertices = b.vertices();
        let hull = hull_all(self.dim, &vertices);
        self.bbox = &self.bbox & &hull;
        self.facets = b.facets();
        self.vertices = vertices;
        self.dd = DdState::Facets(b);
    }

    fn read_vertex_builder(&mut self, b: Box<V2fBuilder>) {
        self.bbox = b.bbox();
        self.facets = b.facets();
        self.vertices = b.extreme_vertices();
        self.dd = DdState::Vertices(b);
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn is_empty(&self) -> bool {
        self.bbox.is_empty()
    }

    pub fn bbox(&self) -> &IntervalVector {
        &self.bbox
    }

    pub fn facets(&self) -> &[Facet] {
        &self.facets
    }

    pub fn vertices(&self) -> &[IntervalVector] {
        &self.vertices
    }

    /// Intersection with one more half-space.
    ///
    /// Cuts the kept F2V builder in place; a polytope last built from
    /// vertices first replays its facets into a fresh one.
    pub fn add_facet(&mut self, f: Facet) -> Result<(), PolytopeError> {
        if f.dim() != self.dim {
            return Err(PolytopeError::DimensionMismatch {
                expected: self.dim,
                found: f.dim(),
            });
        }
        if !f.is_finite() {
            return Err(PolytopeError::NonFiniteFacet {
                index: self.facets.len(),
            });
        }
        if self.is_empty() {
            return Ok(());
        }
        if f.is_zero_row() {
            if f.rhs < 0.0 {
                *self = Self::empty_with(self.dim, self.cfg);
            }
            return Ok(());
        }
        let mut b = match mem::replace(&mut self.dd, DdState::None) {
            DdState::Facets(b) => b,
            _ => Box::new(self.facet_builder()?),
        };
        if b.add_facet(f) == DdOutcome::Emptied {
            debug!(dim = self.dim, "added facet emptied the polytope");
            *self = Self::empty_with(self.dim, self.cfg);
            return Ok(());
        }
        self.read_facet_builder(b);
        Ok(())
    }

    /// Convex hull with one more vertex box.
    ///
    /// Extends the kept V2F builder; a polytope last built from facets first
    /// replays its vertices into a fresh one.
    pub fn add_vertex(&mut self, v: IntervalVector) -> Result<(), PolytopeError> {
        if self.dim == 0 {
            return Err(PolytopeError::ZeroDimension);
        }
        if v.size() != self.dim {
            return Err(PolytopeError::DimensionMismatch {
                expected: self.dim,
                found: v.size(),
            });
        }
        if v.is_empty() || v.is_unbounded() {
            return Err(PolytopeError::InvalidVertex {
                index: self.vertices.len(),
            });
        }
        let mut b = match mem::replace(&mut self.dd, DdState::None) {
            DdState::Vertices(b) => b,
            _ => Box::new(self.vertex_builder()),
        };
        b.add_vertex(v);
        self.read_vertex_builder(b);
        Ok(())
    }

    fn facet_builder(&self) -> Result<F2vBuilder, PolytopeError> {
        let mut b = F2vBuilder::new(&self.bbox, self.cfg)?;
        for f in self.facets.iter().filter(|f| !f.is_zero_row()) {
            b.add_facet(f.clone());
        }
        Ok(b)
    }

    fn vertex_builder(&self) -> V2fBuilder {
        let mut b = V2fBuilder::new(self.dim, self.cfg);
        for v in &self.vertices {
            b.add_vertex(v.clone());
        }
        b
    }

    /// Which builder the caches were read from.
    #[cfg(test)]
    pub(crate) fn builder_kind(&self) -> Option<&'static str> {
        match self.dd {
            DdState::None => None,
            DdState::Facets(_) => Some("facets"),
            DdState::Vertices(_) => Some("vertices"),
        }
    }

    /// `self ∩ b`.
    pub fn meet_with_box(&mut self, b: &IntervalVector) -> Result<(), PolytopeError> {
        if b.size() != self.dim {
            return Err(PolytopeError::DimensionMismatch {
                expected: self.dim,
                found: b.size(),
            });
        }
        if self.is_empty() {
            return Ok(());
        }
        let bbox = &self.bbox & b;
        *self = Self::from_facets_with(&bbox, &self.facets, self.cfg)?;
        Ok(())
    }

    /// `self ∩ other`.
    pub fn meet_with_polytope(&self, other: &Polytope) -> Result<Polytope, PolytopeError> {
        if other.dim != self.dim {
            return Err(PolytopeError::DimensionMismatch {
                expected: self.dim,
                found: other.dim,
            });
        }
        if self.is_empty() || other.is_empty() {
            return Ok(Self::empty(self.dim));
        }
        let bbox = &self.bbox & &other.bbox;
        let mut facets = self.facets.clone();
        facets.extend(other.facets.iter().cloned());
        Self::from_facets_with(&bbox, &facets, self.cfg)
    }

    /// Convex hull of `self ∪ other`.
    pub fn hull_of(&self, other: &Polytope) -> Result<Polytope, PolytopeError> {
        if other.dim != self.dim {
            return Err(PolytopeError::DimensionMismatch {
                expected: self.dim,
                found: other.dim,
            });
        }
        if self.is_empty() {
            return Ok(other.clone());
        }
        if other.is_empty() {
            return Ok(self.clone());
        }
        let mut vertices = self.vertices.clone();
        vertices.extend(other.vertices.iter().cloned());
        Self::from_interval_vertices_with(&vertices, self.cfg)
    }

    /// Is `x` inside (`True`), outside (`False`) or undecided (`Unknown`)?
    pub fn contains(&self, x: &IntervalVector) -> BoolInterval {
        assert_eq!(x.size(), self.dim, "polytope dimension mismatch");
        if x.is_empty() {
            return BoolInterval::Empty;
        }
        if self.is_empty() || !x.intersects(&self.bbox) {
            return BoolInterval::False;
        }
        let mut inside = x.is_subset(&self.bbox);
        for f in &self.facets {
            let e = f.eval_box(x);
            if e.lb() > 0.0 {
                return BoolInterval::False;
            }
            if e.ub() > 0.0 {
                inside = false;
            }
        }
        if inside {
            BoolInterval::True
        } else {
            BoolInterval::Unknown
        }
    }

    /// Range of `row · x` over the polytope (enclosure from the vertices).
    pub fn bound_row(&self, row: &DVector<f64>) -> Interval {
        assert_eq!(row.len(), self.dim, "row dimension mismatch");
        self.vertices
            .iter()
            .fold(Interval::empty(), |acc, v| acc | dot(row, v))
    }

    /// `self ⊆ other`, up to the classification tolerance: every vertex box
    /// satisfies every facet of `other` and lies in its (slightly inflated)
    /// bounding box.
    pub fn is_subset(&self, other: &Polytope) -> bool {
        assert_eq!(other.dim, self.dim, "polytope dimension mismatch");
        if self.is_empty() {
            return true;
        }
        if other.is_empty() {
            return false;
        }
        let scale = other
            .bbox
            .iter()
            .map(Interval::mag)
            .fold(1.0, f64::max);
        let tol = DD_EPS * scale;
        let bbox = other.bbox.inflate(tol);
        self.vertices.iter().all(|v| {
            v.is_subset(&bbox)
                && other
                    .facets
                    .iter()
                    .all(|f| f.eval_box(v).ub() <= tol * f.row.amax().max(1.0))
        })
    }

    /// Outer approximation of the Minkowski sum with `[-r, r]ⁿ`.
    pub fn inflate(&self, r: f64) -> Result<Polytope, PolytopeError> {
        assert!(r >= 0.0, "negative inflation radius");
        if self.is_empty() {
            return Ok(self.clone());
        }
        let facets: Vec<Facet> = self
            .facets
            .iter()
            .map(|f| {
                let pad = Interval::point(f.row_norm1()) * r;
                Facet::new(f.row.clone(), (Interval::point(f.rhs) + pad).ub())
            })
            .collect();
        Self::from_facets_with(&self.bbox.inflate(r), &facets, self.cfg)
    }

    /// Image by `x ↦ c + delta (x - c)`.
    pub fn homothety(&self, c: &DVector<f64>, delta: f64) -> Result<Polytope, PolytopeError> {
        assert_eq!(c.len(), self.dim, "center dimension mismatch");
        let m = nalgebra::DMatrix::identity(self.dim, self.dim) * delta;
        let t = c * (1.0 - delta);
        self.push_forward(&AffineMap::new(m, t))
    }

    /// Outer approximation of the affine image `f(self)`.
    pub fn push_forward(&self, f: &AffineMap) -> Result<Polytope, PolytopeError> {
        assert_eq!(f.input_size(), self.dim, "map dimension mismatch");
        if self.is_empty() {
            return Ok(Self::empty(f.output_size()));
        }
        let images: Vec<IntervalVector> = self.vertices.iter().map(|v| f.eval(v)).collect();
        Self::from_interval_vertices_with(&images, self.cfg)
    }

    /// Approximate volume (floating point, not an enclosure).
    pub fn volume(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let mids: Vec<DVector<f64>> = self.vertices.iter().map(IntervalVector::mid).collect();
        volume::volume_of_hull(&mids)
    }

    /// For a 3D polytope: per facet, its vertices as a closed loop ordered
    /// counterclockwise when seen from outside.
    pub fn compute_3d_facets(&self) -> Vec<Vec<DVector<f64>>> {
        assert_eq!(self.dim, 3, "3D facet extraction needs a 3D polytope");
        faces3d::facet_loops(&self.facets, &self.vertices)
    }
}

impl std::fmt::Display for Polytope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "Polytope(empty, dim={})", self.dim);
        }
        writeln!(f, "Polytope(dim={}, bbox={})", self.dim, self.bbox)?;
        for fct in &self.facets {
            let row: Vec<String> = fct.row.iter().map(|a| a.to_string()).collect();
            writeln!(f, "  [{}] . x <= {}", row.join(", "), fct.rhs)?;
        }
        Ok(())
    }
}
