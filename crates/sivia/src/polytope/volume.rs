//! Volume via facet cones anchored at an interior point.
//!
//! `vol(P) = Σ_F h_F · vol_{n-1}(F) / n`, where `h_F` is the distance from the
//! centroid of the vertices to facet `F`. Facet volumes are computed by the
//! same formula after projecting the facet's vertices onto an orthonormal
//! basis of its hyperplane, down to segments in dimension one.

use nalgebra::DVector;

use super::cfg::DD_EPS;
use super::util::{centroid, dedup_points, orthonormal_complement, project};
use super::{DdCfg, V2fBuilder};

/// Volume of the convex hull of `points` (all of the same dimension).
pub(crate) fn volume_of_hull(points: &[DVector<f64>]) -> f64 {
    let Some(first) = points.first() else {
        return 0.0;
    };
    let n = first.len();
    if n == 1 {
        let lo = points.iter().map(|p| p[0]).fold(f64::INFINITY, f64::min);
        let hi = points.iter().map(|p| p[0]).fold(f64::NEG_INFINITY, f64::max);
        return (hi - lo).max(0.0);
    }
    let mut pts = points.to_vec();
    let scale = pts.iter().map(|p| p.amax()).fold(1.0, f64::max);
    dedup_points(&mut pts, DD_EPS * scale);
    if pts.len() <= n {
        return 0.0;
    }
    let mut b = V2fBuilder::new(n, DdCfg::default());
    for p in &pts {
        b.add_point(p);
    }
    if !b.is_full_dimensional() {
        return 0.0;
    }
    let center = centroid(&pts);
    let mut total = 0.0;
    for f in b.facets() {
        let norm = f.row.norm();
        if norm <= DD_EPS {
            continue;
        }
        let height = (f.rhs - f.row.dot(&center)) / norm;
        if height <= 0.0 {
            continue;
        }
        let tol = DD_EPS * scale.max(f.rhs.abs()) * norm.max(1.0);
        let on: Vec<DVector<f64>> = pts
            .iter()
            .filter(|p| (f.row.dot(p) - f.rhs).abs() <= tol)
            .cloned()
            .collect();
        if on.len() < n {
            continue;
        }
        let Some(basis) = orthonormal_complement(&f.row, DD_EPS) else {
            continue;
        };
        let origin = on[0].clone();
        let projected: Vec<DVector<f64>> = on.iter().map(|p| project(p, &origin, &basis)).collect();
        total += height * volume_of_hull(&projected) / n as f64;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(v: &[&[f64]]) -> Vec<DVector<f64>> {
        v.iter().map(|p| DVector::from_vec(p.to_vec())).collect()
    }

    #[test]
    fn unit_square_and_triangle() {
        let sq = pts(&[&[0.0, 0.0], &[1.0, 0.0], &[1.0, 1.0], &[0.0, 1.0]]);
        assert!((volume_of_hull(&sq) - 1.0).abs() < 1e-12);
        let tri = pts(&[&[0.0, 0.0], &[2.0, 0.0], &[0.0, 2.0]]);
        assert!((volume_of_hull(&tri) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn cube_volume() {
        let mut v = Vec::new();
        for i in 0..8 {
            v.push(DVector::from_vec(vec![
                2.0 * (i & 1) as f64,
                2.0 * ((i >> 1) & 1) as f64,
                2.0 * ((i >> 2) & 1) as f64,
            ]));
        }
        assert!((volume_of_hull(&v) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn flat_sets_have_zero_volume() {
        let seg = pts(&[&[0.0, 0.0], &[1.0, 1.0], &[2.0, 2.0]]);
        assert_eq!(volume_of_hull(&seg), 0.0);
    }
}
