//! Small geometric helpers: centroids, hyperplane bases, loop ordering, dedup.

use nalgebra::DVector;

/// Arithmetic mean of a non-empty point list.
pub(crate) fn centroid(points: &[DVector<f64>]) -> DVector<f64> {
    debug_assert!(!points.is_empty());
    let mut acc = DVector::zeros(points[0].len());
    for p in points {
        acc += p;
    }
    acc / (points.len() as f64)
}

/// Orthonormal basis of the hyperplane orthogonal to `normal` (Gram-Schmidt
/// over the canonical basis). Returns `None` for a null normal.
pub(crate) fn orthonormal_complement(normal: &DVector<f64>, tol: f64) -> Option<Vec<DVector<f64>>> {
    let n = normal.len();
    let norm = normal.norm();
    if norm <= tol {
        return None;
    }
    let mut basis: Vec<DVector<f64>> = vec![normal / norm];
    for i in 0..n {
        if basis.len() == n {
            break;
        }
        let mut v = DVector::zeros(n);
        v[i] = 1.0;
        for b in &basis {
            let c = b.dot(&v);
            v -= b * c;
        }
        let nv = v.norm();
        if nv > 1e-6 {
            basis.push(v / nv);
        }
    }
    if basis.len() != n {
        return None;
    }
    basis.remove(0);
    Some(basis)
}

/// Coordinates of `p - origin` in the given orthonormal basis.
pub(crate) fn project(p: &DVector<f64>, origin: &DVector<f64>, basis: &[DVector<f64>]) -> DVector<f64> {
    let rel = p - origin;
    DVector::from_iterator(basis.len(), basis.iter().map(|b| b.dot(&rel)))
}

/// Orders coplanar points of a 3D facet counterclockwise as seen from the
/// side `normal` points to.
pub(crate) fn order_loop(points: &[DVector<f64>], normal: &DVector<f64>) -> Vec<DVector<f64>> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let Some(basis) = orthonormal_complement(normal, 0.0) else {
        return points.to_vec();
    };
    let (u, w) = (&basis[0], &basis[1]);
    // (u, w, normal) must be right-handed for a counterclockwise loop.
    let handed = u[1] * w[2] - u[2] * w[1];
    let handed = [
        handed,
        u[2] * w[0] - u[0] * w[2],
        u[0] * w[1] - u[1] * w[0],
    ];
    let flip = handed[0] * normal[0] + handed[1] * normal[1] + handed[2] * normal[2] < 0.0;
    let c = centroid(points);
    let mut items: Vec<(f64, DVector<f64>)> = points
        .iter()
        .map(|p| {
            let rel = p - &c;
            let mut angle = w.dot(&rel).atan2(u.dot(&rel));
            if flip {
                angle = -angle;
            }
            (angle, p.clone())
        })
        .collect();
    items.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
    items.into_iter().map(|(_, p)| p).collect()
}

/// Removes points closer than `tol` (max-norm) to an earlier point.
pub(crate) fn dedup_points(points: &mut Vec<DVector<f64>>, tol: f64) {
    let mut kept: Vec<DVector<f64>> = Vec::with_capacity(points.len());
    for p in points.drain(..) {
        if !kept.iter().any(|q| (q - &p).amax() <= tol) {
            kept.push(p);
        }
    }
    *points = kept;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complement_is_orthonormal() {
        let n = DVector::from_vec(vec![1.0, 2.0, -1.0]);
        let b = orthonormal_complement(&n, 1e-12).unwrap();
        assert_eq!(b.len(), 2);
        for v in &b {
            assert!((v.norm() - 1.0).abs() < 1e-12);
            assert!(v.dot(&n).abs() < 1e-12);
        }
        assert!(b[0].dot(&b[1]).abs() < 1e-12);
    }

    #[test]
    fn square_loop_is_counterclockwise_from_above() {
        let pts: Vec<DVector<f64>> = [(1.0, 1.0), (0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]
            .iter()
            .map(|&(x, y)| DVector::from_vec(vec![x, y, 0.0]))
            .collect();
        let normal = DVector::from_vec(vec![0.0, 0.0, 1.0]);
        let l = order_loop(&pts, &normal);
        let mut area = 0.0;
        for i in 0..l.len() {
            let (p, q) = (&l[i], &l[(i + 1) % l.len()]);
            area += p[0] * q[1] - q[0] * p[1];
        }
        assert!((area - 2.0).abs() < 1e-12);
    }
}
