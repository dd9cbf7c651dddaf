//! Ordered vertex loops of 3D facets (for drawing and meshing).

use nalgebra::DVector;

use super::cfg::DD_EPS;
use super::util::{dedup_points, order_loop};
use super::Facet;
use crate::interval::IntervalVector;

/// For each facet with at least three incident vertices, the loop of those
/// vertices (midpoints), counterclockwise seen from outside.
pub(crate) fn facet_loops(facets: &[Facet], vertices: &[IntervalVector]) -> Vec<Vec<DVector<f64>>> {
    let mids: Vec<DVector<f64>> = vertices.iter().map(IntervalVector::mid).collect();
    let scale = mids.iter().map(|p| p.amax()).fold(1.0, f64::max);
    let mut out = Vec::with_capacity(facets.len());
    for f in facets {
        let norm = f.row.norm();
        if norm == 0.0 {
            continue;
        }
        // Interval vertices may sit up to their radius inside the facet.
        let mut on: Vec<DVector<f64>> = vertices
            .iter()
            .zip(&mids)
            .filter(|(v, m)| {
                let slack = f.eval_box(v).diam() + DD_EPS * scale * norm.max(1.0);
                (f.row.dot(m) - f.rhs).abs() <= slack
            })
            .map(|(_, m)| m.clone())
            .collect();
        dedup_points(&mut on, DD_EPS * scale);
        if on.len() >= 3 {
            out.push(order_loop(&on, &f.row));
        }
    }
    out
}
