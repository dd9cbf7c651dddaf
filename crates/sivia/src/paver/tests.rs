use std::f64::consts::PI;

use super::*;
use crate::ctc::CtcPolytope;
use crate::function::ClosureFn;
use crate::interval::IntervalMatrix;
use crate::polytope::Polytope;
use crate::sep::{SepInverse, SepWrapper};

fn bx(b: &[(f64, f64)]) -> IntervalVector {
    IntervalVector::from_bounds(b)
}

fn disk() -> SepInverse<impl crate::function::VectorFn> {
    let f = ClosureFn::new(2, 1, |x: &IntervalVector| {
        IntervalVector::from_intervals(vec![x[0].sqr() + x[1].sqr()])
    })
    .with_jacobian(|x: &IntervalVector| {
        IntervalMatrix::from_row_slice(1, 2, &[x[0] * 2.0, x[1] * 2.0])
    });
    SepInverse::new(f, bx(&[(-1.0, 1.0)]))
}

fn assert_partition(p: &Paving) {
    for id in 0..p.len() {
        let n = p.node(NodeId(id));
        if let NodeKind::Split { children, .. } = n.kind {
            let (a, b) = (p.node(children[0]), p.node(children[1]));
            assert_eq!(&(&a.bx | &b.bx), &n.bx);
            assert_eq!(a.depth, n.depth + 1);
        }
    }
}

#[test]
fn disk_paving_brackets_area() {
    let x = bx(&[(-2.0, 2.0), (-2.0, 2.0)]);
    let p = pave(&x, &disk(), PavingCfg::with_eps(0.05)).unwrap();
    let vin = p.volume(PavingLabel::In);
    let vb = p.volume(PavingLabel::Boundary);
    let vout = p.volume(PavingLabel::Out);
    assert!(vin > 0.0 && vin <= PI, "inner area {vin}");
    assert!(vin + vb >= PI, "outer area {}", vin + vb);
    assert!((vin + vb + vout - 16.0).abs() < 1e-9);
    assert_eq!(p.label_at(&[0.0, 0.0]), Some(PavingLabel::In));
    assert_eq!(p.label_at(&[1.9, 1.9]), Some(PavingLabel::Out));
    assert_eq!(p.label_at(&[3.0, 0.0]), None);
    assert!(p.depth() > 4);
    assert_partition(&p);
    for b in p.boxes(PavingLabel::Boundary) {
        assert!(b.max_diam() <= 0.05);
    }
}

#[test]
fn decided_box_is_a_single_leaf() {
    let s = SepWrapper::new(bx(&[(-5.0, 5.0), (-5.0, 5.0)]));
    let p = pave(&bx(&[(0.0, 1.0), (0.0, 1.0)]), &s, PavingCfg::default()).unwrap();
    assert_eq!(p.len(), 1);
    assert_eq!(p.count(PavingLabel::In), 1);
    assert_eq!(p.depth(), 0);
    assert_eq!(p.dim(), 2);
}

#[test]
fn box_test_paving() {
    let poly = Polytope::from_vertices(&[
        nalgebra::DVector::from_vec(vec![0.0, 0.0]),
        nalgebra::DVector::from_vec(vec![1.0, 0.0]),
        nalgebra::DVector::from_vec(vec![0.0, 1.0]),
    ])
    .unwrap();
    let x = bx(&[(-0.5, 1.5), (-0.5, 1.5)]);
    let p = regular_pave(&x, |b| poly.contains(b), PavingCfg::with_eps(0.05)).unwrap();
    let vin = p.volume(PavingLabel::In);
    assert!(vin > 0.25 && vin <= 0.5, "{vin}");
    assert_partition(&p);
}

#[test]
fn unsplittable_box_becomes_boundary_leaf() {
    // [1, 1 + ulp] has no float strictly between its bounds
    let x = bx(&[(1.0, 1.0 + f64::EPSILON)]);
    let s = SepWrapper::new(bx(&[(0.0, 1.0)]));
    let p = pave(&x, &s, PavingCfg::with_eps(1e-300)).unwrap();
    assert_eq!(p.len(), 1);
    assert_eq!(p.count(PavingLabel::Boundary), 1);
    assert_eq!(p.depth(), 0);
}

#[test]
fn contractor_paving_never_claims_inside() {
    let poly = Polytope::from_box(&bx(&[(0.0, 1.0), (0.0, 1.0)])).unwrap();
    let c = CtcPolytope::new(poly);
    let x = bx(&[(-2.0, 2.0), (-2.0, 2.0)]);
    let p = pave_ctc(&x, &c, PavingCfg::with_eps(0.1)).unwrap();
    assert_eq!(p.count(PavingLabel::In), 0);
    assert!(p.count(PavingLabel::Out) > 0);
    let covered: f64 = p.volume(PavingLabel::Boundary);
    assert!(covered >= 1.0);
}

#[test]
fn invalid_inputs() {
    let s = SepWrapper::new(bx(&[(0.0, 1.0)]));
    let x = bx(&[(0.0, 2.0)]);
    assert_eq!(
        pave(&x, &s, PavingCfg::with_eps(0.0)).err(),
        Some(PavingError::InvalidEps { eps: 0.0 })
    );
    let cfg = PavingCfg {
        bisect_ratio: 1.0,
        ..PavingCfg::default()
    };
    assert_eq!(
        pave(&x, &s, cfg).err(),
        Some(PavingError::InvalidRatio { ratio: 1.0 })
    );
    assert_eq!(
        pave(&IntervalVector::empty(1), &s, PavingCfg::default()).err(),
        Some(PavingError::EmptyBox)
    );
    assert_eq!(
        pave(&IntervalVector::new(1), &s, PavingCfg::default()).err(),
        Some(PavingError::UnboundedBox)
    );
    assert_eq!(
        pave(&bx(&[(0.0, 1.0), (0.0, 1.0)]), &s, PavingCfg::default()).err(),
        Some(PavingError::DimensionMismatch {
            expected: 1,
            found: 2
        })
    );
}
