use nalgebra::DVector;

use super::*;
use crate::actions::OctaSym;
use crate::ctc::{BoundaryCfg, CtcInverse, CtcWrapper};
use crate::function::{AffineMap, ClosureFn};
use crate::interval::{BoolInterval, IntervalMatrix};
use crate::polytope::{Facet, Polytope};

fn bx(b: &[(f64, f64)]) -> IntervalVector {
    IntervalVector::from_bounds(b)
}

fn norm2() -> ClosureFn<impl Fn(&IntervalVector) -> IntervalVector> {
    ClosureFn::new(2, 1, |x: &IntervalVector| {
        IntervalVector::from_intervals(vec![x[0].sqr() + x[1].sqr()])
    })
    .with_jacobian(|x: &IntervalVector| {
        IntervalMatrix::from_row_slice(1, 2, &[x[0] * 2.0, x[1] * 2.0])
    })
}

#[test]
fn wrapper_classifies_relative_to_box() {
    let s = SepWrapper::new(bx(&[(1.0, 2.0)]));
    let p = s.separate(&bx(&[(0.0, 3.0)]));
    assert_eq!(p.outer, bx(&[(1.0, 2.0)]));
    assert_eq!(p.inner, bx(&[(0.0, 3.0)]));
    assert_eq!(p.boundary(), bx(&[(1.0, 2.0)]));

    assert!(s.separate(&bx(&[(1.2, 1.8)])).is_inside());
    assert!(s.separate(&bx(&[(5.0, 6.0)])).is_outside());
}

#[test]
fn ctc_pair_uses_each_side() {
    let s = SepCtcPair::new(
        CtcWrapper::new(bx(&[(-10.0, 0.5)])),
        CtcWrapper::new(bx(&[(0.0, 10.0)])),
    );
    let p = s.separate(&bx(&[(-1.0, 1.0)]));
    assert_eq!(p.inner, bx(&[(-1.0, 0.5)]));
    assert_eq!(p.outer, bx(&[(0.0, 1.0)]));
}

#[test]
fn inter_union_not() {
    let a = SepWrapper::new(bx(&[(0.0, 2.0)]));
    let b = SepWrapper::new(bx(&[(1.0, 3.0)]));

    let x = bx(&[(1.2, 1.8)]);
    assert!((&a).and(&b).separate(&x).is_inside());
    assert!((&a).or(&b).separate(&x).is_inside());

    let x = bx(&[(2.2, 2.8)]);
    assert!((&a).and(&b).separate(&x).is_outside());
    assert!((&a).or(&b).separate(&x).is_inside());

    let x = bx(&[(-1.0, -0.5)]);
    assert!((&a).or(&b).separate(&x).is_outside());
    assert!((&a).or(&b).not().separate(&x).is_inside());

    let x = bx(&[(-1.0, 4.0)]);
    let p = (&a).and(&b).separate(&x);
    assert_eq!(p.outer, bx(&[(1.0, 2.0)]));
    assert_eq!(p.inner, x);
}

/// `|x| + |y| + |z| <= 3` inside `[-2, 2]³`.
fn octa() -> Polytope {
    let facets: Vec<Facet> = (0..8)
        .map(|k| {
            let s = |b: usize| if k >> b & 1 == 1 { -1.0 } else { 1.0 };
            Facet::new(DVector::from_vec(vec![s(0), s(1), s(2)]), 3.0)
        })
        .collect();
    Polytope::from_facets(&bx(&[(-2.0, 2.0); 3]), &facets).unwrap()
}

#[test]
fn polytope_separation() {
    let s = SepPolytope::new(octa());
    let x = IntervalVector::new(3);
    let p = s.separate(&x);
    assert_eq!(p.outer, bx(&[(-2.0, 2.0); 3]));
    assert_eq!(p.inner, x);

    let x = bx(&[(1.02, 2.0); 3]);
    let p = s.separate(&x);
    assert_eq!(p.inner, x);
    assert!(p.is_outside());

    let x = bx(&[(-0.5, 0.5); 3]);
    assert!(s.separate(&x).is_inside());
}

#[test]
fn empty_polytope_separates_everything_outside() {
    let s = SepPolytope::new(Polytope::empty(2));
    let x = bx(&[(0.0, 1.0), (0.0, 1.0)]);
    let p = s.separate(&x);
    assert_eq!(p.inner, x);
    assert!(p.is_outside());
}

#[test]
fn transform_moves_the_set() {
    let s = SepWrapper::new(bx(&[(0.0, 1.0), (0.0, 1.0)]));
    let f = AffineMap::translation(DVector::from_vec(vec![2.0, 0.0]));
    let f_inv = AffineMap::translation(DVector::from_vec(vec![-2.0, 0.0]));
    let t = SepTransform::new(s, f, f_inv);
    assert!(t.separate(&bx(&[(2.2, 2.8), (0.2, 0.8)])).is_inside());
    assert!(t.separate(&bx(&[(0.2, 0.8), (0.2, 0.8)])).is_outside());
    let p = t.separate(&bx(&[(1.5, 2.5), (0.5, 0.6)]));
    assert_eq!(p.outer, bx(&[(2.0, 2.5), (0.5, 0.6)]));
}

#[test]
fn q_inter_of_intervals() {
    let list = vec![
        SepWrapper::new(bx(&[(0.0, 2.0)])),
        SepWrapper::new(bx(&[(1.0, 3.0)])),
        SepWrapper::new(bx(&[(5.0, 6.0)])),
    ];
    let s = SepQInter::new(2, list);
    let p = s.separate(&bx(&[(-10.0, 10.0)]));
    assert_eq!(p.outer, bx(&[(1.0, 2.0)]));
    assert_eq!(p.inner, bx(&[(-10.0, 10.0)]));
    assert!(s.separate(&bx(&[(1.5, 1.8)])).is_inside());
    assert!(s.separate(&bx(&[(5.2, 5.8)])).is_outside());
}

#[test]
fn q_inter_rejects_points_in_a_single_set() {
    let list = vec![
        SepWrapper::new(bx(&[(0.0, 1.0)])),
        SepWrapper::new(bx(&[(2.0, 3.0)])),
        SepWrapper::new(bx(&[(4.0, 5.0)])),
    ];
    let s = SepQInter::new(2, list);
    let x = bx(&[(0.0, 5.0)]);
    let p = s.separate(&x);
    assert!(p.is_outside());
    assert_eq!(p.inner, x);
}

#[test]
fn inverse_separates_disk() {
    let s = SepInverse::new(norm2(), bx(&[(-1.0, 1.0)]));
    assert!(s.separate(&bx(&[(-0.5, 0.5), (-0.5, 0.5)])).is_inside());
    assert!(s.separate(&bx(&[(2.0, 3.0), (2.0, 3.0)])).is_outside());
    let p = s.separate(&bx(&[(0.5, 2.0), (0.0, 0.1)]));
    assert!(!p.is_inside() && !p.is_outside());
}

#[test]
fn action_maps_the_set() {
    let s = OctaSym::new(vec![-2, 1]).unwrap();
    let sep = SepAction::new(SepWrapper::new(bx(&[(0.0, 1.0), (2.0, 3.0)])), s);
    assert!(sep.separate(&bx(&[(-2.9, -2.1), (0.1, 0.9)])).is_inside());
    assert!(sep.separate(&bx(&[(0.1, 0.9), (2.1, 2.9)])).is_outside());
}

#[test]
fn boundary_separator_classifies_removed_pieces() {
    let circle = CtcInverse::new(norm2(), bx(&[(1.0, 1.0)]));
    let disk = |p: &DVector<f64>| BoolInterval::from(p.norm_squared() <= 1.0);
    let cfg = BoundaryCfg {
        seed: Some(1),
        ..BoundaryCfg::default()
    };
    let s = SepBoundary::with_cfg(&circle, disk, cfg);
    assert!(s.separate(&bx(&[(-0.5, 0.5), (-0.5, 0.5)])).is_inside());
    assert!(s.separate(&bx(&[(2.0, 3.0), (2.0, 3.0)])).is_outside());
    let x = bx(&[(0.0, 2.0), (-0.1, 0.1)]);
    let p = s.separate(&x);
    assert_eq!(&p.inner | &p.outer, x);
}

#[test]
fn boundary_separator_keeps_unknown_pieces_on_both_sides() {
    let calls = std::cell::Cell::new(0);
    let test = |_: &DVector<f64>| {
        calls.set(calls.get() + 1);
        BoolInterval::Unknown
    };
    let s = SepBoundary::new(CtcWrapper::new(bx(&[(0.0, 1.0)])), test);
    let x = bx(&[(-1.0, 1.0)]);
    let p = s.separate(&x);
    assert_eq!(p.inner, x);
    assert_eq!(p.outer, x);
    assert!(bx(&[(-1.0, 0.0)]).is_subset(&p.boundary()));
    assert_eq!(calls.get(), 1 + BoundaryCfg::default().attempts);
}

#[test]
#[should_panic(expected = "empty answer")]
fn boundary_separator_rejects_empty_answers() {
    let s = SepBoundary::new(CtcWrapper::new(bx(&[(0.0, 1.0)])), |_: &DVector<f64>| {
        BoolInterval::Empty
    });
    s.separate(&bx(&[(-1.0, 1.0)]));
}
