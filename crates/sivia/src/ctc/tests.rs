use nalgebra::{DMatrix, DVector};

use super::*;
use crate::actions::OctaSym;
use crate::function::ClosureFn;
use crate::interval::{BoolInterval, Interval, IntervalMatrix};
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
fn wrapper_intersects() {
    let c = CtcWrapper::new(bx(&[(0.0, 1.0), (2.0, 3.0)]));
    let mut x = bx(&[(0.5, 5.0), (-1.0, 2.5)]);
    c.contract(&mut x);
    assert_eq!(x, bx(&[(0.5, 1.0), (2.0, 2.5)]));
    let mut far = bx(&[(4.0, 5.0), (0.0, 1.0)]);
    c.contract(&mut far);
    assert!(far.is_empty());
}

#[test]
fn and_or_combinators() {
    let a = CtcWrapper::new(bx(&[(0.0, 2.0)]));
    let b = CtcWrapper::new(bx(&[(1.0, 4.0)]));
    let mut x = bx(&[(-10.0, 10.0)]);
    (&a).and(&b).contract(&mut x);
    assert_eq!(x, bx(&[(1.0, 2.0)]));

    let far = CtcWrapper::new(bx(&[(6.0, 7.0)]));
    let mut x = bx(&[(-10.0, 10.0)]);
    (&a).or(&far).contract(&mut x);
    assert_eq!(x, bx(&[(0.0, 7.0)]));

    let mut x = bx(&[(-10.0, 10.0)]);
    (&a).and(&far).contract(&mut x);
    assert!(x.is_empty());
}

#[test]
fn list_forms_match_pairs() {
    let list: Vec<Box<dyn Ctc>> = vec![
        Box::new(CtcWrapper::new(bx(&[(0.0, 5.0)]))),
        Box::new(CtcWrapper::new(bx(&[(2.0, 8.0)]))),
        Box::new(CtcWrapper::new(bx(&[(3.0, 9.0)]))),
    ];
    let inter = CtcInterList::new(list);
    assert_eq!(inter.len(), 3);
    let mut x = IntervalVector::new(1);
    inter.contract(&mut x);
    assert_eq!(x, bx(&[(3.0, 5.0)]));

    let union = CtcUnionList::new(vec![
        CtcWrapper::new(bx(&[(0.0, 1.0)])),
        CtcWrapper::new(bx(&[(20.0, 21.0)])),
        CtcWrapper::new(bx(&[(-3.0, -2.0)])),
    ]);
    let mut x = bx(&[(-10.0, 10.0)]);
    union.contract(&mut x);
    assert_eq!(x, bx(&[(-3.0, 1.0)]));
}

#[test]
fn q_inter_contractor() {
    let list = vec![
        CtcWrapper::new(bx(&[(0.0, 2.0)])),
        CtcWrapper::new(bx(&[(1.0, 3.0)])),
        CtcWrapper::new(bx(&[(5.0, 6.0)])),
    ];
    let c = CtcQInter::new(2, list);
    let mut x = bx(&[(-10.0, 10.0)]);
    c.contract(&mut x);
    assert_eq!(x, bx(&[(1.0, 2.0)]));
}

#[test]
#[should_panic(expected = "does not match operator dimension")]
fn dimension_mismatch_panics() {
    let c = CtcWrapper::new(bx(&[(0.0, 1.0)]));
    let mut x = IntervalVector::new(2);
    c.contract(&mut x);
}

#[test]
fn polytope_contracts_space_to_its_box() {
    let c = CtcPolytope::new(octa());
    let mut x = IntervalVector::new(3);
    c.contract(&mut x);
    assert_eq!(x, bx(&[(-2.0, 2.0); 3]));

    let mut corner = bx(&[(1.02, 2.0); 3]);
    c.contract(&mut corner);
    assert!(corner.is_empty());
}

#[test]
fn polytope_facet_sweep_narrows() {
    // x + y <= 1 in [0, 2]²
    let p = Polytope::from_facets(
        &bx(&[(0.0, 2.0), (0.0, 2.0)]),
        &[Facet::new(DVector::from_vec(vec![1.0, 1.0]), 1.0)],
    )
    .unwrap();
    let c = CtcPolytope::new(p);
    let mut x = bx(&[(0.0, 2.0), (0.5, 2.0)]);
    c.contract(&mut x);
    assert!((x[0].ub() - 0.5).abs() < 1e-12);
    assert!((x[1].ub() - 1.0).abs() < 1e-12);

    let mut y = IntervalVector::new(2);
    CtcPolytope::new(Polytope::empty(2)).contract(&mut y);
    assert!(y.is_empty());
}

#[test]
fn inverse_centered_form_contracts() {
    let c = CtcInverse::new(norm2(), bx(&[(0.0, 1.0)]));
    let mut x = bx(&[(0.5, 2.0), (0.0, 0.1)]);
    c.contract(&mut x);
    assert!(x[0].contains(1.0));
    assert!(x[0].ub() < 1.2, "{x}");

    let mut far = bx(&[(2.0, 3.0), (2.0, 3.0)]);
    c.contract(&mut far);
    assert!(far.is_empty());
}

#[test]
fn inverse_without_jacobian_only_tests() {
    let f = ClosureFn::new(1, 1, |x: &IntervalVector| {
        IntervalVector::from_intervals(vec![x[0] * 2.0])
    });
    let c = CtcInverse::new(f, bx(&[(0.0, 1.0)]));
    let mut x = bx(&[(0.0, 4.0)]);
    c.contract(&mut x);
    assert_eq!(x, bx(&[(0.0, 4.0)]));
    let mut x = bx(&[(0.4, 4.0)]);
    c.contract(&mut x);
    assert_eq!(x, bx(&[(0.4, 4.0)]));
    let mut x = bx(&[(3.0, 4.0)]);
    c.contract(&mut x);
    assert!(x.is_empty());
}

#[test]
fn inverse_affine_is_exact_on_linear_maps() {
    let f = crate::function::AffineMap::linear(DMatrix::from_row_slice(1, 2, &[1.0, 1.0]));
    let c = CtcInverse::new(f, bx(&[(0.0, 1.0)]));
    let mut x = bx(&[(0.0, 4.0), (0.0, 0.5)]);
    c.contract(&mut x);
    assert!((x[0].ub() - 1.0).abs() < 1e-12, "{x}");
}

#[test]
fn boundary_restores_inside_pieces() {
    let circle = CtcInverse::new(norm2(), bx(&[(1.0, 1.0)]));
    let disk = |p: &DVector<f64>| BoolInterval::from(p.norm_squared() <= 1.0);
    let cfg = BoundaryCfg {
        seed: Some(7),
        ..BoundaryCfg::default()
    };
    let c = CtcBoundary::with_cfg(&circle, disk, cfg);

    let mut inside = bx(&[(-0.5, 0.5), (-0.5, 0.5)]);
    c.contract(&mut inside);
    assert_eq!(inside, bx(&[(-0.5, 0.5), (-0.5, 0.5)]));

    let mut outside = bx(&[(2.0, 3.0), (2.0, 3.0)]);
    c.contract(&mut outside);
    assert!(outside.is_empty());

    let mut straddle = bx(&[(0.0, 2.0), (-0.1, 0.1)]);
    c.contract(&mut straddle);
    assert!(straddle[0].contains(0.0) && straddle[0].contains(1.0));
}

#[test]
fn boundary_retries_on_unknown() {
    let calls = std::cell::Cell::new(0);
    let test = |_: &DVector<f64>| {
        calls.set(calls.get() + 1);
        BoolInterval::Unknown
    };
    let c = CtcBoundary::new(CtcWrapper::new(bx(&[(0.0, 1.0)])), test);
    let mut x = bx(&[(-1.0, 1.0)]);
    c.contract(&mut x);
    // unknown pieces are kept
    assert_eq!(x, bx(&[(-1.0, 1.0)]));
    assert_eq!(calls.get(), 1 + c.cfg().attempts);
}

#[test]
#[should_panic(expected = "empty answer")]
fn boundary_rejects_empty_answers() {
    let c = CtcBoundary::new(CtcWrapper::new(bx(&[(0.0, 1.0)])), |_: &DVector<f64>| {
        BoolInterval::Empty
    });
    let mut x = bx(&[(-1.0, 1.0)]);
    c.contract(&mut x);
}

#[test]
fn action_maps_the_set() {
    let s = OctaSym::new(vec![-2, 1]).unwrap();
    let c = CtcAction::new(CtcWrapper::new(bx(&[(0.0, 1.0), (2.0, 3.0)])), s);
    let mut x = IntervalVector::new(2);
    c.contract(&mut x);
    assert_eq!(x, bx(&[(-3.0, -2.0), (0.0, 1.0)]));
}

#[test]
fn contraction_keeps_empty_boxes_empty() {
    let c = CtcPolytope::new(octa());
    let mut x = IntervalVector::empty(3);
    c.contract(&mut x);
    assert!(x.is_empty());
    assert_eq!(Interval::empty(), x[0]);
}
