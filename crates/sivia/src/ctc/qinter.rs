//! q-relaxed intersection.

use std::cmp::Ordering;

use super::{check_size, common_size, Ctc};
use crate::interval::{Interval, IntervalVector};

/// Smallest box containing every point that lies in at least `q` of `boxes`.
///
/// Computed per dimension by sweeping the sorted bounds of the non-empty
/// boxes with a running depth: the lower bound is the first point reaching
/// depth `q` from the left, the upper bound the first one from the right.
/// A dimension where no point reaches depth `q` makes the whole box empty.
pub fn qinter(n: usize, q: usize, boxes: &[IntervalVector]) -> IntervalVector {
    assert!(q >= 1, "q-intersection needs q >= 1");
    let live: Vec<&IntervalVector> = boxes.iter().filter(|b| !b.is_empty()).collect();
    if live.len() < q {
        return IntervalVector::empty(n);
    }
    let mut ends = Vec::with_capacity(2 * live.len());
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        ends.clear();
        for b in &live {
            ends.push((b[i].lb(), End::Lower));
            ends.push((b[i].ub(), End::Upper));
        }
        // closed intervals: at equal values, openings come first
        ends.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(Ordering::Equal)
                .then(a.1.cmp(&b.1))
        });
        let lb = first_at_depth(ends.iter(), End::Lower, q);
        let ub = first_at_depth(ends.iter().rev(), End::Upper, q);
        match (lb, ub) {
            (Some(lb), Some(ub)) => out.push(Interval::new(lb, ub)),
            _ => return IntervalVector::empty(n),
        }
    }
    IntervalVector::from_intervals(out)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum End {
    Lower,
    Upper,
}

/// Walks `ends`, counting `opening` ends up and the others down.
fn first_at_depth<'a, I>(ends: I, opening: End, q: usize) -> Option<f64>
where
    I: Iterator<Item = &'a (f64, End)>,
{
    let mut depth = 0usize;
    for &(v, end) in ends {
        if end == opening {
            depth += 1;
            if depth == q {
                return Some(v);
            }
        } else {
            depth = depth.saturating_sub(1);
        }
    }
    None
}

/// Keeps the points that at least `q` of the contractors keep.
pub struct CtcQInter<C = Box<dyn Ctc>> {
    n: usize,
    q: usize,
    list: Vec<C>,
}

impl<C: Ctc> CtcQInter<C> {
    /// Panics unless `1 <= q <= list.len()` and the dimensions agree.
    pub fn new(q: usize, list: Vec<C>) -> Self {
        let n = common_size(&list);
        assert!(q >= 1 && q <= list.len(), "q must lie in 1..=len");
        Self { n, q, list }
    }

    pub fn q(&self) -> usize {
        self.q
    }
}

impl<C: Ctc> Ctc for CtcQInter<C> {
    fn size(&self) -> usize {
        self.n
    }

    fn contract(&self, x: &mut IntervalVector) {
        check_size(self.n, x);
        if x.is_empty() {
            return;
        }
        let results: Vec<IntervalVector> = self
            .list
            .iter()
            .map(|c| {
                let mut y = x.clone();
                c.contract(&mut y);
                y
            })
            .collect();
        x.intersect_with(&qinter(self.n, self.q, &results));
    }
}
