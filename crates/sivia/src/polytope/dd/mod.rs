//! Double Description method: incremental facet→vertex and vertex→facet
//! construction.
//!
//! Both builders keep an arena of elements addressed by stable indices
//! (`Vec<Option<_>>`, removed slots become `None`). Each element stores its
//! incidence list (sorted ids of the dual elements it lies on) and its
//! adjacency list (ids of neighbouring elements of the same kind). Adjacency
//! after an update is decided by the combinatorial test: two candidates are
//! linked when they share at least `n - 1` incidences and no third candidate's
//! incidence contains the shared set.

mod f2v;
mod v2f;

pub use f2v::F2vBuilder;
pub use v2f::V2fBuilder;

use crate::interval::Interval;

/// Result of inserting one facet (F2V) or one vertex (V2F).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DdOutcome {
    /// V2F only: not enough affinely independent vertices yet.
    Pending,
    /// Nothing removed; the element is redundant.
    Redundant,
    /// `removed` elements were dropped and `created` new ones built.
    Cut { removed: usize, created: usize },
    /// F2V only: every vertex violated the new facet.
    Emptied,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    In,
    On,
    Out,
}

#[inline]
pub(crate) fn side_of(lambda: Interval, tol: f64) -> Side {
    if lambda.ub() < -tol {
        Side::In
    } else if lambda.lb() > tol {
        Side::Out
    } else {
        Side::On
    }
}

/// Intersection of two sorted id lists.
pub(crate) fn common(a: &[usize], b: &[usize]) -> Vec<usize> {
    let (mut i, mut j) = (0, 0);
    let mut out = Vec::new();
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}

/// `small ⊆ big` for sorted id lists.
pub(crate) fn is_sorted_subset(small: &[usize], big: &[usize]) -> bool {
    let mut j = 0;
    for &x in small {
        while j < big.len() && big[j] < x {
            j += 1;
        }
        if j == big.len() || big[j] != x {
            return false;
        }
        j += 1;
    }
    true
}

pub(crate) fn insert_sorted(v: &mut Vec<usize>, x: usize) {
    if let Err(pos) = v.binary_search(&x) {
        v.insert(pos, x);
    }
}

/// One element taking part in the adjacency update.
pub(crate) struct Candidate<'a> {
    pub id: usize,
    pub incidence: &'a [usize],
    pub links: &'a [usize],
}

/// Pairs of candidates to link after an update in dimension `n`.
pub(crate) fn new_links(cands: &[Candidate<'_>], n: usize) -> Vec<(usize, usize)> {
    let need = n.saturating_sub(1);
    let mut out = Vec::new();
    for (a, ca) in cands.iter().enumerate() {
        for cb in &cands[a + 1..] {
            if ca.links.contains(&cb.id) {
                continue;
            }
            let shared = common(ca.incidence, cb.incidence);
            if shared.len() < need {
                continue;
            }
            let dominated = cands.iter().any(|cc| {
                cc.id != ca.id && cc.id != cb.id && is_sorted_subset(&shared, cc.incidence)
            });
            if !dominated {
                out.push((ca.id, cb.id));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorted_list_helpers() {
        assert_eq!(common(&[1, 3, 5, 7], &[2, 3, 7, 8]), vec![3, 7]);
        assert!(is_sorted_subset(&[3, 7], &[1, 3, 5, 7]));
        assert!(!is_sorted_subset(&[3, 4], &[1, 3, 5, 7]));
        let mut v = vec![1, 4];
        insert_sorted(&mut v, 3);
        insert_sorted(&mut v, 3);
        assert_eq!(v, vec![1, 3, 4]);
    }

    #[test]
    fn adjacency_rejects_dominated_pairs() {
        // Square face in 3D: corners share facet 9 and pairwise one side facet.
        let inc = [vec![0, 2, 9], vec![1, 2, 9], vec![1, 3, 9], vec![0, 3, 9]];
        let cands: Vec<Candidate<'_>> = inc
            .iter()
            .enumerate()
            .map(|(id, i)| Candidate {
                id,
                incidence: i,
                links: &[],
            })
            .collect();
        let mut links = new_links(&cands, 3);
        links.sort();
        assert_eq!(links, vec![(0, 1), (0, 3), (1, 2), (2, 3)]);
    }
}
