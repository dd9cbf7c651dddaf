use super::{BoxPair, Sep};
use crate::ctc::{check_size, qinter};
use crate::interval::IntervalVector;

/// Points belonging to at least `q` of the `k` sets.
///
/// `outer = x ∩ qinter(q, outers)` and `inner = x ∩ qinter(k - q + 1, inners)`.
pub struct SepQInter<S = Box<dyn Sep>> {
    n: usize,
    q: usize,
    list: Vec<S>,
}

impl<S: Sep> SepQInter<S> {
    /// Panics unless `1 <= q <= list.len()` and the dimensions agree.
    pub fn new(q: usize, list: Vec<S>) -> Self {
        let Some(n) = list.first().map(Sep::size) else {
            panic!("separator list must not be empty");
        };
        assert!(
            list.iter().all(|s| s.size() == n),
            "separators in a list differ in dimension"
        );
        assert!(q >= 1 && q <= list.len(), "q must lie in 1..=len");
        Self { n, q, list }
    }

    pub fn q(&self) -> usize {
        self.q
    }
}

impl<S: Sep> Sep for SepQInter<S> {
    fn size(&self) -> usize {
        self.n
    }

    fn separate(&self, x: &IntervalVector) -> BoxPair {
        check_size(self.n, x);
        let k = self.list.len();
        let (inners, outers): (Vec<_>, Vec<_>) = self
            .list
            .iter()
            .map(|s| {
                let p = s.separate(x);
                (p.inner, p.outer)
            })
            .unzip();
        BoxPair {
            inner: x & &qinter(self.n, k - self.q + 1, &inners),
            outer: x & &qinter(self.n, self.q, &outers),
        }
    }
}
