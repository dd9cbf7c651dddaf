use super::{BoxPair, Sep};
use crate::actions::OctaSym;
use crate::ctc::check_size;
use crate::interval::IntervalVector;

/// Separator for `s(S)` from a separator for `S`.
pub struct SepAction<S> {
    sep: S,
    s: OctaSym,
    s_inv: OctaSym,
}

impl<S: Sep> SepAction<S> {
    pub fn new(sep: S, s: OctaSym) -> Self {
        assert_eq!(sep.size(), s.size(), "symmetry and separator differ in dimension");
        let s_inv = s.invert();
        Self { sep, s, s_inv }
    }
}

impl<S: Sep> Sep for SepAction<S> {
    fn size(&self) -> usize {
        self.sep.size()
    }

    fn separate(&self, x: &IntervalVector) -> BoxPair {
        check_size(self.size(), x);
        let p = self.sep.separate(&self.s_inv.apply(x));
        BoxPair {
            inner: x & &self.s.apply(&p.inner),
            outer: x & &self.s.apply(&p.outer),
        }
    }
}
