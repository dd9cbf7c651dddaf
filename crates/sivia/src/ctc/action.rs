use super::{check_size, Ctc};
use crate::actions::OctaSym;
use crate::interval::IntervalVector;

/// Contractor for `s(S)` given a contractor `ctc` for `S`:
/// `x ↦ x ∩ s(ctc(s⁻¹(x)))`.
pub struct CtcAction<C> {
    ctc: C,
    s: OctaSym,
    s_inv: OctaSym,
}

impl<C: Ctc> CtcAction<C> {
    pub fn new(ctc: C, s: OctaSym) -> Self {
        assert_eq!(ctc.size(), s.size(), "symmetry and contractor differ in dimension");
        let s_inv = s.invert();
        Self { ctc, s, s_inv }
    }
}

impl<C: Ctc> Ctc for CtcAction<C> {
    fn size(&self) -> usize {
        self.ctc.size()
    }

    fn contract(&self, x: &mut IntervalVector) {
        check_size(self.size(), x);
        if x.is_empty() {
            return;
        }
        let mut y = self.s_inv.apply(x);
        self.ctc.contract(&mut y);
        x.intersect_with(&self.s.apply(&y));
    }
}
