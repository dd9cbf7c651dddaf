use super::{BoxPair, Sep};
use crate::ctc::check_size;
use crate::function::VectorFn;
use crate::interval::IntervalVector;

/// Separator for `f(S)` from a separator `s` for `S`, the map `f` and its
/// inverse `f_inv`.
pub struct SepTransform<S, F, G> {
    s: S,
    f: F,
    f_inv: G,
}

impl<S: Sep, F: VectorFn, G: VectorFn> SepTransform<S, F, G> {
    pub fn new(s: S, f: F, f_inv: G) -> Self {
        let n = s.size();
        assert!(
            f.input_size() == n && f.output_size() == n,
            "forward map must act on the separator's space"
        );
        assert!(
            f_inv.input_size() == n && f_inv.output_size() == n,
            "inverse map must act on the separator's space"
        );
        Self { s, f, f_inv }
    }
}

impl<S: Sep, F: VectorFn, G: VectorFn> Sep for SepTransform<S, F, G> {
    fn size(&self) -> usize {
        self.s.size()
    }

    fn separate(&self, x: &IntervalVector) -> BoxPair {
        check_size(self.size(), x);
        if x.is_empty() {
            return BoxPair::new(x.clone(), x.clone());
        }
        let y = self.f_inv.eval(x);
        let p = self.s.separate(&y);
        BoxPair {
            inner: x & &self.f.eval(&p.inner),
            outer: x & &self.f.eval(&p.outer),
        }
    }
}
