use super::{BoxPair, Sep};
use crate::ctc::{check_size, Ctc, CtcInverse};
use crate::function::VectorFn;
use crate::interval::IntervalVector;

/// Separator for `f⁻¹(Y)`.
///
/// `outer` contracts onto `Y`; `inner` is the hull of the contractions onto
/// each box of the complement of `Y` (closed pieces of `Rᵐ \ Y`).
pub struct SepInverse<F> {
    ctc: CtcInverse<F>,
    complement: Vec<IntervalVector>,
}

impl<F: VectorFn> SepInverse<F> {
    pub fn new(f: F, y: IntervalVector) -> Self {
        let complement = IntervalVector::new(y.size()).diff(&y);
        Self {
            ctc: CtcInverse::new(f, y),
            complement,
        }
    }
}

impl<F: VectorFn> Sep for SepInverse<F> {
    fn size(&self) -> usize {
        self.ctc.size()
    }

    fn separate(&self, x: &IntervalVector) -> BoxPair {
        check_size(self.size(), x);
        let mut outer = x.clone();
        self.ctc.contract(&mut outer);
        let f = self.ctc.function();
        let mut inner = IntervalVector::empty(x.size());
        for piece in &self.complement {
            let mut y = x.clone();
            CtcInverse::new(f, piece.clone()).contract(&mut y);
            inner.hull_with(&y);
        }
        BoxPair { inner, outer }
    }
}
