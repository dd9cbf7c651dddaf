//! Branch-and-prune paving.
//!
//! Model
//! - A box is classified; a decided box becomes an `In`/`Out` leaf, an
//!   undetermined one is bisected along its largest dimension until its
//!   largest diameter drops to `eps`, where it becomes a `Boundary` leaf.
//! - Three classifiers: a separator ([`pave`]), a contractor ([`pave_ctc`],
//!   an emptied box is `Out`, nothing is ever `In`), and a box test
//!   ([`regular_pave`]).
//! - Sequential depth-first recursion; children partition their parent.

mod tree;

#[cfg(test)]
mod tests;

pub use tree::{Node, NodeId, NodeKind, Paving, PavingLabel};

use thiserror::Error;
use tracing::debug;

use crate::ctc::Ctc;
use crate::interval::{BoolInterval, IntervalVector};
use crate::sep::Sep;

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PavingCfg {
    /// Boxes whose largest diameter is at most `eps` are not bisected.
    pub eps: f64,
    /// Split position within the bisected interval, in `(0, 1)`.
    pub bisect_ratio: f64,
}

impl Default for PavingCfg {
    fn default() -> Self {
        Self {
            eps: 1e-2,
            bisect_ratio: 0.49,
        }
    }
}

impl PavingCfg {
    pub fn with_eps(eps: f64) -> Self {
        Self {
            eps,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PavingError {
    #[error("eps must be positive and finite, got {eps}")]
    InvalidEps { eps: f64 },
    #[error("bisection ratio must lie in (0, 1), got {ratio}")]
    InvalidRatio { ratio: f64 },
    #[error("cannot pave an empty box")]
    EmptyBox,
    #[error("cannot pave an unbounded box")]
    UnboundedBox,
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
}

/// Outcome of classifying one box.
enum Step {
    Leaf(PavingLabel),
    Undetermined,
}

/// Paves `x` with a separator.
pub fn pave<S: Sep + ?Sized>(
    x: &IntervalVector,
    sep: &S,
    cfg: PavingCfg,
) -> Result<Paving, PavingError> {
    validate(x, sep.size(), &cfg)?;
    Ok(Paver::new(cfg).run(x, |b| {
        let p = sep.separate(b);
        if p.is_inside() {
            Step::Leaf(PavingLabel::In)
        } else if p.is_outside() {
            Step::Leaf(PavingLabel::Out)
        } else {
            Step::Undetermined
        }
    }))
}

/// Paves `x` with a contractor for the set: emptied boxes are `Out`.
///
/// A box whose contraction is already smaller than `eps` becomes a
/// `Boundary` leaf without further bisection.
pub fn pave_ctc<C: Ctc + ?Sized>(
    x: &IntervalVector,
    ctc: &C,
    cfg: PavingCfg,
) -> Result<Paving, PavingError> {
    validate(x, ctc.size(), &cfg)?;
    let eps = cfg.eps;
    Ok(Paver::new(cfg).run(x, |b| {
        let mut y = b.clone();
        ctc.contract(&mut y);
        if y.is_empty() {
            Step::Leaf(PavingLabel::Out)
        } else if y.max_diam() <= eps {
            Step::Leaf(PavingLabel::Boundary)
        } else {
            Step::Undetermined
        }
    }))
}

/// Paves `x` with a box test (`Empty` answers count as `Out`).
pub fn regular_pave<T>(x: &IntervalVector, test: T, cfg: PavingCfg) -> Result<Paving, PavingError>
where
    T: Fn(&IntervalVector) -> BoolInterval,
{
    validate(x, x.size(), &cfg)?;
    Ok(Paver::new(cfg).run(x, |b| match test(b) {
        BoolInterval::True => Step::Leaf(PavingLabel::In),
        BoolInterval::False | BoolInterval::Empty => Step::Leaf(PavingLabel::Out),
        BoolInterval::Unknown => Step::Undetermined,
    }))
}

fn validate(x: &IntervalVector, n: usize, cfg: &PavingCfg) -> Result<(), PavingError> {
    if !(cfg.eps > 0.0 && cfg.eps.is_finite()) {
        return Err(PavingError::InvalidEps { eps: cfg.eps });
    }
    if !(cfg.bisect_ratio > 0.0 && cfg.bisect_ratio < 1.0) {
        return Err(PavingError::InvalidRatio {
            ratio: cfg.bisect_ratio,
        });
    }
    if x.size() != n {
        return Err(PavingError::DimensionMismatch {
            expected: n,
            found: x.size(),
        });
    }
    if x.is_empty() {
        return Err(PavingError::EmptyBox);
    }
    if x.is_unbounded() {
        return Err(PavingError::UnboundedBox);
    }
    Ok(())
}

/// Recursive builder accumulating nodes in post-order.
struct Paver {
    cfg: PavingCfg,
    nodes: Vec<Node>,
}

impl Paver {
    fn new(cfg: PavingCfg) -> Self {
        Self {
            cfg,
            nodes: Vec::new(),
        }
    }

    fn run<F>(mut self, x: &IntervalVector, mut classify: F) -> Paving
    where
        F: FnMut(&IntervalVector) -> Step,
    {
        let root = self.recur(x.clone(), 0, &mut classify);
        let paving = Paving {
            nodes: self.nodes,
            root,
        };
        debug!(
            inside = paving.count(PavingLabel::In),
            outside = paving.count(PavingLabel::Out),
            boundary = paving.count(PavingLabel::Boundary),
            depth = paving.depth(),
            eps = self.cfg.eps,
            "paving done"
        );
        paving
    }

    fn recur<F>(&mut self, x: IntervalVector, depth: usize, classify: &mut F) -> NodeId
    where
        F: FnMut(&IntervalVector) -> Step,
    {
        let kind = match classify(&x) {
            Step::Leaf(l) => NodeKind::Leaf(l),
            Step::Undetermined if x.max_diam() <= self.cfg.eps => {
                NodeKind::Leaf(PavingLabel::Boundary)
            }
            Step::Undetermined => {
                let dim = x.argmax_diam();
                let (left, right) = x.bisect(dim, self.cfg.bisect_ratio);
                // no float strictly inside the split interval
                if left == x || right == x {
                    self.nodes.push(Node {
                        bx: x,
                        depth,
                        kind: NodeKind::Leaf(PavingLabel::Boundary),
                    });
                    return NodeId(self.nodes.len() - 1);
                }
                let a = self.recur(left, depth + 1, classify);
                let b = self.recur(right, depth + 1, classify);
                NodeKind::Split {
                    dim,
                    children: [a, b],
                }
            }
        };
        self.nodes.push(Node { bx: x, depth, kind });
        NodeId(self.nodes.len() - 1)
    }
}
