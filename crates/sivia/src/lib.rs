//! Guaranteed set computations over real vector domains.
//!
//! Layers (leaves first)
//! - `interval`: outward-rounded intervals, boxes, four-valued booleans.
//! - `actions`, `function`: signed coordinate permutations and black-box
//!   vector functions (closures, affine maps).
//! - `polytope`: convex polytopes kept in facet and vertex form through the
//!   Double Description method.
//! - `ctc`, `sep`: contractor and separator algebras.
//! - `paver`, `fixpoint`: branch-and-prune paving and fixpoint iteration.
//!
//! Soundness: no operation discards a point of the set it describes. Boxes
//! are only ever narrowed to enclosures, never below them.

pub mod actions;
pub mod ctc;
pub mod fixpoint;
pub mod function;
pub mod interval;
pub mod paver;
pub mod polytope;
pub mod sep;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use interval::{BoolInterval, Interval, IntervalVector};
pub use polytope::{Facet, Polytope};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::actions::OctaSym;
    pub use crate::ctc::{
        BoundaryCfg, Ctc, CtcAction, CtcBoundary, CtcExt, CtcInter, CtcInterList, CtcInverse,
        CtcPolytope, CtcPolytopeCfg, CtcQInter, CtcUnion, CtcUnionList, CtcWrapper,
    };
    pub use crate::fixpoint::{fixpoint, fixpoint_with, FixpointCfg, StopRule, Volume};
    pub use crate::function::{AffineMap, ClosureFn, VectorFn};
    pub use crate::interval::{BoolInterval, Interval, IntervalMatrix, IntervalVector};
    pub use crate::paver::{pave, pave_ctc, regular_pave, Paving, PavingCfg, PavingLabel};
    pub use crate::polytope::{Facet, Polytope};
    pub use crate::sep::{
        BoxPair, Sep, SepAction, SepBoundary, SepCtcPair, SepExt, SepInter, SepInverse, SepNot,
        SepPolytope, SepQInter, SepTransform, SepUnion, SepWrapper,
    };
    pub use nalgebra::{DMatrix, DVector};
}
