//! Tolerance defaults for the double-description engine.
//!
//! Policy
//! - Vertex/facet classification uses one fixed absolute tolerance. Ties are
//!   decided by it and never by insertion order.
//! - Rows are normalized (max-abs in `[1, 2)`) before classification, so an
//!   absolute tolerance is meaningful across facets.

/// Classification tolerance for `row · v - rhs` in both builders.
pub(crate) const DD_EPS: f64 = 1e-9;
/// Relative rank threshold for affine independence in the vertex builder.
pub(crate) const RANK_EPS: f64 = 1e-10;

/// Configuration of the F2V/V2F builders.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DdCfg {
    /// `In` when `row · v - rhs < -tolerance`, `Out` when `> tolerance`,
    /// `On` otherwise.
    pub tolerance: f64,
}

impl Default for DdCfg {
    fn default() -> Self {
        Self { tolerance: DD_EPS }
    }
}
