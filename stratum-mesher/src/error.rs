//! Errors raised during mesh generation

/// Failure modes of the piecewise-uniform mesh generators
///
/// All variants are deterministic in the region specification, so a failed
/// generation cannot succeed on retry with the same inputs.
#[derive(thiserror::Error, Debug)]
pub enum MeshError {
    #[error("mesh generation needs at least one region")]
    EmptyRegionList,
    #[error("region {index} has non-positive width")]
    NonPositiveWidth { index: usize },
    #[error("region {index} requests zero cells")]
    ZeroCells { index: usize },
}
