//! Error types for mesh bending operations.

use mesh_types::MeshError;
use thiserror::Error;

/// Result type for bending operations.
pub type BendResult<T> = Result<T, BendError>;

/// Errors that can occur while bending a mesh along a curve.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum BendError {
    /// A compute was requested before a source mesh was set.
    #[error("no source mesh set")]
    NoSource,

    /// A compute was requested before a curve sampler was set.
    #[error("no curve sampler set")]
    NoCurve,

    /// The source mesh has no vertices to bend.
    #[error("source mesh has no vertices")]
    EmptySource,

    /// Every vertex projects onto the same bend-axis coordinate.
    #[error("mesh has zero extent along the bend axis (all vertices at x = {min_x})")]
    DegenerateExtent {
        /// The shared bend-axis coordinate.
        min_x: f64,
    },

    /// The source mesh is structurally inconsistent.
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

impl BendError {
    /// Check if this error is a usage error of the owning component
    /// (missing source or curve) rather than a property of the data.
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(self, Self::NoSource | Self::NoCurve)
    }
}
