//! Error types for terrain refinement and coarsening.

use terrain_types::MeshError;
use thiserror::Error;

/// Errors that can occur during refinement or coarsening.
#[derive(Debug, Error)]
pub enum SubdivideError {
    /// Coarsening needs a non-zero multiple of four faces.
    #[error("Cannot coarsen a mesh of {count} faces (need a non-zero multiple of 4)")]
    InvalidFaceCount {
        /// Face count at the time of the call.
        count: usize,
    },

    /// A face in the child block was not emitted by the last refinement.
    #[error("Face {index} was not emitted by the last refinement")]
    UnknownLineage {
        /// Index of the offending face.
        index: usize,
    },

    /// Refinement would exceed the configured face limit.
    #[error("Refinement would exceed maximum mesh size ({current} -> {projected} faces, max {max})")]
    MeshTooLarge {
        /// Current face count.
        current: usize,
        /// Projected face count after refinement.
        projected: usize,
        /// Maximum allowed face count.
        max: usize,
    },

    /// Initial displacement scale outside `(0, 2)`.
    #[error("Invalid displacement scale: {0} (must be finite and in (0, 2))")]
    InvalidScale(f64),

    /// The mesh store rejected an update.
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

impl SubdivideError {
    /// Whether the mesh was in a state that does not allow the operation.
    ///
    /// Such calls leave the mesh untouched and fail the same way until the
    /// mesh changes.
    #[must_use]
    pub const fn is_invalid_state(&self) -> bool {
        matches!(
            self,
            Self::InvalidFaceCount { .. } | Self::UnknownLineage { .. }
        )
    }
}

/// Result type for refinement operations.
pub type SubdivideResult<T> = std::result::Result<T, SubdivideError>;
