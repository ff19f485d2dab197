//! Error types for mesh store operations.

use thiserror::Error;

use crate::PointId;

/// Errors raised by [`MeshStore`](crate::MeshStore) validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshError {
    /// A face references a point that is not in the arena.
    #[error("Face {face} references point {point}, which is not in the arena ({len} points)")]
    DanglingPoint {
        /// Index of the offending face.
        face: usize,
        /// The unresolved handle.
        point: PointId,
        /// Arena length at the time of the check.
        len: usize,
    },

    /// The point arena is full.
    #[error("Point arena is full ({0} points)")]
    ArenaFull(usize),
}

/// Result type for mesh store operations.
pub type MeshResult<T> = std::result::Result<T, MeshError>;
