//! Refinement parameters.

use crate::error::{SubdivideError, SubdivideResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How new edge midpoints are placed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SubdivisionMethod {
    /// Midpoint displacement - each new midpoint is lifted or lowered by
    /// Gaussian noise whose amplitude decays with the level.
    #[default]
    Displaced,

    /// Flat subdivision - midpoints sit exactly on their edge.
    /// Useful for increasing face count without changing geometry.
    Flat,
}

impl SubdivisionMethod {
    /// Check if this method perturbs new points.
    #[must_use]
    pub const fn is_displacing(&self) -> bool {
        matches!(self, Self::Displaced)
    }
}

/// Upper bound (exclusive) for the initial displacement scale.
///
/// The per-level amplitude `s * 2^(-s)` only shrinks when `s` halves if
/// `s < 2`.
pub const MAX_INITIAL_SCALE: f64 = 2.0;

/// Parameters for a [`Terrain`](crate::Terrain).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TerrainParams {
    /// Midpoint placement.
    pub method: SubdivisionMethod,

    /// Displacement scale at level 0.
    pub initial_scale: f64,

    /// Optional seed for reproducible terrain.
    pub seed: Option<u64>,

    /// Maximum faces allowed after a refinement (prevents memory issues).
    pub max_faces: usize,

    /// Half the side length of the seed square.
    pub half_extent: f64,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            method: SubdivisionMethod::default(),
            initial_scale: 1.0,
            seed: None,
            max_faces: 10_000_000, // 10M faces max
            half_extent: 3.0,
        }
    }
}

impl TerrainParams {
    /// Create new parameters with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create parameters for flat subdivision.
    #[must_use]
    pub fn flat() -> Self {
        Self {
            method: SubdivisionMethod::Flat,
            ..Self::default()
        }
    }

    /// Set subdivision method.
    #[must_use]
    pub const fn with_method(mut self, method: SubdivisionMethod) -> Self {
        self.method = method;
        self
    }

    /// Set the level-0 displacement scale.
    #[must_use]
    pub const fn with_initial_scale(mut self, scale: f64) -> Self {
        self.initial_scale = scale;
        self
    }

    /// Set a random seed for reproducibility.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Remove the seed (draw from OS entropy).
    #[must_use]
    pub const fn without_seed(mut self) -> Self {
        self.seed = None;
        self
    }

    /// Set maximum faces allowed.
    #[must_use]
    pub const fn with_max_faces(mut self, max_faces: usize) -> Self {
        self.max_faces = max_faces;
        self
    }

    /// Set the seed square's half extent.
    #[must_use]
    pub const fn with_half_extent(mut self, half_extent: f64) -> Self {
        self.half_extent = half_extent;
        self
    }

    /// Check the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`SubdivideError::InvalidScale`] if `initial_scale` is not
    /// finite or not in `(0, MAX_INITIAL_SCALE)`.
    pub fn validate(&self) -> SubdivideResult<()> {
        let s = self.initial_scale;
        if !s.is_finite() || s <= 0.0 || s >= MAX_INITIAL_SCALE {
            return Err(SubdivideError::InvalidScale(s));
        }
        Ok(())
    }

    /// Face count after `levels` refinements of a `current_faces` mesh.
    ///
    /// Saturates at `usize::MAX`.
    #[must_use]
    pub const fn expected_faces(current_faces: usize, levels: u32) -> usize {
        let mut faces = current_faces;
        let mut i = 0;
        while i < levels {
            faces = faces.saturating_mul(4);
            i += 1;
        }
        faces
    }
}
