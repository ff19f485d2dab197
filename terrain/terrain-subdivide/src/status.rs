//! Terrain status snapshot for display.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Snapshot of a [`Terrain`](crate::Terrain) for a UI collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TerrainStatus {
    /// Subdivision level (number of refinements not yet undone).
    pub level: u32,

    /// Number of quads.
    pub faces: usize,

    /// Number of points in the arena.
    pub points: usize,

    /// Displacement scale the next refinement will use.
    pub scale: f64,
}

impl TerrainStatus {
    /// Average number of quads sharing each point.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // Counts stay far below 2^52
    pub fn faces_per_point(&self) -> f64 {
        if self.points == 0 {
            0.0
        } else {
            self.faces as f64 / self.points as f64
        }
    }
}

impl std::fmt::Display for TerrainStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Level {}: {} quads, {} points (scale {:.4})",
            self.level, self.faces, self.points, self.scale
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let status = TerrainStatus {
            level: 2,
            faces: 16,
            points: 25,
            scale: 0.25,
        };

        let display = format!("{status}");
        assert!(display.contains("Level 2"));
        assert!(display.contains("16 quads"));
        assert!(display.contains("25 points"));
        assert!(display.contains("0.2500"));
    }

    #[test]
    fn test_faces_per_point() {
        let status = TerrainStatus {
            level: 0,
            faces: 0,
            points: 0,
            scale: 1.0,
        };
        assert!(status.faces_per_point().abs() < f64::EPSILON);

        let status = TerrainStatus {
            level: 1,
            faces: 4,
            points: 8,
            scale: 0.5,
        };
        assert!((status.faces_per_point() - 0.5).abs() < f64::EPSILON);
    }
}
