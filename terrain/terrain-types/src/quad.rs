//! Quadrilateral faces and their normals.

use nalgebra::{Point3, Vector3};

use crate::{PointArena, PointId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Compute the canonical unit normal of the plane through three points.
///
/// The normal is `(b - a) x (c - a)` normalized, with its sign flipped when
/// needed so the y component is non-negative. Collinear or coincident points
/// give the up vector `(0, 1, 0)`. Degeneracy is judged by the angle at `a`,
/// so tiny faces keep their true orientation.
///
/// # Example
///
/// ```
/// use terrain_types::{quad_normal, Point3};
///
/// // Seed-square winding
/// let n = quad_normal(
///     &Point3::new(-1.0, 0.0, -1.0),
///     &Point3::new(-1.0, 0.0, 1.0),
///     &Point3::new(1.0, 0.0, 1.0),
/// );
/// assert!((n.y - 1.0).abs() < 1e-12);
///
/// // Degenerate
/// let up = quad_normal(&Point3::origin(), &Point3::origin(), &Point3::origin());
/// assert_eq!(up, terrain_types::Vector3::y());
/// ```
#[must_use]
pub fn quad_normal(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> Vector3<f64> {
    let ab = b - a;
    let ac = c - a;
    let n = ab.cross(&ac);
    let len_sq = n.norm_squared();
    // |ab x ac|^2 = |ab|^2 |ac|^2 sin^2(angle), so this bounds the angle, not the size.
    if len_sq <= f64::EPSILON * ab.norm_squared() * ac.norm_squared() {
        return Vector3::y();
    }
    let n = n / len_sq.sqrt();
    if n.y < 0.0 { -n } else { n }
}

/// Where a face came from.
///
/// Refinement tags each newly emitted child with the index of the face it
/// was cut from and which of the three emitted wedges it is. Coarsening uses
/// the tags to find the corners it has to restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Lineage {
    /// Subdivision level produced by the refinement that emitted the face.
    pub generation: u32,
    /// Index of the parent face in the mesh at that refinement.
    pub origin: usize,
    /// Wedge number, `0..3`.
    pub wedge: u8,
}

impl Lineage {
    /// Number of wedges emitted per parent.
    pub const WEDGES: usize = 3;

    /// Create a lineage tag.
    #[inline]
    #[must_use]
    pub const fn new(generation: u32, origin: usize, wedge: u8) -> Self {
        Self {
            generation,
            origin,
            wedge,
        }
    }
}

/// A quad face referencing four points of a [`PointArena`].
///
/// Points are listed in perimeter order; edge `i` joins point `i` and point
/// `(i + 1) % 4`. The normal is derived from the first three points and is
/// recomputed by every method that changes a point.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QuadFace {
    points: [PointId; 4],
    normal: Vector3<f64>,
    lineage: Option<Lineage>,
}

impl QuadFace {
    /// Create a face and compute its normal from the arena.
    ///
    /// # Panics
    ///
    /// Panics if a handle is not present in `arena`.
    #[must_use]
    pub fn new(points: [PointId; 4], arena: &PointArena) -> Self {
        let mut face = Self {
            points,
            normal: Vector3::y(),
            lineage: None,
        };
        face.recompute_normal(arena);
        face
    }

    /// Attach a lineage tag.
    #[inline]
    #[must_use]
    pub const fn with_lineage(mut self, lineage: Lineage) -> Self {
        self.lineage = Some(lineage);
        self
    }

    /// Point handles in perimeter order.
    #[inline]
    #[must_use]
    pub const fn points(&self) -> [PointId; 4] {
        self.points
    }

    /// Unit normal with a non-negative y component.
    #[inline]
    #[must_use]
    pub const fn normal(&self) -> Vector3<f64> {
        self.normal
    }

    /// Lineage tag, if the face was emitted by a refinement.
    #[inline]
    #[must_use]
    pub const fn lineage(&self) -> Option<Lineage> {
        self.lineage
    }

    /// The four edges as `(start, end)` handle pairs.
    #[must_use]
    pub const fn edges(&self) -> [(PointId, PointId); 4] {
        let [a, b, c, d] = self.points;
        [(a, b), (b, c), (c, d), (d, a)]
    }

    /// Replace all four points and recompute the normal.
    ///
    /// # Panics
    ///
    /// Panics if a handle is not present in `arena`.
    pub fn set_points(&mut self, points: [PointId; 4], arena: &PointArena) {
        self.points = points;
        self.recompute_normal(arena);
    }

    /// Recompute the normal from the current point positions.
    ///
    /// # Panics
    ///
    /// Panics if a handle is not present in `arena`.
    pub fn recompute_normal(&mut self, arena: &PointArena) {
        let [a, b, c, _] = self.points;
        self.normal = quad_normal(
            &arena[a].position,
            &arena[b].position,
            &arena[c].position,
        );
    }
}

/// A quad with resolved corner positions.
///
/// Utility for renderers and geometric queries that do not care about
/// point identity.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Quad {
    /// Corner positions in perimeter order.
    pub corners: [Point3<f64>; 4],
    /// Unit normal of the owning face.
    pub normal: Vector3<f64>,
}

impl Quad {
    /// Resolve a face against its arena.
    ///
    /// # Panics
    ///
    /// Panics if a handle is not present in `arena`.
    #[must_use]
    pub fn resolve(face: &QuadFace, arena: &PointArena) -> Self {
        Self {
            corners: face.points().map(|id| arena[id].position),
            normal: face.normal(),
        }
    }

    /// Mean of the four corners.
    #[must_use]
    pub fn centroid(&self) -> Point3<f64> {
        let sum = self
            .corners
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + p.coords);
        Point3::from(sum / 4.0)
    }

    /// Lengths of the four edges, edge `i` joining corner `i` and `i + 1`.
    #[must_use]
    pub fn edge_lengths(&self) -> [f64; 4] {
        let c = &self.corners;
        [
            (c[1] - c[0]).norm(),
            (c[2] - c[1]).norm(),
            (c[3] - c[2]).norm(),
            (c[0] - c[3]).norm(),
        ]
    }

    /// Area of the quad, split along the 0-2 diagonal.
    ///
    /// Exact for planar convex quads.
    #[must_use]
    pub fn area(&self) -> f64 {
        let [a, b, c, d] = self.corners;
        let first = (b - a).cross(&(c - a)).norm();
        let second = (c - a).cross(&(d - a)).norm();
        (first + second) * 0.5
    }
}
