//! Traits for quad mesh types.

use crate::{Aabb, Point, PointId, Quad, QuadFace};
use nalgebra::Point3;

/// Read access to quad mesh topology.
///
/// Renderers and analysis code take `impl QuadTopology` so they do not
/// depend on how the mesh is stored.
pub trait QuadTopology {
    /// Get the number of points.
    fn point_count(&self) -> usize;

    /// Get the number of faces (quads).
    fn face_count(&self) -> usize;

    /// Check if the mesh is empty.
    fn is_empty(&self) -> bool {
        self.point_count() == 0 || self.face_count() == 0
    }

    /// Get a point by handle.
    ///
    /// Returns `None` if the handle does not resolve.
    fn point(&self, id: PointId) -> Option<&Point>;

    /// Get a face by index.
    ///
    /// Returns `None` if the index is out of bounds.
    fn face(&self, index: usize) -> Option<&QuadFace>;

    /// Get a face with its corner positions resolved.
    fn quad(&self, index: usize) -> Option<Quad>;

    /// Iterate over all faces with resolved corner positions.
    fn quads(&self) -> impl Iterator<Item = Quad>;
}

/// Trait for types that can compute a bounding box.
pub trait MeshBounds {
    /// Compute the axis-aligned bounding box.
    ///
    /// Returns an empty AABB if the mesh has no faces.
    fn bounds(&self) -> Aabb;

    /// Compute the bounding box, returning `None` if empty.
    fn bounds_opt(&self) -> Option<Aabb> {
        let b = self.bounds();
        if b.is_empty() { None } else { Some(b) }
    }

    /// Get the center of the bounding box.
    fn center(&self) -> Point3<f64> {
        self.bounds().center()
    }
}
