//! Point arena and quad mesh store.

use std::ops::Index;

use nalgebra::Point3;

use crate::{Aabb, MeshBounds, MeshError, MeshResult, Point, PointId, Quad, QuadFace, QuadTopology};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Growable storage for terrain points, addressed by [`PointId`].
///
/// Handles stay valid until the arena is truncated below them.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PointArena {
    points: Vec<Point>,
}

impl PointArena {
    /// Create an empty arena.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Number of points.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the arena holds no points.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Append a point and return its handle.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::ArenaFull`] when the handle space is exhausted.
    pub fn push(&mut self, point: Point) -> MeshResult<PointId> {
        let len = self.points.len();
        let raw = u32::try_from(len).map_err(|_| MeshError::ArenaFull(len))?;
        self.points.push(point);
        Ok(PointId::new(raw))
    }

    /// Look up a point.
    #[inline]
    #[must_use]
    pub fn get(&self, id: PointId) -> Option<&Point> {
        self.points.get(id.index())
    }

    /// Whether `id` resolves in this arena.
    #[inline]
    #[must_use]
    pub fn contains(&self, id: PointId) -> bool {
        id.index() < self.points.len()
    }

    /// Iterate over `(handle, point)` pairs in insertion order.
    #[allow(clippy::cast_possible_truncation)] // push keeps len within u32
    pub fn iter(&self) -> impl Iterator<Item = (PointId, &Point)> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| (PointId::new(i as u32), p))
    }

    /// Reserve room for `additional` points.
    pub fn reserve(&mut self, additional: usize) {
        self.points.reserve(additional);
    }

    fn truncate(&mut self, len: usize) {
        self.points.truncate(len);
    }
}

impl Index<PointId> for PointArena {
    type Output = Point;

    fn index(&self, id: PointId) -> &Point {
        &self.points[id.index()]
    }
}

/// The current terrain mesh: an ordered list of quads over a shared point arena.
///
/// Faces hold [`PointId`] handles, so a point shared by several faces is
/// stored once. The store only checks structure (every handle resolves);
/// subdivision invariants are maintained by the engine that drives it.
///
/// # Example
///
/// ```
/// use terrain_types::{MeshStore, QuadTopology};
///
/// let store = MeshStore::seed_square(3.0);
/// assert_eq!(store.face_count(), 1);
/// assert_eq!(store.point_count(), 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MeshStore {
    points: PointArena,
    faces: Vec<QuadFace>,
}

impl MeshStore {
    /// Create an empty store.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            points: PointArena::new(),
            faces: Vec::new(),
        }
    }

    /// A single flat quad in the x-z plane at `y = 0`, spanning
    /// `-half_extent..=half_extent` on both axes.
    ///
    /// Corners are `(-h, 0, -h)`, `(-h, 0, h)`, `(h, 0, h)`, `(h, 0, -h)`.
    #[must_use]
    pub fn seed_square(half_extent: f64) -> Self {
        let h = half_extent;
        let points = PointArena {
            points: vec![
                Point::from_coords(-h, 0.0, -h),
                Point::from_coords(-h, 0.0, h),
                Point::from_coords(h, 0.0, h),
                Point::from_coords(h, 0.0, -h),
            ],
        };
        let ids = [0, 1, 2, 3].map(PointId::new);
        let face = QuadFace::new(ids, &points);
        Self {
            points,
            faces: vec![face],
        }
    }

    /// Build a store from points and quads given as point indices.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::DanglingPoint`] if a quad references an index
    /// outside `points`, or [`MeshError::ArenaFull`] if there are more points
    /// than handles.
    ///
    /// # Example
    ///
    /// ```
    /// use terrain_types::{MeshStore, Point, QuadTopology};
    ///
    /// // Two quads sharing the edge (1, 2)
    /// let points = vec![
    ///     Point::from_coords(0.0, 0.0, 0.0),
    ///     Point::from_coords(0.0, 0.0, 1.0),
    ///     Point::from_coords(1.0, 0.0, 1.0),
    ///     Point::from_coords(1.0, 0.0, 0.0),
    ///     Point::from_coords(0.0, 0.0, 2.0),
    ///     Point::from_coords(1.0, 0.0, 2.0),
    /// ];
    /// let store = MeshStore::from_quads(points, &[[0, 1, 2, 3], [1, 4, 5, 2]])?;
    /// assert_eq!(store.face_count(), 2);
    /// # Ok::<(), terrain_types::MeshError>(())
    /// ```
    pub fn from_quads(points: Vec<Point>, quads: &[[u32; 4]]) -> MeshResult<Self> {
        let len = points.len();
        if u32::try_from(len).is_err() {
            return Err(MeshError::ArenaFull(len));
        }
        let points = PointArena { points };

        let mut faces = Vec::with_capacity(quads.len());
        for (face, quad) in quads.iter().enumerate() {
            let ids = quad.map(PointId::new);
            if let Some(&point) = ids.iter().find(|id| !points.contains(**id)) {
                return Err(MeshError::DanglingPoint { face, point, len });
            }
            faces.push(QuadFace::new(ids, &points));
        }

        Ok(Self { points, faces })
    }

    /// Current faces, in mesh order.
    #[inline]
    #[must_use]
    pub fn faces(&self) -> &[QuadFace] {
        &self.faces
    }

    /// Swap in a new face list and return the previous one.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::DanglingPoint`] if any face references a point
    /// missing from the arena. The store is unchanged on error.
    pub fn replace(&mut self, faces: Vec<QuadFace>) -> MeshResult<Vec<QuadFace>> {
        check_handles(&faces, self.points.len())?;
        Ok(std::mem::replace(&mut self.faces, faces))
    }

    /// The point arena.
    #[inline]
    #[must_use]
    pub const fn points(&self) -> &PointArena {
        &self.points
    }

    /// Append a point to the arena.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::ArenaFull`] when the handle space is exhausted.
    pub fn add_point(&mut self, point: Point) -> MeshResult<PointId> {
        self.points.push(point)
    }

    /// Position of a point, if the handle resolves.
    #[inline]
    #[must_use]
    pub fn position(&self, id: PointId) -> Option<&Point3<f64>> {
        self.points.get(id).map(|p| &p.position)
    }

    /// Drop every point at or beyond `len`.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::DanglingPoint`] if a face still references one
    /// of the points being dropped. Nothing is removed on error.
    pub fn truncate_points(&mut self, len: usize) -> MeshResult<()> {
        if len >= self.points.len() {
            return Ok(());
        }
        check_handles(&self.faces, len)?;
        self.points.truncate(len);
        Ok(())
    }

    /// Reserve room for additional points and faces.
    pub fn reserve(&mut self, additional_points: usize, additional_faces: usize) {
        self.points.reserve(additional_points);
        self.faces.reserve(additional_faces);
    }
}

fn check_handles(faces: &[QuadFace], len: usize) -> MeshResult<()> {
    for (face, quad) in faces.iter().enumerate() {
        if let Some(point) = quad.points().into_iter().find(|id| id.index() >= len) {
            return Err(MeshError::DanglingPoint { face, point, len });
        }
    }
    Ok(())
}

impl QuadTopology for MeshStore {
    fn point_count(&self) -> usize {
        self.points.len()
    }

    fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn point(&self, id: PointId) -> Option<&Point> {
        self.points.get(id)
    }

    fn face(&self, index: usize) -> Option<&QuadFace> {
        self.faces.get(index)
    }

    fn quad(&self, index: usize) -> Option<Quad> {
        self.faces
            .get(index)
            .map(|face| Quad::resolve(face, &self.points))
    }

    fn quads(&self) -> impl Iterator<Item = Quad> {
        self.faces
            .iter()
            .map(|face| Quad::resolve(face, &self.points))
    }
}

impl MeshBounds for MeshStore {
    fn bounds(&self) -> Aabb {
        let mut aabb = Aabb::empty();
        for face in &self.faces {
            for id in face.points() {
                aabb.expand_to_include(&self.points[id].position);
            }
        }
        aabb
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn two_quads() -> MeshStore {
        let points = vec![
            Point::from_coords(0.0, 0.0, 0.0),
            Point::from_coords(0.0, 0.0, 1.0),
            Point::from_coords(1.0, 0.0, 1.0),
            Point::from_coords(1.0, 0.0, 0.0),
            Point::from_coords(0.0, 0.0, 2.0),
            Point::from_coords(1.0, 1.0, 2.0),
        ];
        MeshStore::from_quads(points, &[[0, 1, 2, 3], [1, 4, 5, 2]]).expect("valid quads")
    }

    #[test]
    fn empty_store() {
        let store = MeshStore::new();
        assert!(store.is_empty());
        assert_eq!(store.face_count(), 0);
        assert!(store.bounds().is_empty());
    }

    #[test]
    fn seed_square_layout() {
        let store = MeshStore::seed_square(3.0);
        let face = &store.faces()[0];

        let expected = [(-3.0, -3.0), (-3.0, 3.0), (3.0, 3.0), (3.0, -3.0)];
        for (id, (x, z)) in face.points().into_iter().zip(expected) {
            let p = store.position(id).unwrap();
            assert_eq!((p.x, p.y, p.z), (x, 0.0, z));
        }
        assert_eq!(face.normal(), nalgebra::Vector3::y());
        assert_eq!(store.bounds().size(), nalgebra::Vector3::new(6.0, 0.0, 6.0));
    }

    #[test]
    fn from_quads_rejects_bad_index() {
        let points = vec![Point::from_coords(0.0, 0.0, 0.0)];
        let err = MeshStore::from_quads(points, &[[0, 0, 0, 7]]).unwrap_err();
        assert_eq!(
            err,
            MeshError::DanglingPoint {
                face: 0,
                point: PointId::new(7),
                len: 1,
            }
        );
    }

    #[test]
    fn shared_edge_is_one_pair_of_handles() {
        let store = two_quads();
        let a = store.faces()[0].points();
        let b = store.faces()[1].points();
        assert_eq!(a[1], b[0]);
        assert_eq!(a[2], b[3]);
    }

    #[test]
    fn replace_swaps_faces() {
        let mut store = two_quads();
        let first = store.faces()[0].clone();

        let previous = store.replace(vec![first.clone()]).unwrap();

        assert_eq!(previous.len(), 2);
        assert_eq!(store.faces(), &[first]);
    }

    #[test]
    fn replace_rejects_dangling_handles() {
        let mut store = two_quads();
        let mut other = MeshStore::seed_square(1.0);
        for _ in 0..10 {
            other.add_point(Point::from_coords(0.0, 0.0, 0.0)).unwrap();
        }
        let far = other.add_point(Point::from_coords(0.0, 0.0, 0.0)).unwrap();
        let mut face = other.faces()[0].clone();
        face.set_points([far, far, far, far], other.points());

        let err = store.replace(vec![face]).unwrap_err();

        assert!(matches!(err, MeshError::DanglingPoint { face: 0, .. }));
        assert_eq!(store.face_count(), 2);
    }

    #[test]
    fn truncate_points_guards_referenced_points() {
        let mut store = MeshStore::seed_square(1.0);
        let extra = store.add_point(Point::from_coords(0.0, 1.0, 0.0)).unwrap();
        assert_eq!(extra, PointId::new(4));

        assert!(store.truncate_points(2).is_err());
        assert_eq!(store.point_count(), 5);

        store.truncate_points(4).unwrap();
        assert_eq!(store.point_count(), 4);
        assert!(store.point(extra).is_none());
    }

    #[test]
    fn quads_resolve_positions() {
        let store = two_quads();
        let quads: Vec<_> = store.quads().collect();
        assert_eq!(quads.len(), 2);
        assert_eq!(quads[1].corners[2], Point3::new(1.0, 1.0, 2.0));
        assert_eq!(store.quad(1), Some(quads[1]));
        assert!(store.quad(2).is_none());
        assert_eq!(store.bounds().height_range(), (0.0, 1.0));
    }

    #[test]
    fn arena_iter_yields_handles_in_order() {
        let store = MeshStore::seed_square(2.0);
        let ids: Vec<_> = store.points().iter().map(|(id, _)| id.raw()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }
}
