//! Terrain context: mesh, displacement scale, level and RNG in one place.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use terrain_types::{MeshStore, QuadFace, QuadTopology};
use tracing::{debug, warn};

use crate::coarsen::coarsen;
use crate::error::{SubdivideError, SubdivideResult};
use crate::params::TerrainParams;
use crate::refine::refine;
use crate::status::TerrainStatus;

/// A refinable terrain.
///
/// Owns the [`MeshStore`], the current displacement scale, the subdivision
/// level and the random source. [`refine`](Self::refine) and
/// [`coarsen`](Self::coarsen) take `&mut self`, so no reader can observe a
/// half-updated mesh.
///
/// # Example
///
/// ```
/// use terrain_subdivide::{Terrain, TerrainParams};
///
/// let mut terrain = Terrain::new(TerrainParams::new().with_seed(7))?;
/// assert_eq!(terrain.refine()?, 4);
/// assert_eq!(terrain.refine()?, 16);
/// assert_eq!(terrain.coarsen()?, 4);
/// assert_eq!(terrain.level(), 1);
/// # Ok::<(), terrain_subdivide::SubdivideError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Terrain<R = StdRng> {
    store: MeshStore,
    params: TerrainParams,
    scale: f64,
    level: u32,
    /// Arena length before each refinement still in effect.
    watermarks: Vec<usize>,
    rng: R,
}

impl Terrain<StdRng> {
    /// Create a terrain over the seed square described by `params`.
    ///
    /// Uses `params.seed` when set, OS entropy otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`SubdivideError::InvalidScale`] if the params do not validate.
    pub fn new(params: TerrainParams) -> SubdivideResult<Self> {
        let store = MeshStore::seed_square(params.half_extent);
        Self::from_store(store, params)
    }

    /// Create a terrain over an existing mesh at level 0.
    ///
    /// # Errors
    ///
    /// Returns [`SubdivideError::InvalidScale`] if the params do not validate.
    pub fn from_store(store: MeshStore, params: TerrainParams) -> SubdivideResult<Self> {
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(store, params, rng)
    }
}

impl<R: Rng> Terrain<R> {
    /// Create a terrain with an explicit random source.
    ///
    /// `params.seed` is ignored; the caller controls `rng`.
    ///
    /// # Errors
    ///
    /// Returns [`SubdivideError::InvalidScale`] if the params do not validate.
    pub fn with_rng(store: MeshStore, params: TerrainParams, rng: R) -> SubdivideResult<Self> {
        params.validate()?;
        Ok(Self {
            store,
            scale: params.initial_scale,
            params,
            level: 0,
            watermarks: Vec::new(),
            rng,
        })
    }

    /// Run one midpoint-displacement pass and return the new face count.
    ///
    /// Quadruples the face count, halves the scale and raises the level by
    /// one. An empty mesh is left as is and `Ok(0)` is returned.
    ///
    /// # Errors
    ///
    /// - [`SubdivideError::MeshTooLarge`] if the result would exceed
    ///   `max_faces`.
    /// - [`SubdivideError::Mesh`] if the point arena runs out of handles;
    ///   points added by the failed pass are removed again.
    pub fn refine(&mut self) -> SubdivideResult<usize> {
        let current = self.store.face_count();
        if current == 0 {
            debug!("Refine requested on empty terrain");
            return Ok(0);
        }

        let projected = TerrainParams::expected_faces(current, 1);
        if projected > self.params.max_faces {
            return Err(SubdivideError::MeshTooLarge {
                current,
                projected,
                max: self.params.max_faces,
            });
        }

        let watermark = self.store.point_count();
        let generation = self.level + 1;
        let result = refine(
            &mut self.store,
            self.scale,
            generation,
            self.params.method,
            &mut self.rng,
        );
        match result {
            Ok(scale) => {
                self.scale = scale;
                self.level = generation;
                self.watermarks.push(watermark);
                Ok(self.store.face_count())
            }
            Err(err) => {
                self.store.truncate_points(watermark)?;
                Err(err)
            }
        }
    }

    /// Undo the last refinement and return the new face count.
    ///
    /// Restores the previous faces with their original point handles,
    /// drops the points the refinement created, doubles the scale and
    /// lowers the level by one.
    ///
    /// # Errors
    ///
    /// Fails with an invalid-state error (see
    /// [`SubdivideError::is_invalid_state`]) when the face count is not a
    /// non-zero multiple of four or the mesh does not hold the wedges of the
    /// last refinement. The terrain is unchanged on such errors.
    ///
    /// A [`SubdivideError::Mesh`] from reclaiming points is returned after
    /// the faces, scale and level have already been coarsened.
    pub fn coarsen(&mut self) -> SubdivideResult<usize> {
        let scale = match coarsen(&mut self.store, self.scale, self.level) {
            Ok(scale) => scale,
            Err(err) => {
                warn!(level = self.level, faces = self.store.face_count(), "Coarsen rejected: {err}");
                return Err(err);
            }
        };

        // Faces are already coarsened; keep scale and level in step with them
        // even if reclaiming points fails.
        self.scale = scale;
        self.level = self.level.saturating_sub(1);
        if let Some(watermark) = self.watermarks.pop() {
            self.store.truncate_points(watermark)?;
        }

        Ok(self.store.face_count())
    }

    /// Refine or coarsen until the terrain sits at `level`.
    ///
    /// # Errors
    ///
    /// Propagates the first failing [`refine`](Self::refine) or
    /// [`coarsen`](Self::coarsen); levels reached before the failure are kept.
    pub fn refine_to(&mut self, level: u32) -> SubdivideResult<usize> {
        while self.level < level {
            if self.store.face_count() == 0 {
                break;
            }
            self.refine()?;
        }
        while self.level > level {
            self.coarsen()?;
        }
        Ok(self.store.face_count())
    }
}

impl<R> Terrain<R> {
    /// The mesh store.
    #[inline]
    #[must_use]
    pub const fn store(&self) -> &MeshStore {
        &self.store
    }

    /// Current faces, for rendering.
    #[inline]
    #[must_use]
    pub fn faces(&self) -> &[QuadFace] {
        self.store.faces()
    }

    /// Number of faces.
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.store.face_count()
    }

    /// Subdivision level.
    #[inline]
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Displacement scale the next refinement will use.
    #[inline]
    #[must_use]
    pub const fn scale(&self) -> f64 {
        self.scale
    }

    /// Parameters the terrain was built with.
    #[inline]
    #[must_use]
    pub const fn params(&self) -> &TerrainParams {
        &self.params
    }

    /// Snapshot for display.
    #[must_use]
    pub fn status(&self) -> TerrainStatus {
        TerrainStatus {
            level: self.level,
            faces: self.store.face_count(),
            points: self.store.point_count(),
            scale: self.scale,
        }
    }

    /// Give up the terrain and keep the mesh.
    #[must_use]
    pub fn into_store(self) -> MeshStore {
        self.store
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::params::SubdivisionMethod;
    use approx::assert_relative_eq;
    use terrain_types::{MeshBounds, Point3};

    fn seeded() -> Terrain {
        Terrain::new(TerrainParams::new().with_seed(2024)).unwrap()
    }

    #[test]
    fn test_new_rejects_bad_scale() {
        let err = Terrain::new(TerrainParams::new().with_initial_scale(3.0)).unwrap_err();
        assert!(matches!(err, SubdivideError::InvalidScale(_)));
    }

    #[test]
    fn test_refine_updates_counters() {
        let mut terrain = seeded();
        assert_eq!(terrain.face_count(), 1);
        assert_eq!(terrain.level(), 0);

        assert_eq!(terrain.refine().unwrap(), 4);
        assert_eq!(terrain.level(), 1);
        assert_eq!(terrain.scale(), 0.5);

        assert_eq!(terrain.refine().unwrap(), 16);
        assert_eq!(terrain.level(), 2);
        assert_eq!(terrain.scale(), 0.25);
    }

    #[test]
    fn test_coarsen_single_face_is_rejected() {
        let mut terrain = seeded();

        let err = terrain.coarsen().unwrap_err();

        assert!(err.is_invalid_state());
        assert_eq!(terrain.face_count(), 1);
        assert_eq!(terrain.level(), 0);
        assert_eq!(terrain.scale(), 1.0);
    }

    #[test]
    fn test_round_trip_restores_seed() {
        let mut terrain = seeded();
        let seed_faces = terrain.faces().to_vec();

        terrain.refine().unwrap();
        assert_eq!(terrain.coarsen().unwrap(), 1);

        assert_eq!(terrain.faces(), seed_faces.as_slice());
        assert_eq!(terrain.store().point_count(), 4);
        assert_eq!(terrain.scale(), 1.0);
        assert_eq!(terrain.level(), 0);
    }

    #[test]
    fn test_coarsen_keeps_counters_when_reclaim_fails() {
        let mut terrain = seeded();
        terrain.refine().unwrap();
        // A watermark below the seed corners cannot be truncated to.
        terrain.watermarks = vec![2];

        let err = terrain.coarsen().unwrap_err();

        assert!(matches!(err, SubdivideError::Mesh(_)));
        assert_eq!(terrain.face_count(), 1);
        assert_eq!(terrain.level(), 0);
        assert_eq!(terrain.scale(), 1.0);
        assert!(terrain.watermarks.is_empty());
    }

    #[test]
    fn test_second_level_round_trip() {
        let mut terrain = seeded();
        terrain.refine().unwrap();
        let level_one = terrain.store().clone();

        terrain.refine().unwrap();
        terrain.coarsen().unwrap();

        assert_eq!(terrain.store(), &level_one);
    }

    #[test]
    fn test_center_sits_above_origin() {
        let mut terrain = seeded();
        terrain.refine().unwrap();

        let center = terrain.faces()[0].points()[2];
        let p = terrain.store().position(center).unwrap();
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.z, 0.0, epsilon = 1e-12);
        for face in terrain.faces() {
            assert_eq!(face.points()[if face.lineage().is_some() { 3 } else { 2 }], center);
        }
    }

    #[test]
    fn test_max_faces_guard() {
        let params = TerrainParams::new().with_seed(1).with_max_faces(16);
        let mut terrain = Terrain::new(params).unwrap();
        terrain.refine().unwrap();
        terrain.refine().unwrap();

        let err = terrain.refine().unwrap_err();

        assert!(matches!(
            err,
            SubdivideError::MeshTooLarge {
                current: 16,
                projected: 64,
                max: 16
            }
        ));
        assert_eq!(terrain.face_count(), 16);
        assert_eq!(terrain.level(), 2);
    }

    #[test]
    fn test_refine_empty_terrain() {
        let mut terrain = Terrain::from_store(MeshStore::new(), TerrainParams::new()).unwrap();
        assert_eq!(terrain.refine().unwrap(), 0);
        assert_eq!(terrain.level(), 0);
        assert_eq!(terrain.scale(), 1.0);
        assert_eq!(terrain.refine_to(3).unwrap(), 0);
    }

    #[test]
    fn test_refine_to_moves_both_ways() {
        let mut terrain = seeded();
        assert_eq!(terrain.refine_to(3).unwrap(), 64);
        assert_eq!(terrain.level(), 3);
        assert_eq!(terrain.refine_to(1).unwrap(), 4);
        assert_eq!(terrain.level(), 1);
        assert_eq!(terrain.scale(), 0.5);
    }

    #[test]
    fn test_flat_terrain_stays_flat() {
        let mut terrain = Terrain::new(TerrainParams::flat()).unwrap();
        terrain.refine_to(3).unwrap();

        let bounds = terrain.store().bounds();
        assert_eq!(bounds.height_range(), (0.0, 0.0));
        assert_eq!(bounds.min, Point3::new(-3.0, 0.0, -3.0));
        assert_eq!(terrain.params().method, SubdivisionMethod::Flat);
    }

    #[test]
    fn test_same_seed_same_terrain() {
        let mut a = seeded();
        let mut b = seeded();
        a.refine_to(3).unwrap();
        b.refine_to(3).unwrap();
        assert_eq!(a.store(), b.store());
    }

    #[test]
    fn test_injected_rng() {
        let rng = StdRng::seed_from_u64(5);
        let mut terrain =
            Terrain::with_rng(MeshStore::seed_square(1.0), TerrainParams::new(), rng).unwrap();
        terrain.refine().unwrap();
        assert_eq!(terrain.status().faces, 4);
        assert_eq!(terrain.status().points, 9);
    }

    #[test]
    fn test_status_and_into_store() {
        let mut terrain = seeded();
        terrain.refine().unwrap();

        let status = terrain.status();
        assert_eq!(status.level, 1);
        assert_eq!(status.faces, 4);
        assert_eq!(status.points, 9);
        assert_eq!(status.scale, 0.5);

        let store = terrain.into_store();
        assert_eq!(store.face_count(), 4);
    }
}
