//! One midpoint-displacement pass.

use hashbrown::HashMap;
use rand::Rng;
use terrain_types::{Lineage, MeshStore, Point, PointId, QuadFace};
use tracing::debug;

use crate::displacement;
use crate::error::SubdivideResult;
use crate::params::SubdivisionMethod;

/// Split every quad of `store` into four and return the halved scale.
///
/// For each face in order, the four edge midpoints are looked up in a cache
/// keyed on the unordered pair of edge endpoints, so a neighbor that shares
/// the edge gets the same point. A new midpoint sits at the mean of its
/// endpoints, lifted along y by a draw from [`displacement::sample`] when
/// `method` displaces. The center is the mean of the four midpoints.
///
/// The face itself becomes the wedge at its first corner,
/// `[corner0, mid0, center, mid3]`. The other three wedges are emitted as new
/// faces `[mid[w], corner[w + 1], mid[w + 1], center]` for `w` in `0..3`,
/// tagged with `Lineage { generation, origin, wedge: w }` and appended after
/// all originals in origin then wedge order.
///
/// An empty store is left alone and `scale` is returned unchanged.
///
/// # Errors
///
/// Returns an error if the point arena runs out of handles. The face list is
/// not touched in that case, but points added before the failure remain in
/// the arena.
pub fn refine<R: Rng + ?Sized>(
    store: &mut MeshStore,
    scale: f64,
    generation: u32,
    method: SubdivisionMethod,
    rng: &mut R,
) -> SubdivideResult<f64> {
    let mut faces = store.faces().to_vec();
    let original_faces = faces.len();
    if original_faces == 0 {
        debug!("Refining empty mesh: nothing to do");
        return Ok(scale);
    }
    let original_points = store.points().len();

    // Each face adds one center and on average two unshared midpoints.
    store.reserve(original_faces * 3, 0);
    let mut children = Vec::with_capacity(original_faces * Lineage::WEDGES);
    let mut edge_midpoints: HashMap<(PointId, PointId), PointId> =
        HashMap::with_capacity(original_faces * 2);
    let mut lift = Lift { rng, scale, method };

    for (origin, face) in faces.iter_mut().enumerate() {
        let corners = face.points();

        let mut mids = corners;
        for (slot, (a, b)) in mids.iter_mut().zip(face.edges()) {
            *slot = get_or_create_midpoint(a, b, store, &mut edge_midpoints, &mut lift)?;
        }

        let center = Point::centroid4(&mids.map(|id| store.points()[id]));
        let center = store.add_point(center)?;

        for wedge in 0..3_u8 {
            let w = usize::from(wedge);
            let child = QuadFace::new(
                [mids[w], corners[w + 1], mids[w + 1], center],
                store.points(),
            )
            .with_lineage(Lineage::new(generation, origin, wedge));
            children.push(child);
        }

        face.set_points([corners[0], mids[0], center, mids[3]], store.points());
    }

    faces.extend(children);
    store.replace(faces)?;

    debug!(
        "Refined to generation {}: {} -> {} faces, {} -> {} points, scale {} -> {}",
        generation,
        original_faces,
        store.faces().len(),
        original_points,
        store.points().len(),
        scale,
        scale / 2.0
    );

    Ok(scale / 2.0)
}

/// Vertical offset source for new midpoints.
struct Lift<'a, R: ?Sized> {
    rng: &'a mut R,
    scale: f64,
    method: SubdivisionMethod,
}

impl<R: Rng + ?Sized> Lift<'_, R> {
    fn next_offset(&mut self) -> f64 {
        if self.method.is_displacing() {
            displacement::sample(&mut *self.rng, self.scale)
        } else {
            0.0
        }
    }
}

/// Get or create the midpoint of the edge `a`-`b`.
fn get_or_create_midpoint<R: Rng + ?Sized>(
    a: PointId,
    b: PointId,
    store: &mut MeshStore,
    edge_midpoints: &mut HashMap<(PointId, PointId), PointId>,
    lift: &mut Lift<'_, R>,
) -> SubdivideResult<PointId> {
    let edge = normalize_edge(a, b);

    if let Some(&midpoint) = edge_midpoints.get(&edge) {
        return Ok(midpoint);
    }

    let mut midpoint = store.points()[a].midpoint(&store.points()[b]);
    midpoint.position.y += lift.next_offset();

    let id = store.add_point(midpoint)?;
    edge_midpoints.insert(edge, id);

    Ok(id)
}

/// Normalize edge so the smaller handle comes first.
const fn normalize_edge(a: PointId, b: PointId) -> (PointId, PointId) {
    if a.raw() <= b.raw() { (a, b) } else { (b, a) }
}
