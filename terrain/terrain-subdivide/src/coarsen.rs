//! Exact inverse of a refinement pass.

use terrain_types::{Lineage, MeshStore, PointId};
use tracing::debug;

use crate::error::{SubdivideError, SubdivideResult};

/// Undo the last [`refine`](crate::refine()) of `store` and return the doubled scale.
///
/// With `n = faces / 4`, faces `0..n` are the parents the refinement
/// reshaped and faces `n..` are the wedges it emitted. Each wedge's lineage
/// names its parent and wedge number; wedge `w`'s second point is the
/// parent's original corner `w + 1`, which is written back before the wedges
/// are dropped.
///
/// Points that only the dropped wedges referenced stay in the arena; callers
/// that track the arena length before refining can truncate it afterwards.
///
/// # Errors
///
/// - [`SubdivideError::InvalidFaceCount`] if the face count is zero or not a
///   multiple of four.
/// - [`SubdivideError::UnknownLineage`] if a face past `n` is untagged, comes
///   from a different generation, names a parent outside `0..n`, or repeats a
///   `(parent, wedge)` pair.
///
/// The store is unchanged on error.
pub fn coarsen(store: &mut MeshStore, scale: f64, generation: u32) -> SubdivideResult<f64> {
    let count = store.faces().len();
    if count < 4 || count % 4 != 0 {
        return Err(SubdivideError::InvalidFaceCount { count });
    }
    let parents = count / 4;

    let corners = restored_corners(store, parents, generation)?;

    let mut faces = store.faces()[..parents].to_vec();
    for (face, [c1, c2, c3]) in faces.iter_mut().zip(corners) {
        let c0 = face.points()[0];
        face.set_points([c0, c1, c2, c3], store.points());
    }
    store.replace(faces)?;

    debug!(
        "Coarsened generation {}: {} -> {} faces, scale {} -> {}",
        generation,
        count,
        parents,
        scale,
        scale * 2.0
    );

    Ok(scale * 2.0)
}

/// Collect, per parent, the corners held by its three wedges.
fn restored_corners(
    store: &MeshStore,
    parents: usize,
    generation: u32,
) -> SubdivideResult<Vec<[PointId; 3]>> {
    let mut slots: Vec<[Option<PointId>; Lineage::WEDGES]> = vec![[None; Lineage::WEDGES]; parents];

    for (index, child) in store.faces().iter().enumerate().skip(parents) {
        let unknown = SubdivideError::UnknownLineage { index };
        let lineage = child.lineage().ok_or(unknown)?;
        if lineage.generation != generation || lineage.origin >= parents {
            return Err(SubdivideError::UnknownLineage { index });
        }
        let slot = slots[lineage.origin]
            .get_mut(usize::from(lineage.wedge))
            .ok_or(SubdivideError::UnknownLineage { index })?;
        if slot.is_some() {
            return Err(SubdivideError::UnknownLineage { index });
        }
        *slot = Some(child.points()[1]);
    }

    // 3n tagged children with distinct (parent, wedge) pairs fill every slot.
    slots
        .into_iter()
        .enumerate()
        .map(|(parent, slot)| match slot {
            [Some(a), Some(b), Some(c)] => Ok([a, b, c]),
            _ => Err(SubdivideError::UnknownLineage { index: parent }),
        })
        .collect()
}
