//! Fractal terrain toolkit.
//!
//! This umbrella crate re-exports the terrain-* crates, providing one API
//! for building and walking midpoint-displacement terrain. Rendering,
//! windowing and input are left to the embedding application: it reads the
//! faces and normals, and calls [`Terrain::refine`](subdivide::Terrain::refine)
//! or [`Terrain::coarsen`](subdivide::Terrain::coarsen) on user commands.
//!
//! # Quick Start
//!
//! ```
//! use terrain::prelude::*;
//!
//! let mut terrain = Terrain::new(TerrainParams::new().with_seed(1))?;
//! terrain.refine_to(3)?;
//!
//! for quad in terrain.store().quads() {
//!     // hand quad.corners and quad.normal to a renderer
//!     assert!(quad.normal.y >= 0.0);
//! }
//! println!("{}", terrain.status());
//! # Ok::<(), terrain::subdivide::SubdivideError>(())
//! ```
//!
//! # Module Organization
//!
//! - [`types`] - Mesh store, point arena, quads, normals, bounds
//! - [`subdivide`] - Refinement, coarsening, displacement schedule, terrain context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

/// Mesh store, point arena and quad types.
pub use terrain_types as types;

/// Midpoint-displacement refinement and coarsening.
pub use terrain_subdivide as subdivide;

/// Commonly used items.
pub mod prelude {
    pub use terrain_subdivide::{
        SubdivideError, SubdivideResult, SubdivisionMethod, Terrain, TerrainParams,
        TerrainStatus,
    };
    pub use terrain_types::{
        Aabb, Lineage, MeshBounds, MeshStore, Point, Point3, PointId, Quad, QuadFace,
        QuadTopology, Vector3,
    };
}
