//! Midpoint-displacement refinement of quad terrain meshes.
//!
//! This crate turns a coarse quad mesh into fractal terrain and back:
//!
//! - **Refine**: splits every quad into 4 through shared edge midpoints,
//!   lifting each new midpoint by Gaussian noise whose amplitude decays with
//!   the level
//! - **Coarsen**: exact inverse of the last refinement, restoring the previous
//!   faces with their original point handles
//! - **Flat** mode: same topology without displacement
//!
//! The [`Terrain`] context owns the mesh, the displacement scale, the level
//! counter and the random source. The free functions [`refine()`] and
//! [`coarsen()`] operate on a bare [`MeshStore`](terrain_types::MeshStore).
//!
//! # Examples
//!
//! Build a terrain and step through levels:
//!
//! ```
//! use terrain_subdivide::{Terrain, TerrainParams};
//!
//! let mut terrain = Terrain::new(TerrainParams::new().with_seed(42))?;
//!
//! // Each refinement quadruples the quad count
//! terrain.refine()?;
//! terrain.refine()?;
//! assert_eq!(terrain.face_count(), 16);
//!
//! // Coarsening walks back exactly
//! terrain.coarsen()?;
//! assert_eq!(terrain.face_count(), 4);
//! println!("{}", terrain.status());
//! # Ok::<(), terrain_subdivide::SubdivideError>(())
//! ```
//!
//! A seed quad cannot be coarsened:
//!
//! ```
//! use terrain_subdivide::{Terrain, TerrainParams};
//!
//! let mut terrain = Terrain::new(TerrainParams::flat())?;
//! let err = terrain.coarsen().unwrap_err();
//! assert!(err.is_invalid_state());
//! assert_eq!(terrain.face_count(), 1);
//! # Ok::<(), terrain_subdivide::SubdivideError>(())
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod coarsen;
pub mod displacement;
mod error;
mod params;
mod refine;
mod status;
mod terrain;

pub use coarsen::coarsen;
pub use error::{SubdivideError, SubdivideResult};
pub use params::{MAX_INITIAL_SCALE, SubdivisionMethod, TerrainParams};
pub use refine::refine;
pub use status::TerrainStatus;
pub use terrain::Terrain;
