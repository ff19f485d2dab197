//! Core quad mesh types for fractal terrain.
//!
//! This crate provides the data model the refinement engine works on:
//!
//! - [`Point`] / [`PointId`] - Terrain points and their stable arena handles
//! - [`PointArena`] - Shared point storage
//! - [`QuadFace`] - A quad referencing four points, with a canonical normal
//! - [`MeshStore`] - The current mesh: ordered faces over one arena
//! - [`Quad`] - A face with resolved corner positions, for renderers
//! - [`Aabb`] - Axis-aligned bounding box
//!
//! # Coordinate System
//!
//! Height is the **y axis**. The seed terrain lies in the x-z plane and
//! displacement only moves points along y. Face normals are canonicalized to
//! point upward (`normal.y >= 0`) regardless of winding, so lighting does not
//! depend on point order.
//!
//! # Point Identity
//!
//! Faces refer to points by [`PointId`]. Two faces sharing an edge share the
//! two handles of that edge, which keeps the surface watertight: moving a
//! shared point moves it for every face.
//!
//! # Example
//!
//! ```
//! use terrain_types::{MeshStore, MeshBounds, QuadTopology};
//!
//! let store = MeshStore::seed_square(3.0);
//! assert_eq!(store.face_count(), 1);
//! assert!(!store.is_empty());
//!
//! let (low, high) = store.bounds().height_range();
//! assert_eq!((low, high), (0.0, 0.0));
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod bounds;
mod error;
mod point;
mod quad;
mod store;
mod traits;

pub use bounds::Aabb;
pub use error::{MeshError, MeshResult};
pub use point::{Point, PointId};
pub use quad::{quad_normal, Lineage, Quad, QuadFace};
pub use store::{MeshStore, PointArena};
pub use traits::{MeshBounds, QuadTopology};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
