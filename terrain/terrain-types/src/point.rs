//! Terrain points and their arena handles.

use std::fmt;

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stable handle to a point stored in a [`MeshStore`](crate::MeshStore).
///
/// Two handles are equal only when they name the same arena slot. Points
/// with equal coordinates but different handles are distinct vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PointId(u32);

impl PointId {
    /// Create a handle from a raw arena index.
    #[inline]
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Arena slot this handle refers to.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Raw handle value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// A point of the terrain surface.
///
/// The y axis is height. Midpoint displacement only ever perturbs `y`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    /// Position in world space.
    pub position: Point3<f64>,
}

impl Point {
    /// Create a point at the given position.
    ///
    /// # Example
    ///
    /// ```
    /// use terrain_types::{Point, Point3};
    ///
    /// let p = Point::new(Point3::new(1.0, 2.0, 3.0));
    /// assert_eq!(p.position.y, 2.0);
    /// ```
    #[inline]
    #[must_use]
    pub const fn new(position: Point3<f64>) -> Self {
        Self { position }
    }

    /// Create a point from raw coordinates.
    #[inline]
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Point3::new is not const in nalgebra
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: Point3::new(x, y, z),
        }
    }

    /// Arithmetic mean of two points, coordinate by coordinate.
    ///
    /// # Example
    ///
    /// ```
    /// use terrain_types::Point;
    ///
    /// let a = Point::from_coords(-3.0, 0.0, -3.0);
    /// let b = Point::from_coords(-3.0, 2.0, 3.0);
    /// let m = a.midpoint(&b);
    /// assert_eq!(m.position.x, -3.0);
    /// assert_eq!(m.position.y, 1.0);
    /// assert_eq!(m.position.z, 0.0);
    /// ```
    #[inline]
    #[must_use]
    pub fn midpoint(&self, other: &Self) -> Self {
        Self::new(nalgebra::center(&self.position, &other.position))
    }

    /// Arithmetic mean of four points.
    #[must_use]
    pub fn centroid4(points: &[Self; 4]) -> Self {
        let sum = points
            .iter()
            .fold(nalgebra::Vector3::zeros(), |acc, p| acc + p.position.coords);
        Self::new(Point3::from(sum / 4.0))
    }
}

impl From<Point3<f64>> for Point {
    fn from(position: Point3<f64>) -> Self {
        Self::new(position)
    }
}

impl From<[f64; 3]> for Point {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::from_coords(x, y, z)
    }
}

impl From<(f64, f64, f64)> for Point {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self::from_coords(x, y, z)
    }
}
