//! # Convex Hull
//!
//! QuickHull algorithm for computing 3D convex hulls of point clouds.
//!
//! ## Algorithm Overview
//!
//! QuickHull is a divide-and-conquer algorithm:
//! 1. Find extreme points to form initial simplex (tetrahedron)
//! 2. For each face, find the farthest point outside
//! 3. Create new faces from that point to the horizon edges
//! 4. Repeat until no points remain outside
//!
//! The result keeps a source index per hull vertex so that labels attached
//! to input points survive the hull.

mod quickhull;


pub use quickhull::{convex_hull, Hull};

use crate::error::MeshError;
use glam::DVec3;

/// Computes the hull of labelled points and returns the label of every hull vertex.
///
/// Points that end up strictly inside the hull are dropped along with their labels.
///
/// # Example
///
/// ```rust
/// use exo_mesh::ops::hull::labelled_hull;
/// use glam::DVec3;
///
/// let points = [DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z, DVec3::splat(0.1)];
/// let labels = ['a', 'b', 'c', 'd', 'e'];
/// let (hull, hull_labels) = labelled_hull(&points, &labels).unwrap();
///
/// assert_eq!(hull.mesh.vertex_count(), 4);
/// assert!(!hull_labels.contains(&'e'));
/// ```
pub fn labelled_hull<T: Copy>(
    points: &[DVec3],
    labels: &[T],
) -> Result<(Hull, Vec<T>), MeshError> {
    if points.len() != labels.len() {
        return Err(MeshError::invalid_topology(format!(
            "{} points but {} labels",
            points.len(),
            labels.len()
        )));
    }

    let hull = convex_hull(points)?;
    let hull_labels = hull.sources.iter().map(|&s| labels[s]).collect();
    Ok((hull, hull_labels))
}
