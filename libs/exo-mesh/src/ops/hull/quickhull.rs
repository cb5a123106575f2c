//! # QuickHull Algorithm
//!
//! 3D convex hull computation using the QuickHull algorithm.
//! Based on the original algorithm by Barber, Dobkin, and Huhdanpaa.
//!
//! ## Algorithm Steps
//!
//! 1. Find 6 extreme points (min/max on each axis)
//! 2. Build initial tetrahedron from 4 non-coplanar points
//! 3. Assign remaining points to the face they are farthest outside of
//! 4. For each face with outside points:
//!    a. Find farthest point
//!    b. Find horizon edges (boundary of visible faces)
//!    c. Create new faces from horizon to farthest point
//!    d. Reassign outside points to new faces
//! 5. Repeat until no faces have outside points
//!
//! Every hull vertex remembers which input point it is a copy of, so callers
//! can carry per-point tags through the hull without re-matching positions.

use crate::error::MeshError;
use crate::mesh::Mesh;
use crate::spatial::PointIndex;
use config::constants::EPSILON;
use glam::DVec3;
use robust::{orient3d, Coord3D};
use std::collections::{BTreeSet, HashMap};

/// A convex hull mesh with the input point each vertex was copied from.
#[derive(Debug, Clone)]
pub struct Hull {
    /// Closed, outward-wound hull surface
    pub mesh: Mesh,
    /// For each hull vertex, the index of its source in the input slice
    pub sources: Vec<usize>,
}

/// Computes the convex hull of a set of 3D points.
///
/// # Arguments
///
/// * `points` - Points to compute hull of (at least 4 non-coplanar)
///
/// # Returns
///
/// The hull mesh and, per hull vertex, the index of the input point it copies.
/// Duplicate input points resolve to their first occurrence.
///
/// # Example
///
/// ```rust
/// use exo_mesh::ops::hull::convex_hull;
/// use glam::DVec3;
///
/// let points = vec![
///     DVec3::new(0.0, 0.0, 0.0),
///     DVec3::new(1.0, 0.0, 0.0),
///     DVec3::new(0.0, 1.0, 0.0),
///     DVec3::new(0.0, 0.0, 1.0),
/// ];
/// let hull = convex_hull(&points).unwrap();
/// assert_eq!(hull.mesh.triangle_count(), 4);
/// ```
pub fn convex_hull(points: &[DVec3]) -> Result<Hull, MeshError> {
    if points.len() < 4 {
        return Err(MeshError::degenerate("Convex hull requires at least 4 points"));
    }

    let (unique_points, unique_sources) = remove_duplicates(points);
    if unique_points.len() < 4 {
        return Err(MeshError::degenerate(
            "Convex hull requires at least 4 unique points",
        ));
    }

    let initial_faces = build_initial_simplex(&unique_points)?;
    let final_faces = quickhull_iterate(initial_faces, &unique_points);

    faces_to_hull(&final_faces, &unique_points, &unique_sources)
}

/// A face of the convex hull (triangle).
#[derive(Debug, Clone)]
struct HullFace {
    /// Indices of the three vertices
    vertices: [usize; 3],
    /// Outward-pointing unit normal (zero for a sliver face)
    normal: DVec3,
    /// Distance from origin along normal
    distance: f64,
    /// Points outside this face (indices into points array)
    outside_points: Vec<usize>,
}

impl HullFace {
    /// Creates a new face from three vertex indices.
    fn new(v0: usize, v1: usize, v2: usize, points: &[DVec3]) -> Self {
        let p0 = points[v0];
        let normal = (points[v1] - p0).cross(points[v2] - p0).normalize_or_zero();
        let distance = normal.dot(p0);

        Self {
            vertices: [v0, v1, v2],
            normal,
            distance,
            outside_points: Vec::new(),
        }
    }

    /// Returns the signed distance from a point to this face's plane.
    fn signed_distance(&self, point: DVec3) -> f64 {
        self.normal.dot(point) - self.distance
    }

    /// Returns true if the point is outside (in front of) this face.
    fn is_outside(&self, point: DVec3) -> bool {
        self.signed_distance(point) > EPSILON
    }

    /// Finds the farthest outside point.
    fn farthest_point(&self, points: &[DVec3]) -> Option<usize> {
        self.outside_points
            .iter()
            .max_by(|&&a, &&b| {
                let da = self.signed_distance(points[a]);
                let db = self.signed_distance(points[b]);
                da.total_cmp(&db)
            })
            .copied()
    }
}

/// Removes duplicate points within EPSILON tolerance.
///
/// Returns the unique points and, for each, the index of its first occurrence.
fn remove_duplicates(points: &[DVec3]) -> (Vec<DVec3>, Vec<usize>) {
    let mut index = PointIndex::new(EPSILON);
    let mut sources = Vec::with_capacity(points.len());
    for (i, p) in points.iter().enumerate() {
        if index.closest_within(*p, EPSILON).is_none() {
            index.insert(*p);
            sources.push(i);
        }
    }
    (index.into_points(), sources)
}

fn coord(p: DVec3) -> Coord3D<f64> {
    Coord3D {
        x: p.x,
        y: p.y,
        z: p.z,
    }
}

/// Builds the initial tetrahedron from extreme points.
fn build_initial_simplex(points: &[DVec3]) -> Result<Vec<HullFace>, MeshError> {
    // Find extreme points on each axis
    let mut extremes = [0usize; 6];
    for (i, p) in points.iter().enumerate() {
        if p.x < points[extremes[0]].x { extremes[0] = i; }
        if p.x > points[extremes[1]].x { extremes[1] = i; }
        if p.y < points[extremes[2]].y { extremes[2] = i; }
        if p.y > points[extremes[3]].y { extremes[3] = i; }
        if p.z < points[extremes[4]].z { extremes[4] = i; }
        if p.z > points[extremes[5]].z { extremes[5] = i; }
    }

    // Find two points with maximum distance
    let (p0, p1) = find_farthest_pair(&extremes, points);

    // Find third point farthest from line p0-p1
    let p2 = find_farthest_from_line(p0, p1, points)?;

    // Find fourth point farthest from plane p0-p1-p2
    let p3 = find_farthest_from_plane(p0, p1, p2, points)?;

    if orient3d(coord(points[p0]), coord(points[p1]), coord(points[p2]), coord(points[p3])) == 0.0 {
        return Err(MeshError::degenerate("All points are coplanar"));
    }

    // Create initial tetrahedron faces (ensure outward normals)
    let centroid = (points[p0] + points[p1] + points[p2] + points[p3]) / 4.0;
    let mut faces = vec![
        create_face_outward(p0, p1, p2, centroid, points),
        create_face_outward(p0, p2, p3, centroid, points),
        create_face_outward(p0, p3, p1, centroid, points),
        create_face_outward(p1, p3, p2, centroid, points),
    ];

    let simplex = [p0, p1, p2, p3];
    let remaining: Vec<usize> = (0..points.len()).filter(|i| !simplex.contains(i)).collect();
    assign_outside_points(&mut faces, &remaining, points);

    Ok(faces)
}

/// Finds the pair of points with maximum distance.
fn find_farthest_pair(indices: &[usize], points: &[DVec3]) -> (usize, usize) {
    let mut max_dist = 0.0;
    let mut best = (indices[0], indices[1]);

    for (i, &a) in indices.iter().enumerate() {
        for &b in indices.iter().skip(i + 1) {
            let dist = (points[a] - points[b]).length_squared();
            if dist > max_dist {
                max_dist = dist;
                best = (a, b);
            }
        }
    }
    best
}

/// Finds the point farthest from a line.
fn find_farthest_from_line(p0: usize, p1: usize, points: &[DVec3]) -> Result<usize, MeshError> {
    let line_dir = (points[p1] - points[p0]).normalize_or_zero();
    let mut max_dist = 0.0;
    let mut best = None;

    for (i, p) in points.iter().enumerate() {
        if i == p0 || i == p1 {
            continue;
        }
        let v = *p - points[p0];
        let dist = (v - v.dot(line_dir) * line_dir).length();
        if dist > max_dist {
            max_dist = dist;
            best = Some(i);
        }
    }

    best.ok_or_else(|| MeshError::degenerate("All points are collinear"))
}

/// Finds the point farthest from a plane.
fn find_farthest_from_plane(
    p0: usize,
    p1: usize,
    p2: usize,
    points: &[DVec3],
) -> Result<usize, MeshError> {
    let normal = (points[p1] - points[p0])
        .cross(points[p2] - points[p0])
        .normalize_or_zero();

    let mut max_dist = 0.0;
    let mut best = None;

    for (i, p) in points.iter().enumerate() {
        if i == p0 || i == p1 || i == p2 {
            continue;
        }
        let dist = normal.dot(*p - points[p0]).abs();
        if dist > max_dist {
            max_dist = dist;
            best = Some(i);
        }
    }

    best.ok_or_else(|| MeshError::degenerate("All points are coplanar"))
}

/// Creates a face with outward-pointing normal.
fn create_face_outward(v0: usize, v1: usize, v2: usize, centroid: DVec3, points: &[DVec3]) -> HullFace {
    let face = HullFace::new(v0, v1, v2, points);
    let face_center = (points[v0] + points[v1] + points[v2]) / 3.0;

    // If normal points toward centroid, flip the face
    if face.normal.dot(centroid - face_center) > 0.0 {
        HullFace::new(v0, v2, v1, points)
    } else {
        face
    }
}

/// Gives each point to the face it lies farthest outside of.
///
/// Points outside no face are inside the current hull and dropped.
fn assign_outside_points(faces: &mut [HullFace], candidates: &[usize], points: &[DVec3]) {
    for &idx in candidates {
        let point = points[idx];
        let mut best: Option<(usize, f64)> = None;
        for (face_idx, face) in faces.iter().enumerate() {
            let dist = face.signed_distance(point);
            if dist > EPSILON && best.map_or(true, |(_, d)| dist > d) {
                best = Some((face_idx, dist));
            }
        }
        if let Some((face_idx, _)) = best {
            faces[face_idx].outside_points.push(idx);
        }
    }
}

/// Main QuickHull iteration.
fn quickhull_iterate(mut faces: Vec<HullFace>, points: &[DVec3]) -> Vec<HullFace> {
    // Every pass consumes one outside point as a hull vertex
    let max_iterations = points.len() + 1;

    for _ in 0..max_iterations {
        let Some(face_idx) = faces.iter().position(|f| !f.outside_points.is_empty()) else {
            break;
        };

        let Some(eye) = faces[face_idx].farthest_point(points) else {
            break;
        };

        // Find all faces visible from this point
        let visible: Vec<bool> = faces.iter().map(|f| f.is_outside(points[eye])).collect();
        let horizon = find_horizon_edges(&faces, &visible);

        // Collect outside points from visible faces
        let mut reassign: Vec<usize> = faces
            .iter()
            .zip(&visible)
            .filter(|(_, &v)| v)
            .flat_map(|(f, _)| f.outside_points.iter().copied())
            .collect();
        reassign.retain(|&p| p != eye);

        // Remove visible faces
        let mut keep = visible.iter().map(|v| !v);
        faces.retain(|_| keep.next().unwrap_or(true));

        // Create new faces from horizon edges to the eye point. The horizon
        // keeps the winding of the removed faces, so new faces stay outward.
        let first_new = faces.len();
        for (e0, e1) in horizon {
            faces.push(HullFace::new(e0, e1, eye, points));
        }

        assign_outside_points(&mut faces[first_new..], &reassign, points);
    }

    faces
}

/// Finds horizon edges from visible faces.
fn find_horizon_edges(faces: &[HullFace], visible: &[bool]) -> Vec<(usize, usize)> {
    let mut edge_count: HashMap<(usize, usize), usize> = HashMap::new();

    let visible_faces = || faces.iter().zip(visible).filter(|(_, &v)| v).map(|(f, _)| f);

    for face in visible_faces() {
        let v = face.vertices;
        for (a, b) in [(v[0], v[1]), (v[1], v[2]), (v[2], v[0])] {
            *edge_count.entry((a.min(b), a.max(b))).or_insert(0) += 1;
        }
    }

    // Horizon edges appear exactly once among visible faces
    let mut horizon = Vec::new();
    for face in visible_faces() {
        let v = face.vertices;
        for (a, b) in [(v[0], v[1]), (v[1], v[2]), (v[2], v[0])] {
            if edge_count[&(a.min(b), a.max(b))] == 1 {
                horizon.push((a, b));
            }
        }
    }

    horizon
}

/// Converts hull faces to a mesh, recording each vertex's source point.
fn faces_to_hull(
    faces: &[HullFace],
    points: &[DVec3],
    point_sources: &[usize],
) -> Result<Hull, MeshError> {
    // Sorted so vertex order is independent of face order
    let used_vertices: BTreeSet<usize> = faces.iter().flat_map(|f| f.vertices).collect();

    let mut vertex_map: HashMap<usize, u32> = HashMap::with_capacity(used_vertices.len());
    let mut vertices = Vec::with_capacity(used_vertices.len());
    let mut sources = Vec::with_capacity(used_vertices.len());

    for &v in &used_vertices {
        vertex_map.insert(v, vertices.len() as u32);
        vertices.push(points[v]);
        sources.push(point_sources[v]);
    }

    let triangles = faces
        .iter()
        .map(|f| f.vertices.map(|v| vertex_map[&v]))
        .collect();

    Ok(Hull {
        mesh: Mesh::from_parts(vertices, triangles)?,
        sources,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convex_hull_tetrahedron() {
        let points = vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.5, 1.0, 0.0),
            DVec3::new(0.5, 0.5, 1.0),
        ];
        let hull = convex_hull(&points).unwrap();

        // Tetrahedron has 4 vertices and 4 faces
        assert_eq!(hull.mesh.vertex_count(), 4);
        assert_eq!(hull.mesh.triangle_count(), 4);
        assert_eq!(hull.sources, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_convex_hull_too_few_points() {
        let points = vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.5, 1.0, 0.0),
        ];
        assert!(convex_hull(&points).is_err());
    }

    #[test]
    fn test_convex_hull_coplanar_points() {
        let points = vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(1.0, 1.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
            DVec3::new(0.5, 0.5, 0.0),
        ];
        assert!(matches!(
            convex_hull(&points),
            Err(MeshError::DegenerateGeometry { .. })
        ));
    }

    #[test]
    fn test_convex_hull_thin_tetrahedron_is_not_coplanar() {
        // Exact orientation sees the tiny lift
        let points = vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
            DVec3::new(0.25, 0.25, 1e-9),
        ];
        let hull = convex_hull(&points).unwrap();
        assert_eq!(hull.mesh.vertex_count(), 4);
        assert_eq!(hull.mesh.triangle_count(), 4);
        assert!(hull.mesh.signed_volume() > 0.0);
    }

    #[test]
    fn test_remove_duplicates_keeps_first_occurrence() {
        let points = vec![DVec3::ZERO, DVec3::X, DVec3::ZERO, DVec3::Y];
        let (unique, sources) = remove_duplicates(&points);
        assert_eq!(unique.len(), 3);
        assert_eq!(sources, vec![0, 1, 3]);
    }
}
