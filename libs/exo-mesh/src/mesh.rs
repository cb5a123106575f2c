//! # Mesh Data Structure
//!
//! Core mesh representation with vertices, triangles, and optional normals,
//! plus the cleanup passes (welding, culling) the thickener relies on.

use crate::error::MeshError;
use crate::spatial::PointIndex;
use config::constants::{MAX_TRIANGLES, MAX_VERTICES, VERTEX_MERGE_EPSILON};
use glam::{DMat4, DVec3};

/// A triangle mesh with vertices and indices.
///
/// All geometry calculations use f64 internally. Export to f32 only
/// happens at the GPU boundary.
///
/// # Example
///
/// ```rust
/// use exo_mesh::Mesh;
/// use glam::DVec3;
///
/// let mut mesh = Mesh::new();
/// mesh.add_vertex(DVec3::new(0.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(1.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(0.0, 1.0, 0.0));
/// mesh.add_triangle(0, 1, 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Vertex positions (f64 for precision)
    vertices: Vec<DVec3>,
    /// Triangle indices (3 indices per triangle)
    triangles: Vec<[u32; 3]>,
    /// Optional vertex normals
    normals: Option<Vec<DVec3>>,
}

impl Mesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mesh with pre-allocated capacity.
    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(triangle_count),
            normals: None,
        }
    }

    /// Creates a mesh from raw parts, checking every index.
    pub fn from_parts(vertices: Vec<DVec3>, triangles: Vec<[u32; 3]>) -> Result<Self, MeshError> {
        let count = vertices.len() as u32;
        if let Some(bad) = triangles.iter().find(|tri| tri.iter().any(|&i| i >= count)) {
            return Err(MeshError::invalid_topology(format!(
                "triangle {:?} references a vertex outside 0..{}",
                bad, count
            )));
        }
        Ok(Self {
            vertices,
            triangles,
            normals: None,
        })
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Returns true if the mesh is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Adds a vertex and returns its index.
    pub fn add_vertex(&mut self, position: DVec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        index
    }

    /// Adds a triangle by vertex indices.
    pub fn add_triangle(&mut self, v0: u32, v1: u32, v2: u32) {
        self.triangles.push([v0, v1, v2]);
    }

    /// Returns a reference to the vertices.
    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Returns a reference to the triangles.
    #[inline]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    pub(crate) fn triangles_mut(&mut self) -> &mut [[u32; 3]] {
        &mut self.triangles
    }

    /// Returns the vertex at the given index.
    #[inline]
    pub fn vertex(&self, index: u32) -> DVec3 {
        self.vertices[index as usize]
    }

    /// Moves the vertex at the given index.
    #[inline]
    pub fn set_vertex(&mut self, index: u32, position: DVec3) {
        self.vertices[index as usize] = position;
    }

    /// Returns the triangle at the given index.
    #[inline]
    pub fn triangle(&self, index: usize) -> [u32; 3] {
        self.triangles[index]
    }

    /// Returns the vertex normals.
    pub fn normals(&self) -> Option<&[DVec3]> {
        self.normals.as_deref()
    }

    /// Computes and sets area-weighted vertex normals.
    pub fn compute_normals(&mut self) {
        let mut normals = vec![DVec3::ZERO; self.vertices.len()];

        for tri in &self.triangles {
            let v0 = self.vertices[tri[0] as usize];
            let v1 = self.vertices[tri[1] as usize];
            let v2 = self.vertices[tri[2] as usize];

            let normal = (v1 - v0).cross(v2 - v0);

            normals[tri[0] as usize] += normal;
            normals[tri[1] as usize] += normal;
            normals[tri[2] as usize] += normal;
        }

        for normal in &mut normals {
            *normal = normal.normalize_or_zero();
        }

        self.normals = Some(normals);
    }

    /// Computes the axis-aligned bounding box.
    ///
    /// Returns (min, max) corners of the bounding box.
    pub fn bounding_box(&self) -> (DVec3, DVec3) {
        if self.vertices.is_empty() {
            return (DVec3::ZERO, DVec3::ZERO);
        }

        let mut min = self.vertices[0];
        let mut max = self.vertices[0];

        for v in &self.vertices[1..] {
            min = min.min(*v);
            max = max.max(*v);
        }

        (min, max)
    }

    /// Transforms all vertices by a 4x4 matrix.
    pub fn transform(&mut self, matrix: &DMat4) {
        for v in &mut self.vertices {
            *v = matrix.transform_point3(*v);
        }

        // Transform normals if present (use inverse transpose for normals)
        if let Some(normals) = &mut self.normals {
            let normal_matrix = matrix.inverse().transpose();
            for n in normals {
                *n = normal_matrix.transform_vector3(*n).normalize_or_zero();
            }
        }
    }

    /// Translates the mesh by a vector.
    pub fn translate(&mut self, offset: DVec3) {
        for v in &mut self.vertices {
            *v += offset;
        }
    }

    /// Appends another mesh to this one.
    ///
    /// Vertices are not shared; use [`Mesh::weld_vertices`] to join
    /// coincident ones. Normals are dropped.
    pub fn merge(&mut self, other: &Mesh) {
        let offset = self.vertices.len() as u32;

        self.vertices.extend_from_slice(&other.vertices);
        self.triangles.extend(
            other
                .triangles
                .iter()
                .map(|tri| [tri[0] + offset, tri[1] + offset, tri[2] + offset]),
        );
        self.normals = None;
    }

    /// Keeps only the triangles for which the predicate returns true.
    ///
    /// Returns the number of removed triangles.
    pub fn retain_triangles<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&[u32; 3]) -> bool,
    {
        let before = self.triangles.len();
        self.triangles.retain(|tri| keep(tri));
        before - self.triangles.len()
    }

    /// Returns true if the triangle repeats a vertex or has (near) zero area.
    pub fn is_degenerate_triangle(&self, tri: &[u32; 3]) -> bool {
        is_degenerate(&self.vertices, tri)
    }

    /// Removes triangles that repeat a vertex or have zero area.
    ///
    /// Returns the number of removed triangles.
    pub fn cull_degenerate_triangles(&mut self) -> usize {
        let vertices = &self.vertices;
        let before = self.triangles.len();
        self.triangles.retain(|tri| !is_degenerate(vertices, tri));
        before - self.triangles.len()
    }

    /// Removes vertices not referenced by any triangle and compacts indices.
    ///
    /// Returns the number of removed vertices.
    pub fn cull_unused_vertices(&mut self) -> usize {
        let mut used = vec![false; self.vertices.len()];
        for tri in &self.triangles {
            for &v in tri {
                used[v as usize] = true;
            }
        }

        let removed = used.iter().filter(|&&u| !u).count();
        if removed == 0 {
            return 0;
        }

        let mut remap = vec![u32::MAX; self.vertices.len()];
        let mut kept = Vec::with_capacity(self.vertices.len() - removed);
        for (i, v) in self.vertices.iter().enumerate() {
            if used[i] {
                remap[i] = kept.len() as u32;
                kept.push(*v);
            }
        }

        for tri in &mut self.triangles {
            for v in tri.iter_mut() {
                *v = remap[*v as usize];
            }
        }
        self.vertices = kept;
        self.normals = None;
        removed
    }

    /// Merges vertices closer than `tolerance` into the first one seen.
    ///
    /// Returns the number of vertices merged away.
    pub fn weld_vertices(&mut self, tolerance: f64) -> usize {
        let mut index = PointIndex::new(tolerance);
        let mut remap = Vec::with_capacity(self.vertices.len());

        for v in &self.vertices {
            let target = match index.closest_within(*v, tolerance) {
                Some(existing) => existing,
                None => index.insert(*v),
            };
            remap.push(target as u32);
        }

        let welded = self.vertices.len() - index.len();
        if welded == 0 {
            return 0;
        }

        for tri in &mut self.triangles {
            for v in tri.iter_mut() {
                *v = remap[*v as usize];
            }
        }
        self.vertices = index.into_points();
        self.normals = None;
        welded
    }

    /// Signed volume enclosed by the triangles (positive when outward wound).
    pub fn signed_volume(&self) -> f64 {
        self.triangles
            .iter()
            .map(|tri| {
                let v0 = self.vertices[tri[0] as usize];
                let v1 = self.vertices[tri[1] as usize];
                let v2 = self.vertices[tri[2] as usize];
                v0.dot(v1.cross(v2))
            })
            .sum::<f64>()
            / 6.0
    }

    /// Checks the mesh against the configured size limits.
    pub fn check_limits(&self) -> Result<(), MeshError> {
        if self.vertices.len() > MAX_VERTICES {
            return Err(MeshError::TooManyVertices {
                count: self.vertices.len(),
                max: MAX_VERTICES,
            });
        }
        if self.triangles.len() > MAX_TRIANGLES {
            return Err(MeshError::TooManyTriangles {
                count: self.triangles.len(),
                max: MAX_TRIANGLES,
            });
        }
        Ok(())
    }

    /// Validates the mesh for correctness.
    ///
    /// Checks:
    /// - All triangle indices are valid
    /// - No degenerate triangles (repeated vertex or zero area)
    ///
    /// Returns true if valid.
    pub fn validate(&self) -> bool {
        let vertex_count = self.vertices.len() as u32;

        self.triangles.iter().all(|tri| {
            tri.iter().all(|&i| i < vertex_count) && !self.is_degenerate_triangle(tri)
        })
    }

    /// Exports vertices as f32 array for GPU.
    ///
    /// Returns flattened [x, y, z, x, y, z, ...] array.
    pub fn vertices_f32(&self) -> Vec<f32> {
        self.vertices
            .iter()
            .flat_map(|v| [v.x as f32, v.y as f32, v.z as f32])
            .collect()
    }

    /// Exports triangle indices as u32 array for GPU.
    ///
    /// Returns flattened [i0, i1, i2, i0, i1, i2, ...] array.
    pub fn indices_u32(&self) -> Vec<u32> {
        self.triangles.iter().flatten().copied().collect()
    }
}

fn is_degenerate(vertices: &[DVec3], tri: &[u32; 3]) -> bool {
    if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
        return true;
    }
    let v0 = vertices[tri[0] as usize];
    let v1 = vertices[tri[1] as usize];
    let v2 = vertices[tri[2] as usize];
    (v1 - v0).cross(v2 - v0).length() < VERTEX_MERGE_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_tetrahedron() -> Mesh {
        let mut mesh = Mesh::new();
        mesh.add_vertex(DVec3::ZERO);
        mesh.add_vertex(DVec3::X);
        mesh.add_vertex(DVec3::Y);
        mesh.add_vertex(DVec3::Z);
        mesh.add_triangle(0, 2, 1);
        mesh.add_triangle(0, 1, 3);
        mesh.add_triangle(0, 3, 2);
        mesh.add_triangle(1, 2, 3);
        mesh
    }

    #[test]
    fn test_mesh_new() {
        let mesh = Mesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn test_mesh_add_vertex() {
        let mut mesh = Mesh::new();
        let idx = mesh.add_vertex(DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(idx, 0);
        assert_eq!(mesh.vertex_count(), 1);
        assert_eq!(mesh.vertex(0), DVec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_mesh_from_parts_rejects_bad_index() {
        let result = Mesh::from_parts(vec![DVec3::ZERO, DVec3::X], vec![[0, 1, 2]]);
        assert!(matches!(result, Err(MeshError::InvalidTopology { .. })));
    }

    #[test]
    fn test_mesh_bounding_box() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(DVec3::new(-1.0, -2.0, -3.0));
        mesh.add_vertex(DVec3::new(4.0, 5.0, 6.0));
        let (min, max) = mesh.bounding_box();
        assert_eq!(min, DVec3::new(-1.0, -2.0, -3.0));
        assert_eq!(max, DVec3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn test_mesh_validate_invalid_index() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(DVec3::ZERO);
        mesh.add_triangle(0, 1, 2);
        assert!(!mesh.validate());
    }

    #[test]
    fn test_mesh_merge_offsets_indices() {
        let mut mesh1 = unit_tetrahedron();
        let mut mesh2 = unit_tetrahedron();
        mesh2.translate(DVec3::new(5.0, 0.0, 0.0));

        mesh1.merge(&mesh2);
        assert_eq!(mesh1.vertex_count(), 8);
        assert_eq!(mesh1.triangle_count(), 8);
        assert_eq!(mesh1.triangle(4), [4, 6, 5]);
    }

    #[test]
    fn test_cull_degenerate_triangles() {
        let mut mesh = unit_tetrahedron();
        mesh.add_triangle(0, 0, 1); // repeated vertex
        mesh.add_vertex(DVec3::new(2.0, 0.0, 0.0));
        mesh.add_triangle(0, 1, 4); // collinear, zero area

        assert_eq!(mesh.cull_degenerate_triangles(), 2);
        assert_eq!(mesh.triangle_count(), 4);
        assert!(mesh.validate());
    }

    #[test]
    fn test_cull_unused_vertices_is_idempotent() {
        let mut mesh = unit_tetrahedron();
        mesh.add_vertex(DVec3::splat(9.0));
        assert_eq!(mesh.cull_unused_vertices(), 1);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.cull_unused_vertices(), 0);
        assert_eq!(mesh.vertex_count(), 4);
    }

    #[test]
    fn test_weld_vertices_joins_coincident() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(DVec3::ZERO);
        mesh.add_vertex(DVec3::X);
        mesh.add_vertex(DVec3::Y);
        mesh.add_vertex(DVec3::X + DVec3::splat(1e-12));
        mesh.add_vertex(DVec3::Y);
        mesh.add_vertex(DVec3::ONE);
        mesh.add_triangle(0, 1, 2);
        mesh.add_triangle(3, 5, 4);

        assert_eq!(mesh.weld_vertices(VERTEX_MERGE_EPSILON), 2);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle(1), [1, 3, 2]);
    }

    #[test]
    fn test_signed_volume_tetrahedron() {
        let mesh = unit_tetrahedron();
        assert_relative_eq!(mesh.signed_volume(), 1.0 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_compute_normals_unit_length() {
        let mut mesh = unit_tetrahedron();
        mesh.compute_normals();
        let normals = mesh.normals().unwrap();
        assert_eq!(normals.len(), 4);
        for n in normals {
            assert_relative_eq!(n.length(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_mesh_export_buffers() {
        let mesh = unit_tetrahedron();
        assert_eq!(mesh.vertices_f32().len(), 12);
        assert_eq!(mesh.indices_u32()[..3], [0, 2, 1]);
        assert!(mesh.check_limits().is_ok());
    }
}
