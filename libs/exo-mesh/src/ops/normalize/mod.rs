//! # Mesh Normalization
//!
//! Whole-mesh cleanup run after assembling pieces:
//!
//! 1. Weld vertices closer than [`VERTEX_MERGE_EPSILON`]
//! 2. Cull triangles that collapsed during welding
//! 3. Cull vertices no triangle references
//! 4. Make winding agree across every manifold edge
//! 5. Turn closed components outward (positive signed volume)
//! 6. Recompute vertex normals


use crate::mesh::Mesh;
use config::constants::VERTEX_MERGE_EPSILON;
use std::collections::{HashMap, VecDeque};
use tracing::debug;

/// What [`normalize`] changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    /// Vertices merged into a coincident vertex
    pub welded: usize,
    /// Degenerate triangles removed
    pub culled_triangles: usize,
    /// Unreferenced vertices removed
    pub culled_vertices: usize,
    /// Triangles whose winding was reversed
    pub flipped: usize,
}

impl NormalizeStats {
    /// Returns true if the mesh was already normalized.
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

/// Normalizes a mesh in place.
///
/// # Example
///
/// ```rust
/// use exo_mesh::{convex_hull, normalize};
/// use glam::DVec3;
///
/// let points = [DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z];
/// let mut mesh = convex_hull(&points).unwrap().mesh;
/// let stats = normalize(&mut mesh);
///
/// assert!(stats.is_noop());
/// assert!(mesh.normals().is_some());
/// ```
pub fn normalize(mesh: &mut Mesh) -> NormalizeStats {
    let welded = mesh.weld_vertices(VERTEX_MERGE_EPSILON);
    let culled_triangles = mesh.cull_degenerate_triangles();
    let culled_vertices = mesh.cull_unused_vertices();
    let flipped = unify_winding(mesh);
    mesh.compute_normals();

    let stats = NormalizeStats {
        welded,
        culled_triangles,
        culled_vertices,
        flipped,
    };
    if stats.is_noop() {
        debug!(vertices = mesh.vertex_count(), "mesh already normalized");
    } else {
        debug!(
            ?stats,
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            "normalized mesh"
        );
    }
    stats
}

/// Undirected edge key.
fn edge_key(a: u32, b: u32) -> (u32, u32) {
    (a.min(b), a.max(b))
}

fn directed_edges(tri: &[u32; 3]) -> [(u32, u32); 3] {
    [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])]
}

/// True if `tri` walks the edge from `a` to `b`.
fn has_directed_edge(tri: &[u32; 3], a: u32, b: u32) -> bool {
    directed_edges(tri).contains(&(a, b))
}

/// Orients faces consistently per connected component and turns closed
/// components outward. Returns the number of reversed triangles.
fn unify_winding(mesh: &mut Mesh) -> usize {
    let triangles = mesh.triangles().to_vec();
    if triangles.is_empty() {
        return 0;
    }

    let mut edge_faces: HashMap<(u32, u32), Vec<usize>> = HashMap::new();
    for (f, tri) in triangles.iter().enumerate() {
        for (a, b) in directed_edges(tri) {
            edge_faces.entry(edge_key(a, b)).or_default().push(f);
        }
    }

    let mut flip = vec![false; triangles.len()];
    let mut visited = vec![false; triangles.len()];
    let mut components: Vec<(Vec<usize>, bool)> = Vec::new();

    for seed in 0..triangles.len() {
        if visited[seed] {
            continue;
        }
        visited[seed] = true;

        let mut members = Vec::new();
        let mut closed = true;
        let mut queue = VecDeque::from([seed]);

        while let Some(f) = queue.pop_front() {
            members.push(f);
            for (a, b) in directed_edges(&triangles[f]) {
                let faces = &edge_faces[&edge_key(a, b)];
                if faces.len() != 2 {
                    closed = false;
                    continue;
                }
                let g = if faces[0] == f { faces[1] } else { faces[0] };
                if visited[g] {
                    continue;
                }
                visited[g] = true;
                // As oriented, f walks a -> b; a consistent neighbour walks b -> a
                let f_walks_ab = !flip[f];
                let g_walks_ab = has_directed_edge(&triangles[g], a, b);
                flip[g] = g_walks_ab == f_walks_ab;
                queue.push_back(g);
            }
        }

        components.push((members, closed));
    }

    for (members, closed) in &components {
        if !closed {
            continue;
        }
        let volume: f64 = members
            .iter()
            .map(|&f| {
                let [a, b, c] = triangles[f].map(|v| mesh.vertex(v));
                let v = a.dot(b.cross(c));
                if flip[f] { -v } else { v }
            })
            .sum();
        if volume < 0.0 {
            for &f in members {
                flip[f] = !flip[f];
            }
        }
    }

    let mut flipped = 0;
    for (tri, &reverse) in mesh.triangles_mut().iter_mut().zip(&flip) {
        if reverse {
            tri.swap(1, 2);
            flipped += 1;
        }
    }
    flipped
}
