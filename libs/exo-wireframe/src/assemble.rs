//! # Mesh Assembly
//!
//! Joins node hulls, caps and tubes into the output mesh.

use exo_mesh::{normalize, Mesh, MeshError};
use tracing::debug;

/// Appends every piece, cleans the result up and normalizes it.
///
/// Coincident vertices of neighbouring pieces are welded, so tube rings
/// that snapped onto hull vertices become shared.
pub fn assemble<'a, I>(pieces: I) -> Result<Mesh, MeshError>
where
    I: IntoIterator<Item = &'a Mesh>,
{
    let mut mesh = Mesh::new();
    let mut count = 0;
    for piece in pieces {
        mesh.merge(piece);
        count += 1;
    }

    let culled_triangles = mesh.cull_degenerate_triangles();
    let culled_vertices = mesh.cull_unused_vertices();
    let stats = normalize(&mut mesh);
    mesh.check_limits()?;

    debug!(
        pieces = count,
        culled_triangles,
        culled_vertices,
        welded = stats.welded,
        flipped = stats.flipped,
        "assembled mesh"
    );
    Ok(mesh)
}
