//! # Cylinder Primitive
//!
//! Generates a capped cylinder along +Z with axial subdivisions.

use crate::error::MeshError;
use crate::mesh::Mesh;
use config::constants::MIN_SIDES;
use glam::DVec3;
use std::f64::consts::PI;

/// Creates a closed cylinder mesh standing on the XY plane.
///
/// # Arguments
///
/// * `radius` - Radius of the circumscribed circle
/// * `height` - Height along Z axis, base at z=0
/// * `segments` - Number of segments around circumference
/// * `rings` - Number of axial bands the side is split into
///
/// # Example
///
/// ```rust
/// use exo_mesh::primitives::create_cylinder;
///
/// let mesh = create_cylinder(1.0, 4.0, 10, 5).unwrap();
/// assert_eq!(mesh.vertex_count(), 60);
/// ```
pub fn create_cylinder(
    radius: f64,
    height: f64,
    segments: u32,
    rings: u32,
) -> Result<Mesh, MeshError> {
    if height <= 0.0 || !height.is_finite() {
        return Err(MeshError::degenerate(format!(
            "Cylinder height must be positive: {}",
            height
        )));
    }

    if radius <= 0.0 || !radius.is_finite() {
        return Err(MeshError::degenerate(format!(
            "Cylinder radius must be positive: {}",
            radius
        )));
    }

    if segments < MIN_SIDES {
        return Err(MeshError::degenerate(format!(
            "Cylinder segments must be at least {}: {}",
            MIN_SIDES, segments
        )));
    }

    if rings == 0 {
        return Err(MeshError::degenerate("Cylinder needs at least one ring"));
    }

    let n = segments as usize;
    let mut mesh = Mesh::with_capacity(
        (rings as usize + 1) * n,
        rings as usize * n * 2 + 2 * (n - 2),
    );

    // Circle k sits at height k * height / rings
    let circles: Vec<Vec<u32>> = (0..=rings)
        .map(|k| {
            let z = height * k as f64 / rings as f64;
            (0..segments)
                .map(|j| {
                    let theta = 2.0 * PI * j as f64 / segments as f64;
                    mesh.add_vertex(DVec3::new(radius * theta.cos(), radius * theta.sin(), z))
                })
                .collect()
        })
        .collect();

    // Side quads between consecutive circles
    for pair in circles.windows(2) {
        let (lower, upper) = (&pair[0], &pair[1]);
        for j in 0..n {
            let j_next = (j + 1) % n;
            mesh.add_triangle(lower[j], lower[j_next], upper[j_next]);
            mesh.add_triangle(lower[j], upper[j_next], upper[j]);
        }
    }

    // Fan caps
    let bottom = &circles[0];
    let top = &circles[rings as usize];
    for j in 1..n - 1 {
        mesh.add_triangle(bottom[0], bottom[j + 1], bottom[j]);
        mesh.add_triangle(top[0], top[j], top[j + 1]);
    }

    Ok(mesh)
}
