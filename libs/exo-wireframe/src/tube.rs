//! # Strut Tubes
//!
//! One tapered, twisted tube per input line, running between the joint
//! planes of its two struts. Odd rings are turned by half a side so the
//! side faces zig-zag ("stocking stitch") instead of forming flat quads.
//!
//! End rings snap onto node hull or cap vertices within tolerance, so the
//! final weld joins tubes and nodes into one surface.

use crate::geometry::Plane;
use crate::graph::{Strut, StrutGraph};
use config::constants::{
    FAILURE_CYLINDER_RINGS, FAILURE_CYLINDER_SEGMENTS, MAX_TRIANGLES, MAX_VERTICES,
};
use exo_mesh::{create_cylinder, Mesh, MeshError, PointIndex};
use std::f64::consts::PI;
use tracing::warn;

/// Number of tube segments for a tube of length `distance`.
///
/// Always even and at least 2, so the last ring has the same phase as the
/// first. Halves round to even. Saturates at `usize::MAX`.
///
/// # Example
///
/// ```rust
/// use exo_wireframe::tube::segment_count;
///
/// assert_eq!(segment_count(10.0, 2.0), 6);
/// assert_eq!(segment_count(0.0, 1.0), 2);
/// ```
pub fn segment_count(distance: f64, division: f64) -> usize {
    let pairs = (0.5 * distance / division).round_ties_even() as usize;
    pairs.saturating_mul(2).saturating_add(2)
}

/// Vertex indices of one emitted ring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ring {
    pub vertices: Vec<u32>,
    /// Ring points that found no vertex to snap to
    pub unmatched: usize,
}

/// Appends a ring of `sides` vertices on `plane` to `mesh`.
///
/// With a lookup, every point takes the position of the closest lookup
/// point within `tolerance`; points without one keep their own position and
/// are counted as unmatched.
pub fn emit_ring(
    mesh: &mut Mesh,
    plane: &Plane,
    sides: u32,
    radius: f64,
    lookup: Option<&PointIndex>,
    tolerance: f64,
) -> Ring {
    let mut unmatched = 0;
    let vertices = plane
        .ring(sides, radius)
        .into_iter()
        .map(|p| {
            let position = match lookup {
                Some(index) => match index.closest_within(p, tolerance) {
                    Some(i) => index.point(i),
                    None => {
                        unmatched += 1;
                        p
                    }
                },
                None => p,
            };
            mesh.add_vertex(position)
        })
        .collect();

    Ring {
        vertices,
        unmatched,
    }
}

/// Angular position of the upper ring relative to the lower one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shift {
    /// Upper vertex `j` sits half a side before lower vertex `j`
    Back,
    /// Upper vertex `j` sits half a side after lower vertex `j`
    Forward,
}

/// Joins two half-side-shifted rings with a band of triangles.
///
/// Rings run counter-clockwise about the axis from `lower` to `upper`;
/// the band faces away from that axis.
pub fn stitch_rings(mesh: &mut Mesh, lower: &[u32], upper: &[u32], shift: Shift) {
    let n = lower.len();
    for j in 0..n {
        let k = (j + 1) % n;
        match shift {
            Shift::Back => {
                mesh.add_triangle(lower[j], lower[k], upper[k]);
                mesh.add_triangle(lower[j], upper[k], upper[j]);
            }
            Shift::Forward => {
                mesh.add_triangle(lower[j], lower[k], upper[j]);
                mesh.add_triangle(lower[k], upper[k], upper[j]);
            }
        }
    }
}

/// Builds the tube between the joint planes of struts `a` and `b`.
///
/// `lookup` indexes every node hull and cap vertex; end rings snap onto it
/// unless their end is open. Fails before allocating when the tube would
/// exceed the mesh limits.
pub fn build_tube(
    a: &Strut,
    b: &Strut,
    sides: u32,
    division: f64,
    lookup: &PointIndex,
    tolerance: f64,
) -> Result<Mesh, MeshError> {
    let start = a.joint_plane();
    let distance = start.origin.distance(b.joint_plane().origin);
    let segments = segment_count(distance, division);

    let n = sides as usize;
    let vertex_count = segments.saturating_add(1).saturating_mul(n);
    if vertex_count > MAX_VERTICES {
        return Err(MeshError::TooManyVertices {
            count: vertex_count,
            max: MAX_VERTICES,
        });
    }
    let triangle_count = segments.saturating_mul(n).saturating_mul(2);
    if triangle_count > MAX_TRIANGLES {
        return Err(MeshError::TooManyTriangles {
            count: triangle_count,
            max: MAX_TRIANGLES,
        });
    }

    let step = distance / segments as f64;
    let twist = -PI / sides as f64;
    let mut mesh = Mesh::with_capacity(vertex_count, triangle_count);
    let mut rings: Vec<Vec<u32>> = Vec::with_capacity(segments + 1);
    let mut unmatched = 0;

    for k in 0..=segments {
        let t = k as f64 / segments as f64;
        let mut plane = start.offset(step * k as f64);
        if k % 2 == 1 {
            plane = plane.rotated(twist);
        }
        let radius = a.hull_radius + (b.hull_radius - a.hull_radius) * t;
        let snap = (k == 0 && !a.solo) || (k == segments && !b.solo);

        let ring = emit_ring(
            &mut mesh,
            &plane,
            sides,
            radius,
            snap.then_some(lookup),
            tolerance,
        );
        unmatched += ring.unmatched;
        rings.push(ring.vertices);
    }

    for (k, pair) in rings.windows(2).enumerate() {
        // Ring k + 1 is twisted when odd
        let shift = if k % 2 == 0 { Shift::Back } else { Shift::Forward };
        stitch_rings(&mut mesh, &pair[0], &pair[1], shift);
    }

    if unmatched > 0 {
        warn!(line = a.line, unmatched, "tube end ring not matched to node vertices");
    }
    Ok(mesh)
}

/// Lines whose joint planes pass each other.
pub fn find_engulfed(graph: &StrutGraph) -> Vec<usize> {
    (0..graph.line_count())
        .filter(|&line| {
            let (a, b) = graph.line_struts(line);
            // NaN offsets count as engulfed
            !(a.joint_offset + b.joint_offset <= 2.0 * a.length)
        })
        .collect()
}

/// One cylinder per listed line, from its start node along the full line.
///
/// The radius is the average of the two supplied end radii.
pub fn engulfed_diagnostic(graph: &StrutGraph, lines: &[usize]) -> Result<Mesh, MeshError> {
    let mut diagnostic = Mesh::new();
    for &line in lines {
        let (a, b) = graph.line_struts(line);
        let mut cylinder = create_cylinder(
            (a.radius + b.radius) / 2.0,
            2.0 * a.length,
            FAILURE_CYLINDER_SEGMENTS,
            FAILURE_CYLINDER_RINGS,
        )?;
        cylinder.transform(&a.frame.to_matrix());
        diagnostic.merge(&cylinder);
    }
    Ok(diagnostic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Segment;
    use crate::offsets::CylinderClearance;
    use crate::params::ThickenParams;
    use approx::assert_relative_eq;
    use glam::DVec3;

    fn solve(lines: &[Segment], params: &ThickenParams) -> StrutGraph {
        StrutGraph::solve(lines, params, &CylinderClearance).unwrap()
    }

    #[test]
    fn test_segment_count_examples() {
        assert_eq!(segment_count(10.0, 2.0), 6);
        assert_eq!(segment_count(10.0, 1.0), 12);
        assert_eq!(segment_count(3.0, 1.0), 6);
        assert_eq!(segment_count(0.1, 5.0), 2);
    }

    #[test]
    fn test_segment_count_halves_round_to_even() {
        // 0.5, 1.5, 2.5, 3.5 pairs
        assert_eq!(segment_count(1.0, 1.0), 2);
        assert_eq!(segment_count(3.0, 1.0), 6);
        assert_eq!(segment_count(5.0, 1.0), 6);
        assert_eq!(segment_count(7.0, 1.0), 10);
    }

    #[test]
    fn test_segment_count_saturates() {
        assert_eq!(segment_count(10.0, 1e-300), usize::MAX);
    }

    #[test]
    fn test_tube_over_vertex_limit_fails_before_building() {
        let graph = solve(&[Segment::new(DVec3::ZERO, DVec3::X * 10.0)], &ThickenParams::default());
        let (a, b) = graph.line_struts(0);
        let lookup = PointIndex::new(1e-3);

        for division in [1e-7, 1e-300] {
            assert!(matches!(
                build_tube(a, b, 6, division, &lookup, 1e-3),
                Err(MeshError::TooManyVertices { max: MAX_VERTICES, .. })
            ));
        }
    }

    #[test]
    fn test_segment_count_even() {
        for i in 0..200 {
            let count = segment_count(i as f64 * 0.37, 0.5);
            assert!(count >= 2);
            assert_eq!(count % 2, 0);
        }
    }

    #[test]
    fn test_emit_ring_snaps() {
        let plane = Plane::from_normal(DVec3::ZERO, DVec3::Z);
        let mut targets = plane.ring(4, 1.0);
        targets[2] += DVec3::splat(1e-4);
        targets.pop();
        let lookup = PointIndex::from_points(&targets, 1e-3);

        let mut mesh = Mesh::new();
        let ring = emit_ring(&mut mesh, &plane, 4, 1.0, Some(&lookup), 1e-3);

        assert_eq!(ring.vertices, vec![0, 1, 2, 3]);
        assert_eq!(ring.unmatched, 1);
        assert_eq!(mesh.vertex(2), targets[2]);
    }

    #[test]
    fn test_emit_ring_without_lookup() {
        let plane = Plane::from_normal(DVec3::ONE, DVec3::X);
        let mut mesh = Mesh::new();
        let ring = emit_ring(&mut mesh, &plane, 5, 2.0, None, 1e-3);
        assert_eq!(ring.unmatched, 0);
        for v in mesh.vertices() {
            assert_relative_eq!(v.distance(DVec3::ONE), 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_stitch_faces_outward() {
        let lower = Plane::from_normal(DVec3::ZERO, DVec3::Z);
        for (shift, twist) in [(Shift::Back, -PI / 6.0), (Shift::Forward, PI / 6.0)] {
            let mut mesh = Mesh::new();
            let a = emit_ring(&mut mesh, &lower, 6, 1.0, None, 1e-3);
            let upper = lower.offset(1.0).rotated(twist);
            let b = emit_ring(&mut mesh, &upper, 6, 1.0, None, 1e-3);
            stitch_rings(&mut mesh, &a.vertices, &b.vertices, shift);

            assert_eq!(mesh.triangle_count(), 12);
            for tri in mesh.triangles() {
                let [p, q, r] = tri.map(|i| mesh.vertex(i));
                let normal = (q - p).cross(r - p);
                let center = (p + q + r) / 3.0;
                assert!(normal.dot(DVec3::new(center.x, center.y, 0.0)) > 0.0);
                assert!(!mesh.is_degenerate_triangle(tri));
            }
        }
    }

    #[test]
    fn test_tube_counts_and_taper() {
        let params = ThickenParams::default()
            .with_radii(vec![1.0], vec![0.5])
            .with_division(1.0);
        let graph = solve(&[Segment::new(DVec3::ZERO, DVec3::X * 10.0)], &params);
        let (a, b) = graph.line_struts(0);
        let lookup = PointIndex::new(params.tolerance);

        let tube = build_tube(a, b, 6, 1.0, &lookup, params.tolerance).unwrap();

        assert_eq!(tube.vertex_count(), 13 * 6);
        assert_eq!(tube.triangle_count(), 12 * 12);

        // First and last ring apothems are the supplied radii
        let apothem = |i: u32, j: u32| {
            let mid = (tube.vertex(i) + tube.vertex(j)) / 2.0;
            DVec3::new(0.0, mid.y, mid.z).length()
        };
        assert_relative_eq!(apothem(0, 1), 1.0, epsilon = 1e-12);
        assert_relative_eq!(apothem(72, 73), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_tube_end_ring_matches_far_cap() {
        let params = ThickenParams::default().with_node_depth(0.5);
        let graph = solve(&[Segment::new(DVec3::ZERO, DVec3::new(0.0, 3.0, 4.0))], &params);
        let (a, b) = graph.line_struts(0);

        let far = b.joint_plane().ring(params.sides, b.hull_radius);
        let lookup = PointIndex::from_points(&far, params.tolerance);
        let tube =
            build_tube(a, b, params.sides, params.division, &lookup, params.tolerance).unwrap();

        let last = &tube.vertices()[tube.vertex_count() - far.len()..];
        for p in last {
            assert!(far.iter().any(|q| q == p));
        }
    }

    #[test]
    fn test_find_engulfed() {
        let lines = [
            Segment::new(DVec3::ZERO, DVec3::X * 10.0),
            Segment::new(DVec3::ZERO, DVec3::Y * 10.0),
            Segment::new(DVec3::ZERO, DVec3::new(10.0, 0.4, 0.0)),
        ];
        let graph = solve(&lines, &ThickenParams::default().with_radius(1.0));
        let engulfed = find_engulfed(&graph);
        assert!(engulfed.contains(&0));
        assert!(engulfed.contains(&2));
    }

    #[test]
    fn test_find_engulfed_clear_lines() {
        let lines = [
            Segment::new(DVec3::ZERO, DVec3::X * 10.0),
            Segment::new(DVec3::ZERO, DVec3::Y * 10.0),
        ];
        let graph = solve(&lines, &ThickenParams::default());
        assert!(find_engulfed(&graph).is_empty());
    }

    #[test]
    fn test_engulfed_diagnostic_cylinder() {
        let params = ThickenParams::default().with_radii(vec![1.0], vec![0.5]);
        let graph = solve(&[Segment::new(DVec3::ZERO, DVec3::Z * 8.0)], &params);

        let mesh = engulfed_diagnostic(&graph, &[0]).unwrap();
        let segments = FAILURE_CYLINDER_SEGMENTS as usize;
        let rings = FAILURE_CYLINDER_RINGS as usize;
        assert_eq!(mesh.vertex_count(), (rings + 1) * segments);

        let (min, max) = mesh.bounding_box();
        assert_relative_eq!(min.z, 0.0, epsilon = 1e-12);
        assert_relative_eq!(max.z, 8.0, epsilon = 1e-12);
        for v in mesh.vertices() {
            assert_relative_eq!(DVec3::new(v.x, v.y, 0.0).length(), 0.75, epsilon = 1e-12);
        }
        assert!(mesh.signed_volume() > 0.0);
    }
}
