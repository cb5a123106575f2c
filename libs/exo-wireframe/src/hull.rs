//! # Node Hulls
//!
//! The solid joint at every node where two or more struts meet, and the
//! flat cap at capped valence-1 ends.
//!
//! A joint starts as the convex hull of every incident strut's ring (at the
//! node's hull offset) plus one knuckle point behind the node per strut.
//! Hull vertices are then relocated: ring vertices slide out along their
//! strut to its joint plane, knuckles move to `knuckle_min` from the node.
//! Faces lying entirely on one strut's ring are removed, leaving an opening
//! the strut tube attaches to.

use crate::graph::{HullTag, Node, Strut};
use config::constants::HULL_RING_SEPARATION;
use exo_mesh::{labelled_hull, normalize, Mesh, MeshError};
use glam::DVec3;
use tracing::warn;

/// Tagged hull input points of a node with valence two or more.
///
/// For each incident strut, in order: its ring just past the hull offset,
/// then its knuckle. Lower valences have no hull points.
pub fn collect_hull_points(node: &Node, struts: &[Strut], sides: u32) -> (Vec<DVec3>, Vec<HullTag>) {
    if node.valence() < 2 {
        return (Vec::new(), Vec::new());
    }

    let capacity = node.valence() * (sides as usize + 1);
    let mut points = Vec::with_capacity(capacity);
    let mut tags = Vec::with_capacity(capacity);

    for &s in &node.struts {
        let strut = &struts[s];
        let ring = strut
            .frame
            .offset(ring_offset(node))
            .ring(sides, strut.hull_radius);
        tags.extend(std::iter::repeat(HullTag::Strut(s)).take(ring.len()));
        points.extend(ring);

        points.push(node.position - strut.tangent * (node.hull_offset / 2.0));
        tags.push(HullTag::Knuckle);
    }

    (points, tags)
}

/// Distance from the node at which rings enter the hull.
fn ring_offset(node: &Node) -> f64 {
    node.hull_offset + HULL_RING_SEPARATION
}

/// Builds the mesh for one node: a joint hull, a cap, or nothing.
pub fn build_node_hull(node: &Node, struts: &[Strut], sides: u32) -> Result<Mesh, MeshError> {
    match node.struts.as_slice() {
        [] => Ok(Mesh::new()),
        [only] if struts[*only].solo => Ok(Mesh::new()),
        [only] => Ok(build_cap(&struts[*only], sides)),
        _ => build_joint(node, struts, sides),
    }
}

/// Flat fan over a strut's joint ring, facing away from the strut.
pub fn build_cap(strut: &Strut, sides: u32) -> Mesh {
    let plane = strut.joint_plane();
    let n = sides as usize;
    let mut mesh = Mesh::with_capacity(n + 1, n);

    let apex = mesh.add_vertex(plane.origin);
    let rim: Vec<u32> = plane
        .ring(sides, strut.hull_radius)
        .into_iter()
        .map(|p| mesh.add_vertex(p))
        .collect();

    for k in 0..n {
        mesh.add_triangle(apex, rim[(k + 1) % n], rim[k]);
    }
    mesh
}

fn build_joint(node: &Node, struts: &[Strut], sides: u32) -> Result<Mesh, MeshError> {
    let (mut mesh, _) = tagged_joint(node, struts, sides)?;
    normalize(&mut mesh);
    Ok(mesh)
}

/// Relocated joint hull with strut openings, before welding.
///
/// Returns the tag of every vertex alongside the mesh.
pub fn tagged_joint(
    node: &Node,
    struts: &[Strut],
    sides: u32,
) -> Result<(Mesh, Vec<HullTag>), MeshError> {
    let (hull, tags) = labelled_hull(&node.hull_points, &node.hull_tags)?;
    let mut mesh = hull.mesh;
    let hulled_at = ring_offset(node);

    for (v, tag) in tags.iter().enumerate() {
        let v = v as u32;
        let position = mesh.vertex(v);
        let relocated = match *tag {
            HullTag::Strut(s) => {
                let strut = &struts[s];
                position + strut.tangent * (strut.joint_offset - hulled_at)
            }
            HullTag::Knuckle => (position - node.position)
                .try_normalize()
                .or_else(|| node.normal.try_normalize())
                .map_or(position, |direction| {
                    node.position + direction * node.knuckle_min
                }),
        };
        mesh.set_vertex(v, relocated);
    }

    for &s in &node.struts {
        let on_hull = tags.iter().filter(|t| **t == HullTag::Strut(s)).count();
        if on_hull < sides as usize {
            warn!(
                strut = s,
                on_hull,
                sides,
                "strut ring not fully on node hull"
            );
        }
    }

    mesh.retain_triangles(|tri| {
        let owner = tags[tri[0] as usize];
        !(matches!(owner, HullTag::Strut(_))
            && tags[tri[1] as usize] == owner
            && tags[tri[2] as usize] == owner)
    });

    Ok((mesh, tags))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Segment;
    use crate::graph::StrutGraph;
    use crate::offsets::CylinderClearance;
    use crate::params::ThickenParams;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn solve(lines: &[Segment], params: &ThickenParams) -> StrutGraph {
        StrutGraph::solve(lines, params, &CylinderClearance).unwrap()
    }

    #[test]
    fn test_cap_is_fan() {
        let params = ThickenParams::default().with_sides(7).with_radius(0.5);
        let graph = solve(&[Segment::new(DVec3::ZERO, DVec3::Z * 3.0)], &params);

        let cap = build_node_hull(&graph.nodes[0], &graph.struts, 7).unwrap();
        assert_eq!(cap.vertex_count(), 8);
        assert_eq!(cap.triangle_count(), 7);

        // Faces point away from the strut
        for tri in cap.triangles() {
            let [a, b, c] = tri.map(|i| cap.vertex(i));
            assert!((b - a).cross(c - a).z < 0.0);
        }
    }

    #[test]
    fn test_cap_apothem_is_radius() {
        let params = ThickenParams::default().with_sides(6).with_radius(0.8);
        let graph = solve(&[Segment::new(DVec3::ZERO, DVec3::X * 3.0)], &params);
        let cap = build_cap(&graph.struts[0], 6);

        let edge_mid = (cap.vertex(1) + cap.vertex(2)) / 2.0;
        assert_relative_eq!(edge_mid.distance(cap.vertex(0)), 0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_open_end_has_no_mesh() {
        let params = ThickenParams::default().with_open_ends(true);
        let graph = solve(&[Segment::new(DVec3::ZERO, DVec3::X * 3.0)], &params);
        let mesh = build_node_hull(&graph.nodes[1], &graph.struts, 6).unwrap();
        assert!(mesh.is_empty());
        assert!(graph.nodes[1].hull_points.is_empty());
    }

    #[test]
    fn test_collinear_joint_is_open_prism() {
        let lines = [
            Segment::new(DVec3::new(-5.0, 0.0, 0.0), DVec3::ZERO),
            Segment::new(DVec3::ZERO, DVec3::new(5.0, 0.0, 0.0)),
        ];
        let params = ThickenParams::default().with_radius(1.0);
        let graph = solve(&lines, &params);
        let node = &graph.nodes[1];

        assert_relative_eq!(node.hull_offset, 0.5 / (PI / 6.0).cos(), epsilon = 1e-12);

        let mesh = build_node_hull(node, &graph.struts, 6).unwrap();
        // Both hexagonal caps removed, six side quads left
        assert_eq!(mesh.vertex_count(), 12);
        assert_eq!(mesh.triangle_count(), 12);
    }

    #[test]
    fn test_joint_rings_sit_on_joint_planes() {
        let lines = [
            Segment::new(DVec3::ZERO, DVec3::X * 6.0),
            Segment::new(DVec3::ZERO, DVec3::Y * 6.0),
            Segment::new(DVec3::ZERO, DVec3::Z * 6.0),
        ];
        let params = ThickenParams::default().with_radius(0.5).with_sides(8);
        let graph = solve(&lines, &params);
        let node = &graph.nodes[0];
        let mesh = build_node_hull(node, &graph.struts, 8).unwrap();

        for &s in &node.struts {
            let strut = &graph.struts[s];
            let ring = strut.joint_plane().ring(8, strut.hull_radius);
            for p in ring {
                let found = mesh.vertices().iter().any(|v| v.distance(p) < 1e-9);
                assert!(found, "ring point {p:?} of strut {s} missing");
            }
        }
    }

    #[test]
    fn test_joint_has_opening_per_strut() {
        let lines = [
            Segment::new(DVec3::ZERO, DVec3::X * 6.0),
            Segment::new(DVec3::ZERO, DVec3::Y * 6.0),
            Segment::new(DVec3::ZERO, DVec3::Z * 6.0),
        ];
        let graph = solve(&lines, &ThickenParams::default());
        let node = &graph.nodes[0];
        let (mesh, tags) = tagged_joint(node, &graph.struts, 6).unwrap();

        for &s in &node.struts {
            let ring = tags.iter().filter(|t| **t == HullTag::Strut(s)).count();
            assert_eq!(ring, 6);
        }
        // No face is spanned by a single strut's ring
        for tri in mesh.triangles() {
            let [a, b, c] = tri.map(|v| tags[v as usize]);
            assert!(!(matches!(a, HullTag::Strut(_)) && a == b && b == c), "{tri:?}");
        }
    }

    #[test]
    fn test_fix_offset_pulls_thin_ring_past_hull() {
        let bend = DVec3::new((2.0 * PI / 3.0).cos(), (2.0 * PI / 3.0).sin(), 0.0);
        let lines = [
            Segment::new(DVec3::ZERO, DVec3::X * 6.0),
            Segment::new(DVec3::ZERO, bend * 6.0),
        ];
        let params = ThickenParams::default().with_radii(vec![0.1, 1.0], vec![0.1, 1.0]);
        let graph = solve(&lines, &params);
        let node = &graph.nodes[0];
        let thin = &graph.struts[0];
        assert!(thin.fix_offset > node.hull_offset);

        let (tagged, tags) = tagged_joint(node, &graph.struts, 6).unwrap();
        for (v, tag) in tags.iter().enumerate() {
            if *tag == HullTag::Strut(0) {
                let p = tagged.vertex(v as u32);
                assert_relative_eq!(p.x, thin.fix_offset, epsilon = 1e-9);
            }
        }

        let mesh = build_node_hull(node, &graph.struts, 6).unwrap();
        for p in thin.joint_plane().ring(6, thin.hull_radius) {
            let found = mesh.vertices().iter().any(|v| v.distance(p) < 1e-9);
            assert!(found, "ring point {p:?} missing");
        }
    }

    #[test]
    fn test_knuckles_pulled_to_knuckle_min() {
        let lines = [
            Segment::new(DVec3::ZERO, DVec3::X * 6.0),
            Segment::new(DVec3::ZERO, DVec3::Y * 6.0),
        ];
        let params = ThickenParams::default().with_radii(vec![0.5, 0.3], vec![0.5]);
        let graph = solve(&lines, &params);
        let node = &graph.nodes[0];

        let (_, tags) = labelled_hull(&node.hull_points, &node.hull_tags).unwrap();
        let knuckle_count = tags.iter().filter(|t| **t == HullTag::Knuckle).count();
        assert!(knuckle_count > 0);

        let mesh = build_node_hull(node, &graph.struts, 6).unwrap();
        let at_knuckle_min = mesh
            .vertices()
            .iter()
            .filter(|v| (v.distance(node.position) - 0.3).abs() < 1e-9)
            .count();
        assert_eq!(at_knuckle_min, knuckle_count);
    }
}
