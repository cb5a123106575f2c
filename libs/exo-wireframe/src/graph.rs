//! # Strut Graph
//!
//! Turns a list of lines into nodes (deduplicated endpoints) and struts
//! (line halves), then solves the offsets every later stage reads.
//!
//! Line `i` owns struts `2i` (start half) and `2i + 1` (end half). Both halves
//! run from their node to the midpoint of the two node positions.

use crate::error::ThickenError;
use crate::geometry::{Plane, Segment};
use crate::hull::collect_hull_points;
use crate::offsets::{pair_hull_offset, OffsetPolicy};
use crate::params::ThickenParams;
use exo_mesh::PointIndex;
use glam::DVec3;
use std::f64::consts::PI;
use tracing::debug;

/// Owner of a node hull input point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HullTag {
    /// Ring point of the strut with this index
    Strut(usize),
    /// Point behind the node that rounds off the joint
    Knuckle,
}

/// A deduplicated line endpoint.
#[derive(Debug, Clone)]
pub struct Node {
    pub position: DVec3,
    /// Incident struts in discovery order
    pub struts: Vec<usize>,
    /// Sum of the reversed incident strut tangents
    pub normal: DVec3,
    /// Distance from the node at which hull rings sit
    pub hull_offset: f64,
    /// Largest incident hull radius
    pub max_radius: f64,
    /// Smallest incident raw radius; knuckles end up this far from the node
    pub knuckle_min: f64,
    pub hull_points: Vec<DVec3>,
    /// Owner of each entry of `hull_points`
    pub hull_tags: Vec<HullTag>,
}

impl Node {
    fn new(position: DVec3) -> Self {
        Self {
            position,
            struts: Vec::new(),
            normal: DVec3::ZERO,
            hull_offset: 0.0,
            max_radius: 0.0,
            knuckle_min: f64::INFINITY,
            hull_points: Vec::new(),
            hull_tags: Vec::new(),
        }
    }

    #[inline]
    pub fn valence(&self) -> usize {
        self.struts.len()
    }
}

/// One half of an input line, from a node to the line midpoint.
#[derive(Debug, Clone)]
pub struct Strut {
    /// Input line this strut is half of
    pub line: usize,
    /// Node at the strut start
    pub node: usize,
    /// The other half of the same line
    pub pair: usize,
    pub start: DVec3,
    pub end: DVec3,
    /// Unit direction from `start` to `end`
    pub tangent: DVec3,
    pub length: f64,
    /// Supplied radius
    pub radius: f64,
    /// Circumradius of the polygon whose apothem is `radius`
    pub hull_radius: f64,
    /// Origin at `start`, normal along `tangent`
    pub frame: Plane,
    /// Clearance from neighbouring struts, at least the node depth
    pub fix_offset: f64,
    /// Distance from the node to the plane where hull and tube meet
    pub joint_offset: f64,
    /// Open valence-1 end: no cap, tube runs to the node
    pub solo: bool,
}

impl Strut {
    /// The plane where this strut's tube meets its node hull or cap.
    pub fn joint_plane(&self) -> Plane {
        self.frame.offset(self.joint_offset)
    }
}

/// Nodes and struts of a wireframe with solved offsets.
#[derive(Debug, Clone)]
pub struct StrutGraph {
    pub nodes: Vec<Node>,
    pub struts: Vec<Strut>,
}

impl StrutGraph {
    /// Builds the graph, solves offsets and collects hull points.
    ///
    /// # Example
    ///
    /// ```rust
    /// use exo_wireframe::{CylinderClearance, Segment, StrutGraph, ThickenParams};
    /// use glam::DVec3;
    ///
    /// let lines = [
    ///     Segment::new(DVec3::ZERO, DVec3::X * 4.0),
    ///     Segment::new(DVec3::ZERO, DVec3::Y * 4.0),
    /// ];
    /// let graph = StrutGraph::solve(&lines, &ThickenParams::default(), &CylinderClearance).unwrap();
    ///
    /// assert_eq!(graph.nodes.len(), 3);
    /// assert_eq!(graph.nodes[0].valence(), 2);
    /// ```
    pub fn solve(
        lines: &[Segment],
        params: &ThickenParams,
        policy: &dyn OffsetPolicy,
    ) -> Result<Self, ThickenError> {
        let mut graph = Self::build(lines, params)?;
        graph.solve_offsets(params, policy);
        graph.collect_hull_points(params);
        Ok(graph)
    }

    /// Deduplicates endpoints into nodes and splits every line into two struts.
    pub fn build(lines: &[Segment], params: &ThickenParams) -> Result<Self, ThickenError> {
        if lines.is_empty() {
            return Err(ThickenError::NoLines);
        }
        params.validate()?;

        let mut index = PointIndex::new(params.tolerance);
        let mut nodes: Vec<Node> = Vec::new();
        let mut struts = Vec::with_capacity(lines.len() * 2);

        let mut node_for = |point: DVec3, nodes: &mut Vec<Node>| {
            match index.closest_within(point, params.tolerance) {
                Some(existing) => existing,
                None => {
                    nodes.push(Node::new(point));
                    index.insert(point)
                }
            }
        };

        let polygon_scale = 1.0 / (PI / params.sides as f64).cos();

        for (i, line) in lines.iter().enumerate() {
            let a = node_for(line.start, &mut nodes);
            let b = node_for(line.end, &mut nodes);
            if a == b {
                return Err(ThickenError::DegenerateLine { index: i });
            }

            let span = Segment::new(nodes[a].position, nodes[b].position);
            let (pa, pb) = (span.start, span.end);
            let mid = span.midpoint();
            let tangent = span.tangent();
            let half_length = span.length() / 2.0;

            let frame_a = Plane::from_normal(pa, tangent);
            let frame_b = Plane {
                origin: pb,
                ..frame_a.mirrored()
            };

            let halves = [
                (a, pa, tangent, frame_a, params.start_radius(i)),
                (b, pb, -tangent, frame_b, params.end_radius(i)),
            ];
            for (k, (node, start, tangent, frame, radius)) in halves.into_iter().enumerate() {
                let id = 2 * i + k;
                nodes[node].struts.push(id);
                struts.push(Strut {
                    line: i,
                    node,
                    pair: 2 * i + 1 - k,
                    start,
                    end: mid,
                    tangent,
                    length: half_length,
                    radius,
                    hull_radius: radius * polygon_scale,
                    frame,
                    fix_offset: 0.0,
                    joint_offset: 0.0,
                    solo: false,
                });
            }
        }

        debug!(nodes = nodes.len(), struts = struts.len(), "built strut graph");
        Ok(Self { nodes, struts })
    }

    /// Fills in node hull offsets and strut fix / joint offsets.
    pub fn solve_offsets(&mut self, params: &ThickenParams, policy: &dyn OffsetPolicy) {
        let depth = params.node_depth;

        for (n, node) in self.nodes.iter_mut().enumerate() {
            let incident = &node.struts;

            node.normal = incident.iter().map(|&s| -self.struts[s].tangent).sum();
            node.max_radius = incident
                .iter()
                .map(|&s| self.struts[s].hull_radius)
                .fold(0.0, f64::max);
            node.knuckle_min = incident
                .iter()
                .map(|&s| self.struts[s].radius)
                .fold(f64::INFINITY, f64::min);

            if let [only] = incident.as_slice() {
                let strut = &mut self.struts[*only];
                node.hull_offset = depth;
                strut.fix_offset = depth;
                strut.solo = params.open_ends;
                strut.joint_offset = if strut.solo { 0.0 } else { depth };
                continue;
            }

            let mut hull_offset: f64 = 0.0;
            let mut fix = vec![depth; incident.len()];
            for i in 0..incident.len() {
                for j in i + 1..incident.len() {
                    let si = &self.struts[incident[i]];
                    let sj = &self.struts[incident[j]];
                    let theta = si.tangent.angle_between(sj.tangent);

                    hull_offset =
                        hull_offset.max(pair_hull_offset(theta, si.hull_radius, sj.hull_radius));

                    let (fi, fj) = policy.fix_offsets(theta, si.radius, sj.radius);
                    fix[i] = fix[i].max(fi);
                    fix[j] = fix[j].max(fj);
                }
            }

            if hull_offset < params.tolerance {
                hull_offset = node.max_radius / 2.0;
            }
            node.hull_offset = hull_offset;

            for (&s, fix_offset) in incident.iter().zip(fix) {
                let strut = &mut self.struts[s];
                strut.fix_offset = fix_offset;
                strut.joint_offset = hull_offset.max(fix_offset).max(depth);
            }

            debug!(
                node = n,
                valence = incident.len(),
                hull_offset,
                knuckle_min = node.knuckle_min,
                "solved node offsets"
            );
        }
    }

    /// Stores every node's tagged hull input points.
    pub fn collect_hull_points(&mut self, params: &ThickenParams) {
        for node in &mut self.nodes {
            let (points, tags) = collect_hull_points(node, &self.struts, params.sides);
            node.hull_points = points;
            node.hull_tags = tags;
        }
    }

    /// Start and end strut of line `line`.
    #[inline]
    pub fn line_struts(&self, line: usize) -> (&Strut, &Strut) {
        (&self.struts[2 * line], &self.struts[2 * line + 1])
    }

    #[inline]
    pub fn line_count(&self) -> usize {
        self.struts.len() / 2
    }
}
