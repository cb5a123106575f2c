//! # Exo Wireframe
//!
//! Thickens a wireframe of straight lines into a solid mesh: every line
//! becomes a tapered, twisted tube and every point where lines meet becomes
//! a (possibly non-convex) joint.
//!
//! ## Pipeline
//!
//! ```text
//! lines → StrutGraph (nodes, struts, offsets) → node hulls / caps
//!                                             → strut tubes
//!                                             → assembled mesh
//! ```
//!
//! Lines whose node joints overlap ("engulfed" struts) abort the run with
//! [`ThickenError::Engulfed`], which carries one cylinder per failed line.
//!
//! ## Usage
//!
//! ```rust
//! use exo_wireframe::{thicken, Segment, ThickenParams};
//! use glam::DVec3;
//!
//! let lines = [Segment::new(DVec3::ZERO, DVec3::new(10.0, 0.0, 0.0))];
//! let params = ThickenParams::default().with_radii(vec![1.0], vec![0.5]);
//!
//! let mesh = thicken(&lines, &params).unwrap();
//! // 12 tube segments of 6 sides, plus two 6-triangle end caps
//! assert_eq!(mesh.triangle_count(), 12 * 6 * 2 + 2 * 6);
//! ```

pub mod assemble;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod hull;
pub mod offsets;
pub mod params;
pub mod tube;


pub use error::ThickenError;
pub use geometry::{Plane, Segment};
pub use graph::{HullTag, Node, Strut, StrutGraph};
pub use offsets::{CylinderClearance, NoFixOffset, OffsetPolicy};
pub use params::ThickenParams;

use exo_mesh::{Mesh, PointIndex};
use tracing::{info, warn};

/// Thickens `lines` with the default [`CylinderClearance`] fix offsets.
pub fn thicken(lines: &[Segment], params: &ThickenParams) -> Result<Mesh, ThickenError> {
    thicken_with_policy(lines, params, &CylinderClearance)
}

/// Thickens `lines`, pulling struts apart at nodes as `policy` dictates.
pub fn thicken_with_policy(
    lines: &[Segment],
    params: &ThickenParams,
    policy: &dyn OffsetPolicy,
) -> Result<Mesh, ThickenError> {
    info!(lines = lines.len(), sides = params.sides, "thickening wireframe");

    let graph = StrutGraph::solve(lines, params, policy)?;

    let engulfed = tube::find_engulfed(&graph);
    if !engulfed.is_empty() {
        for &line in &engulfed {
            warn!(line, "strut engulfed by its nodes");
        }
        let diagnostic = tube::engulfed_diagnostic(&graph, &engulfed)?;
        return Err(ThickenError::Engulfed {
            lines: engulfed,
            diagnostic,
        });
    }

    let hulls = map_collect(&graph.nodes, |node| {
        hull::build_node_hull(node, &graph.struts, params.sides)
    })
    .into_iter()
    .collect::<Result<Vec<_>, _>>()?;

    let mut lookup = PointIndex::new(params.tolerance);
    for hull in &hulls {
        for v in hull.vertices() {
            lookup.insert(*v);
        }
    }

    let line_ids: Vec<usize> = (0..graph.line_count()).collect();
    let tubes = map_collect(&line_ids, |&line| {
        let (a, b) = graph.line_struts(line);
        tube::build_tube(a, b, params.sides, params.division, &lookup, params.tolerance)
    })
    .into_iter()
    .collect::<Result<Vec<_>, _>>()?;

    let mesh = assemble::assemble(hulls.iter().chain(&tubes))?;

    info!(
        nodes = graph.nodes.len(),
        struts = graph.struts.len(),
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "thickened wireframe"
    );
    Ok(mesh)
}

/// Maps every item, in order, on the rayon pool when `parallel` is enabled.
fn map_collect<T, R, F>(items: &[T], f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
        items.par_iter().map(f).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        items.iter().map(f).collect()
    }
}
