//! # Node Offsets
//!
//! How far along each strut its joint plane has to sit so neighbouring
//! struts at a node don't run into each other.
//!
//! Two distances are involved:
//!
//! - the **hull offset**, shared by all struts at a node: the distance at
//!   which the rings of every strut pair stop overlapping, so the convex hull
//!   of all rings keeps every ring on its surface;
//! - the **fix offset**, per strut: the distance at which the strut's own
//!   cross-section clears every neighbouring strut. Hull vertices are pulled
//!   out to it, which turns the convex hull into a non-convex joint.

use config::constants::approx_zero;

/// Produces the pair of fix offsets for two struts meeting at a node.
///
/// `theta` is the angle between the two strut tangents (both pointing away
/// from the node), `r1`/`r2` the raw strut radii. Both results are
/// non-negative; the first belongs to the strut with radius `r1`.
pub trait OffsetPolicy {
    fn fix_offsets(&self, theta: f64, r1: f64, r2: f64) -> (f64, f64);
}

/// Pulls each strut out until its cross-section clears the other cylinder.
///
/// A disc of radius `r1` on axis 1 at distance `d` from the node clears a
/// cylinder of radius `r2` on axis 2 once `d·sin θ − r1·cos θ ≥ r2`.
///
/// # Example
///
/// ```rust
/// use exo_wireframe::{CylinderClearance, OffsetPolicy};
/// use std::f64::consts::FRAC_PI_2;
///
/// let (f1, f2) = CylinderClearance.fix_offsets(FRAC_PI_2, 1.0, 2.0);
/// assert!((f1 - 2.0).abs() < 1e-12);
/// assert!((f2 - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CylinderClearance;

impl OffsetPolicy for CylinderClearance {
    fn fix_offsets(&self, theta: f64, r1: f64, r2: f64) -> (f64, f64) {
        let (sin, cos) = theta.sin_cos();
        if approx_zero(sin) {
            return (0.0, 0.0);
        }
        let f1 = (r2 + r1 * cos) / sin;
        let f2 = (r1 + r2 * cos) / sin;
        (f1.max(0.0), f2.max(0.0))
    }
}

/// Leaves every node convex: all fix offsets are zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFixOffset;

impl OffsetPolicy for NoFixOffset {
    fn fix_offsets(&self, _theta: f64, _r1: f64, _r2: f64) -> (f64, f64) {
        (0.0, 0.0)
    }
}

/// Distance at which two rings of hull radii `r1`, `r2` at angle `theta`
/// stop overlapping.
///
/// Infinite when the struts coincide.
pub fn pair_hull_offset(theta: f64, r1: f64, r2: f64) -> f64 {
    let half = theta / 2.0;
    let (sin, cos) = half.sin_cos();
    if approx_zero(sin) {
        return f64::INFINITY;
    }
    r1.max(r2) * cos / sin
}
