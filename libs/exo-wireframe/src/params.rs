//! # Thickening Parameters
//!
//! Everything besides the lines themselves that shapes the output mesh.
//! Parameter sets are plain serde values, so they can be stored as JSON.

use crate::error::ThickenError;
use config::constants::{
    DEFAULT_DIVISION, DEFAULT_NODE_DEPTH, DEFAULT_RADIUS, DEFAULT_SIDES, DEFAULT_TOLERANCE,
    MIN_SIDES,
};
use serde::{Deserialize, Serialize};

/// Parameters for [`thicken`](crate::thicken).
///
/// Radius lists are indexed by line. A list shorter than the line list
/// repeats its last value for the remaining lines.
///
/// # Example
///
/// ```rust
/// use exo_wireframe::ThickenParams;
///
/// let params = ThickenParams::default()
///     .with_sides(8)
///     .with_radii(vec![1.0], vec![0.5])
///     .with_open_ends(true);
///
/// assert!(params.validate().is_ok());
/// assert_eq!(params.end_radius(3), 0.5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThickenParams {
    /// Number of sides of every strut cross-section
    pub sides: u32,
    /// Radius at each line's start point
    pub start_radii: Vec<f64>,
    /// Radius at each line's end point
    pub end_radii: Vec<f64>,
    /// Minimum distance from a node to the joint plane of its struts
    pub node_depth: f64,
    /// Target length of one tube segment
    pub division: f64,
    /// Leave valence-1 ends uncapped
    pub open_ends: bool,
    /// Distance below which two points are the same
    pub tolerance: f64,
}

impl Default for ThickenParams {
    fn default() -> Self {
        Self {
            sides: DEFAULT_SIDES,
            start_radii: vec![DEFAULT_RADIUS],
            end_radii: vec![DEFAULT_RADIUS],
            node_depth: DEFAULT_NODE_DEPTH,
            division: DEFAULT_DIVISION,
            open_ends: false,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl ThickenParams {
    /// Sets the cross-section side count.
    pub fn with_sides(mut self, sides: u32) -> Self {
        self.sides = sides;
        self
    }

    /// Sets the start and end radius lists.
    pub fn with_radii(mut self, start_radii: Vec<f64>, end_radii: Vec<f64>) -> Self {
        self.start_radii = start_radii;
        self.end_radii = end_radii;
        self
    }

    /// Uses one radius for every line end.
    pub fn with_radius(self, radius: f64) -> Self {
        self.with_radii(vec![radius], vec![radius])
    }

    /// Sets the node depth.
    pub fn with_node_depth(mut self, node_depth: f64) -> Self {
        self.node_depth = node_depth;
        self
    }

    /// Sets the division length.
    pub fn with_division(mut self, division: f64) -> Self {
        self.division = division;
        self
    }

    /// Sets whether valence-1 ends stay open.
    pub fn with_open_ends(mut self, open_ends: bool) -> Self {
        self.open_ends = open_ends;
        self
    }

    /// Sets the point matching tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Radius at the start of line `line`.
    ///
    /// Only meaningful after [`validate`](Self::validate) succeeded.
    pub fn start_radius(&self, line: usize) -> f64 {
        broadcast(&self.start_radii, line)
    }

    /// Radius at the end of line `line`.
    pub fn end_radius(&self, line: usize) -> f64 {
        broadcast(&self.end_radii, line)
    }

    /// Checks every parameter, reporting the first problem found.
    pub fn validate(&self) -> Result<(), ThickenError> {
        if self.sides < MIN_SIDES {
            return Err(ThickenError::TooFewSides {
                sides: self.sides,
                min: MIN_SIDES,
            });
        }

        check_radii("Start", &self.start_radii)?;
        check_radii("End", &self.end_radii)?;

        if !(self.division.is_finite() && self.division > 0.0) {
            return Err(ThickenError::InvalidDivision(self.division));
        }
        if !(self.node_depth.is_finite() && self.node_depth >= 0.0) {
            return Err(ThickenError::InvalidNodeDepth(self.node_depth));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(ThickenError::InvalidTolerance(self.tolerance));
        }

        Ok(())
    }
}

fn broadcast(values: &[f64], index: usize) -> f64 {
    values
        .get(index)
        .or_else(|| values.last())
        .copied()
        .unwrap_or(DEFAULT_RADIUS)
}

fn check_radii(which: &'static str, radii: &[f64]) -> Result<(), ThickenError> {
    if radii.is_empty() {
        return Err(ThickenError::EmptyRadii { which });
    }
    match radii
        .iter()
        .enumerate()
        .find(|(_, r)| !(r.is_finite() && **r > 0.0))
    {
        Some((index, &value)) => Err(ThickenError::InvalidRadius {
            which,
            index,
            value,
        }),
        None => Ok(()),
    }
}
