//! # Thicken Errors
//!
//! Errors raised while validating input or building the thickened mesh.

use exo_mesh::{Mesh, MeshError};
use thiserror::Error;

/// Errors that can occur while thickening a wireframe.
#[derive(Debug, Error)]
pub enum ThickenError {
    /// No input lines
    #[error("No lines to thicken")]
    NoLines,

    /// Side count below the triangle minimum
    #[error("Strut side count must be at least {min}: {sides}")]
    TooFewSides { sides: u32, min: u32 },

    /// A radius list has no entries
    #[error("{which} radius list is empty")]
    EmptyRadii { which: &'static str },

    /// A radius is zero, negative or not finite
    #[error("{which} radius {index} must be positive: {value}")]
    InvalidRadius {
        which: &'static str,
        index: usize,
        value: f64,
    },

    /// Division length is zero, negative or not finite
    #[error("Division length must be positive: {0}")]
    InvalidDivision(f64),

    /// Node depth is negative or not finite
    #[error("Node depth must be non-negative: {0}")]
    InvalidNodeDepth(f64),

    /// Tolerance is zero, negative or not finite
    #[error("Tolerance must be positive: {0}")]
    InvalidTolerance(f64),

    /// Both endpoints of a line fall on the same node
    #[error("Line {index} has coincident endpoints")]
    DegenerateLine { index: usize },

    /// Node hulls overlap along one or more lines
    #[error("One or more struts is engulfed by its nodes (lines {lines:?})")]
    Engulfed {
        /// Indices of the failed input lines
        lines: Vec<usize>,
        /// One cylinder per failed line
        diagnostic: Mesh,
    },

    /// Mesh kernel failure
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

impl ThickenError {
    /// Returns the diagnostic mesh for engulfed struts.
    pub fn diagnostic(&self) -> Option<&Mesh> {
        match self {
            Self::Engulfed { diagnostic, .. } => Some(diagnostic),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engulfed_message() {
        let err = ThickenError::Engulfed {
            lines: vec![0, 2],
            diagnostic: Mesh::new(),
        };
        assert_eq!(
            err.to_string(),
            "One or more struts is engulfed by its nodes (lines [0, 2])"
        );
        assert!(err.diagnostic().is_some());
    }

    #[test]
    fn test_mesh_error_converts() {
        let err: ThickenError = MeshError::degenerate("flat").into();
        assert!(matches!(err, ThickenError::Mesh(_)));
        assert!(err.diagnostic().is_none());
    }
}
