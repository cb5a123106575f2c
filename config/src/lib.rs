//! # Config Crate
//!
//! Centralized configuration constants for the wireframe thickening pipeline.
//! Tolerances, defaults and safety limits live here so `exo-mesh` and
//! `exo-wireframe` agree on every threshold.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{DEFAULT_SIDES, DEFAULT_TOLERANCE, EPSILON};
//!
//! // Use EPSILON for floating-point comparisons
//! let value: f64 = 0.00000000001; // 1e-11, smaller than EPSILON (1e-10)
//! assert!(value.abs() < EPSILON);
//!
//! // Defaults for a thickening run
//! assert_eq!(DEFAULT_SIDES, 6);
//! assert!(DEFAULT_TOLERANCE > EPSILON);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Explicit Tolerances**: Matching distances are defaults a caller can override

pub mod constants;

#[cfg(test)]
mod tests;
