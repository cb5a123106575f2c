//! # Primitives
//!
//! Mesh generation for standalone shapes.

pub mod cylinder;

pub use cylinder::create_cylinder;
