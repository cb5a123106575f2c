//! # Mesh Operations
//!
//! Convex hulls and whole-mesh cleanup.

pub mod hull;
pub mod normalize;

pub use hull::{convex_hull, labelled_hull, Hull};
pub use normalize::{normalize, NormalizeStats};
