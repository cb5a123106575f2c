//! # Exo Mesh
//!
//! Triangle mesh kernel used by the wireframe thickener.
//!
//! ## Architecture
//!
//! ```text
//! exo-wireframe (graph, hulls, tubes) → exo-mesh (Mesh)
//! ```
//!
//! ## Algorithms
//!
//! - **Spatial index**: hash grid answering "closest point within tolerance"
//! - **Hull**: QuickHull with an exact orientation check for the initial simplex
//! - **Normalization**: weld, cull, winding unification, outward orientation
//! - **Primitives**: capped cylinder for diagnostics
//!
//! ## Usage
//!
//! ```rust
//! use exo_mesh::{convex_hull, normalize};
//! use glam::DVec3;
//!
//! let points = [DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z];
//! let mut mesh = convex_hull(&points).unwrap().mesh;
//! normalize(&mut mesh);
//! assert_eq!(mesh.triangle_count(), 4);
//! ```

pub mod error;
pub mod mesh;
pub mod ops;
pub mod primitives;
pub mod spatial;

pub use error::MeshError;
pub use mesh::Mesh;
pub use ops::{convex_hull, labelled_hull, normalize, Hull, NormalizeStats};
pub use primitives::create_cylinder;
pub use spatial::PointIndex;
