//! # Configuration Constants
//!
//! Centralized constants for the thickening pipeline. All geometry tolerances,
//! tessellation defaults and safety limits are defined here.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances
//! - **Defaults**: Parameter defaults for a thickening run
//! - **Diagnostics**: Tessellation of the engulfed-strut report geometry
//! - **Limits**: Maximum values for safety bounds

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons.
///
/// Used for determining if two floating-point values are "equal" within
/// numerical tolerance, and as the visibility threshold of the convex hull.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-11));
/// ```
pub const EPSILON: f64 = 1e-10;

/// Epsilon for vertex welding and degenerate triangle detection.
///
/// Vertices closer than this are merged during normalization, and triangles
/// whose doubled area falls below it are culled.
///
/// # Example
///
/// ```rust
/// use config::constants::VERTEX_MERGE_EPSILON;
///
/// fn vertices_should_merge(v1: [f64; 3], v2: [f64; 3]) -> bool {
///     let dx = v1[0] - v2[0];
///     let dy = v1[1] - v2[1];
///     let dz = v1[2] - v2[2];
///     (dx * dx + dy * dy + dz * dz).sqrt() < VERTEX_MERGE_EPSILON
/// }
/// ```
pub const VERTEX_MERGE_EPSILON: f64 = 1e-8;

/// Default absolute distance tolerance for point matching.
///
/// Endpoints closer than this share a node, and tube rings snap onto node
/// hull vertices within this distance.
pub const DEFAULT_TOLERANCE: f64 = 1e-3;

/// Minimum cell size for spatial hashing.
///
/// Keeps the hash grid from degenerating when the query tolerance is tiny.
pub const MIN_CELL_SIZE: f64 = 1e-6;

/// Extra distance node hull rings are pushed past the hull offset.
///
/// At the hull offset neighbouring rings touch, and can share a vertex.
/// The gap keeps every hull vertex owned by a single strut; relocation
/// takes it out again and welding closes the resulting slivers.
pub const HULL_RING_SEPARATION: f64 = 1e-6;

// =============================================================================
// DEFAULT PARAMETERS
// =============================================================================

/// Minimum number of sides for a strut cross-section.
///
/// # Example
///
/// ```rust
/// use config::constants::MIN_SIDES;
///
/// let requested = 2;
/// assert!(requested < MIN_SIDES);
/// ```
pub const MIN_SIDES: u32 = 3;

/// Default number of sides for a strut cross-section.
pub const DEFAULT_SIDES: u32 = 6;

/// Default strut radius when no radius list is supplied.
pub const DEFAULT_RADIUS: f64 = 0.5;

/// Default target length of one tube segment.
pub const DEFAULT_DIVISION: f64 = 1.0;

/// Default node depth (minimum joint plane offset from a node).
pub const DEFAULT_NODE_DEPTH: f64 = 0.0;

// =============================================================================
// DIAGNOSTIC CONSTANTS
// =============================================================================

/// Number of segments around each engulfed-strut diagnostic cylinder.
pub const FAILURE_CYLINDER_SEGMENTS: u32 = 10;

/// Number of axial divisions of each engulfed-strut diagnostic cylinder.
pub const FAILURE_CYLINDER_RINGS: u32 = 5;

// =============================================================================
// LIMIT CONSTANTS
// =============================================================================

/// Maximum number of vertices in a single mesh.
///
/// Safety limit to prevent memory exhaustion from extremely dense wireframes.
///
/// # Example
///
/// ```rust
/// use config::constants::MAX_VERTICES;
///
/// let vertex_count = 1000;
/// assert!(vertex_count < MAX_VERTICES);
/// ```
pub const MAX_VERTICES: usize = 10_000_000;

/// Maximum number of triangles in a single mesh.
pub const MAX_TRIANGLES: usize = 10_000_000;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Checks if a f64 value is approximately zero within EPSILON.
///
/// # Example
///
/// ```rust
/// use config::constants::approx_zero;
///
/// assert!(approx_zero(1e-11));
/// assert!(!approx_zero(0.1));
/// ```
#[inline]
pub fn approx_zero(value: f64) -> bool {
    value.abs() < EPSILON
}
