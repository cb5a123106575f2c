//! # Tests for Config Constants
//!
//! Unit tests verifying the correctness of configuration constants
//! and helper functions.

use crate::constants::*;

// =============================================================================
// PRECISION TESTS
// =============================================================================

#[test]
fn test_epsilon_is_positive() {
    assert!(EPSILON > 0.0, "EPSILON must be positive");
}

#[test]
fn test_epsilon_is_small() {
    assert!(EPSILON < 1e-6, "EPSILON should be small for precision");
}

#[test]
fn test_vertex_merge_epsilon_larger_than_epsilon() {
    assert!(
        VERTEX_MERGE_EPSILON >= EPSILON,
        "VERTEX_MERGE_EPSILON should be >= EPSILON"
    );
}

#[test]
fn test_tolerance_larger_than_merge_epsilon() {
    // Snapping must reach further than welding, or snapped rings never weld
    assert!(DEFAULT_TOLERANCE > VERTEX_MERGE_EPSILON);
}

#[test]
fn test_hull_ring_separation_range() {
    // Distinct to the hull, far below matching distance
    assert!(HULL_RING_SEPARATION > EPSILON);
    assert!(HULL_RING_SEPARATION < DEFAULT_TOLERANCE);
}

#[test]
fn test_min_cell_size_positive() {
    assert!(MIN_CELL_SIZE > 0.0);
}

// =============================================================================
// DEFAULT TESTS
// =============================================================================

#[test]
fn test_min_sides_is_triangle() {
    assert_eq!(MIN_SIDES, 3);
}

#[test]
fn test_default_sides_valid() {
    assert!(DEFAULT_SIDES >= MIN_SIDES);
}

#[test]
fn test_defaults_positive() {
    assert!(DEFAULT_RADIUS > 0.0);
    assert!(DEFAULT_DIVISION > 0.0);
    assert!(DEFAULT_NODE_DEPTH >= 0.0);
}

#[test]
fn test_failure_cylinder_tessellation() {
    assert!(FAILURE_CYLINDER_SEGMENTS >= MIN_SIDES);
    assert!(FAILURE_CYLINDER_RINGS >= 1);
}

// =============================================================================
// APPROX_ZERO TESTS
// =============================================================================

#[test]
fn test_approx_zero_exact_zero() {
    assert!(approx_zero(0.0));
}

#[test]
fn test_approx_zero_within_epsilon() {
    let small = EPSILON / 2.0;
    assert!(approx_zero(small));
    assert!(approx_zero(-small));
}

#[test]
fn test_approx_zero_non_zero_values() {
    assert!(!approx_zero(1.0));
    assert!(!approx_zero(-1.0));
    assert!(!approx_zero(0.1));
}

// =============================================================================
// LIMIT TESTS
// =============================================================================

#[test]
fn test_mesh_limits_reasonable() {
    assert!(MAX_VERTICES >= 1_000_000);
    assert!(MAX_TRIANGLES >= 1_000_000);
}
