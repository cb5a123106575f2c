//! # Spatial Index for Point Matching
//!
//! Hash grid over 3D points answering "closest point within tolerance".
//! Used for node deduplication, tube-to-hull ring matching and vertex welding,
//! replacing exact-coordinate equality with a tolerance query.
//!
//! ## Example
//!
//! ```rust
//! use exo_mesh::PointIndex;
//! use glam::DVec3;
//!
//! let mut index = PointIndex::new(0.01);
//! index.insert(DVec3::ZERO);
//! index.insert(DVec3::X);
//!
//! assert_eq!(index.closest_within(DVec3::new(0.001, 0.0, 0.0), 0.01), Some(0));
//! assert_eq!(index.closest_within(DVec3::new(0.5, 0.0, 0.0), 0.01), None);
//! ```

use config::constants::MIN_CELL_SIZE;
use glam::DVec3;
use std::collections::HashMap;

/// 3D cell coordinate for spatial hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CellCoord {
    x: i64,
    y: i64,
    z: i64,
}

impl CellCoord {
    /// Creates a cell coordinate from 3D position.
    fn from_position(pos: DVec3, cell_size: f64) -> Self {
        Self {
            x: (pos.x / cell_size).floor() as i64,
            y: (pos.y / cell_size).floor() as i64,
            z: (pos.z / cell_size).floor() as i64,
        }
    }
}

/// Spatial index over a growing list of points.
///
/// Points keep the index they were inserted with, so the index doubles as
/// the point table of whatever it deduplicates.
#[derive(Debug, Clone)]
pub struct PointIndex {
    /// Hash grid: cell -> point indices
    grid: HashMap<CellCoord, Vec<usize>>,
    /// Cell size for hashing
    cell_size: f64,
    /// Inserted points in insertion order
    points: Vec<DVec3>,
}

impl PointIndex {
    /// Creates an empty index whose cells are sized for `tolerance` queries.
    pub fn new(tolerance: f64) -> Self {
        Self {
            grid: HashMap::new(),
            cell_size: tolerance.max(MIN_CELL_SIZE),
            points: Vec::new(),
        }
    }

    /// Creates an index over existing points.
    pub fn from_points(points: &[DVec3], tolerance: f64) -> Self {
        let mut index = Self::new(tolerance);
        for p in points {
            index.insert(*p);
        }
        index
    }

    /// Adds a point and returns its index.
    pub fn insert(&mut self, point: DVec3) -> usize {
        let idx = self.points.len();
        self.points.push(point);
        self.grid
            .entry(CellCoord::from_position(point, self.cell_size))
            .or_default()
            .push(idx);
        idx
    }

    /// Returns the number of indexed points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if no point has been inserted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the point stored at `index`.
    #[inline]
    pub fn point(&self, index: usize) -> DVec3 {
        self.points[index]
    }

    /// Returns all indexed points in insertion order.
    #[inline]
    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    /// Consumes the index, returning its points.
    pub fn into_points(self) -> Vec<DVec3> {
        self.points
    }

    /// Finds the closest point strictly closer than `tolerance`.
    ///
    /// Ties resolve to the lowest index.
    pub fn closest_within(&self, query: DVec3, tolerance: f64) -> Option<usize> {
        let reach = DVec3::splat(tolerance);
        let cell_min = CellCoord::from_position(query - reach, self.cell_size);
        let cell_max = CellCoord::from_position(query + reach, self.cell_size);

        let mut best: Option<(f64, usize)> = None;

        for cx in cell_min.x..=cell_max.x {
            for cy in cell_min.y..=cell_max.y {
                for cz in cell_min.z..=cell_max.z {
                    let cell = CellCoord { x: cx, y: cy, z: cz };
                    let Some(candidates) = self.grid.get(&cell) else {
                        continue;
                    };
                    for &idx in candidates {
                        let dist = self.points[idx].distance(query);
                        if dist >= tolerance {
                            continue;
                        }
                        let better = match best {
                            None => true,
                            Some((best_dist, best_idx)) => {
                                dist < best_dist || (dist == best_dist && idx < best_idx)
                            }
                        };
                        if better {
                            best = Some((dist, idx));
                        }
                    }
                }
            }
        }

        best.map(|(_, idx)| idx)
    }
}
