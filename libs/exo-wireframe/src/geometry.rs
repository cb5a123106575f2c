//! # Geometry Primitives
//!
//! Input line segments and oriented planes used to place rings.

use glam::{DMat4, DVec3};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// A straight wireframe line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: DVec3,
    pub end: DVec3,
}

impl Segment {
    pub fn new(start: DVec3, end: DVec3) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Unit direction from start to end (zero for a point).
    #[inline]
    pub fn tangent(&self) -> DVec3 {
        (self.end - self.start).normalize_or_zero()
    }

    /// Point at parameter `t` (0 = start, 1 = end).
    #[inline]
    pub fn point_at(&self, t: f64) -> DVec3 {
        self.start.lerp(self.end, t)
    }

    #[inline]
    pub fn midpoint(&self) -> DVec3 {
        self.point_at(0.5)
    }
}

/// An origin with a right-handed orthonormal frame.
///
/// Ring angles are measured from `x_axis` towards `y_axis`, counter-clockwise
/// when looking down `normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub origin: DVec3,
    pub x_axis: DVec3,
    pub y_axis: DVec3,
    pub normal: DVec3,
}

impl Plane {
    /// Builds a plane around a unit normal with an arbitrary but stable x axis.
    pub fn from_normal(origin: DVec3, normal: DVec3) -> Self {
        let x_axis = normal.any_orthonormal_vector();
        Self::from_axes(origin, x_axis, normal.cross(x_axis))
    }

    /// Builds a plane from two orthonormal in-plane axes.
    pub fn from_axes(origin: DVec3, x_axis: DVec3, y_axis: DVec3) -> Self {
        Self {
            origin,
            x_axis,
            y_axis,
            normal: x_axis.cross(y_axis),
        }
    }

    /// Point at in-plane coordinates (u, v).
    #[inline]
    pub fn point_at(&self, u: f64, v: f64) -> DVec3 {
        self.origin + self.x_axis * u + self.y_axis * v
    }

    /// Same frame moved by `offset`.
    pub fn translated(&self, offset: DVec3) -> Self {
        Self {
            origin: self.origin + offset,
            ..*self
        }
    }

    /// Same frame moved `distance` along its normal.
    pub fn offset(&self, distance: f64) -> Self {
        self.translated(self.normal * distance)
    }

    /// Frame rotated counter-clockwise by `angle` about the normal.
    pub fn rotated(&self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            x_axis: self.x_axis * cos + self.y_axis * sin,
            y_axis: self.y_axis * cos - self.x_axis * sin,
            ..*self
        }
    }

    /// Frame facing the other way, keeping the x axis: (x, -y, -n).
    ///
    /// A ring on the mirrored frame has the same vertex set as one on `self`.
    pub fn mirrored(&self) -> Self {
        Self::from_axes(self.origin, self.x_axis, -self.y_axis)
    }

    /// `sides` points on a circle of `radius` at angles `TAU * k / sides`.
    pub fn ring(&self, sides: u32, radius: f64) -> Vec<DVec3> {
        (0..sides)
            .map(|k| {
                let (sin, cos) = (TAU * k as f64 / sides as f64).sin_cos();
                self.point_at(radius * cos, radius * sin)
            })
            .collect()
    }

    /// Local-to-world transform: x, y, normal become X, Y, Z.
    pub fn to_matrix(&self) -> DMat4 {
        DMat4::from_cols(
            self.x_axis.extend(0.0),
            self.y_axis.extend(0.0),
            self.normal.extend(0.0),
            self.origin.extend(1.0),
        )
    }
}
