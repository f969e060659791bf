//! Snap resolution and segment math for plan geometry.
//!
//! All distance and snapping math happens on the horizontal plane (x/z);
//! the y axis is vertical elevation and is forced to floor level for
//! plan-bound placements.
//!
//! ## Snap Resolution
//!
//! ```text
//!   raw pointer ──► endpoint within 0.5? ──► yes ──► that endpoint, exactly
//!                        │ no                        (first match wins,
//!                        ▼                            canonical order)
//!                   grid snap to 0.5 steps
//! ```
//!
//! The endpoint pass walks candidates in canonical collection order and
//! returns the first hit rather than the globally nearest one. Callers that
//! depend on ordering must supply candidates in that order.

use serde::{Deserialize, Serialize};

/// Radius around a wall endpoint that captures a dragged point, in plan units.
pub const ENDPOINT_SNAP_RADIUS: f32 = 0.5;

/// Grid cell size for fallback snapping, in plan units.
pub const GRID_STEP: f32 = 0.5;

/// A point in plan space.
///
/// `x` and `z` span the horizontal plan; `y` is vertical elevation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal X component.
    pub x: f32,
    /// Vertical elevation.
    pub y: f32,
    /// Horizontal Z component.
    pub z: f32,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Origin point.
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Euclidean distance to another point on the horizontal plane,
    /// ignoring elevation.
    #[must_use]
    pub fn horizontal_distance(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        (dx * dx + dz * dz).sqrt()
    }

    /// Translate on the horizontal plane, preserving elevation.
    #[must_use]
    pub fn translated(&self, dx: f32, dz: f32) -> Self {
        Self::new(self.x + dx, self.y, self.z + dz)
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::zero()
    }
}

/// Round a point to the nearest grid intersection on the horizontal plane.
///
/// Elevation is forced to floor level.
#[must_use]
pub fn snap_to_grid(point: Point) -> Point {
    Point::new(
        (point.x / GRID_STEP).round() * GRID_STEP,
        0.0,
        (point.z / GRID_STEP).round() * GRID_STEP,
    )
}

/// Resolve a raw pointer position against snap targets.
///
/// With snapping disabled the point passes through with elevation forced to
/// floor level. With snapping enabled, the first endpoint within
/// [`ENDPOINT_SNAP_RADIUS`] (horizontal Euclidean) is returned exactly;
/// otherwise the point falls back to [`snap_to_grid`].
///
/// `endpoints` must yield candidates in canonical collection order, with the
/// dragged element's own endpoints already excluded.
#[must_use]
pub fn resolve_point<I>(candidate: Point, endpoints: I, snap_enabled: bool) -> Point
where
    I: IntoIterator<Item = Point>,
{
    if !snap_enabled {
        return Point::new(candidate.x, 0.0, candidate.z);
    }

    for endpoint in endpoints {
        if candidate.horizontal_distance(&endpoint) <= ENDPOINT_SNAP_RADIUS {
            return endpoint;
        }
    }

    snap_to_grid(candidate)
}

/// Project a cursor position onto a wall segment and return the offset from
/// the segment start, clamped to `[0, length]`.
///
/// Projection happens on the horizontal plane. A zero-length segment yields
/// offset 0 rather than NaN.
#[must_use]
pub fn project_offset(start: Point, end: Point, cursor: Point) -> f32 {
    let dx = end.x - start.x;
    let dz = end.z - start.z;
    let len_sq = dx * dx + dz * dz;

    if len_sq == 0.0 {
        return 0.0;
    }

    let t = ((cursor.x - start.x) * dx + (cursor.z - start.z) * dz) / len_sq;
    let t = t.clamp(0.0, 1.0);
    t * len_sq.sqrt()
}

/// Heading from a center point toward a cursor on the horizontal plane,
/// in radians.
#[must_use]
pub fn heading(center: Point, cursor: Point) -> f32 {
    let dx = cursor.x - center.x;
    let dz = cursor.z - center.z;
    dx.atan2(dz)
}

/// Advance a rotation to the next quarter-turn multiple, wrapped to
/// `[0, 2*PI)`.
#[must_use]
pub fn quarter_turn(rotation: f32) -> f32 {
    let step = std::f32::consts::FRAC_PI_2;
    // Tolerance keeps repeated turns from sticking on rounded multiples.
    let next = (rotation / step + 1e-3).floor() + 1.0;
    (next * step).rem_euclid(std::f32::consts::TAU)
}
