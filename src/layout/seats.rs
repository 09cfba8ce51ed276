//! Seat geometry resolver.
//!
//! Maps a table shape and seat count to seat offsets relative to the table
//! center. Offsets are in canvas units with `y` growing downwards, so seat 0
//! of an elliptical table sits at the top and indices advance clockwise.

use std::f64::consts::{FRAC_PI_2, TAU};

use serde::{Deserialize, Serialize};

use crate::geometry::{Footprint, Offset};
use crate::table::TableShape;

/// Visual table bodies plus the gap between a body edge and its seat centers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeatGeometry {
    pub round_body: Footprint,
    pub oval_body: Footprint,
    pub square_body: Footprint,
    pub rectangular_body: Footprint,
    pub seat_offset: f64,
}

impl Default for SeatGeometry {
    fn default() -> Self {
        Self {
            round_body: Footprint::new(110.0, 110.0),
            oval_body: Footprint::new(130.0, 90.0),
            square_body: Footprint::new(110.0, 110.0),
            rectangular_body: Footprint::new(150.0, 110.0),
            seat_offset: 25.0,
        }
    }
}

impl SeatGeometry {
    pub fn body(&self, shape: TableShape) -> Footprint {
        match shape {
            TableShape::Round => self.round_body,
            TableShape::Oval => self.oval_body,
            TableShape::Square => self.square_body,
            TableShape::Rectangular => self.rectangular_body,
        }
    }
}

/// Seats per side for the straight-edged shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SideAllocation {
    pub top: usize,
    pub right: usize,
    pub bottom: usize,
    pub left: usize,
}

impl SideAllocation {
    pub fn total(&self) -> usize {
        self.top + self.right + self.bottom + self.left
    }
}

/// Per-side seat counts, or `None` for shapes that seat around an ellipse.
///
/// Sides are filled in order and each is clamped to the seats still
/// unassigned, so counts always sum to `capacity` and never go negative.
pub fn side_allocation(shape: TableShape, capacity: usize) -> Option<SideAllocation> {
    match shape {
        TableShape::Round | TableShape::Oval => None,
        TableShape::Square => {
            let per_side = capacity.div_ceil(4);
            let top = per_side.min(capacity);
            let right = per_side.min(capacity - top);
            let bottom = per_side.min(capacity - top - right);
            let left = capacity - top - right - bottom;
            Some(SideAllocation {
                top,
                right,
                bottom,
                left,
            })
        }
        TableShape::Rectangular => {
            let per_long_side = capacity.div_ceil(3);
            let top = per_long_side.min(capacity);
            let bottom = per_long_side.min(capacity - top);
            let remaining = capacity - top - bottom;
            let left = remaining / 2;
            Some(SideAllocation {
                top,
                right: remaining - left,
                bottom,
                left,
            })
        }
    }
}

/// Resolve seat offsets for `capacity` seats at a table of `shape`.
///
/// Pure; a zero capacity yields no seats.
pub fn resolve_seats(shape: TableShape, capacity: usize, geometry: &SeatGeometry) -> Vec<Offset> {
    if capacity == 0 {
        return Vec::new();
    }

    let body = geometry.body(shape);
    match side_allocation(shape, capacity) {
        None => {
            let radius_x = body.half_width() + geometry.seat_offset;
            let radius_y = match shape {
                TableShape::Round => radius_x,
                _ => body.half_height() + geometry.seat_offset,
            };
            ring(capacity, radius_x, radius_y)
        }
        Some(sides) => perimeter(sides, body, geometry.seat_offset),
    }
}

fn ring(capacity: usize, radius_x: f64, radius_y: f64) -> Vec<Offset> {
    (0..capacity)
        .map(|i| {
            let angle = (i as f64 / capacity as f64) * TAU - FRAC_PI_2;
            Offset::new(angle.cos() * radius_x, angle.sin() * radius_y)
        })
        .collect()
}

fn perimeter(sides: SideAllocation, body: Footprint, seat_offset: f64) -> Vec<Offset> {
    let half_w = body.half_width();
    let half_h = body.half_height();
    let reach_x = half_w + seat_offset;
    let reach_y = half_h + seat_offset;
    let mut seats = Vec::with_capacity(sides.total());

    // Clockwise: top left-to-right, right top-to-bottom, bottom right-to-left,
    // left bottom-to-top.
    seats.extend((0..sides.top).map(|k| Offset::new(along(k, sides.top, body.width), -reach_y)));
    seats.extend(
        (0..sides.right).map(|k| Offset::new(reach_x, along(k, sides.right, body.height))),
    );
    seats.extend(
        (0..sides.bottom).map(|k| Offset::new(-along(k, sides.bottom, body.width), reach_y)),
    );
    seats.extend(
        (0..sides.left).map(|k| Offset::new(-reach_x, -along(k, sides.left, body.height))),
    );
    seats
}

/// Position of seat `k` of `n` spread evenly along a side of `length`,
/// measured from the side's midpoint.
fn along(k: usize, n: usize, length: f64) -> f64 {
    (k + 1) as f64 / (n + 1) as f64 * length - length / 2.0
}
