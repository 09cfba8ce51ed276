//! Layout constraint engine.
//!
//! Keeps a table's whole footprint on the canvas and optionally quantises its
//! center to a grid. Snapping happens before clamping; when snapping is on the
//! clamp range is narrowed to the grid multiples that still fit, so a snapped
//! result is both on-grid and in bounds.

use serde::{Deserialize, Serialize};

use crate::geometry::{CanvasSize, Footprint, Point};
use crate::table::TableShape;

/// Bounding boxes used for constraint math, one per shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Footprints {
    pub round: Footprint,
    pub rectangular: Footprint,
    pub oval: Footprint,
    pub square: Footprint,
}

impl Default for Footprints {
    fn default() -> Self {
        Self {
            round: Footprint::new(160.0, 160.0),
            rectangular: Footprint::new(200.0, 160.0),
            oval: Footprint::new(180.0, 140.0),
            square: Footprint::new(160.0, 160.0),
        }
    }
}

impl Footprints {
    pub fn for_shape(&self, shape: TableShape) -> Footprint {
        match shape {
            TableShape::Round => self.round,
            TableShape::Rectangular => self.rectangular,
            TableShape::Oval => self.oval,
            TableShape::Square => self.square,
        }
    }
}

/// Result of a constraint pass, with flags for what was adjusted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constrained {
    pub position: Point,
    pub snapped: bool,
    pub clamped: bool,
}

/// Constrain `position` so `footprint` stays inside `canvas`.
///
/// `snap` carries the grid size when snap-to-grid is on. Deterministic and
/// idempotent.
pub fn constrain(position: Point, footprint: Footprint, canvas: CanvasSize, snap: Option<f64>) -> Point {
    constrain_detailed(position, footprint, canvas, snap).position
}

pub fn constrain_detailed(
    position: Point,
    footprint: Footprint,
    canvas: CanvasSize,
    snap: Option<f64>,
) -> Constrained {
    let grid = snap.filter(|g| g.is_finite() && *g > 0.0);
    let x = constrain_axis(position.x, footprint.half_width(), canvas.width, grid);
    let y = constrain_axis(position.y, footprint.half_height(), canvas.height, grid);
    Constrained {
        position: Point::new(x.value, y.value),
        snapped: x.snapped || y.snapped,
        clamped: x.clamped || y.clamped,
    }
}

struct Axis {
    value: f64,
    snapped: bool,
    clamped: bool,
}

fn constrain_axis(raw: f64, half: f64, extent: f64, grid: Option<f64>) -> Axis {
    let center = extent / 2.0;
    let value = if raw.is_finite() { raw } else { center };
    let low = half;
    let high = extent - half;

    // Canvas narrower than the footprint: pin to the middle.
    if !(low <= high) {
        return Axis {
            value: center,
            snapped: false,
            clamped: true,
        };
    }

    if let Some(grid) = grid {
        let snapped = (value / grid).round() * grid;
        let grid_low = (low / grid).ceil() * grid;
        let grid_high = (high / grid).floor() * grid;
        if grid_low <= grid_high {
            let clamped = snapped.clamp(grid_low, grid_high);
            return Axis {
                value: clamped,
                snapped: true,
                clamped: clamped != snapped || !raw.is_finite(),
            };
        }
    }

    let clamped = value.clamp(low, high);
    Axis {
        value: clamped,
        snapped: false,
        clamped: clamped != value || !raw.is_finite(),
    }
}
