//! Layout and session configuration.

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};
use crate::geometry::{CanvasSize, Footprint, Point};
use crate::layout::{Footprints, SeatGeometry};
use crate::logging::Logger;
use crate::metrics::SessionMetrics;
use crate::table::TableShape;

/// Geometry constants and defaults for a venue canvas.
///
/// Every field has a default, so a JSON override only needs the keys it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub canvas: CanvasSize,
    pub grid_size: f64,
    pub snap_to_grid: bool,
    pub footprints: Footprints,
    pub seats: SeatGeometry,
    /// Center of the first cell used by bulk layouts.
    pub bulk_origin: Point,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasSize::new(900.0, 850.0),
            grid_size: 20.0,
            snap_to_grid: false,
            footprints: Footprints::default(),
            seats: SeatGeometry::default(),
            bulk_origin: Point::new(150.0, 150.0),
        }
    }
}

impl LayoutConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: LayoutConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if !positive(self.grid_size) {
            return Err(LayoutError::InvalidConfig(format!(
                "grid_size must be positive, got {}",
                self.grid_size
            )));
        }
        if !self.canvas.is_valid() {
            return Err(LayoutError::InvalidConfig(
                "canvas dimensions must be positive".to_string(),
            ));
        }
        if !self.seats.seat_offset.is_finite() || self.seats.seat_offset < 0.0 {
            return Err(LayoutError::InvalidConfig(
                "seat_offset must be a non-negative number".to_string(),
            ));
        }
        for shape in TableShape::ALL {
            check_footprint("footprint", shape, self.footprints.for_shape(shape))?;
            check_footprint("table body", shape, self.seats.body(shape))?;
        }
        Ok(())
    }

    pub fn footprint(&self, shape: TableShape) -> Footprint {
        self.footprints.for_shape(shape)
    }
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn check_footprint(what: &str, shape: TableShape, footprint: Footprint) -> Result<()> {
    if positive(footprint.width) && positive(footprint.height) {
        Ok(())
    } else {
        Err(LayoutError::InvalidConfig(format!(
            "{what} for {} tables must have positive dimensions",
            shape.as_str()
        )))
    }
}

/// Configuration knobs for a layout session.
#[derive(Clone)]
pub struct SessionConfig {
    pub layout: LayoutConfig,
    /// Optional structured logger used by the session.
    pub logger: Option<Logger>,
    /// Metrics accumulator shared with the host.
    pub metrics: Option<Arc<Mutex<SessionMetrics>>>,
    /// Target field used when emitting log events.
    pub log_target: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl SessionConfig {
    pub fn new(layout: LayoutConfig) -> Self {
        Self {
            layout,
            logger: None,
            metrics: None,
            log_target: "seating::session".to_string(),
        }
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(SessionMetrics::new())));
        }
    }

    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    pub fn metrics_handle(&self) -> Option<Arc<Mutex<SessionMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}
