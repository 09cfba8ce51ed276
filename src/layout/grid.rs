//! Bulk layout generator - lay out a batch of identical tables on a grid
//!
//! Backs the "Create Table Layout" dialog. A batch continues numbering and
//! grid placement from the tables that already exist, so repeated batches
//! extend the grid instead of stacking on top of it.
//!
//! # Example
//! ```
//! use sapling_seating::geometry::Point;
//! use sapling_seating::layout::grid::{BulkLayoutRequest, plan_grid};
//! use sapling_seating::table::TableShape;
//!
//! let request = BulkLayoutRequest::from_form(10, 8, TableShape::Round, 4, 350.0)?;
//! let plan = plan_grid(&request, 0, Point::new(150.0, 150.0));
//! assert_eq!(plan[4].position, Point::new(150.0, 500.0));
//! # Ok::<(), sapling_seating::LayoutError>(())
//! ```
//!
//! Generated positions are not constrained to the canvas; a large batch may
//! run past the visible area.

use std::num::NonZeroUsize;

use crate::error::{LayoutError, Result};
use crate::geometry::Point;
use crate::table::{Capacity, TableShape};

/// Upper bound on tables created by a single batch.
pub const MAX_BULK_TABLES: usize = 200;

/// Validated input of a bulk layout action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BulkLayoutRequest {
    pub count: NonZeroUsize,
    pub capacity: Capacity,
    pub shape: TableShape,
    pub columns: NonZeroUsize,
    /// Distance between neighbouring grid cells, in canvas units.
    pub spacing: f64,
}

impl BulkLayoutRequest {
    pub fn new(
        count: NonZeroUsize,
        capacity: Capacity,
        shape: TableShape,
        columns: NonZeroUsize,
        spacing: f64,
    ) -> Result<Self> {
        if !spacing.is_finite() || spacing <= 0.0 {
            return Err(LayoutError::InvalidBulkRequest(format!(
                "spacing must be a positive number, got {spacing}"
            )));
        }
        if count.get() > MAX_BULK_TABLES {
            return Err(LayoutError::InvalidBulkRequest(format!(
                "at most {MAX_BULK_TABLES} tables per batch, got {count}"
            )));
        }
        Ok(Self {
            count,
            capacity,
            shape,
            columns,
            spacing,
        })
    }

    /// Validate raw dialog values.
    pub fn from_form(count: i64, capacity: i64, shape: TableShape, columns: i64, spacing: f64) -> Result<Self> {
        let count = positive(count, "table count")?;
        let columns = positive(columns, "grid columns")?;
        Self::new(count, Capacity::new(capacity)?, shape, columns, spacing)
    }
}

fn positive(raw: i64, what: &str) -> Result<NonZeroUsize> {
    usize::try_from(raw)
        .ok()
        .and_then(NonZeroUsize::new)
        .ok_or_else(|| LayoutError::InvalidBulkRequest(format!("{what} must be at least 1, got {raw}")))
}

/// One table of a planned batch.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedTable {
    /// Grid index, counted across existing tables and this batch.
    pub index: usize,
    pub row: usize,
    pub col: usize,
    pub name: String,
    pub position: Point,
}

/// Plan positions and default names for a batch.
///
/// `existing` is the number of tables already on the canvas; the batch
/// starts at that grid index.
pub fn plan_grid(request: &BulkLayoutRequest, existing: usize, base: Point) -> Vec<PlannedTable> {
    let columns = request.columns.get();
    (0..request.count.get())
        .map(|offset| {
            let index = existing + offset;
            let col = index % columns;
            let row = index / columns;
            PlannedTable {
                index,
                row,
                col,
                name: format!("Table {}", index + 1),
                position: Point::new(
                    base.x + col as f64 * request.spacing,
                    base.y + row as f64 * request.spacing,
                ),
            }
        })
        .collect()
}
