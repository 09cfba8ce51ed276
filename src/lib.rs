//! Venue seating layout engine for the Sapling planner.
//!
//! Tables are arranged on a 2-D canvas: the [`layout`] module holds the pure
//! geometry (seat offsets, footprint constraints, bulk grids) and
//! [`session::LayoutSession`] owns the table collection and turns edits and
//! pointer drags into committed, constrained updates.

pub mod config;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod registry;
pub mod session;
pub mod table;
pub mod width;

pub use config::{LayoutConfig, SessionConfig};
pub use error::{LayoutError, Result};
pub use geometry::{CanvasSize, Footprint, Offset, Point};
pub use layout::{
    BulkLayoutRequest, Constrained, Footprints, PlannedTable, SeatGeometry, SideAllocation,
    constrain, constrain_detailed, plan_grid, resolve_seats, side_allocation,
};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink,
};
pub use metrics::{MetricSnapshot, SessionMetrics};
pub use registry::{DirtyTables, LayoutSnapshot, TableRegistry};
pub use session::{
    CellScale, DragState, EditField, EditState, LayoutSession, PointerEvent, PointerOutcome,
    TableInteraction,
};
pub use table::{Capacity, Level, Seat, SeatId, Table, TableId, TableShape, TableSpec};
pub use width::display_width;
