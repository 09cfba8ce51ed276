//! Layout module orchestrator.
//!
//! Seat geometry, canvas constraints, and bulk grid planning are pure
//! functions; the session module is the only caller that commits their
//! results to tables.

pub mod constraint;
pub mod grid;
pub mod seats;

pub use constraint::{Constrained, Footprints, constrain, constrain_detailed};
pub use grid::{BulkLayoutRequest, MAX_BULK_TABLES, PlannedTable, plan_grid};
pub use seats::{SeatGeometry, SideAllocation, resolve_seats, side_allocation};
