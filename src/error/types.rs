use thiserror::Error;

use crate::table::TableId;

/// Unified result type for the seating layout crate.
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Errors surfaced at the edges of the seating layout engine.
///
/// Stale table references and out-of-bounds drag targets are not errors;
/// the session resolves those silently.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("capacity must be a positive integer, got `{0}`")]
    InvalidCapacity(String),
    #[error("capacity {requested} exceeds the maximum of {max}")]
    CapacityTooLarge { requested: i64, max: u16 },
    #[error("invalid bulk layout request: {0}")]
    InvalidBulkRequest(String),
    #[error("table name is empty")]
    EmptyName,
    #[error("guest name is empty")]
    EmptyGuest,
    #[error("seat {index} is out of range for table {table} with {capacity} seats")]
    SeatOutOfRange {
        table: TableId,
        index: usize,
        capacity: usize,
    },
    #[error("seat {index} of table {table} is already occupied")]
    SeatOccupied { table: TableId, index: usize },
    #[error("guest `{0}` is already seated")]
    GuestAlreadySeated(String),
    #[error("cannot shrink table {table} to {requested} seats: seat {occupied_index} is occupied")]
    CapacityBelowOccupancy {
        table: TableId,
        requested: u16,
        occupied_index: usize,
    },
    #[error("unknown level `{0}`")]
    UnknownLevel(String),
    #[error("canvas must have finite, positive dimensions, got {width}x{height}")]
    InvalidCanvas { width: f64, height: f64 },
    #[error("malformed table record: {0}")]
    InvalidTable(String),
    #[error("invalid layout configuration: {0}")]
    InvalidConfig(String),
    #[error("configuration parse error: {0}")]
    Config(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
