//! Table and seat data model.
//!
//! Tables own their seats; nothing outside the registry mutates a table, so
//! the mutators here are crate-private and the public surface is read-only.

mod core;

pub use core::{
    Capacity, Level, MAX_CAPACITY, Seat, SeatId, Table, TableId, TableIdAllocator, TableShape,
    TableSpec,
};
