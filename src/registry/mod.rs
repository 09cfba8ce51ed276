//! Table collection owned by the canvas.
//!
//! Each entry carries a blake3 fingerprint of its serialized form so
//! renderers can repaint only the tables whose visible state changed.

mod core;

pub use core::{DirtyTables, LayoutSnapshot, TableRegistry};
