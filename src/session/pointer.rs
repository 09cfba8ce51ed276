//! Host-agnostic pointer stream for drag interactions.
//!
//! Terminal hosts feed crossterm mouse events through
//! [`PointerEvent::from_mouse`]; graphical hosts build the events directly in
//! canvas units.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::geometry::Point;
use crate::table::TableId;

/// Canvas units covered by one terminal cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellScale {
    pub x: f64,
    pub y: f64,
}

impl Default for CellScale {
    fn default() -> Self {
        Self { x: 10.0, y: 20.0 }
    }
}

impl CellScale {
    pub fn to_canvas(&self, column: u16, row: u16) -> Point {
        Point::new(f64::from(column) * self.x, f64::from(row) * self.y)
    }
}

/// One step of a drag gesture, in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { at: Point },
    Move { at: Point },
    Up,
    /// Pointer capture was lost; abandon the gesture.
    Cancel,
}

impl PointerEvent {
    /// Translate a primary-button crossterm mouse event. Other buttons,
    /// scrolling, and hover moves yield `None`.
    pub fn from_mouse(event: &MouseEvent, scale: CellScale) -> Option<Self> {
        let at = scale.to_canvas(event.column, event.row);
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => Some(PointerEvent::Down { at }),
            MouseEventKind::Drag(MouseButton::Left) => Some(PointerEvent::Move { at }),
            MouseEventKind::Up(MouseButton::Left) => Some(PointerEvent::Up),
            _ => None,
        }
    }
}

/// What the session did with a pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerOutcome {
    Ignored,
    DragStarted(TableId),
    DragMoved { table: TableId, preview: Point },
    DragCommitted { table: TableId, position: Point },
    DragCancelled(TableId),
}
