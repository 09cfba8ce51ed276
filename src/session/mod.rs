//! Interaction controller for the seating canvas.
//!
//! [`LayoutSession`] owns the table collection together with the transient
//! state of the planner: the open inline edit, the active drag, and the
//! snap-to-grid toggle. Every mutation goes through here. Operations that
//! name a table which no longer exists are ignored rather than reported.

pub mod focus;
pub mod pointer;

use serde_json::{Value, json};

use crate::config::SessionConfig;
use crate::error::{LayoutError, Result};
use crate::geometry::{CanvasSize, Offset, Point};
use crate::layout::{BulkLayoutRequest, constrain, constrain_detailed, plan_grid, resolve_seats};
use crate::logging::{LogLevel, event_with_fields, json_kv};
use crate::metrics::{MetricSnapshot, SessionMetrics};
use crate::registry::{DirtyTables, LayoutSnapshot, TableRegistry};
use crate::table::{Capacity, Level, Table, TableId, TableShape, TableSpec};
use crate::width::sanitize_label;

pub use focus::{EditField, EditFocus, EditState};
pub use pointer::{CellScale, PointerEvent, PointerOutcome};

/// Interaction state of a single table, derived from the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableInteraction {
    Idle,
    Dragging,
    EditingName,
    EditingLevel,
}

/// An in-flight drag. Nothing is committed until the drag ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    pub table: TableId,
    pub origin: Point,
    pub delta: Offset,
    pub preview: Point,
}

pub struct LayoutSession {
    registry: TableRegistry,
    config: SessionConfig,
    canvas: CanvasSize,
    snap_to_grid: bool,
    edit: EditFocus,
    drag: Option<DragState>,
    last_pointer: Option<Point>,
}

impl Default for LayoutSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl LayoutSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            registry: TableRegistry::new(),
            canvas: config.layout.canvas,
            snap_to_grid: config.layout.snap_to_grid,
            config,
            edit: EditFocus::new(),
            drag: None,
            last_pointer: None,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    /// Record a new viewport size. Existing tables stay where they are until
    /// they are next moved or [`LayoutSession::fit_to_canvas`] is called.
    ///
    /// A viewport with a non-finite or non-positive side is rejected and the
    /// previous canvas is kept. An active drag preview is re-constrained.
    pub fn set_canvas_size(&mut self, canvas: CanvasSize) -> Result<()> {
        if !canvas.is_valid() {
            return Err(LayoutError::InvalidCanvas {
                width: canvas.width,
                height: canvas.height,
            });
        }
        self.canvas = canvas;
        self.refresh_drag_preview();
        Ok(())
    }

    // --- read model -------------------------------------------------------

    pub fn registry(&self) -> &TableRegistry {
        &self.registry
    }

    pub fn tables(&self) -> impl DoubleEndedIterator<Item = &Table> + '_ {
        self.registry.iter()
    }

    pub fn table(&self, id: TableId) -> Option<&Table> {
        self.registry.get(id)
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Tables ordered by level, Diamond first and unlevelled last. Ties keep
    /// paint order.
    pub fn tables_by_level(&self) -> Vec<&Table> {
        let mut tables: Vec<&Table> = self.registry.iter().collect();
        tables.sort_by_key(|table| (table.level().is_none(), table.level()));
        tables
    }

    pub fn snapshot(&self) -> LayoutSnapshot {
        self.registry.snapshot()
    }

    pub fn take_dirty(&mut self) -> DirtyTables {
        self.registry.take_dirty()
    }

    /// Where a table should be drawn: the drag preview while it is being
    /// dragged, its committed position otherwise.
    pub fn displayed_position(&self, id: TableId) -> Option<Point> {
        match self.drag {
            Some(drag) if drag.table == id => Some(drag.preview),
            _ => self.registry.get(id).map(Table::position),
        }
    }

    /// Absolute seat centers for rendering, in seat-index order.
    pub fn seat_positions(&self, id: TableId) -> Option<Vec<Point>> {
        let table = self.registry.get(id)?;
        let center = self.displayed_position(id)?;
        let offsets = resolve_seats(table.shape(), table.capacity().as_usize(), &self.config.layout.seats);
        Some(offsets.into_iter().map(|offset| center.offset_by(offset)).collect())
    }

    /// Topmost table whose footprint covers `point`.
    pub fn table_at(&self, point: Point) -> Option<TableId> {
        self.registry
            .iter()
            .rev()
            .find(|table| {
                let center = self.displayed_position(table.id()).unwrap_or(table.position());
                self.config.layout.footprint(table.shape()).contains(center, point)
            })
            .map(Table::id)
    }

    pub fn interaction(&self, id: TableId) -> Option<TableInteraction> {
        if !self.registry.contains(id) {
            return None;
        }
        if self.drag.is_some_and(|drag| drag.table == id) {
            return Some(TableInteraction::Dragging);
        }
        Some(match self.edit.current() {
            Some(edit) if edit.table == id => match edit.field {
                EditField::Name => TableInteraction::EditingName,
                EditField::Level => TableInteraction::EditingLevel,
            },
            _ => TableInteraction::Idle,
        })
    }

    pub fn editing(&self) -> Option<&EditState> {
        self.edit.current()
    }

    pub fn drag(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    // --- snap -------------------------------------------------------------

    pub fn snap_to_grid(&self) -> bool {
        self.snap_to_grid
    }

    pub fn set_snap_to_grid(&mut self, enabled: bool) {
        self.snap_to_grid = enabled;
        self.refresh_drag_preview();
    }

    /// Flip snap-to-grid, returning the new setting.
    pub fn toggle_snap_to_grid(&mut self) -> bool {
        self.snap_to_grid = !self.snap_to_grid;
        self.refresh_drag_preview();
        self.emit(LogLevel::Debug, "snap.toggled", [json_kv("enabled", self.snap_to_grid)]);
        self.snap_to_grid
    }

    // --- creation and deletion --------------------------------------------

    /// Add one table at the canvas center.
    pub fn add_table(&mut self, spec: TableSpec) -> Result<TableId> {
        let name = match spec.name.as_deref() {
            Some(raw) => sanitize_label(raw).ok_or(LayoutError::EmptyName)?,
            None => self.default_name(),
        };
        let position = self.place(spec.shape, self.canvas.center());
        let id = self.registry.allocate_id();
        let mut table = Table::new(id, name, spec.shape, spec.capacity, position);
        table.set_level(spec.level);
        self.registry.insert(table);

        self.with_metrics(|metrics| metrics.record_added(1));
        self.emit(
            LogLevel::Info,
            "table.added",
            [
                json_kv("table", id.get()),
                json_kv("shape", spec.shape.as_str()),
                json_kv("capacity", spec.capacity.get()),
            ],
        );
        Ok(id)
    }

    /// Add a batch of identical tables on a grid. Positions are not
    /// constrained to the canvas.
    pub fn add_bulk_layout(&mut self, request: BulkLayoutRequest) -> Result<Vec<TableId>> {
        let plan = plan_grid(&request, self.registry.len(), self.config.layout.bulk_origin);
        let mut ids = Vec::with_capacity(plan.len());
        for planned in plan {
            let id = self.registry.allocate_id();
            self.registry.insert(Table::new(
                id,
                planned.name,
                request.shape,
                request.capacity,
                planned.position,
            ));
            ids.push(id);
        }

        self.with_metrics(|metrics| metrics.record_added(ids.len()));
        self.emit(
            LogLevel::Info,
            "layout.bulk_added",
            [
                json_kv("count", ids.len()),
                json_kv("columns", request.columns.get()),
                json_kv("spacing", request.spacing),
            ],
        );
        Ok(ids)
    }

    /// Remove a table and any edit or drag state pointing at it.
    pub fn delete_table(&mut self, id: TableId) -> bool {
        if self.registry.remove(id).is_none() {
            return self.stale(id, "delete");
        }
        self.edit.clear_for(id);
        if self.drag.is_some_and(|drag| drag.table == id) {
            self.drag = None;
            self.last_pointer = None;
        }
        self.with_metrics(SessionMetrics::record_deleted);
        self.emit(LogLevel::Info, "table.deleted", [json_kv("table", id.get())]);
        true
    }

    // --- positioning ------------------------------------------------------

    /// Move a table to `position`, constrained. Returns the committed position.
    pub fn update_position(&mut self, id: TableId, position: Point) -> Option<Point> {
        let Some(shape) = self.registry.get(id).map(Table::shape) else {
            self.stale(id, "update_position");
            return None;
        };
        let committed = self.place(shape, position);
        self.registry.update(id, |table| table.set_position(committed));
        if let Some(drag) = self.drag.as_mut().filter(|drag| drag.table == id) {
            drag.origin = committed;
            drag.delta = Offset::ZERO;
            drag.preview = committed;
        }
        Some(committed)
    }

    /// Pull every table back inside the current canvas.
    pub fn fit_to_canvas(&mut self) -> usize {
        let placements: Vec<(TableId, TableShape, Point)> = self
            .registry
            .iter()
            .map(|table| (table.id(), table.shape(), table.position()))
            .collect();
        let mut moved = 0;
        for (id, shape, position) in placements {
            let committed = self.place(shape, position);
            if committed != position {
                self.registry.update(id, |table| table.set_position(committed));
                moved += 1;
            }
        }
        moved
    }

    pub fn begin_drag(&mut self, id: TableId) -> bool {
        let Some(origin) = self.registry.get(id).map(Table::position) else {
            return self.stale(id, "begin_drag");
        };
        if self.drag.is_some() {
            self.cancel_drag();
        }
        self.drag = Some(DragState {
            table: id,
            origin,
            delta: Offset::ZERO,
            preview: origin,
        });
        true
    }

    /// Accumulate a pointer delta and return the constrained preview.
    pub fn drag_by(&mut self, delta: Offset) -> Option<Point> {
        let drag = self.drag?;
        let Some(shape) = self.registry.get(drag.table).map(Table::shape) else {
            self.drag = None;
            self.last_pointer = None;
            self.stale(drag.table, "drag_by");
            return None;
        };
        if !(delta.dx.is_finite() && delta.dy.is_finite()) {
            return Some(drag.preview);
        }

        let total = drag.delta.plus(delta);
        let preview = constrain(
            drag.origin.offset_by(total),
            self.config.layout.footprint(shape),
            self.canvas,
            self.grid(),
        );
        self.drag = Some(DragState {
            delta: total,
            preview,
            ..drag
        });
        Some(preview)
    }

    /// Commit `origin + delta`, constrained. Returns the committed position.
    pub fn end_drag(&mut self) -> Option<Point> {
        let drag = self.drag.take()?;
        self.last_pointer = None;
        let Some(shape) = self.registry.get(drag.table).map(Table::shape) else {
            self.stale(drag.table, "end_drag");
            return None;
        };
        let committed = self.place(shape, drag.origin.offset_by(drag.delta));
        self.registry.update(drag.table, |table| table.set_position(committed));

        self.with_metrics(SessionMetrics::record_drag_committed);
        self.emit(
            LogLevel::Debug,
            "drag.committed",
            [
                json_kv("table", drag.table.get()),
                json_kv("x", committed.x),
                json_kv("y", committed.y),
            ],
        );
        Some(committed)
    }

    /// Abandon the active drag; the table keeps its last committed position.
    pub fn cancel_drag(&mut self) -> Option<TableId> {
        let drag = self.drag.take()?;
        self.last_pointer = None;
        self.with_metrics(SessionMetrics::record_drag_cancelled);
        self.emit(LogLevel::Debug, "drag.cancelled", [json_kv("table", drag.table.get())]);
        Some(drag.table)
    }

    /// Feed one step of the host's pointer stream.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> PointerOutcome {
        match event {
            PointerEvent::Down { at } => {
                if self.drag.is_some() {
                    self.cancel_drag();
                }
                let Some(id) = self.table_at(at) else {
                    return PointerOutcome::Ignored;
                };
                if self.begin_drag(id) {
                    self.last_pointer = Some(at);
                    PointerOutcome::DragStarted(id)
                } else {
                    PointerOutcome::Ignored
                }
            }
            PointerEvent::Move { at } => {
                let (Some(drag), Some(last)) = (self.drag, self.last_pointer) else {
                    return PointerOutcome::Ignored;
                };
                self.last_pointer = Some(at);
                match self.drag_by(Offset::between(last, at)) {
                    Some(preview) => PointerOutcome::DragMoved {
                        table: drag.table,
                        preview,
                    },
                    None => PointerOutcome::Ignored,
                }
            }
            PointerEvent::Up => {
                let Some(drag) = self.drag else {
                    return PointerOutcome::Ignored;
                };
                match self.end_drag() {
                    Some(position) => PointerOutcome::DragCommitted {
                        table: drag.table,
                        position,
                    },
                    None => PointerOutcome::Ignored,
                }
            }
            PointerEvent::Cancel => match self.cancel_drag() {
                Some(table) => PointerOutcome::DragCancelled(table),
                None => PointerOutcome::Ignored,
            },
        }
    }

    // --- attributes -------------------------------------------------------

    pub fn rename(&mut self, id: TableId, name: &str) -> Result<bool> {
        if !self.registry.contains(id) {
            return Ok(self.stale(id, "rename"));
        }
        let name = sanitize_label(name).ok_or(LayoutError::EmptyName)?;
        self.registry.update(id, |table| table.set_name(name));
        Ok(true)
    }

    pub fn set_level(&mut self, id: TableId, level: Option<Level>) -> bool {
        match self.registry.update(id, |table| table.set_level(level)) {
            Some(()) => true,
            None => self.stale(id, "set_level"),
        }
    }

    /// Change a table's seat count. Shrinking below an occupied seat fails.
    pub fn resize_table(&mut self, id: TableId, capacity: Capacity) -> Result<bool> {
        match self.registry.update(id, |table| table.resize(capacity)) {
            Some(result) => result.map(|()| true),
            None => Ok(self.stale(id, "resize_table")),
        }
    }

    /// Change a table's shape and re-constrain it for the new footprint.
    pub fn reshape_table(&mut self, id: TableId, shape: TableShape) -> bool {
        let Some(position) = self.registry.get(id).map(Table::position) else {
            return self.stale(id, "reshape_table");
        };
        let committed = self.place(shape, position);
        self.registry.update(id, |table| {
            table.set_shape(shape);
            table.set_position(committed);
        });
        self.refresh_drag_preview();
        true
    }

    /// Bind a guest to an empty seat. A guest may hold only one seat.
    pub fn assign_guest(&mut self, id: TableId, seat: usize, guest: &str) -> Result<bool> {
        if !self.registry.contains(id) {
            return Ok(self.stale(id, "assign_guest"));
        }
        let guest = sanitize_label(guest).ok_or(LayoutError::EmptyGuest)?;
        if self.registry.iter().any(|table| table.seat_of(&guest).is_some()) {
            return Err(LayoutError::GuestAlreadySeated(guest));
        }
        match self.registry.update(id, |table| table.assign_guest(seat, guest)) {
            Some(result) => result.map(|()| true),
            None => Ok(false),
        }
    }

    /// Clear a seat, returning the guest who held it.
    pub fn release_seat(&mut self, id: TableId, seat: usize) -> Result<Option<String>> {
        match self.registry.update(id, |table| table.release_seat(seat)) {
            Some(result) => result,
            None => {
                self.stale(id, "release_seat");
                Ok(None)
            }
        }
    }

    // --- inline editing ---------------------------------------------------

    /// Open an inline edit, closing any edit open on another table.
    pub fn begin_edit(&mut self, id: TableId, field: EditField) -> bool {
        let Some(table) = self.registry.get(id) else {
            return self.stale(id, "begin_edit");
        };
        let draft = match field {
            EditField::Name => table.name().to_string(),
            EditField::Level => table.level().map(|level| level.to_string()).unwrap_or_default(),
        };
        self.edit.begin(id, field, draft);
        true
    }

    pub fn update_draft(&mut self, text: impl Into<String>) -> bool {
        self.edit.set_draft(text)
    }

    /// Apply the open edit. An invalid draft keeps the edit open.
    pub fn commit_edit(&mut self) -> Result<bool> {
        let Some(edit) = self.edit.take() else {
            return Ok(false);
        };
        let outcome = match edit.field {
            EditField::Name => self.rename(edit.table, &edit.draft),
            EditField::Level => Level::parse_optional(&edit.draft)
                .map(|level| self.set_level(edit.table, level)),
        };
        if outcome.is_err() {
            self.edit.restore(edit);
        }
        outcome
    }

    pub fn cancel_edit(&mut self) -> Option<EditState> {
        self.edit.take()
    }

    // --- observability ----------------------------------------------------

    pub fn metrics_snapshot(&self) -> Option<MetricSnapshot> {
        let metrics = self.config.metrics.as_ref()?;
        metrics.lock().ok().map(|guard| guard.snapshot())
    }

    /// Log the current metrics snapshot when both logger and metrics are configured.
    pub fn emit_metrics(&self) {
        if let (Some(logger), Some(snapshot)) = (self.config.logger.as_ref(), self.metrics_snapshot()) {
            let target = format!("{}.metrics", self.config.log_target);
            let _ = logger.log_event(snapshot.to_log_event(&target));
        }
    }

    // --- internals --------------------------------------------------------

    /// `Table {n}` for the first `n` past the table count that no table uses.
    fn default_name(&self) -> String {
        let mut number = self.registry.len() + 1;
        loop {
            let name = format!("Table {number}");
            if !self.registry.iter().any(|table| table.name() == name) {
                return name;
            }
            number += 1;
        }
    }

    /// Rebuild the drag preview from `origin + delta` against the current
    /// shape and canvas.
    fn refresh_drag_preview(&mut self) {
        let Some(drag) = self.drag else {
            return;
        };
        let Some(shape) = self.registry.get(drag.table).map(Table::shape) else {
            return;
        };
        let preview = constrain(
            drag.origin.offset_by(drag.delta),
            self.config.layout.footprint(shape),
            self.canvas,
            self.grid(),
        );
        self.drag = Some(DragState { preview, ..drag });
    }

    fn grid(&self) -> Option<f64> {
        self.snap_to_grid.then_some(self.config.layout.grid_size)
    }

    fn place(&self, shape: TableShape, position: Point) -> Point {
        let result = constrain_detailed(
            position,
            self.config.layout.footprint(shape),
            self.canvas,
            self.grid(),
        );
        self.with_metrics(|metrics| metrics.record_constraint(result.clamped, result.snapped));
        result.position
    }

    fn stale(&self, id: TableId, operation: &str) -> bool {
        self.with_metrics(SessionMetrics::record_stale);
        self.emit(
            LogLevel::Debug,
            "stale_reference_ignored",
            [json_kv("table", id.get()), json_kv("operation", json!(operation))],
        );
        false
    }

    fn with_metrics(&self, apply: impl FnOnce(&mut SessionMetrics)) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                apply(&mut guard);
            }
        }
    }

    fn emit(&self, level: LogLevel, message: &str, fields: impl IntoIterator<Item = (String, Value)>) {
        if let Some(logger) = self.config.logger.as_ref() {
            let event = event_with_fields(level, &self.config.log_target, message, fields);
            let _ = logger.log_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{Logger, MemorySink};
    use proptest::prelude::*;

    fn cap(n: i64) -> Capacity {
        Capacity::new(n).unwrap()
    }

    fn round(n: i64) -> TableSpec {
        TableSpec::new(TableShape::Round, cap(n))
    }

    fn session() -> LayoutSession {
        LayoutSession::default()
    }

    fn observed() -> (LayoutSession, MemorySink) {
        let sink = MemorySink::new();
        let mut config = SessionConfig::default().with_logger(Logger::new(sink.clone()));
        config.enable_metrics();
        (LayoutSession::new(config), sink)
    }

    #[test]
    fn added_table_sits_at_canvas_center_with_its_seats() {
        let mut session = session();
        let id = session.add_table(round(8)).unwrap();
        let table = session.table(id).unwrap();
        assert_eq!(table.position(), Point::new(450.0, 425.0));
        assert_eq!(table.name(), "Table 1");
        assert_eq!(table.seats().len(), 8);

        let seats = session.seat_positions(id).unwrap();
        assert_eq!(seats.len(), 8);
        assert!((seats[0].x - 450.0).abs() < 1e-9);
        assert!((seats[0].y - 345.0).abs() < 1e-9);
        assert!((seats[2].x - 530.0).abs() < 1e-9);
    }

    #[test]
    fn add_table_rejects_blank_names() {
        let mut session = session();
        let err = session.add_table(round(4).named("   ")).unwrap_err();
        assert!(matches!(err, LayoutError::EmptyName));
        assert!(session.is_empty());
    }

    #[test]
    fn default_names_skip_numbers_still_in_use() {
        let mut session = session();
        let first = session.add_table(round(4)).unwrap();
        session.add_table(round(4)).unwrap();
        session.delete_table(first);
        let third = session.add_table(round(4)).unwrap();
        assert_eq!(session.table(third).unwrap().name(), "Table 3");
        let names: Vec<_> = session.tables().map(|t| t.name().to_string()).collect();
        assert_eq!(names, vec!["Table 2", "Table 3"]);
    }

    #[test]
    fn invalid_canvas_sizes_are_rejected() {
        let mut session = session();
        for bad in [
            CanvasSize::new(f64::NAN, 850.0),
            CanvasSize::new(900.0, 0.0),
            CanvasSize::new(-10.0, 850.0),
            CanvasSize::new(f64::INFINITY, 850.0),
        ] {
            assert!(matches!(
                session.set_canvas_size(bad),
                Err(LayoutError::InvalidCanvas { .. })
            ));
        }
        assert_eq!(session.canvas(), CanvasSize::new(900.0, 850.0));

        let id = session.add_table(round(8)).unwrap();
        let position = session.table(id).unwrap().position();
        assert!(position.is_finite());
        assert_eq!(position, Point::new(450.0, 425.0));
    }

    #[test]
    fn reshape_mid_drag_refreshes_the_preview() {
        let mut session = session();
        let id = session.add_table(round(8)).unwrap();
        session.begin_drag(id);
        assert_eq!(session.drag_by(Offset::new(-5000.0, 0.0)), Some(Point::new(80.0, 425.0)));

        assert!(session.reshape_table(id, TableShape::Rectangular));
        let shown = session.displayed_position(id).unwrap();
        assert_eq!(shown, Point::new(100.0, 425.0));
        assert_eq!(session.end_drag(), Some(Point::new(100.0, 425.0)));
    }

    #[test]
    fn canvas_shrink_mid_drag_refreshes_the_preview() {
        let mut session = session();
        let id = session.add_table(round(8)).unwrap();
        session.begin_drag(id);
        session.drag_by(Offset::new(300.0, 0.0));
        assert_eq!(session.displayed_position(id), Some(Point::new(750.0, 425.0)));

        session.set_canvas_size(CanvasSize::new(600.0, 850.0)).unwrap();
        assert_eq!(session.displayed_position(id), Some(Point::new(520.0, 425.0)));
        // The committed position is untouched until the drag ends.
        assert_eq!(session.table(id).unwrap().position(), Point::new(450.0, 425.0));
    }

    #[test]
    fn snap_toggle_mid_drag_refreshes_the_preview() {
        let mut session = session();
        let id = session.add_table(round(8)).unwrap();
        session.begin_drag(id);
        session.drag_by(Offset::new(13.0, 7.0));
        assert_eq!(session.displayed_position(id), Some(Point::new(463.0, 432.0)));
        session.toggle_snap_to_grid();
        assert_eq!(session.displayed_position(id), Some(Point::new(460.0, 440.0)));
    }

    #[test]
    fn bulk_layout_follows_grid_formula() {
        let mut session = session();
        let request = BulkLayoutRequest::from_form(10, 8, TableShape::Round, 4, 350.0).unwrap();
        let ids = session.add_bulk_layout(request).unwrap();
        assert_eq!(ids.len(), 10);
        let fifth = session.table(ids[4]).unwrap();
        assert_eq!(fifth.position(), Point::new(150.0, 500.0));
        assert_eq!(fifth.name(), "Table 5");
        // Far columns run past the 900-wide canvas; bulk layouts are not clamped.
        assert_eq!(session.table(ids[3]).unwrap().position().x, 150.0 + 3.0 * 350.0);
        assert!(session.tables().all(|t| t.occupied_count() == 0));
    }

    #[test]
    fn second_batch_continues_numbering() {
        let mut session = session();
        session.add_table(round(6)).unwrap();
        let request = BulkLayoutRequest::from_form(2, 4, TableShape::Square, 3, 300.0).unwrap();
        let ids = session.add_bulk_layout(request).unwrap();
        let first = session.table(ids[0]).unwrap();
        assert_eq!(first.name(), "Table 2");
        assert_eq!(first.position(), Point::new(450.0, 150.0));
    }

    #[test]
    fn drag_commits_constrained_position_on_end() {
        let mut session = session();
        let id = session.add_table(round(8)).unwrap();
        assert!(session.begin_drag(id));
        assert_eq!(session.interaction(id), Some(TableInteraction::Dragging));

        session.drag_by(Offset::new(100.0, 0.0));
        let preview = session.drag_by(Offset::new(1000.0, 50.0)).unwrap();
        assert_eq!(preview, Point::new(820.0, 475.0));
        // Nothing is committed until the drag ends.
        assert_eq!(session.table(id).unwrap().position(), Point::new(450.0, 425.0));
        assert_eq!(session.displayed_position(id), Some(preview));

        assert_eq!(session.end_drag(), Some(Point::new(820.0, 475.0)));
        assert_eq!(session.table(id).unwrap().position(), Point::new(820.0, 475.0));
        assert_eq!(session.interaction(id), Some(TableInteraction::Idle));
    }

    #[test]
    fn cancelled_drag_leaves_last_committed_position() {
        let mut session = session();
        let id = session.add_table(round(8)).unwrap();
        session.begin_drag(id);
        session.drag_by(Offset::new(-200.0, -200.0));
        assert_eq!(session.cancel_drag(), Some(id));
        assert_eq!(session.table(id).unwrap().position(), Point::new(450.0, 425.0));
        assert!(session.drag().is_none());
    }

    #[test]
    fn snapping_applies_on_commit() {
        let mut session = session();
        let id = session.add_table(round(8)).unwrap();
        assert!(session.toggle_snap_to_grid());
        session.begin_drag(id);
        session.drag_by(Offset::new(13.0, 7.0));
        assert_eq!(session.end_drag(), Some(Point::new(460.0, 440.0)));
        assert!(!session.toggle_snap_to_grid());
    }

    #[test]
    fn deleting_mid_drag_makes_the_drag_a_noop() {
        let (mut session, sink) = observed();
        let id = session.add_table(round(8)).unwrap();
        session.begin_drag(id);
        assert!(session.delete_table(id));
        assert!(session.drag().is_none());
        assert_eq!(session.drag_by(Offset::new(10.0, 10.0)), None);
        assert_eq!(session.end_drag(), None);
        assert!(!session.delete_table(id));
        assert!(sink.messages().contains(&"stale_reference_ignored".to_string()));
        assert_eq!(session.metrics_snapshot().unwrap().stale_references, 1);
    }

    #[test]
    fn delete_clears_only_its_own_edit_state() {
        let mut session = session();
        let a = session.add_table(round(4)).unwrap();
        let b = session.add_table(round(4)).unwrap();

        session.begin_edit(a, EditField::Name);
        assert!(session.delete_table(b));
        assert_eq!(session.len(), 1);
        assert_eq!(session.editing().map(|e| e.table), Some(a));

        assert!(session.delete_table(a));
        assert!(session.editing().is_none());
        assert!(session.is_empty());
    }

    #[test]
    fn only_one_table_is_edited_at_a_time() {
        let mut session = session();
        let a = session.add_table(round(4)).unwrap();
        let b = session.add_table(round(4)).unwrap();
        session.begin_edit(a, EditField::Name);
        session.begin_edit(b, EditField::Level);
        assert_eq!(session.interaction(a), Some(TableInteraction::Idle));
        assert_eq!(session.interaction(b), Some(TableInteraction::EditingLevel));
    }

    #[test]
    fn name_edit_commits_through_rename() {
        let mut session = session();
        let a = session.add_table(round(4)).unwrap();
        let b = session.add_table(round(4)).unwrap();
        session.begin_edit(a, EditField::Name);
        assert_eq!(session.editing().unwrap().draft, "Table 1");
        session.update_draft("  Board Members ");
        assert!(session.commit_edit().unwrap());
        assert_eq!(session.table(a).unwrap().name(), "Board Members");
        assert_eq!(session.table(b).unwrap().name(), "Table 2");
        assert!(session.editing().is_none());
    }

    #[test]
    fn invalid_drafts_keep_the_edit_open() {
        let mut session = session();
        let a = session.add_table(round(4)).unwrap();
        session.begin_edit(a, EditField::Level);
        session.update_draft("Copper");
        assert!(matches!(session.commit_edit(), Err(LayoutError::UnknownLevel(_))));
        assert_eq!(session.interaction(a), Some(TableInteraction::EditingLevel));

        session.update_draft("platinum");
        assert!(session.commit_edit().unwrap());
        assert_eq!(session.table(a).unwrap().level(), Some(Level::Platinum));

        session.begin_edit(a, EditField::Name);
        session.update_draft("");
        assert!(matches!(session.commit_edit(), Err(LayoutError::EmptyName)));
        assert!(session.cancel_edit().is_some());
        assert_eq!(session.table(a).unwrap().name(), "Table 1");
    }

    #[test]
    fn edit_of_deleted_table_commits_nothing() {
        let mut session = session();
        let a = session.add_table(round(4)).unwrap();
        session.begin_edit(a, EditField::Name);
        session.delete_table(a);
        assert!(!session.update_draft("ghost"));
        assert!(!session.commit_edit().unwrap());
        assert!(!session.begin_edit(a, EditField::Name));
        assert!(!session.rename(a, "ghost").unwrap());
        assert!(!session.set_level(a, Some(Level::Gold)));
    }

    #[test]
    fn tables_sort_by_level_with_unlevelled_last() {
        let mut session = session();
        let plain = session.add_table(round(4)).unwrap();
        let gold = session.add_table(round(4).with_level(Level::Gold)).unwrap();
        let diamond = session.add_table(round(4).with_level(Level::Diamond)).unwrap();
        let order: Vec<_> = session.tables_by_level().iter().map(|t| t.id()).collect();
        assert_eq!(order, vec![diamond, gold, plain]);
    }

    #[test]
    fn resize_keeps_seats_in_step_with_capacity() {
        let mut session = session();
        let id = session.add_table(round(8)).unwrap();
        session.assign_guest(id, 1, "Ada Lovelace").unwrap();
        session.assign_guest(id, 7, "Grace Hopper").unwrap();

        let err = session.resize_table(id, cap(6)).unwrap_err();
        assert!(matches!(err, LayoutError::CapacityBelowOccupancy { occupied_index: 7, .. }));
        assert_eq!(session.table(id).unwrap().seats().len(), 8);

        assert_eq!(session.release_seat(id, 7).unwrap().as_deref(), Some("Grace Hopper"));
        assert!(session.resize_table(id, cap(6)).unwrap());
        let table = session.table(id).unwrap();
        assert_eq!(table.seats().len(), 6);
        assert_eq!(table.seats()[1].guest(), Some("Ada Lovelace"));
        assert_eq!(session.seat_positions(id).unwrap().len(), 6);
    }

    #[test]
    fn guests_hold_a_single_seat() {
        let mut session = session();
        let a = session.add_table(round(4)).unwrap();
        let b = session.add_table(round(4)).unwrap();
        session.assign_guest(a, 0, "Ada").unwrap();
        assert!(matches!(
            session.assign_guest(b, 0, " Ada "),
            Err(LayoutError::GuestAlreadySeated(_))
        ));
        assert!(matches!(session.assign_guest(b, 0, "  "), Err(LayoutError::EmptyGuest)));
        assert!(matches!(
            session.assign_guest(b, 9, "Bob"),
            Err(LayoutError::SeatOutOfRange { .. })
        ));
    }

    #[test]
    fn reshape_reconstrains_for_larger_footprint() {
        let mut session = session();
        let id = session.add_table(round(8)).unwrap();
        session.update_position(id, Point::new(0.0, 0.0));
        assert_eq!(session.table(id).unwrap().position(), Point::new(80.0, 80.0));
        assert!(session.reshape_table(id, TableShape::Rectangular));
        let table = session.table(id).unwrap();
        assert_eq!(table.shape(), TableShape::Rectangular);
        assert_eq!(table.position(), Point::new(100.0, 80.0));
    }

    #[test]
    fn pointer_stream_drives_a_drag() {
        let mut session = session();
        let id = session.add_table(round(8)).unwrap();

        assert_eq!(
            session.handle_pointer(PointerEvent::Down { at: Point::new(460.0, 430.0) }),
            PointerOutcome::DragStarted(id)
        );
        assert_eq!(
            session.handle_pointer(PointerEvent::Move { at: Point::new(480.0, 430.0) }),
            PointerOutcome::DragMoved {
                table: id,
                preview: Point::new(470.0, 425.0)
            }
        );
        session.handle_pointer(PointerEvent::Move { at: Point::new(500.0, 450.0) });
        assert_eq!(
            session.handle_pointer(PointerEvent::Up),
            PointerOutcome::DragCommitted {
                table: id,
                position: Point::new(490.0, 445.0)
            }
        );
        assert_eq!(session.handle_pointer(PointerEvent::Up), PointerOutcome::Ignored);
    }

    #[test]
    fn pointer_down_on_empty_canvas_is_ignored() {
        let mut session = session();
        session.add_table(round(8)).unwrap();
        assert_eq!(
            session.handle_pointer(PointerEvent::Down { at: Point::new(5.0, 5.0) }),
            PointerOutcome::Ignored
        );
        assert_eq!(
            session.handle_pointer(PointerEvent::Move { at: Point::new(50.0, 5.0) }),
            PointerOutcome::Ignored
        );
    }

    #[test]
    fn pointer_cancel_abandons_the_gesture() {
        let mut session = session();
        let id = session.add_table(round(8)).unwrap();
        session.handle_pointer(PointerEvent::Down { at: Point::new(450.0, 425.0) });
        session.handle_pointer(PointerEvent::Move { at: Point::new(600.0, 425.0) });
        assert_eq!(session.handle_pointer(PointerEvent::Cancel), PointerOutcome::DragCancelled(id));
        assert_eq!(session.table(id).unwrap().position(), Point::new(450.0, 425.0));
    }

    #[test]
    fn topmost_table_wins_hit_test() {
        let mut session = session();
        let _below = session.add_table(round(8)).unwrap();
        let above = session.add_table(round(8)).unwrap();
        assert_eq!(session.table_at(Point::new(450.0, 425.0)), Some(above));
    }

    #[test]
    fn fit_to_canvas_pulls_bulk_tables_back() {
        let mut session = session();
        let request = BulkLayoutRequest::from_form(4, 8, TableShape::Round, 4, 350.0).unwrap();
        let ids = session.add_bulk_layout(request).unwrap();
        assert_eq!(session.fit_to_canvas(), 2);
        assert_eq!(session.table(ids[3]).unwrap().position(), Point::new(820.0, 150.0));
    }

    #[test]
    fn dirty_tracking_reports_changed_tables() {
        let mut session = session();
        let a = session.add_table(round(4)).unwrap();
        let b = session.add_table(round(4)).unwrap();
        assert_eq!(session.take_dirty().changed, vec![a, b]);

        session.rename(b, "Sponsors").unwrap();
        session.set_level(a, None);
        let dirty = session.take_dirty();
        assert_eq!(dirty.changed, vec![b]);

        session.delete_table(a);
        assert_eq!(session.take_dirty().removed, vec![a]);
    }

    #[test]
    fn lifecycle_is_logged_and_counted() {
        let (mut session, sink) = observed();
        let id = session.add_table(round(8)).unwrap();
        session.begin_drag(id);
        session.drag_by(Offset::new(5000.0, 0.0));
        session.end_drag();
        session.emit_metrics();

        let messages = sink.messages();
        assert!(messages.contains(&"table.added".to_string()));
        assert!(messages.contains(&"drag.committed".to_string()));
        assert_eq!(messages.last().map(String::as_str), Some("session_metrics"));

        let snapshot = session.metrics_snapshot().unwrap();
        assert_eq!(snapshot.tables_added, 1);
        assert_eq!(snapshot.drags_committed, 1);
        assert_eq!(snapshot.positions_clamped, 1);
    }

    fn any_shape() -> impl Strategy<Value = TableShape> {
        (0usize..4).prop_map(|i| TableShape::ALL[i])
    }

    proptest! {
        #[test]
        fn drags_never_leave_the_canvas(
            shape in any_shape(),
            snap in any::<bool>(),
            deltas in prop::collection::vec((-3000.0f64..3000.0, -3000.0f64..3000.0), 1..12),
        ) {
            let mut session = LayoutSession::default();
            session.set_snap_to_grid(snap);
            let id = session.add_table(TableSpec::new(shape, Capacity::new(6).unwrap())).unwrap();
            let footprint = session.config().layout.footprint(shape);
            let canvas = session.canvas();

            session.begin_drag(id);
            for (dx, dy) in deltas {
                session.drag_by(Offset::new(dx, dy));
            }
            let p = session.end_drag().unwrap();
            prop_assert!(p.x - footprint.half_width() >= 0.0);
            prop_assert!(p.x + footprint.half_width() <= canvas.width);
            prop_assert!(p.y - footprint.half_height() >= 0.0);
            prop_assert!(p.y + footprint.half_height() <= canvas.height);
        }

        #[test]
        fn capacity_changes_keep_seat_count(start in 1i64..=50, next in 1i64..=50) {
            let mut session = LayoutSession::default();
            let id = session.add_table(TableSpec::new(TableShape::Square, Capacity::new(start).unwrap())).unwrap();
            session.resize_table(id, Capacity::new(next).unwrap()).unwrap();
            let table = session.table(id).unwrap();
            prop_assert_eq!(table.seats().len(), table.capacity().as_usize());
            prop_assert_eq!(table.seats().len(), next as usize);
        }
    }
}
