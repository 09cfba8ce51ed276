use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;

/// Counters accumulated by a layout session.
#[derive(Debug, Default, Clone)]
pub struct SessionMetrics {
    tables_added: u64,
    tables_deleted: u64,
    drags_committed: u64,
    drags_cancelled: u64,
    positions_clamped: u64,
    positions_snapped: u64,
    stale_references: u64,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_added(&mut self, count: usize) {
        self.tables_added = self.tables_added.saturating_add(count as u64);
    }

    pub fn record_deleted(&mut self) {
        self.tables_deleted = self.tables_deleted.saturating_add(1);
    }

    pub fn record_drag_committed(&mut self) {
        self.drags_committed = self.drags_committed.saturating_add(1);
    }

    pub fn record_drag_cancelled(&mut self) {
        self.drags_cancelled = self.drags_cancelled.saturating_add(1);
    }

    pub fn record_constraint(&mut self, clamped: bool, snapped: bool) {
        if clamped {
            self.positions_clamped = self.positions_clamped.saturating_add(1);
        }
        if snapped {
            self.positions_snapped = self.positions_snapped.saturating_add(1);
        }
    }

    pub fn record_stale(&mut self) {
        self.stale_references = self.stale_references.saturating_add(1);
    }

    pub fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            tables_added: self.tables_added,
            tables_deleted: self.tables_deleted,
            drags_committed: self.drags_committed,
            drags_cancelled: self.drags_cancelled,
            positions_clamped: self.positions_clamped,
            positions_snapped: self.positions_snapped,
            stale_references: self.stale_references,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub tables_added: u64,
    pub tables_deleted: u64,
    pub drags_committed: u64,
    pub drags_cancelled: u64,
    pub positions_clamped: u64,
    pub positions_snapped: u64,
    pub stale_references: u64,
}

impl MetricSnapshot {
    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("tables_added".to_string(), json!(self.tables_added));
        map.insert("tables_deleted".to_string(), json!(self.tables_deleted));
        map.insert("drags_committed".to_string(), json!(self.drags_committed));
        map.insert("drags_cancelled".to_string(), json!(self.drags_cancelled));
        map.insert("positions_clamped".to_string(), json!(self.positions_clamped));
        map.insert("positions_snapped".to_string(), json!(self.positions_snapped));
        map.insert("stale_references".to_string(), json!(self.stale_references));
        map
    }

    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "session_metrics", self.as_fields())
    }
}
