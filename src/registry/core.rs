use std::collections::{HashMap, HashSet};

use blake3::Hash;
use serde::Serialize;

use crate::table::{Table, TableId, TableIdAllocator};

#[derive(Debug, Clone)]
struct TableEntry {
    table: Table,
    hash: Option<Hash>,
}

impl TableEntry {
    fn new(table: Table) -> Self {
        let hash = fingerprint(&table);
        Self { table, hash }
    }

    /// Re-fingerprint after a mutation; true when render-visible state changed.
    fn refresh(&mut self) -> bool {
        let new_hash = fingerprint(&self.table);
        let changed = match (self.hash, new_hash) {
            (Some(old), Some(new)) => old != new,
            _ => true,
        };
        self.hash = new_hash;
        changed
    }
}

fn fingerprint(table: &Table) -> Option<Hash> {
    serde_json::to_vec(table)
        .ok()
        .map(|bytes| blake3::hash(&bytes))
}

/// Tables changed or removed since the previous [`TableRegistry::take_dirty`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirtyTables {
    pub changed: Vec<TableId>,
    pub removed: Vec<TableId>,
}

impl DirtyTables {
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.removed.is_empty()
    }
}

/// Serializable read model of the whole canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutSnapshot {
    pub tables: Vec<Table>,
}

/// The table collection owned by a canvas. Iteration follows insertion
/// order, which is also the paint order.
#[derive(Debug, Default)]
pub struct TableRegistry {
    ids: TableIdAllocator,
    order: Vec<TableId>,
    entries: HashMap<TableId, TableEntry>,
    dirty: HashSet<TableId>,
    removed: Vec<TableId>,
}

impl TableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn allocate_id(&mut self) -> TableId {
        self.ids.allocate()
    }

    pub(crate) fn insert(&mut self, table: Table) {
        let id = table.id();
        if self.entries.insert(id, TableEntry::new(table)).is_none() {
            self.order.push(id);
        }
        self.dirty.insert(id);
    }

    /// Mutate one table in place. Returns `None` for unknown ids.
    pub(crate) fn update<R>(&mut self, id: TableId, apply: impl FnOnce(&mut Table) -> R) -> Option<R> {
        let entry = self.entries.get_mut(&id)?;
        let result = apply(&mut entry.table);
        if entry.refresh() {
            self.dirty.insert(id);
        }
        Some(result)
    }

    pub(crate) fn remove(&mut self, id: TableId) -> Option<Table> {
        let entry = self.entries.remove(&id)?;
        self.order.retain(|existing| *existing != id);
        self.dirty.remove(&id);
        self.removed.push(id);
        Some(entry.table)
    }

    pub fn get(&self, id: TableId) -> Option<&Table> {
        self.entries.get(&id).map(|entry| &entry.table)
    }

    pub fn contains(&self, id: TableId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Table> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.entries.get(id).map(|entry| &entry.table))
    }

    pub fn has_dirty(&self) -> bool {
        !self.dirty.is_empty() || !self.removed.is_empty()
    }

    /// Drain change notifications. Changed ids come back in paint order.
    pub fn take_dirty(&mut self) -> DirtyTables {
        let changed = self
            .order
            .iter()
            .filter(|id| self.dirty.contains(*id))
            .copied()
            .collect();
        self.dirty.clear();
        DirtyTables {
            changed,
            removed: std::mem::take(&mut self.removed),
        }
    }

    pub fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot {
            tables: self.iter().cloned().collect(),
        }
    }
}
