use crate::table::TableId;

/// Inline-editable table attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Name,
    Level,
}

/// The one inline edit open on the canvas, with its uncommitted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditState {
    pub table: TableId,
    pub field: EditField,
    pub draft: String,
}

/// Holder for the single open edit. Opening a new edit replaces the old one.
#[derive(Debug, Default)]
pub struct EditFocus {
    current: Option<EditState>,
}

impl EditFocus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an edit, returning whatever edit it displaced.
    pub fn begin(&mut self, table: TableId, field: EditField, draft: String) -> Option<EditState> {
        self.current.replace(EditState {
            table,
            field,
            draft,
        })
    }

    pub fn set_draft(&mut self, text: impl Into<String>) -> bool {
        match self.current.as_mut() {
            Some(edit) => {
                edit.draft = text.into();
                true
            }
            None => false,
        }
    }

    /// Close the edit only if it belongs to `table`.
    pub fn clear_for(&mut self, table: TableId) -> Option<EditState> {
        if self.current.as_ref().map(|edit| edit.table) == Some(table) {
            self.current.take()
        } else {
            None
        }
    }

    pub fn take(&mut self) -> Option<EditState> {
        self.current.take()
    }

    pub(crate) fn restore(&mut self, edit: EditState) {
        self.current = Some(edit);
    }

    pub fn current(&self) -> Option<&EditState> {
        self.current.as_ref()
    }
}
