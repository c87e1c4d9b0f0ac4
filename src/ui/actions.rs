// Action system for table operations.
// Hosts translate their raw events (scroll, keystrokes, clicks) into these
// and hand them to `PdTable::dispatch`.

use serde::Serialize;

use crate::data::record::{Record, RowId};

/// Per-row actions a sink offers on each rendered row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RowAction {
    ToggleSelect,
    Edit,
    Delete,
}

impl RowAction {
    pub fn label(&self) -> &'static str {
        match self {
            RowAction::ToggleSelect => "Select",
            RowAction::Edit => "Edit",
            RowAction::Delete => "Del",
        }
    }
}

/// All actions a table understands
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Viewport
    Scroll(u64),
    ResizeViewport(u32),
    NextPage,
    PrevPage,
    GotoPage(usize),

    // Search and sort
    SearchInput(String),
    ClearSearch,
    SortColumn(usize),

    // Selection
    Row(RowAction, RowId),
    SelectRow(RowId, bool),
    SelectAllVisible(bool),
    ClearSelection,

    // Data operations
    Add(Record),
    Edit(RowId, Record),
    Delete(RowId),
    Refresh,

    // Output
    CopySelected,
    ExportCsv,
    Render,
}

/// What the host should do after an action was handled
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// State changed (or not); a render is scheduled if needed
    Handled,
    /// The host should open an editor for this row and send `Action::Edit`
    EditRequested { id: RowId, record: Record },
    /// Text produced by copy/export
    Text(String),
    /// The table is destroyed or the action did not apply
    Ignored,
}
