// Pure frame building: depends only on the RenderContext handed in, never on
// the widget that owns the state.

use serde::Serialize;

use crate::core::search_manager::{wrap_segments, SearchManager, Segment};
use crate::data::columns::Columns;
use crate::data::record::RowId;
use crate::data::row_store::StoredRow;
use crate::state::selection::{CheckState, SelectionTracker};
use crate::ui::actions::RowAction;

/// Everything needed to build one frame
pub struct RenderContext<'a> {
    /// Rows of the current window, in display order
    pub rows: Vec<&'a StoredRow>,
    pub columns: &'a Columns,
    pub search: &'a SearchManager,
    pub selection: &'a SelectionTracker,
    pub selectable: bool,
    /// Filtered index of the first row in `rows`
    pub start_index: usize,
    pub total_filtered: usize,
    pub offset_px: u64,
    pub canvas_height_px: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedCell {
    /// Plain text of the cell
    pub text: String,
    /// Text split into highlighted / plain runs
    pub segments: Vec<Segment>,
}

impl RenderedCell {
    /// Cell text with every search match wrapped in the given markers
    pub fn to_marked(&self, open: &str, close: &str) -> String {
        wrap_segments(&self.segments, open, close)
    }

    pub fn has_highlight(&self) -> bool {
        self.segments.iter().any(|s| s.highlighted)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedRow {
    pub id: RowId,
    /// Index within the filtered collection
    pub absolute_index: usize,
    pub cells: Vec<RenderedCell>,
    pub selected: bool,
    /// Actions the sink should offer on this row
    pub actions: Vec<RowAction>,
}

/// The window handed to a render sink.
///
/// The sink places `rows` at `offset_px` inside a canvas of
/// `canvas_height_px`, so the table looks full-length while only the window
/// is materialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    pub rows: Vec<RenderedRow>,
    pub start_index: usize,
    pub total_filtered: usize,
    pub offset_px: u64,
    pub canvas_height_px: u64,
    pub select_all: CheckState,
    pub empty_message: Option<String>,
    pub search: String,
}

impl RenderFrame {
    /// Identities of the rendered rows
    pub fn row_ids(&self) -> Vec<RowId> {
        self.rows.iter().map(|r| r.id).collect()
    }

    pub fn end_index(&self) -> usize {
        self.start_index + self.rows.len()
    }
}

/// Something that materializes frames (DOM, terminal, test recorder, ...)
pub trait RenderSink {
    fn render(&mut self, frame: &RenderFrame);
}

/// Build a frame from the context
pub fn render_frame(ctx: &RenderContext) -> RenderFrame {
    let mut actions = Vec::with_capacity(3);
    if ctx.selectable {
        actions.push(RowAction::ToggleSelect);
    }
    actions.push(RowAction::Edit);
    actions.push(RowAction::Delete);

    let rows: Vec<RenderedRow> = ctx
        .rows
        .iter()
        .enumerate()
        .map(|(rel_idx, row)| RenderedRow {
            id: row.id,
            absolute_index: ctx.start_index + rel_idx,
            cells: build_cells(ctx, row),
            selected: ctx.selectable && ctx.selection.is_selected(row.id),
            actions: actions.clone(),
        })
        .collect();

    let ids: Vec<RowId> = rows.iter().map(|r| r.id).collect();
    let empty_message = if rows.is_empty() {
        Some(if ctx.search.is_active() {
            "No matching rows".to_string()
        } else {
            "No data".to_string()
        })
    } else {
        None
    };

    RenderFrame {
        rows,
        start_index: ctx.start_index,
        total_filtered: ctx.total_filtered,
        offset_px: ctx.offset_px,
        canvas_height_px: ctx.canvas_height_px,
        select_all: ctx.selection.check_state(&ids),
        empty_message,
        search: ctx.search.pattern().to_string(),
    }
}

fn build_cells(ctx: &RenderContext, row: &StoredRow) -> Vec<RenderedCell> {
    ctx.columns
        .cells(&row.record)
        .into_iter()
        .map(|value| {
            let text = value.to_string();
            let segments = ctx.search.highlight(&text);
            RenderedCell { text, segments }
        })
        .collect()
}
