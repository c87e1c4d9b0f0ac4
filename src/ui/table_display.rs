use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use crossterm::style::Stylize;

use crate::ui::table_renderer::{RenderFrame, RenderSink, RenderedCell};

/// How a frame is drawn in a terminal
#[derive(Debug, Clone)]
pub struct DisplayOptions {
    /// Column headers; None shows no header row
    pub headers: Option<Vec<String>>,
    /// Style matches with ANSI colors instead of text markers
    pub color: bool,
    pub highlight_open: String,
    pub highlight_close: String,
    pub show_selection: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            headers: None,
            color: false,
            highlight_open: "<mark>".to_string(),
            highlight_close: "</mark>".to_string(),
            show_selection: false,
        }
    }
}

/// Render a frame as a comfy-table followed by a position footer
pub fn format_frame(frame: &RenderFrame, options: &DisplayOptions) -> String {
    if let Some(message) = &frame.empty_message {
        return message.clone();
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    if let Some(headers) = &options.headers {
        let mut header: Vec<Cell> = Vec::with_capacity(headers.len() + 2);
        if options.show_selection {
            header.push(Cell::new(select_all_marker(frame)).add_attribute(Attribute::Bold));
        }
        header.push(Cell::new("#").add_attribute(Attribute::Bold));
        header.extend(
            headers
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
        );
        table.set_header(header);
    }

    for row in &frame.rows {
        let mut cells: Vec<String> = Vec::with_capacity(row.cells.len() + 2);
        if options.show_selection {
            cells.push(if row.selected { "[x]" } else { "[ ]" }.to_string());
        }
        cells.push((row.absolute_index + 1).to_string());
        cells.extend(row.cells.iter().map(|cell| cell_text(cell, options)));
        table.add_row(cells);
    }

    format!(
        "{table}\nRows {}-{} of {} (offset {}px, canvas {}px)",
        frame.start_index + 1,
        frame.end_index(),
        frame.total_filtered,
        frame.offset_px,
        frame.canvas_height_px
    )
}

fn select_all_marker(frame: &RenderFrame) -> &'static str {
    use crate::state::selection::CheckState;
    match frame.select_all {
        CheckState::Checked => "[x]",
        CheckState::Unchecked => "[ ]",
        CheckState::Indeterminate => "[-]",
    }
}

fn cell_text(cell: &RenderedCell, options: &DisplayOptions) -> String {
    if !cell.has_highlight() {
        return cell.text.clone();
    }
    if options.color {
        cell.segments
            .iter()
            .map(|segment| {
                if segment.highlighted {
                    segment.text.as_str().yellow().bold().to_string()
                } else {
                    segment.text.clone()
                }
            })
            .collect()
    } else {
        cell.to_marked(&options.highlight_open, &options.highlight_close)
    }
}

/// Sink that prints every frame to stdout
pub struct TerminalSink {
    options: DisplayOptions,
}

impl TerminalSink {
    pub fn new(options: DisplayOptions) -> Self {
        Self { options }
    }
}

impl RenderSink for TerminalSink {
    fn render(&mut self, frame: &RenderFrame) {
        let text = format_frame(frame, &self.options);
        if frame.empty_message.is_some() {
            println!("{}", text.yellow());
        } else {
            println!("{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::search_manager::SearchManager;
    use crate::data::columns::Columns;
    use crate::data::record::{Record, RowId};
    use crate::data::row_store::StoredRow;
    use crate::state::selection::SelectionTracker;
    use crate::ui::table_renderer::{render_frame, RenderContext};

    #[test]
    fn test_format_frame_marks_matches() {
        let rows = vec![StoredRow {
            id: RowId(0),
            record: Record::positional(["1", "Ali"]),
        }];
        let columns = Columns::default();
        let mut search = SearchManager::new();
        search.set_pattern("li");
        let mut selection = SelectionTracker::new();
        selection.set(RowId(0), true);
        let frame = render_frame(&RenderContext {
            rows: rows.iter().collect(),
            columns: &columns,
            search: &search,
            selection: &selection,
            selectable: true,
            start_index: 0,
            total_filtered: 1,
            offset_px: 0,
            canvas_height_px: 42,
        });

        let options = DisplayOptions {
            headers: Some(vec!["ID".into(), "Name".into()]),
            show_selection: true,
            ..DisplayOptions::default()
        };
        let text = format_frame(&frame, &options);
        assert!(text.contains("A<mark>li</mark>"));
        assert!(text.contains("[x]"));
        assert!(text.contains("Name"));
        assert!(text.ends_with("Rows 1-1 of 1 (offset 0px, canvas 42px)"));
    }

    #[test]
    fn test_empty_frame_shows_message() {
        let frame = RenderFrame {
            rows: Vec::new(),
            start_index: 0,
            total_filtered: 0,
            offset_px: 0,
            canvas_height_px: 0,
            select_all: crate::state::selection::CheckState::Unchecked,
            empty_message: Some("No data".into()),
            search: String::new(),
        };
        assert_eq!(format_frame(&frame, &DisplayOptions::default()), "No data");
    }
}
