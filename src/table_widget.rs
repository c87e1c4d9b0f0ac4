//! The table controller
//!
//! `PdTable` owns every piece of per-instance state: the authoritative rows,
//! the filtered/sorted view, viewport position, selection, search highlight,
//! pending notifications and in-flight collaborator requests. Every state
//! change follows the same order: mutate, rebuild the view, clamp the
//! viewport, request a render.

use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::api::{
    Backend, Operation, OperationResult, PendingRequest, RequestKey, RequestOutcome,
    RequestTracker,
};
use crate::config::Config;
use crate::core::search_manager::SearchManager;
use crate::data::columns::Columns;
use crate::data::data_exporter::DataExporter;
use crate::data::data_view::{DataView, SortState};
use crate::data::record::{Record, RowId};
use crate::data::row_store::{RowStore, StoredRow};
use crate::debouncer::{Debouncer, RenderScheduler};
use crate::error::TableError;
use crate::state::notifications::{Notification, NotificationQueue};
use crate::state::selection::{CheckState, SelectionTracker};
use crate::ui::actions::{Action, DispatchOutcome, RowAction};
use crate::ui::table_renderer::{render_frame, RenderContext, RenderFrame, RenderSink};
use crate::ui::viewport_manager::{ViewportManager, WindowMode};

pub type SuccessCallback = Box<dyn FnMut(&str) + Send>;
pub type ErrorCallback = Box<dyn FnMut(&TableError) + Send>;
pub type LoadCallback = Box<dyn FnMut(usize) + Send>;
pub type ConfirmCallback = Box<dyn FnMut(&StoredRow) -> bool + Send>;

#[derive(Default)]
struct Callbacks {
    on_success: Option<SuccessCallback>,
    on_error: Option<ErrorCallback>,
    on_load: Option<LoadCallback>,
    confirm_delete: Option<ConfirmCallback>,
}

/// Snapshot of table counters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableStats {
    pub total_rows: usize,
    pub filtered_rows: usize,
    pub selected: usize,
    pub visible_start: usize,
    pub visible_end: usize,
    pub page_index: usize,
    pub page_count: usize,
    pub sort: Option<SortState>,
    pub search: String,
    pub loading: bool,
}

pub struct PdTable {
    config: Config,
    store: RowStore,
    view: DataView,
    columns: Columns,
    viewport: ViewportManager,
    search: SearchManager,
    selection: SelectionTracker,
    notifications: NotificationQueue,
    search_debouncer: Debouncer,
    pending_search: Option<String>,
    scheduler: RenderScheduler,
    backend: Backend,
    requests: RequestTracker,
    callbacks: Callbacks,
    sink: Option<Box<dyn RenderSink>>,
    last_frame: Option<RenderFrame>,
    render_count: u64,
    destroyed: bool,
}

impl PdTable {
    /// Table with no collaborator: every mutation stays in memory
    pub fn new(config: Config, records: Vec<Record>) -> Result<Self, TableError> {
        Self::with_backend(config, records, Backend::Local)
    }

    /// Table whose collaborator is built from the `[api]` URLs
    pub fn from_config(config: Config, records: Vec<Record>) -> Result<Self, TableError> {
        let backend = Backend::from_api_config(&config.api)?;
        Self::with_backend(config, records, backend)
    }

    pub fn with_backend(
        config: Config,
        records: Vec<Record>,
        backend: Backend,
    ) -> Result<Self, TableError> {
        config.validate()?;

        let table_cfg = &config.table;
        let mode = if table_cfg.virtual_scroll {
            WindowMode::Virtual {
                row_height: table_cfg.row_height,
                visible_count: table_cfg.visible_rows,
                overscan: table_cfg.overscan,
            }
        } else {
            WindowMode::Paged {
                page_size: table_cfg.page_size,
            }
        };

        let store = RowStore::from_records(records);
        let columns = Columns::for_records(
            table_cfg.columns.clone(),
            store.iter().map(|row| &row.record),
        );
        let mut view = DataView::new(&store);
        view.rebuild(&store, &columns);

        info!(
            target: "table",
            "Created table with {} rows ({:?}, backend={})",
            store.len(),
            mode,
            backend.name()
        );

        let mut scheduler = RenderScheduler::new();
        scheduler.request();

        Ok(Self {
            search_debouncer: Debouncer::new(config.search.debounce_ms),
            config,
            store,
            view,
            columns,
            viewport: ViewportManager::new(mode),
            search: SearchManager::new(),
            selection: SelectionTracker::new(),
            notifications: NotificationQueue::new(),
            pending_search: None,
            scheduler,
            backend,
            requests: RequestTracker::new(),
            callbacks: Callbacks::default(),
            sink: None,
            last_frame: None,
            render_count: 0,
            destroyed: false,
        })
    }

    pub fn with_sink(mut self, sink: Box<dyn RenderSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn on_success(mut self, callback: impl FnMut(&str) + Send + 'static) -> Self {
        self.callbacks.on_success = Some(Box::new(callback));
        self
    }

    pub fn on_error(mut self, callback: impl FnMut(&TableError) + Send + 'static) -> Self {
        self.callbacks.on_error = Some(Box::new(callback));
        self
    }

    pub fn on_load(mut self, callback: impl FnMut(usize) + Send + 'static) -> Self {
        self.callbacks.on_load = Some(Box::new(callback));
        self
    }

    /// Yes/no gate consulted before a delete. Without one, deletes that ask
    /// for confirmation are declined.
    pub fn confirm_delete(mut self, callback: impl FnMut(&StoredRow) -> bool + Send + 'static) -> Self {
        self.callbacks.confirm_delete = Some(Box::new(callback));
        self
    }

    // ---- accessors ----

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    pub fn store(&self) -> &RowStore {
        &self.store
    }

    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    pub fn viewport(&self) -> &ViewportManager {
        &self.viewport
    }

    pub fn row(&self, id: RowId) -> Option<&StoredRow> {
        self.store.get(id)
    }

    /// Rows of the filtered collection in display order
    pub fn filtered_rows(&self) -> Vec<&StoredRow> {
        self.view.get_rows(&self.store)
    }

    pub fn search_text(&self) -> &str {
        self.search.pattern()
    }

    pub fn sort(&self) -> Option<SortState> {
        self.view.sort()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// True while a collaborator request is outstanding
    pub fn is_loading(&self) -> bool {
        self.requests.in_flight() > 0
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain()
    }

    /// Last frame handed to the sink
    pub fn frame(&self) -> Option<&RenderFrame> {
        self.last_frame.as_ref()
    }

    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    pub fn render_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    // ---- data replacement ----

    /// Replace every row. Existing selections become unreachable.
    pub fn replace_rows(&mut self, records: Vec<Record>) -> Result<usize, TableError> {
        self.ensure_alive()?;
        self.store.replace_all(records);
        self.refresh_view();
        Ok(self.store.len())
    }

    /// Replace every row from JSON. Anything but an array of rows is rejected
    /// and the current rows are kept.
    pub fn replace_rows_json(&mut self, value: &Value) -> Result<usize, TableError> {
        self.ensure_alive()?;
        match Record::collection_from_json(value) {
            Ok(records) => self.replace_rows(records),
            Err(e) => {
                self.report_error(&e);
                Err(e)
            }
        }
    }

    pub fn append_row(&mut self, record: Record) -> Result<RowId, TableError> {
        self.ensure_alive()?;
        let id = self.store.append(record);
        self.refresh_view();
        Ok(id)
    }

    /// Remove the row at a position of the authoritative collection
    pub fn remove_row_at(&mut self, index: usize) -> Result<Record, TableError> {
        self.ensure_alive()?;
        let removed = self.store.remove_at(index)?;
        self.refresh_view();
        Ok(removed.record)
    }

    // ---- search, sort, viewport ----

    /// Apply search text immediately, bypassing the debouncer
    pub fn set_search(&mut self, text: &str) {
        if self.destroyed {
            return;
        }
        self.search_debouncer.reset();
        self.pending_search = None;
        self.apply_search(text);
    }

    fn apply_search(&mut self, text: &str) {
        if text == self.search.pattern() {
            return;
        }
        debug!(target: "table", "Applying search '{}'", text);
        self.search.set_pattern(text);
        self.view.set_search(text);
        self.viewport.reset();
        self.refresh_view();
    }

    /// Activate a sortable header: same column flips direction, another
    /// column starts ascending
    pub fn sort_by_column(&mut self, column: usize) -> SortState {
        let sort = SortState::activate(self.view.sort(), column);
        if !self.destroyed {
            self.set_sort(Some(sort));
        }
        sort
    }

    pub fn set_sort(&mut self, sort: Option<SortState>) {
        if self.destroyed {
            return;
        }
        self.view.set_sort(sort);
        self.refresh_view();
    }

    pub fn scroll_to(&mut self, offset: u64) {
        self.on_scroll(offset);
    }

    pub fn set_viewport_height(&mut self, height: u32) {
        if self.destroyed {
            return;
        }
        self.viewport.set_viewport_height(height);
        self.viewport.clamp_to(self.view.row_count());
        self.scheduler.request();
    }

    pub fn next_page(&mut self) -> usize {
        if self.destroyed {
            return self.viewport.page_index();
        }
        let page = self.viewport.next_page(self.view.row_count());
        self.scheduler.request();
        page
    }

    pub fn prev_page(&mut self) -> usize {
        if self.destroyed {
            return self.viewport.page_index();
        }
        let page = self.viewport.prev_page(self.view.row_count());
        self.scheduler.request();
        page
    }

    pub fn goto_page(&mut self, page: usize) -> usize {
        if self.destroyed {
            return self.viewport.page_index();
        }
        let page = self.viewport.goto_page(page, self.view.row_count());
        self.scheduler.request();
        page
    }

    /// Filtered index range of the current window
    pub fn visible_range(&self) -> std::ops::Range<usize> {
        self.viewport.window(self.view.row_count())
    }

    /// Identities of the rows in the current window
    pub fn visible_ids(&self) -> Vec<RowId> {
        self.view.ids_in(&self.store, self.visible_range())
    }

    // ---- selection ----

    pub fn select_row(&mut self, id: RowId, checked: bool) {
        if self.destroyed {
            return;
        }
        self.selection.set(id, checked);
        self.scheduler.request();
    }

    pub fn toggle_row(&mut self, id: RowId) -> bool {
        if self.destroyed {
            return self.selection.is_selected(id);
        }
        let checked = self.selection.toggle(id);
        self.scheduler.request();
        checked
    }

    /// Select or clear every row of the rendered window (not the whole
    /// filtered collection)
    pub fn select_all_visible(&mut self, checked: bool) {
        if self.destroyed {
            return;
        }
        let visible = self.visible_ids();
        self.selection.select_all_visible(&visible, checked);
        self.scheduler.request();
    }

    pub fn select_all_state(&self) -> CheckState {
        self.selection.check_state(&self.visible_ids())
    }

    pub fn is_selected(&self, id: RowId) -> bool {
        self.selection.is_selected(id)
    }

    /// Selected rows that still exist, in authoritative order
    pub fn selected_rows(&self) -> Vec<&StoredRow> {
        self.selection.selected_rows(&self.store)
    }

    pub fn clear_selection(&mut self) {
        if self.destroyed {
            return;
        }
        self.selection.clear();
        self.scheduler.request();
    }

    // ---- output ----

    pub fn stats(&self) -> TableStats {
        let total = self.view.row_count();
        let range = self.viewport.window(total);
        TableStats {
            total_rows: self.store.len(),
            filtered_rows: total,
            selected: self.selected_rows().len(),
            visible_start: range.start,
            visible_end: range.end,
            page_index: self.viewport.page_index(),
            page_count: self.viewport.page_count(total),
            sort: self.view.sort(),
            search: self.search.pattern().to_string(),
            loading: self.is_loading(),
        }
    }

    /// Export the filtered rows as CSV text
    pub fn export_csv(&mut self) -> Result<String, TableError> {
        self.ensure_alive()?;
        if self.view.is_empty() {
            self.notifications.warning(TableError::NoData.to_string());
            return Err(TableError::NoData);
        }

        let rows = self.view.get_rows(&self.store);
        let headers = if self.config.export.include_header {
            self.columns.header_labels()
        } else {
            None
        };

        let text = DataExporter::to_csv_string(&rows, &self.columns, headers.as_deref())
            .map_err(|e| TableError::Export(format!("{:#}", e)))?;
        debug!(target: "export", "Exported {} rows as CSV", rows.len());
        self.notify_success("CSV exported");
        Ok(text)
    }

    pub fn export_csv_to_file(&mut self, path: &Path) -> Result<usize, TableError> {
        let text = self.export_csv()?;
        DataExporter::write_csv_file(path, &text).map_err(|e| {
            let err = TableError::Export(format!("{:#}", e));
            self.report_error(&err);
            err
        })
    }

    /// Tab-separated text of the selected rows
    pub fn copy_selected(&mut self) -> Result<String, TableError> {
        self.ensure_alive()?;
        let rows = self.selected_rows();
        if rows.is_empty() {
            self.notifications
                .warning(TableError::EmptySelection.to_string());
            return Err(TableError::EmptySelection);
        }
        let count = rows.len();
        let text = DataExporter::to_tsv_text(&rows);
        self.notify_success(&format!("{} rows copied", count));
        Ok(text)
    }

    // ---- rendering ----

    /// Build the frame for the current state without touching the sink
    pub fn build_frame(&self) -> RenderFrame {
        let total = self.view.row_count();
        let range = self.viewport.window(total);
        let ctx = RenderContext {
            rows: self.view.rows_in(&self.store, range.clone()),
            columns: &self.columns,
            search: &self.search,
            selection: &self.selection,
            selectable: self.config.table.selectable,
            start_index: range.start,
            total_filtered: total,
            offset_px: self.viewport.offset_px(range.start),
            canvas_height_px: self.viewport.canvas_height_px(total),
        };
        render_frame(&ctx)
    }

    /// Render now, whatever the scheduler says
    pub fn render(&mut self) -> Option<&RenderFrame> {
        if self.destroyed {
            return None;
        }
        self.scheduler.cancel();
        let frame = self.build_frame();
        if let Some(sink) = self.sink.as_mut() {
            sink.render(&frame);
        }
        self.render_count += 1;
        crate::trace_operation!(format!(
            "render #{} rows {}..{} of {}",
            self.render_count,
            frame.start_index,
            frame.end_index(),
            frame.total_filtered
        ));
        Some(&*self.last_frame.insert(frame))
    }

    // ---- events ----

    /// Scroll container moved. The render happens on the next frame.
    pub fn on_scroll(&mut self, offset: u64) {
        if self.destroyed {
            return;
        }
        self.viewport.set_scroll_offset(offset);
        self.scheduler.request();
    }

    pub fn on_search_input(&mut self, text: &str) {
        self.on_search_input_at(text, Instant::now());
    }

    /// A search keystroke. The text is applied once the input has been
    /// quiet for the debounce delay.
    pub fn on_search_input_at(&mut self, text: &str, now: Instant) {
        if self.destroyed || !self.config.table.searchable {
            return;
        }
        self.pending_search = Some(text.to_string());
        self.search_debouncer.trigger_at(now);
    }

    /// Frame callback: applies a due search and performs at most one render.
    /// Returns true when a render happened.
    pub fn on_frame(&mut self, now: Instant) -> bool {
        if self.destroyed {
            return false;
        }
        if self.search_debouncer.should_execute_at(now) {
            if let Some(text) = self.pending_search.take() {
                self.apply_search(&text);
            }
        }
        if self.scheduler.take() {
            self.render();
            true
        } else {
            false
        }
    }

    /// Route a typed action to its handler
    pub async fn dispatch(&mut self, action: Action) -> Result<DispatchOutcome, TableError> {
        if self.destroyed {
            return Ok(DispatchOutcome::Ignored);
        }
        debug!(target: "table", "Dispatch {:?}", action);

        match action {
            Action::Scroll(offset) => self.on_scroll(offset),
            Action::ResizeViewport(height) => self.set_viewport_height(height),
            Action::NextPage => {
                self.next_page();
            }
            Action::PrevPage => {
                self.prev_page();
            }
            Action::GotoPage(page) => {
                self.goto_page(page);
            }
            Action::SearchInput(text) => self.on_search_input(&text),
            Action::ClearSearch => self.set_search(""),
            Action::SortColumn(column) => {
                self.sort_by_column(column);
            }
            Action::Row(RowAction::ToggleSelect, id) => {
                if !self.config.table.selectable {
                    return Ok(DispatchOutcome::Ignored);
                }
                self.toggle_row(id);
            }
            Action::Row(RowAction::Edit, id) => {
                let row = self.store.get(id).ok_or(TableError::RowNotFound(id))?;
                return Ok(DispatchOutcome::EditRequested {
                    id,
                    record: row.record.clone(),
                });
            }
            Action::Row(RowAction::Delete, id) | Action::Delete(id) => {
                self.delete_row(id, true).await?;
            }
            Action::SelectRow(id, checked) => self.select_row(id, checked),
            Action::SelectAllVisible(checked) => self.select_all_visible(checked),
            Action::ClearSelection => self.clear_selection(),
            Action::Add(record) => self.add_row(record).await?,
            Action::Edit(id, record) => self.edit_row(id, record).await?,
            Action::Refresh => {
                self.refresh().await?;
            }
            Action::CopySelected => return self.copy_selected().map(DispatchOutcome::Text),
            Action::ExportCsv => return self.export_csv().map(DispatchOutcome::Text),
            Action::Render => {
                self.render();
            }
        }
        Ok(DispatchOutcome::Handled)
    }

    // ---- CRUD ----

    pub async fn add_row(&mut self, record: Record) -> Result<(), TableError> {
        match self.prepare_add(record)? {
            Some(pending) => self.complete(pending.run().await),
            None => Ok(()),
        }
    }

    pub async fn edit_row(&mut self, id: RowId, record: Record) -> Result<(), TableError> {
        match self.prepare_edit(id, record)? {
            Some(pending) => self.complete(pending.run().await),
            None => Ok(()),
        }
    }

    /// Delete a row. With `confirm`, the confirmation gate must say yes
    /// first; returns Ok(false) when it declines.
    pub async fn delete_row(&mut self, id: RowId, confirm: bool) -> Result<bool, TableError> {
        match self.prepare_delete(id, confirm)? {
            DeletePlan::Declined => Ok(false),
            DeletePlan::Applied => Ok(true),
            DeletePlan::Pending(pending) => self.complete(pending.run().await).map(|_| true),
        }
    }

    /// Reload every row from the collaborator
    pub async fn load(&mut self) -> Result<usize, TableError> {
        let pending = self.prepare_load()?;
        self.complete(pending.run().await)?;
        Ok(self.store.len())
    }

    pub async fn refresh(&mut self) -> Result<usize, TableError> {
        self.load().await
    }

    /// Validate an add. Local tables apply it at once and return None;
    /// CRUD tables return the request to run.
    pub fn prepare_add(&mut self, record: Record) -> Result<Option<PendingRequest>, TableError> {
        self.ensure_alive()?;
        if record.is_empty() {
            return Err(self.reject(TableError::InvalidInput("row has no values".into())));
        }

        if !self.backend.can_mutate() {
            let id = self.store.append(record);
            debug!(target: "crud", "Added row {} locally", id);
            self.refresh_view();
            self.notify_success("Data added");
            return Ok(None);
        }

        let key = self.requests.create_key();
        Ok(Some(self.start_request(key, Operation::Create(record))))
    }

    pub fn prepare_edit(
        &mut self,
        id: RowId,
        record: Record,
    ) -> Result<Option<PendingRequest>, TableError> {
        self.ensure_alive()?;
        if record.is_empty() {
            return Err(self.reject(TableError::InvalidInput("row has no values".into())));
        }
        let Some(existing) = self.store.get(id) else {
            return Err(self.reject(TableError::RowNotFound(id)));
        };

        if !self.backend.can_mutate() {
            self.store.update(id, record)?;
            debug!(target: "crud", "Updated row {} locally", id);
            self.refresh_view();
            self.notify_success("Data updated");
            return Ok(None);
        }

        let Some(key) = existing.record.natural_key().or_else(|| record.natural_key()) else {
            return Err(self.reject(TableError::InvalidInput(format!(
                "row {} has no id to send to the backend",
                id
            ))));
        };
        Ok(Some(self.start_request(
            RequestKey::Update(id),
            Operation::Update { id, key, record },
        )))
    }

    pub fn prepare_delete(&mut self, id: RowId, confirm: bool) -> Result<DeletePlan, TableError> {
        self.ensure_alive()?;
        let Some(existing) = self.store.get(id) else {
            return Err(self.reject(TableError::RowNotFound(id)));
        };

        if confirm {
            let approved = match self.callbacks.confirm_delete.as_mut() {
                Some(gate) => gate(existing),
                None => false,
            };
            if !approved {
                debug!(target: "crud", "Delete of row {} declined", id);
                return Ok(DeletePlan::Declined);
            }
        }

        if !self.backend.can_mutate() {
            self.store.remove(id)?;
            debug!(target: "crud", "Deleted row {} locally", id);
            self.refresh_view();
            self.notify_success("Data deleted");
            return Ok(DeletePlan::Applied);
        }

        let Some(key) = existing.record.natural_key() else {
            return Err(self.reject(TableError::InvalidInput(format!(
                "row {} has no id to send to the backend",
                id
            ))));
        };
        Ok(DeletePlan::Pending(self.start_request(
            RequestKey::Delete(id),
            Operation::Delete { id, key },
        )))
    }

    pub fn prepare_load(&mut self) -> Result<PendingRequest, TableError> {
        self.ensure_alive()?;
        if !self.backend.can_load() {
            return Err(TableError::Unsupported("load".into()));
        }
        Ok(self.start_request(RequestKey::Load, Operation::Load))
    }

    fn start_request(&mut self, key: RequestKey, operation: Operation) -> PendingRequest {
        crate::trace_request!(operation.name(), key);
        let ticket = self.requests.begin(key);
        // Loading indicator
        self.scheduler.request();
        PendingRequest::new(ticket, operation, self.backend.clone())
    }

    /// Apply a finished request. Rows change only on success; failures
    /// leave the table untouched and are reported. Superseded or cancelled
    /// outcomes are dropped silently.
    pub fn complete(&mut self, outcome: RequestOutcome) -> Result<(), TableError> {
        let current = self.requests.finish(&outcome.ticket);
        if self.destroyed {
            return Err(TableError::Destroyed);
        }
        self.scheduler.request();

        let result = match outcome.result {
            Err(e) if e.is_cancelled() => {
                debug!(target: "crud", "Ignoring cancelled {} request", outcome.operation.name());
                return Err(e);
            }
            _ if !current => {
                debug!(target: "crud", "Ignoring superseded {} request", outcome.operation.name());
                return Err(TableError::Cancelled(outcome.operation.name().to_string()));
            }
            Err(e) => {
                self.report_error(&e);
                return Err(e);
            }
            Ok(result) => result,
        };

        match (outcome.operation, result) {
            (Operation::Load, OperationResult::Loaded(records)) => {
                let count = records.len();
                self.store.replace_all(records);
                self.refresh_view();
                info!(target: "crud", "Loaded {} rows", count);
                if let Some(callback) = self.callbacks.on_load.as_mut() {
                    callback(count);
                }
            }
            (Operation::Create(_), OperationResult::Created(record)) => {
                let id = self.store.append(record);
                debug!(target: "crud", "Created row {}", id);
                self.refresh_view();
                self.notify_success("Data created successfully");
            }
            (Operation::Update { id, .. }, OperationResult::Updated(record)) => {
                if let Err(e) = self.store.update(id, record) {
                    self.report_error(&e);
                    return Err(e);
                }
                self.refresh_view();
                self.notify_success("Data updated");
            }
            (Operation::Delete { id, .. }, OperationResult::Deleted) => {
                if self.store.remove(id).is_err() {
                    debug!(target: "crud", "Row {} already gone", id);
                }
                self.refresh_view();
                self.notify_success("Data deleted");
            }
            (operation, result) => {
                warn!(
                    target: "crud",
                    "Mismatched outcome {:?} for {}",
                    result,
                    operation.name()
                );
                return Err(TableError::Unsupported(operation.name().to_string()));
            }
        }
        Ok(())
    }

    // ---- teardown ----

    /// Cancel outstanding work and stop reacting to events
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.requests.cancel_all();
        self.search_debouncer.reset();
        self.pending_search = None;
        self.scheduler.cancel();
        self.sink = None;
        self.destroyed = true;
        info!(target: "table", "Table destroyed");
    }

    // ---- internals ----

    fn ensure_alive(&self) -> Result<(), TableError> {
        if self.destroyed {
            Err(TableError::Destroyed)
        } else {
            Ok(())
        }
    }

    /// Mutation is done: rebuild the view, keep the viewport inside it and
    /// schedule a render
    fn refresh_view(&mut self) {
        self.columns
            .sync_keys(self.store.iter().map(|row| &row.record));
        self.view.rebuild(&self.store, &self.columns);
        self.viewport.clamp_to(self.view.row_count());
        self.scheduler.request();
    }

    fn notify_success(&mut self, message: &str) {
        self.notifications.success(message);
        if let Some(callback) = self.callbacks.on_success.as_mut() {
            callback(message);
        }
    }

    fn report_error(&mut self, error: &TableError) {
        self.notifications.error(error.to_string());
        if let Some(callback) = self.callbacks.on_error.as_mut() {
            callback(error);
        }
    }

    fn reject(&mut self, error: TableError) -> TableError {
        self.report_error(&error);
        error
    }
}

impl Drop for PdTable {
    fn drop(&mut self) {
        self.requests.cancel_all();
    }
}

/// What `prepare_delete` decided
#[derive(Debug)]
pub enum DeletePlan {
    /// The confirmation gate said no; nothing changed
    Declined,
    /// Deleted in memory
    Applied,
    /// Run the request, then hand the outcome to `complete`
    Pending(PendingRequest),
}
