use pd_tables::config::Config;
use pd_tables::data::record::{Record, RowId};
use pd_tables::state::selection::CheckState;
use pd_tables::PdTable;

fn selectable_config(visible_rows: usize) -> Config {
    let mut config = Config::default();
    config.table.selectable = true;
    config.table.visible_rows = visible_rows;
    config
}

fn rows_with_ids(ids: std::ops::RangeInclusive<u32>) -> Vec<Record> {
    ids.map(|i| Record::positional([i.to_string(), format!("Name {}", i)]))
        .collect()
}

fn id_of(table: &PdTable, key: &str) -> RowId {
    table
        .store()
        .iter()
        .find(|row| row.record.natural_key().as_deref() == Some(key))
        .map(|row| row.id)
        .unwrap()
}

#[test]
fn test_selection_survives_filtering_out_and_back() {
    let mut table = PdTable::new(selectable_config(25), rows_with_ids(1..=5)).unwrap();
    let id = id_of(&table, "2");
    table.select_row(id, true);

    table.set_search("Name 2");
    assert!(table.is_selected(id));
    assert!(table.render().unwrap().rows[0].selected);

    table.set_search("Name 4");
    assert!(table.is_selected(id));
    assert!(table.render().unwrap().rows.iter().all(|row| row.id != id));

    table.set_search("");
    let frame = table.render().unwrap();
    let row = frame.rows.iter().find(|row| row.id == id).unwrap();
    assert!(row.selected);
}

#[test]
fn test_selection_survives_sorting() {
    let mut table = PdTable::new(selectable_config(25), rows_with_ids(1..=5)).unwrap();
    let id = id_of(&table, "1");
    table.select_row(id, true);
    table.sort_by_column(0);
    table.sort_by_column(0);

    let frame = table.render().unwrap();
    assert_eq!(frame.rows[4].id, id);
    assert!(frame.rows[4].selected);
    assert_eq!(table.selected_rows().len(), 1);
}

#[tokio::test]
async fn test_deleting_another_row_keeps_selection() {
    let mut table = PdTable::new(selectable_config(25), rows_with_ids(1..=10)).unwrap();
    let seven = id_of(&table, "7");
    let three = id_of(&table, "3");
    table.select_row(seven, true);

    assert!(table.delete_row(three, false).await.unwrap());

    assert!(table.is_selected(seven));
    let selected = table.selected_rows();
    assert_eq!(selected.len(), 1);
    assert_eq!(
        selected[0].record,
        Record::positional(["7", "Name 7"])
    );
}

#[tokio::test]
async fn test_deleted_selection_is_dropped_from_results() {
    let mut table = PdTable::new(selectable_config(25), rows_with_ids(1..=3)).unwrap();
    let two = id_of(&table, "2");
    table.select_row(two, true);
    table.delete_row(two, false).await.unwrap();
    assert!(table.selected_rows().is_empty());
    assert_eq!(table.stats().selected, 0);
}

#[test]
fn test_identity_is_not_positional() {
    // Rows without any natural id are still tracked individually
    let rows = vec![
        Record::keyed([("name", "a")]),
        Record::keyed([("name", "b")]),
        Record::keyed([("name", "c")]),
    ];
    let mut table = PdTable::new(selectable_config(25), rows).unwrap();
    let c = table.store().rows()[2].id;
    table.select_row(c, true);

    table.remove_row_at(0).unwrap();
    let selected = table.selected_rows();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].record, Record::keyed([("name", "c")]));
}

#[test]
fn test_select_all_only_touches_rendered_window() {
    let mut table = PdTable::new(selectable_config(3), rows_with_ids(1..=10)).unwrap();
    assert_eq!(table.select_all_state(), CheckState::Unchecked);

    table.select_all_visible(true);
    assert_eq!(table.select_all_state(), CheckState::Checked);
    assert_eq!(table.selected_rows().len(), 3);

    // Scroll one row down: two of three visible rows are selected
    table.scroll_to(42);
    assert_eq!(table.select_all_state(), CheckState::Indeterminate);

    table.select_all_visible(false);
    assert_eq!(table.select_all_state(), CheckState::Unchecked);
    assert_eq!(table.selected_rows().len(), 1);

    table.clear_selection();
    assert!(table.selected_rows().is_empty());
}

#[test]
fn test_replace_rows_drops_old_selection() {
    let mut table = PdTable::new(selectable_config(25), rows_with_ids(1..=3)).unwrap();
    let one = id_of(&table, "1");
    table.select_row(one, true);
    table.replace_rows(rows_with_ids(1..=3)).unwrap();
    assert!(table.selected_rows().is_empty());
}

#[test]
fn test_render_reports_tri_state() {
    let mut table = PdTable::new(selectable_config(2), rows_with_ids(1..=4)).unwrap();
    let first = table.visible_ids()[0];
    table.select_row(first, true);
    let frame = table.render().unwrap();
    assert_eq!(frame.select_all, CheckState::Indeterminate);
    assert!(frame.rows[0].actions.contains(&pd_tables::ui::actions::RowAction::ToggleSelect));
}
