use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pd_tables::config::Config;
use pd_tables::data::columns::Columns;
use pd_tables::data::data_view::{DataView, SortState};
use pd_tables::data::record::{DataValue, Record};
use pd_tables::data::row_store::RowStore;
use pd_tables::ui::viewport_manager::compute_window;
use pd_tables::PdTable;

fn create_test_rows(rows: usize) -> Vec<Record> {
    let names = vec![
        "Ali", "Budi", "Citra", "Dewi", "Eka", "Fajar", "Gita", "Hadi", "Indah", "Joko",
    ];

    (0..rows)
        .map(|i| {
            Record::Positional(vec![
                DataValue::Integer(i as i64),
                DataValue::String(format!("{} {}", names[i % names.len()], i)),
                DataValue::String(format!("STATUS_{}", i % 5)),
            ])
        })
        .collect()
}

fn benchmark_filter(c: &mut Criterion) {
    let store_10k = RowStore::from_records(create_test_rows(10_000));
    let store_100k = RowStore::from_records(create_test_rows(100_000));
    let columns = Columns::default();

    let mut group = c.benchmark_group("filter");

    group.bench_function("10k_rows", |b| {
        b.iter(|| {
            let mut view = DataView::new(&store_10k).with_search(black_box("ali"));
            view.rebuild(&store_10k, &columns);
            view.row_count()
        });
    });

    group.bench_function("100k_rows", |b| {
        b.iter(|| {
            let mut view = DataView::new(&store_100k).with_search(black_box("ali"));
            view.rebuild(&store_100k, &columns);
            view.row_count()
        });
    });

    // Numeric sort of every row
    group.bench_function("100k_rows_sorted", |b| {
        b.iter(|| {
            let mut view =
                DataView::new(&store_100k).with_sort(Some(SortState::descending(0)));
            view.rebuild(&store_100k, &columns);
            view.row_count()
        });
    });

    group.finish();
}

fn benchmark_window(c: &mut Criterion) {
    let mut group = c.benchmark_group("window");

    group.bench_function("compute_window", |b| {
        b.iter(|| compute_window(black_box(420_000), 42, 25, 5, black_box(100_000)));
    });

    // Scroll then render one frame
    group.bench_function("scroll_and_render", |b| {
        let mut table = PdTable::new(Config::default(), create_test_rows(100_000)).unwrap();
        let mut offset = 0u64;
        b.iter(|| {
            offset = (offset + 420) % 4_200_000;
            table.on_scroll(offset);
            table.render().map(|frame| frame.rows.len())
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_filter, benchmark_window);
criterion_main!(benches);
