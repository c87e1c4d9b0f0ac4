pub mod api;
pub mod config;
pub mod core;
pub mod data;
pub mod debouncer;
pub mod error;
pub mod state;
pub mod table_widget;
pub mod ui;
pub mod utils;

pub use api::{Backend, RowBackend, RowSource};
pub use config::Config;
pub use data::record::{DataValue, Record, RowId};
pub use error::TableError;
pub use table_widget::{PdTable, TableStats};
