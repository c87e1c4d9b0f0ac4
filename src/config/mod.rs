//! Configuration module
//!
//! Table, search, export and collaborator settings loaded from TOML.

pub mod config;

pub use config::{ApiConfig, Config, ExportConfig, SearchConfig, TableConfig};
