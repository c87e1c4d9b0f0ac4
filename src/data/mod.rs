//! Data layer
//!
//! The authoritative row store and the filtered/sorted view over it, plus
//! loading and exporting rows.

// Core data modules
pub mod columns;
pub mod data_view;
pub mod record;
pub mod row_store;

pub mod datavalue_compare;

// Input and output
pub mod data_exporter;
pub mod loaders;
