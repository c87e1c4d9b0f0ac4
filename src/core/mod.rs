//! Core logic shared by rendering and filtering

pub mod search_manager;
