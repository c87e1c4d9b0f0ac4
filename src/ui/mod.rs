//! Presentation layer
//!
//! Window calculation, frame building, typed actions and a terminal sink.

pub mod actions;
pub mod table_display;
pub mod table_renderer;
pub mod viewport_manager;
