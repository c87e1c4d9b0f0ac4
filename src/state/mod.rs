//! State components owned by each table instance

pub mod notifications;
pub mod selection;
