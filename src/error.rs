//! Error taxonomy for table operations

use crate::data::record::RowId;

/// Failures surfaced by `PdTable` operations.
///
/// Every variant is recoverable: the table keeps its previous state and the
/// failure is reported through the notification path.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TableError {
    /// Input that is not a row collection, or a row of the wrong shape
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Copy or export requested with nothing selected
    #[error("No data selected")]
    EmptySelection,

    /// Export requested while the filtered collection is empty
    #[error("No data to export")]
    NoData,

    #[error("row {0} not found")]
    RowNotFound(RowId),

    #[error("row index {index} out of bounds ({len} rows)")]
    IndexOutOfBounds { index: usize, len: usize },

    /// The external collaborator rejected or failed the operation
    #[error("Failed to {operation}: {reason}")]
    Backend { operation: String, reason: String },

    /// A newer request of the same kind superseded this one
    #[error("{0} request superseded")]
    Cancelled(String),

    /// The operation needs a capability the configured backend lacks
    #[error("backend does not support {0}")]
    Unsupported(String),

    #[error("table has been destroyed")]
    Destroyed,

    #[error("export failed: {0}")]
    Export(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl TableError {
    pub fn backend(operation: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        TableError::Backend {
            operation: operation.into(),
            reason: reason.to_string(),
        }
    }

    /// Cancelled requests are expected noise and never reach the user
    pub fn is_cancelled(&self) -> bool {
        matches!(self, TableError::Cancelled(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_message_carries_reason() {
        let err = TableError::backend("delete", "HTTP 500");
        assert_eq!(err.to_string(), "Failed to delete: HTTP 500");
        assert!(!err.is_cancelled());
        assert!(TableError::Cancelled("load".into()).is_cancelled());
    }
}
