//! External row collaborator
//!
//! A table may be backed by nothing (all mutations stay in memory), by a
//! source that can only load rows, or by a full CRUD backend. The capability
//! is fixed when the table is built.

pub mod http;
pub mod request;

use anyhow::Result;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::data::record::Record;

pub use request::{
    Operation, OperationResult, PendingRequest, RequestKey, RequestOutcome, RequestTracker,
    Ticket,
};

/// Something that can load the full row collection
#[async_trait]
pub trait RowSource: Send + Sync {
    async fn load(&self) -> Result<Vec<Record>>;
}

/// A source that can also create, update and delete rows.
/// Rows are addressed by their natural key.
#[async_trait]
pub trait RowBackend: RowSource {
    /// Create a row, returning the stored version (which may carry a new id)
    async fn create(&self, record: &Record) -> Result<Record>;

    async fn update(&self, key: &str, record: &Record) -> Result<Record>;

    async fn delete(&self, key: &str) -> Result<()>;
}

/// Capability set of the collaborator
#[derive(Clone, Default)]
pub enum Backend {
    /// No collaborator: every mutation is applied in memory
    #[default]
    Local,
    /// Rows are loaded remotely, mutations stay in memory
    LoadOnly(Arc<dyn RowSource>),
    /// Loads and mutations go through the collaborator
    Crud(Arc<dyn RowBackend>),
}

impl Backend {
    pub fn load_only(source: impl RowSource + 'static) -> Self {
        Backend::LoadOnly(Arc::new(source))
    }

    pub fn crud(backend: impl RowBackend + 'static) -> Self {
        Backend::Crud(Arc::new(backend))
    }

    pub fn can_load(&self) -> bool {
        !matches!(self, Backend::Local)
    }

    pub fn can_mutate(&self) -> bool {
        matches!(self, Backend::Crud(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Backend::Local => "local",
            Backend::LoadOnly(_) => "load-only",
            Backend::Crud(_) => "crud",
        }
    }
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Backend::{}", self.name())
    }
}
