//! In-flight collaborator requests and their supersession

use std::collections::HashMap;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::api::Backend;
use crate::data::record::{Record, RowId};
use crate::error::TableError;

/// The logical operation a request performs. A newer request with the same
/// key supersedes (cancels) an older one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKey {
    Load,
    /// Each create is distinct, so creates never supersede each other
    Create(u64),
    Update(RowId),
    Delete(RowId),
}

/// Handle for one started request
#[derive(Debug, Clone)]
pub struct Ticket {
    pub key: RequestKey,
    generation: u64,
    token: CancellationToken,
}

impl Ticket {
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Tracks in-flight requests by logical operation
#[derive(Debug, Default)]
pub struct RequestTracker {
    in_flight: HashMap<RequestKey, (u64, CancellationToken)>,
    next_generation: u64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A key for a fresh create request
    pub fn create_key(&mut self) -> RequestKey {
        self.next_generation += 1;
        RequestKey::Create(self.next_generation)
    }

    /// Start a request, cancelling any earlier one with the same key
    pub fn begin(&mut self, key: RequestKey) -> Ticket {
        self.next_generation += 1;
        let generation = self.next_generation;
        let token = CancellationToken::new();
        if let Some((_, previous)) = self.in_flight.insert(key, (generation, token.clone())) {
            debug!(target: "crud", "Request {:?} superseded", key);
            previous.cancel();
        }
        Ticket {
            key,
            generation,
            token,
        }
    }

    /// Mark a request done. Returns false if a newer request with the same
    /// key has replaced it in the meantime.
    pub fn finish(&mut self, ticket: &Ticket) -> bool {
        match self.in_flight.get(&ticket.key) {
            Some((generation, _)) if *generation == ticket.generation => {
                self.in_flight.remove(&ticket.key);
                true
            }
            _ => false,
        }
    }

    pub fn cancel_all(&mut self) {
        for (key, (_, token)) in self.in_flight.drain() {
            debug!(target: "crud", "Cancelling request {:?}", key);
            token.cancel();
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}

/// What a request does
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Load,
    Create(Record),
    Update {
        id: RowId,
        key: String,
        record: Record,
    },
    Delete {
        id: RowId,
        key: String,
    },
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Load => "load",
            Operation::Create(_) => "create",
            Operation::Update { .. } => "update",
            Operation::Delete { .. } => "delete",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OperationResult {
    Loaded(Vec<Record>),
    Created(Record),
    Updated(Record),
    Deleted,
}

/// A request ready to run against the collaborator. Running it does not
/// borrow the table, so the host stays responsive while it is awaited.
#[derive(Debug)]
pub struct PendingRequest {
    pub ticket: Ticket,
    pub operation: Operation,
    backend: Backend,
}

/// Result of a finished (or cancelled) request, to be applied by the table
#[derive(Debug)]
pub struct RequestOutcome {
    pub ticket: Ticket,
    pub operation: Operation,
    pub result: Result<OperationResult, TableError>,
}

impl PendingRequest {
    pub(crate) fn new(ticket: Ticket, operation: Operation, backend: Backend) -> Self {
        Self {
            ticket,
            operation,
            backend,
        }
    }

    pub async fn run(self) -> RequestOutcome {
        let token = self.ticket.token.clone();
        let name = self.operation.name();
        let result = tokio::select! {
            biased;
            _ = token.cancelled() => Err(TableError::Cancelled(name.to_string())),
            result = execute(&self.backend, &self.operation) => result,
        };
        RequestOutcome {
            ticket: self.ticket,
            operation: self.operation,
            result,
        }
    }
}

async fn execute(backend: &Backend, operation: &Operation) -> Result<OperationResult, TableError> {
    let name = operation.name();
    match (backend, operation) {
        (Backend::LoadOnly(source), Operation::Load) => source
            .load()
            .await
            .map(OperationResult::Loaded)
            .map_err(|e| TableError::backend(name, format!("{:#}", e))),
        (Backend::Crud(api), Operation::Load) => api
            .load()
            .await
            .map(OperationResult::Loaded)
            .map_err(|e| TableError::backend(name, format!("{:#}", e))),
        (Backend::Crud(api), Operation::Create(record)) => api
            .create(record)
            .await
            .map(OperationResult::Created)
            .map_err(|e| TableError::backend(name, format!("{:#}", e))),
        (Backend::Crud(api), Operation::Update { key, record, .. }) => api
            .update(key, record)
            .await
            .map(OperationResult::Updated)
            .map_err(|e| TableError::backend(name, format!("{:#}", e))),
        (Backend::Crud(api), Operation::Delete { key, .. }) => api
            .delete(key)
            .await
            .map(|_| OperationResult::Deleted)
            .map_err(|e| TableError::backend(name, format!("{:#}", e))),
        _ => Err(TableError::Unsupported(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_request_supersedes_older() {
        let mut tracker = RequestTracker::new();
        let first = tracker.begin(RequestKey::Load);
        let second = tracker.begin(RequestKey::Load);
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert!(!tracker.finish(&first));
        assert!(tracker.finish(&second));
        assert_eq!(tracker.in_flight(), 0);
    }

    #[test]
    fn test_different_keys_do_not_interfere() {
        let mut tracker = RequestTracker::new();
        let a = tracker.create_key();
        let b = tracker.create_key();
        let first = tracker.begin(a);
        let second = tracker.begin(b);
        tracker.begin(RequestKey::Delete(RowId(1)));
        assert!(!first.is_cancelled());
        assert!(!second.is_cancelled());
        assert_eq!(tracker.in_flight(), 3);

        tracker.cancel_all();
        assert!(first.is_cancelled() && second.is_cancelled());
        assert_eq!(tracker.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_request_resolves_as_cancelled() {
        let mut tracker = RequestTracker::new();
        let ticket = tracker.begin(RequestKey::Load);
        tracker.cancel_all();
        let outcome = PendingRequest::new(ticket, Operation::Load, Backend::Local)
            .run()
            .await;
        assert_eq!(outcome.result, Err(TableError::Cancelled("load".into())));
    }

    #[tokio::test]
    async fn test_local_backend_is_unsupported() {
        let mut tracker = RequestTracker::new();
        let ticket = tracker.begin(RequestKey::Load);
        let outcome = PendingRequest::new(ticket, Operation::Load, Backend::Local)
            .run()
            .await;
        assert_eq!(outcome.result, Err(TableError::Unsupported("load".into())));
    }
}
