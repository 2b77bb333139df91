//! Reorder Reconciliation
//!
//! Drives one gesture through `Idle -> OptimisticallyApplied -> {Confirmed |
//! RolledBack} -> Idle`. The optimistic mutation happens before the backend is
//! asked; a refusal, transport error or timeout puts the pre-gesture snapshot back.

use std::time::Duration;

use crate::commands::{fetch_board, submit_reorder, BoardBackend};
use crate::error::ClientError;
use crate::models::{OrderUpdate, ReorderRequest, ScopeKind};
use crate::reorder::{apply_column_move, apply_task_move, AppliedMove, MoveGesture};
use crate::store::{BoardStore, Restored};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    /// Upper bound on a single backend call
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Where the session stands between gestures
///
/// The terminal states of a gesture are not held here; `settle` reports them
/// as a [`ReorderOutcome`] and the session is `Idle` again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderPhase {
    Idle,
    /// Local state already shows the move; the backend has not answered
    OptimisticallyApplied,
}

/// What became of a gesture
#[derive(Debug, Clone, PartialEq)]
pub enum ReorderOutcome {
    /// Nothing moved; the backend was not called
    NoOp,
    Confirmed { updates: Vec<OrderUpdate> },
    RolledBack { error: ClientError, restored: Restored },
}

/// Reconciliation state for one board
///
/// At most one gesture is pending. A settled session accepts the next gesture.
#[derive(Debug)]
pub struct ReorderSession {
    phase: ReorderPhase,
    pending: Option<AppliedMove>,
}

impl ReorderSession {
    pub fn new() -> Self {
        Self {
            phase: ReorderPhase::Idle,
            pending: None,
        }
    }

    pub fn phase(&self) -> ReorderPhase {
        self.phase
    }

    /// Apply the gesture to `store` and return the request to send, or `None` for a no-op
    pub fn begin(
        &mut self,
        store: &mut BoardStore,
        kind: ScopeKind,
        gesture: &MoveGesture,
    ) -> Result<Option<ReorderRequest>, ClientError> {
        if self.phase == ReorderPhase::OptimisticallyApplied {
            return Err(ClientError::Busy);
        }

        let applied = match kind {
            ScopeKind::Columns => apply_column_move(store, gesture)?,
            ScopeKind::Tasks => apply_task_move(store, gesture)?,
        };
        let Some(applied) = applied else {
            self.phase = ReorderPhase::Idle;
            return Ok(None);
        };

        let request = ReorderRequest {
            root_aggregate_id: store.board_id().to_string(),
            updates: applied.updates.clone(),
        };
        self.pending = Some(applied);
        self.phase = ReorderPhase::OptimisticallyApplied;
        Ok(Some(request))
    }

    /// Record the backend's verdict for the pending gesture
    ///
    /// A rollback only restores the snapshot if nothing else changed the store
    /// since the gesture; otherwise the store is flagged for refresh.
    pub fn settle(&mut self, store: &mut BoardStore, result: Result<(), ClientError>) -> ReorderOutcome {
        let Some(applied) = self.pending.take() else {
            return ReorderOutcome::NoOp;
        };

        self.phase = ReorderPhase::Idle;
        match result {
            Ok(()) => {
                log::debug!("Reorder of {} confirmed ({} updates)", applied.kind.as_str(), applied.updates.len());
                ReorderOutcome::Confirmed {
                    updates: applied.updates,
                }
            }
            Err(error) => {
                let restored = store.roll_back(applied.snapshot, applied.version);
                log::warn!("Reorder of {} rolled back ({:?}): {}", applied.kind.as_str(), restored, error);
                ReorderOutcome::RolledBack { error, restored }
            }
        }
    }
}

impl Default for ReorderSession {
    fn default() -> Self {
        Self::new()
    }
}

/// A board's local state bound to a backend
///
/// Gestures take `&mut self` for their whole round trip, so they never overlap.
pub struct BoardClient<B> {
    backend: B,
    store: BoardStore,
    session: ReorderSession,
    config: ClientConfig,
}

impl<B: BoardBackend> BoardClient<B> {
    pub fn new(backend: B, store: BoardStore, config: ClientConfig) -> Self {
        Self {
            backend,
            store,
            session: ReorderSession::new(),
            config,
        }
    }

    /// Load a board from the backend
    pub async fn open(backend: B, board_id: &str, config: ClientConfig) -> Result<Self, ClientError> {
        let detail = fetch_board(&backend, board_id, config.request_timeout).await?;
        Ok(Self::new(backend, BoardStore::from_detail(detail), config))
    }

    pub fn store(&self) -> &BoardStore {
        &self.store
    }

    /// For applying results of CRUD commands
    pub fn store_mut(&mut self) -> &mut BoardStore {
        &mut self.store
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn phase(&self) -> ReorderPhase {
        self.session.phase()
    }

    /// Replace local state with the backend's
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let board_id = self.store.board_id().to_string();
        let detail = fetch_board(&self.backend, &board_id, self.config.request_timeout).await?;
        self.store.replace(detail);
        Ok(())
    }

    /// Only a gesture that does not match the local state is an `Err`;
    /// backend failures come back as [`ReorderOutcome::RolledBack`]
    pub async fn move_column(&mut self, gesture: &MoveGesture) -> Result<ReorderOutcome, ClientError> {
        self.reorder(ScopeKind::Columns, gesture).await
    }

    /// See [`BoardClient::move_column`]
    pub async fn move_task(&mut self, gesture: &MoveGesture) -> Result<ReorderOutcome, ClientError> {
        self.reorder(ScopeKind::Tasks, gesture).await
    }

    async fn reorder(&mut self, kind: ScopeKind, gesture: &MoveGesture) -> Result<ReorderOutcome, ClientError> {
        let Some(request) = self.session.begin(&mut self.store, kind, gesture)? else {
            return Ok(ReorderOutcome::NoOp);
        };
        let result = submit_reorder(&self.backend, kind, &request, self.config.request_timeout).await;
        Ok(self.session.settle(&mut self.store, result))
    }
}
