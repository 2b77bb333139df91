//! Reorder Reconciliation Endpoints
//!
//! Persist the update set a client derived from an optimistic move.
//! A request is checked in a fixed sequence: principal, structure of the
//! update set, board ownership, then the atomic apply. Nothing is written
//! unless every step passes.

use serde::{Deserialize, Serialize};

use super::guard::{authorize_board, require_principal};
use crate::domain::{parse_id, validate_update_set, DomainError, DomainResult, FailureReason, OrderUpdate, ScopeKind};
use crate::repository::{ColumnPositioningOperations, TaskPositioningOperations};
use crate::AppState;

/// Body of `update_column_order` / `update_task_order`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    /// Board the update set claims to belong to
    pub root_aggregate_id: String,
    pub updates: Vec<OrderUpdate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<FailureReason>,
}

impl ReorderResponse {
    pub fn success() -> Self {
        Self { ok: true, reason: None }
    }

    pub fn failure(reason: FailureReason) -> Self {
        Self {
            ok: false,
            reason: Some(reason),
        }
    }
}

/// Reorder the columns of a board
pub async fn update_column_order(state: &AppState, principal: Option<&str>, request: ReorderRequest) -> ReorderResponse {
    respond(ScopeKind::Columns, reconcile(state, principal, ScopeKind::Columns, &request).await)
}

/// Reorder tasks within and across the columns of a board
pub async fn update_task_order(state: &AppState, principal: Option<&str>, request: ReorderRequest) -> ReorderResponse {
    respond(ScopeKind::Tasks, reconcile(state, principal, ScopeKind::Tasks, &request).await)
}

/// Entry point for raw JSON bodies; a body that does not parse is a validation failure
pub async fn handle_reorder_json(
    state: &AppState,
    principal: Option<&str>,
    kind: ScopeKind,
    body: serde_json::Value,
) -> ReorderResponse {
    let request: ReorderRequest = match serde_json::from_value(body) {
        Ok(request) => request,
        Err(e) => {
            let err = DomainError::Validation(format!("Malformed reorder request: {}", e));
            return respond(kind, Err(err));
        }
    };

    match kind {
        ScopeKind::Columns => update_column_order(state, principal, request).await,
        ScopeKind::Tasks => update_task_order(state, principal, request).await,
    }
}

async fn reconcile(
    state: &AppState,
    principal: Option<&str>,
    kind: ScopeKind,
    request: &ReorderRequest,
) -> DomainResult<usize> {
    let user_id = require_principal(principal)?;
    let updates = validate_update_set(kind, &request.root_aggregate_id, &request.updates)?;
    let board_id = parse_id(&request.root_aggregate_id, "board")?;
    authorize_board(&state.boards, user_id, &board_id).await?;

    if updates.is_empty() {
        return Ok(0);
    }

    match kind {
        ScopeKind::Columns => state.columns.apply_column_order(&board_id, &updates).await?,
        ScopeKind::Tasks => {
            let touched = state.tasks.apply_task_order(&board_id, &updates).await?;
            log::debug!("Task reorder on board {} touched {} columns", board_id, touched.len());
        }
    }

    state.events.board_changed(&board_id);
    Ok(updates.len())
}

fn respond(kind: ScopeKind, outcome: DomainResult<usize>) -> ReorderResponse {
    match outcome {
        Ok(count) => {
            log::info!("Reordered {} {}", count, kind.as_str());
            ReorderResponse::success()
        }
        Err(e) => {
            let reason = e.reason();
            if reason == FailureReason::Internal {
                log::error!("Reorder of {} failed: {}", kind.as_str(), e);
            } else {
                log::warn!("Reorder of {} rejected: {}", kind.as_str(), e);
            }
            ReorderResponse::failure(reason)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{state, task_titles, INTRUDER, OWNER};
    use crate::commands::{create_board, create_column, create_task, get_board};
    use crate::domain::{is_dense, new_id, Board, Column, Task};
    use crate::events::BoardEvent;
    use serde_json::json;

    struct Fixture {
        state: AppState,
        board: Board,
        c1: Column,
        c2: Column,
        t1: Task,
        t2: Task,
        t4: Task,
    }

    async fn fixture() -> Fixture {
        let state = state().await;
        let board = create_board(&state, Some(OWNER), "Roadmap").await.unwrap();
        let c1 = create_column(&state, Some(OWNER), &board.id, "C1").await.unwrap();
        let c2 = create_column(&state, Some(OWNER), &board.id, "C2").await.unwrap();
        let t1 = create_task(&state, Some(OWNER), &board.id, &c1.id, "T1").await.unwrap();
        let t2 = create_task(&state, Some(OWNER), &board.id, &c1.id, "T2").await.unwrap();
        let t4 = create_task(&state, Some(OWNER), &board.id, &c2.id, "T4").await.unwrap();
        Fixture { state, board, c1, c2, t1, t2, t4 }
    }

    fn update(id: &str, order: i64, parent_id: Option<&str>) -> OrderUpdate {
        OrderUpdate {
            id: id.to_string(),
            order,
            parent_id: parent_id.map(str::to_string),
        }
    }

    fn cross_column_move(f: &Fixture) -> ReorderRequest {
        ReorderRequest {
            root_aggregate_id: f.board.id.clone(),
            updates: vec![
                update(&f.t2.id, 0, Some(&f.c1.id)),
                update(&f.t4.id, 0, Some(&f.c2.id)),
                update(&f.t1.id, 1, Some(&f.c2.id)),
            ],
        }
    }

    async fn layout(f: &Fixture) -> (Vec<(String, i32)>, Vec<(String, i32)>) {
        let detail = get_board(&f.state, Some(OWNER), &f.board.id).await.unwrap();
        (task_titles(&detail, "C1"), task_titles(&detail, "C2"))
    }

    #[tokio::test]
    async fn test_cross_column_move_persists() {
        let f = fixture().await;
        let mut events = f.state.events.subscribe();

        let response = update_task_order(&f.state, Some(OWNER), cross_column_move(&f)).await;
        assert_eq!(response, ReorderResponse::success());

        let (c1, c2) = layout(&f).await;
        assert_eq!(c1, vec![("T2".to_string(), 0)]);
        assert_eq!(c2, vec![("T4".to_string(), 0), ("T1".to_string(), 1)]);
        assert_eq!(
            events.recv().await.unwrap(),
            BoardEvent::BoardChanged { board_id: f.board.id.clone() }
        );
    }

    #[tokio::test]
    async fn test_resubmission_is_idempotent() {
        let f = fixture().await;
        assert!(update_task_order(&f.state, Some(OWNER), cross_column_move(&f)).await.ok);
        let first = layout(&f).await;

        assert!(update_task_order(&f.state, Some(OWNER), cross_column_move(&f)).await.ok);
        assert_eq!(layout(&f).await, first);
    }

    #[tokio::test]
    async fn test_intruder_is_rejected_without_writes() {
        let f = fixture().await;
        let before = layout(&f).await;

        let response = update_task_order(&f.state, Some(INTRUDER), cross_column_move(&f)).await;
        assert_eq!(response, ReorderResponse::failure(FailureReason::Unauthorized));

        let response = update_task_order(&f.state, None, cross_column_move(&f)).await;
        assert_eq!(response, ReorderResponse::failure(FailureReason::Unauthorized));

        assert_eq!(layout(&f).await, before);
    }

    #[tokio::test]
    async fn test_padded_owner_id_is_not_the_owner() {
        let f = fixture().await;
        let before = layout(&f).await;

        let padded = format!(" {}", OWNER);
        let response = update_task_order(&f.state, Some(padded.as_str()), cross_column_move(&f)).await;
        assert_eq!(response, ReorderResponse::failure(FailureReason::Unauthorized));
        assert_eq!(layout(&f).await, before);
    }

    #[tokio::test]
    async fn test_task_from_foreign_board_is_unauthorized() {
        let f = fixture().await;
        let theirs = create_board(&f.state, Some(INTRUDER), "Theirs").await.unwrap();
        let col = create_column(&f.state, Some(INTRUDER), &theirs.id, "Col").await.unwrap();
        let foreign = create_task(&f.state, Some(INTRUDER), &theirs.id, &col.id, "Foreign").await.unwrap();

        // Owner claims their own board but smuggles in a foreign task
        let request = ReorderRequest {
            root_aggregate_id: f.board.id.clone(),
            updates: vec![update(&foreign.id, 0, Some(&f.c1.id)), update(&f.t1.id, 1, Some(&f.c1.id))],
        };
        let response = update_task_order(&f.state, Some(OWNER), request).await;
        assert_eq!(response, ReorderResponse::failure(FailureReason::Unauthorized));

        let detail = get_board(&f.state, Some(INTRUDER), &theirs.id).await.unwrap();
        assert_eq!(task_titles(&detail, "Col"), vec![("Foreign".to_string(), 0)]);
    }

    #[tokio::test]
    async fn test_unknown_task_fails_whole_batch() {
        let f = fixture().await;
        let before = layout(&f).await;

        let mut request = cross_column_move(&f);
        request.updates.push(update(&new_id(), 2, Some(&f.c2.id)));
        let response = update_task_order(&f.state, Some(OWNER), request).await;

        assert_eq!(response, ReorderResponse::failure(FailureReason::NotFound));
        assert_eq!(layout(&f).await, before);
    }

    #[tokio::test]
    async fn test_malformed_sets_are_validation_failures() {
        let f = fixture().await;

        let duplicate_ids = ReorderRequest {
            root_aggregate_id: f.board.id.clone(),
            updates: vec![update(&f.t1.id, 0, None), update(&f.t1.id, 1, None)],
        };
        let response = update_task_order(&f.state, Some(OWNER), duplicate_ids).await;
        assert_eq!(response, ReorderResponse::failure(FailureReason::Validation));

        let negative = ReorderRequest {
            root_aggregate_id: f.board.id.clone(),
            updates: vec![update(&f.t1.id, -1, None)],
        };
        let response = update_task_order(&f.state, Some(OWNER), negative).await;
        assert_eq!(response, ReorderResponse::failure(FailureReason::Validation));

        let column_to_other_board = ReorderRequest {
            root_aggregate_id: f.board.id.clone(),
            updates: vec![update(&f.c1.id, 0, Some(&new_id()))],
        };
        let response = update_column_order(&f.state, Some(OWNER), column_to_other_board).await;
        assert_eq!(response, ReorderResponse::failure(FailureReason::Validation));
    }

    #[tokio::test]
    async fn test_raw_json_bodies() {
        let f = fixture().await;

        let body = json!({
            "rootAggregateId": f.board.id,
            "updates": [
                { "id": f.c2.id, "order": 0 },
                { "id": f.c1.id, "order": 1, "parentId": f.board.id }
            ]
        });
        let response = handle_reorder_json(&f.state, Some(OWNER), ScopeKind::Columns, body).await;
        assert_eq!(serde_json::to_value(response).unwrap(), json!({ "ok": true }));

        let detail = get_board(&f.state, Some(OWNER), &f.board.id).await.unwrap();
        let titles: Vec<&str> = detail.columns.iter().map(|c| c.column.title.as_str()).collect();
        assert_eq!(titles, vec!["C2", "C1"]);

        let fractional = json!({
            "rootAggregateId": f.board.id,
            "updates": [{ "id": f.t1.id, "order": 1.5 }]
        });
        let response = handle_reorder_json(&f.state, Some(OWNER), ScopeKind::Tasks, fractional).await;
        assert_eq!(
            serde_json::to_value(response).unwrap(),
            json!({ "ok": false, "reason": "validation" })
        );

        let missing_updates = json!({ "rootAggregateId": f.board.id });
        let response = handle_reorder_json(&f.state, Some(OWNER), ScopeKind::Tasks, missing_updates).await;
        assert_eq!(response.reason, Some(FailureReason::Validation));
    }

    #[tokio::test]
    async fn test_empty_update_set_succeeds() {
        let f = fixture().await;
        let request = ReorderRequest {
            root_aggregate_id: f.board.id.clone(),
            updates: Vec::new(),
        };
        assert!(update_task_order(&f.state, Some(OWNER), request.clone()).await.ok);
        // Ownership is still checked
        let response = update_task_order(&f.state, Some(INTRUDER), request).await;
        assert_eq!(response.reason, Some(FailureReason::Unauthorized));
    }

    #[tokio::test]
    async fn test_closed_store_is_internal() {
        let f = fixture().await;
        f.state.db_state.close().await;

        let response = update_task_order(&f.state, Some(OWNER), cross_column_move(&f)).await;
        assert_eq!(response, ReorderResponse::failure(FailureReason::Internal));
    }

    #[tokio::test]
    async fn test_repack_closes_gaps_left_by_deletion() {
        let f = fixture().await;
        let t3 = create_task(&f.state, Some(OWNER), &f.board.id, &f.c1.id, "T3").await.unwrap();
        crate::commands::delete_task(&f.state, Some(OWNER), &f.board.id, &f.t2.id)
            .await
            .unwrap();

        let request = ReorderRequest {
            root_aggregate_id: f.board.id.clone(),
            updates: vec![update(&t3.id, 0, Some(&f.c1.id)), update(&f.t1.id, 1, Some(&f.c1.id))],
        };
        assert!(update_task_order(&f.state, Some(OWNER), request).await.ok);

        let detail = get_board(&f.state, Some(OWNER), &f.board.id).await.unwrap();
        let tasks: Vec<Task> = detail.columns[0].tasks.iter().map(|t| t.task.clone()).collect();
        assert!(is_dense(&tasks));
        assert_eq!(task_titles(&detail, "C1"), vec![("T3".to_string(), 0), ("T1".to_string(), 1)]);
    }
}
