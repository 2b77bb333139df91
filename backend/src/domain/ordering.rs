//! Ordering Model
//!
//! Columns are ordered within their board, tasks within their column.
//! `order` is scope-relative and dense (`0..n`) after every successful reorder.
//! Deleting a sibling leaves a gap; the next reorder of that scope closes it.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::entity::{parse_id, DomainError, DomainResult};

/// An entity that takes part in a sibling ordering
pub trait OrderedItem {
    fn item_id(&self) -> &str;
    fn order(&self) -> i32;
    fn set_order(&mut self, order: i32);
    fn created_at(&self) -> i64;
}

/// Which sibling ordering a reorder request targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeKind {
    /// Columns of a board
    Columns,
    /// Tasks of the columns of a board
    Tasks,
}

impl ScopeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeKind::Columns => "columns",
            ScopeKind::Tasks => "tasks",
        }
    }
}

/// One `{id, order, parentId}` tuple of an update set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    pub id: String,
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

/// Rendering order: ascending `order`, then creation time, then ID
pub fn compare<T: OrderedItem>(a: &T, b: &T) -> Ordering {
    a.order()
        .cmp(&b.order())
        .then(a.created_at().cmp(&b.created_at()))
        .then_with(|| a.item_id().cmp(b.item_id()))
}

/// Sort one scope's children into rendering order
pub fn sort_scope<T: OrderedItem>(items: &mut [T]) {
    items.sort_by(compare);
}

/// True when the orders are exactly `{0, 1, ..., n-1}`
pub fn is_dense<T: OrderedItem>(items: &[T]) -> bool {
    let mut orders: Vec<i32> = items.iter().map(|i| i.order()).collect();
    orders.sort_unstable();
    orders.iter().enumerate().all(|(idx, order)| *order as usize == idx && *order >= 0)
}

/// Order for an item appended to the scope
pub fn next_order<T: OrderedItem>(items: &[T]) -> i32 {
    items.iter().map(|i| i.order()).max().map(|max| max + 1).unwrap_or(0)
}

/// Sort then reassign `order = index`
///
/// Returns the indices (into the sorted slice) whose order changed.
pub fn repack<T: OrderedItem>(items: &mut [T]) -> Vec<usize> {
    sort_scope(items);
    let mut changed = Vec::new();
    for (idx, item) in items.iter_mut().enumerate() {
        if item.order() != idx as i32 {
            item.set_order(idx as i32);
            changed.push(idx);
        }
    }
    changed
}

/// Structural checks on an update set, done before touching the store
///
/// Checks that can only be answered by the store (existence, the current
/// parent of a task without an explicit `parentId`) happen inside the
/// apply transaction.
pub fn validate_update_set(kind: ScopeKind, board_id: &str, updates: &[OrderUpdate]) -> DomainResult<Vec<OrderUpdate>> {
    let board_id = parse_id(board_id, "board")?;
    let mut seen_ids = HashSet::new();
    let mut seen_orders: HashMap<String, HashSet<i64>> = HashMap::new();
    let mut normalized = Vec::with_capacity(updates.len());

    for update in updates {
        let id = parse_id(&update.id, "item")?;
        if !seen_ids.insert(id.clone()) {
            return Err(DomainError::Validation(format!("Duplicate item {} in update set", id)));
        }

        if update.order < 0 || update.order > i32::MAX as i64 {
            return Err(DomainError::Validation(format!(
                "Order {} for item {} is out of range",
                update.order, id
            )));
        }

        let parent_id = update
            .parent_id
            .as_deref()
            .map(|p| parent_for(kind, p))
            .transpose()?;

        if kind == ScopeKind::Columns {
            if let Some(parent) = &parent_id {
                if *parent != board_id {
                    return Err(DomainError::Validation(format!(
                        "Column {} cannot move to board {}",
                        id, parent
                    )));
                }
            }
        }

        // Tasks without an explicit parent are checked once their column is known
        let scope = match (kind, &parent_id) {
            (ScopeKind::Columns, _) => Some(board_id.clone()),
            (ScopeKind::Tasks, Some(parent)) => Some(parent.clone()),
            (ScopeKind::Tasks, None) => None,
        };
        if let Some(scope) = scope {
            if !seen_orders.entry(scope.clone()).or_default().insert(update.order) {
                return Err(DomainError::Validation(format!(
                    "Duplicate order {} in scope {}",
                    update.order, scope
                )));
            }
        }

        normalized.push(OrderUpdate {
            id,
            order: update.order,
            parent_id,
        });
    }

    Ok(normalized)
}

fn parent_for(kind: ScopeKind, raw: &str) -> DomainResult<String> {
    match kind {
        ScopeKind::Columns => parse_id(raw, "board"),
        ScopeKind::Tasks => parse_id(raw, "column"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::new_id;

    #[derive(Debug, Clone)]
    struct Item {
        id: String,
        order: i32,
        created_at: i64,
    }

    impl OrderedItem for Item {
        fn item_id(&self) -> &str {
            &self.id
        }
        fn order(&self) -> i32 {
            self.order
        }
        fn set_order(&mut self, order: i32) {
            self.order = order;
        }
        fn created_at(&self) -> i64 {
            self.created_at
        }
    }

    fn item(id: &str, order: i32, created_at: i64) -> Item {
        Item {
            id: id.to_string(),
            order,
            created_at,
        }
    }

    fn update(id: &str, order: i64, parent_id: Option<&str>) -> OrderUpdate {
        OrderUpdate {
            id: id.to_string(),
            order,
            parent_id: parent_id.map(str::to_string),
        }
    }

    #[test]
    fn test_sort_breaks_ties_by_creation_then_id() {
        let mut items = vec![item("b", 1, 5), item("a", 1, 5), item("c", 1, 2), item("d", 0, 9)];
        sort_scope(&mut items);
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["d", "c", "a", "b"]);
    }

    #[test]
    fn test_is_dense() {
        assert!(is_dense::<Item>(&[]));
        assert!(is_dense(&[item("a", 1, 0), item("b", 0, 0)]));
        assert!(!is_dense(&[item("a", 0, 0), item("b", 2, 0)]));
        assert!(!is_dense(&[item("a", 0, 0), item("b", 0, 0)]));
    }

    #[test]
    fn test_next_order_appends_after_gap() {
        assert_eq!(next_order::<Item>(&[]), 0);
        assert_eq!(next_order(&[item("a", 0, 0), item("b", 3, 0)]), 4);
    }

    #[test]
    fn test_repack_closes_gaps() {
        let mut items = vec![item("a", 4, 0), item("b", 0, 0), item("c", 2, 0)];
        let changed = repack(&mut items);
        assert_eq!(changed, vec![1, 2]);
        assert!(is_dense(&items));
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_validate_accepts_cross_scope_task_set() {
        let board = new_id();
        let (c1, c2) = (new_id(), new_id());
        let (t1, t2, t4) = (new_id(), new_id(), new_id());
        let updates = vec![
            update(&t2, 0, Some(&c1)),
            update(&t4, 0, Some(&c2)),
            update(&t1, 1, Some(&c2)),
        ];
        let normalized = validate_update_set(ScopeKind::Tasks, &board, &updates).unwrap();
        assert_eq!(normalized.len(), 3);
    }

    #[test]
    fn test_validate_rejects_duplicate_order_in_scope() {
        let board = new_id();
        let updates = vec![update(&new_id(), 0, None), update(&new_id(), 0, None)];
        let err = validate_update_set(ScopeKind::Columns, &board, &updates).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn test_validate_rejects_negative_order_and_duplicate_ids() {
        let board = new_id();
        let id = new_id();
        let err = validate_update_set(ScopeKind::Columns, &board, &[update(&id, -1, None)]).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = validate_update_set(ScopeKind::Columns, &board, &[update(&id, 0, None), update(&id, 1, None)])
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn test_validate_rejects_column_moving_to_other_board() {
        let board = new_id();
        let other = new_id();
        let err = validate_update_set(ScopeKind::Columns, &board, &[update(&new_id(), 0, Some(&other))])
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn test_update_wire_format() {
        let json = serde_json::json!({ "id": "x", "order": 2, "parentId": "p" });
        let parsed: OrderUpdate = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.parent_id.as_deref(), Some("p"));

        let no_parent = serde_json::to_value(update("x", 1, None)).unwrap();
        assert!(no_parent.get("parentId").is_none());
    }
}
