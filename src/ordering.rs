//! Ordering Utilities
//!
//! Sibling ordering of the local copy: columns within the board, tasks within a column.

use std::cmp::Ordering;

use crate::models::{ColumnDetail, TaskDetail};

/// An entry of an ordered scope
pub trait Ordered {
    fn id(&self) -> &str;
    fn order(&self) -> i32;
    fn set_order(&mut self, order: i32);
    fn created_at(&self) -> i64;
}

impl Ordered for ColumnDetail {
    fn id(&self) -> &str {
        &self.column.id
    }
    fn order(&self) -> i32 {
        self.column.order
    }
    fn set_order(&mut self, order: i32) {
        self.column.order = order;
    }
    fn created_at(&self) -> i64 {
        self.column.created_at
    }
}

impl Ordered for TaskDetail {
    fn id(&self) -> &str {
        &self.task.id
    }
    fn order(&self) -> i32 {
        self.task.order
    }
    fn set_order(&mut self, order: i32) {
        self.task.order = order;
    }
    fn created_at(&self) -> i64 {
        self.task.created_at
    }
}

/// Rendering order: `order`, then creation time, then ID
pub fn compare<T: Ordered>(a: &T, b: &T) -> Ordering {
    a.order()
        .cmp(&b.order())
        .then_with(|| a.created_at().cmp(&b.created_at()))
        .then_with(|| a.id().cmp(b.id()))
}

pub fn sort_scope<T: Ordered>(items: &mut [T]) {
    items.sort_by(compare);
}

/// Orders are exactly `0..n` in slice order
pub fn is_dense<T: Ordered>(items: &[T]) -> bool {
    items.iter().enumerate().all(|(i, item)| item.order() == i as i32)
}

/// Set `order` to the positional index; returns how many entries changed
pub fn repack<T: Ordered>(items: &mut [T]) -> usize {
    let mut changed = 0;
    for (i, item) in items.iter_mut().enumerate() {
        if item.order() != i as i32 {
            item.set_order(i as i32);
            changed += 1;
        }
    }
    changed
}
