//! Ordered-list reconciliation.
//!
//! # Responsibility
//! - Compute new orderings for move-by-one and drag-to-index requests.
//! - Rewrite ordinals so they match positions after every move.
//! - Drive optimistic persistence through [`OrderedListReconciler`].
//!
//! # Invariants
//! - After a successful move, ordinals are exactly `0..n` in sequence order.
//! - A move that resolves to the item's own position hands back the input
//!   vector untouched and causes no store write.
//! - Invalid indices or unknown ids are rejected as values, never panics.
//!
//! # Drop rule
//! `target_index` in [`move_to_index`] is a gap position in `0..=len`: gap
//! `k` sits immediately before the item currently at index `k`, and gap
//! `len` is the end of the list. The moved item always lands in that gap, so
//! after removal it is inserted at `target_index - 1` when moving forward and
//! at `target_index` otherwise.

mod drag;
mod reconciler;

pub use drag::{DragGesture, DragState, DropIntent};
pub use reconciler::{MoveResult, OrderedListReconciler, ReconcileError};

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Record with a stable id and a display ordinal.
pub trait Ordered: Clone {
    type Id: Copy + Eq + Display;

    fn id(&self) -> Self::Id;
    fn ordinal(&self) -> i64;
    fn set_ordinal(&mut self, ordinal: i64);
}

/// Direction of a single-step move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// Reason a move request was ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidMove {
    /// No item with this id is in the sequence.
    UnknownItem(String),
    SourceOutOfRange { index: usize, len: usize },
    TargetOutOfRange { index: usize, len: usize },
}

impl Display for InvalidMove {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownItem(id) => write!(f, "item not in list: {id}"),
            Self::SourceOutOfRange { index, len } => {
                write!(f, "source index {index} out of range for {len} items")
            }
            Self::TargetOutOfRange { index, len } => {
                write!(f, "drop index {index} out of range 0..={len}")
            }
        }
    }
}

impl Error for InvalidMove {}

/// Result of a reorder computation. Every variant owns the sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderOutcome<T> {
    /// Order changed; ordinals were rewritten to `0..n`.
    Moved(Vec<T>),
    /// Valid request that resolves to the current order; input returned as-is.
    Unchanged(Vec<T>),
    /// Invalid request; input returned as-is.
    Rejected { items: Vec<T>, reason: InvalidMove },
}

impl<T> ReorderOutcome<T> {
    pub fn is_moved(&self) -> bool {
        matches!(self, Self::Moved(_))
    }

    pub fn items(&self) -> &[T] {
        match self {
            Self::Moved(items) | Self::Unchanged(items) => items,
            Self::Rejected { items, .. } => items,
        }
    }

    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Moved(items) | Self::Unchanged(items) => items,
            Self::Rejected { items, .. } => items,
        }
    }

    pub fn rejection(&self) -> Option<&InvalidMove> {
        match self {
            Self::Rejected { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// Swaps `item_id` with its neighbor in `direction`.
///
/// Moving the first item up or the last item down is a no-op.
pub fn move_adjacent<T: Ordered>(
    mut items: Vec<T>,
    item_id: T::Id,
    direction: MoveDirection,
) -> ReorderOutcome<T> {
    let Some(index) = items.iter().position(|item| item.id() == item_id) else {
        return ReorderOutcome::Rejected {
            items,
            reason: InvalidMove::UnknownItem(item_id.to_string()),
        };
    };

    let neighbor = match direction {
        MoveDirection::Up if index == 0 => return ReorderOutcome::Unchanged(items),
        MoveDirection::Up => index - 1,
        MoveDirection::Down if index + 1 == items.len() => {
            return ReorderOutcome::Unchanged(items)
        }
        MoveDirection::Down => index + 1,
    };

    items.swap(index, neighbor);
    normalize_ordinals(&mut items);
    ReorderOutcome::Moved(items)
}

/// Moves the item at `source_index` into drop gap `target_index`.
///
/// See the module docs for the drop rule.
pub fn move_to_index<T: Ordered>(
    mut items: Vec<T>,
    source_index: usize,
    target_index: usize,
) -> ReorderOutcome<T> {
    let len = items.len();
    if source_index >= len {
        return ReorderOutcome::Rejected {
            items,
            reason: InvalidMove::SourceOutOfRange {
                index: source_index,
                len,
            },
        };
    }
    if target_index > len {
        return ReorderOutcome::Rejected {
            items,
            reason: InvalidMove::TargetOutOfRange {
                index: target_index,
                len,
            },
        };
    }

    let insert_at = drop_insert_index(source_index, target_index, len);
    if insert_at == source_index {
        return ReorderOutcome::Unchanged(items);
    }

    let moved = items.remove(source_index);
    items.insert(insert_at, moved);
    normalize_ordinals(&mut items);
    ReorderOutcome::Moved(items)
}

/// Index the moved item occupies once it is dropped into gap `target_index`.
///
/// Clamped to `0..len` so a drop past the end makes the item last.
pub fn drop_insert_index(source_index: usize, target_index: usize, len: usize) -> usize {
    let insert_at = if target_index > source_index {
        target_index - 1
    } else {
        target_index
    };
    insert_at.min(len.saturating_sub(1))
}

/// Rewrites every ordinal to the item's position.
pub fn normalize_ordinals<T: Ordered>(items: &mut [T]) {
    for (index, item) in items.iter_mut().enumerate() {
        item.set_ordinal(index as i64);
    }
}

/// Sorts ascending by ordinal; equal ordinals keep their relative order.
pub fn sort_by_ordinal<T: Ordered>(items: &mut [T]) {
    items.sort_by_key(|item| item.ordinal());
}

/// Returns whether ordinals are exactly `0..n` in sequence order.
pub fn ordinals_are_dense<T: Ordered>(items: &[T]) -> bool {
    items
        .iter()
        .enumerate()
        .all(|(index, item)| item.ordinal() == index as i64)
}
