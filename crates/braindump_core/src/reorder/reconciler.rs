//! Optimistic reconciler binding reorder math to a record store.
//!
//! # Invariants
//! - The in-memory sequence is replaced before the store is called, and is
//!   left as-is when the store fails. Callers surface the error; the visible
//!   order may drift from the store until the next `load`.
//! - Every commit writes the ordinals of all items of the scope, not just
//!   the moved one, and nothing else: content edited elsewhere survives.
//! - Items the store no longer has are dropped from the sequence on commit,
//!   never re-created.
//! - No session means no mutation and no store call.

use super::drag::{DragGesture, DragState};
use super::{move_adjacent, move_to_index, normalize_ordinals, sort_by_ordinal};
use super::{InvalidMove, MoveDirection};
use super::{Ordered, ReorderOutcome};
use crate::model::UserId;
use crate::repo::{RecordStore, StoreError};
use crate::session::Session;
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Errors surfaced to the caller of a reconciler operation.
#[derive(Debug)]
pub enum ReconcileError {
    /// A mutating operation ran without a signed-in session.
    AuthRequired,
    /// The store rejected the write; in-memory order was kept.
    Store(StoreError),
}

impl Display for ReconcileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthRequired => write!(f, "sign-in required"),
            Self::Store(err) => write!(f, "failed to save order: {err}"),
        }
    }
}

impl Error for ReconcileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::AuthRequired => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for ReconcileError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// What a move request did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveResult {
    /// Order changed and every ordinal was written to the store.
    Committed,
    /// Nothing to do; the store was not called.
    Unchanged,
    /// Request ignored; the store was not called.
    Rejected(InvalidMove),
}

/// Client-side owner of one ordered scope (a list's tasks, a user's tags).
pub struct OrderedListReconciler<T, S>
where
    T: Ordered,
    S: RecordStore<T>,
{
    store: S,
    scope: S::Scope,
    items: Vec<T>,
    gesture: DragGesture,
}

impl<T, S> OrderedListReconciler<T, S>
where
    T: Ordered,
    S: RecordStore<T>,
{
    /// Creates an empty reconciler; call [`Self::load`] to fill it.
    pub fn new(store: S, scope: S::Scope) -> Self {
        Self::with_items(store, scope, Vec::new())
    }

    /// Creates a reconciler over already-fetched items, sorted by ordinal.
    pub fn with_items(store: S, scope: S::Scope, mut items: Vec<T>) -> Self {
        sort_by_ordinal(&mut items);
        Self {
            store,
            scope,
            items,
            gesture: DragGesture::new(),
        }
    }

    /// Replaces the in-memory sequence with the store's view of the scope.
    pub fn load(&mut self, session: Option<&Session>) -> Result<&[T], ReconcileError> {
        let owner = require_owner(session)?;
        let mut items = self.store.list(owner, &self.scope)?;
        sort_by_ordinal(&mut items);
        debug!(
            "event=reorder_load module=reorder status=ok count={}",
            items.len()
        );
        self.items = items;
        Ok(self.items.as_slice())
    }

    /// Current display order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn scope(&self) -> &S::Scope {
        &self.scope
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Moves one item a single step and persists the new order.
    pub fn move_adjacent(
        &mut self,
        session: Option<&Session>,
        item_id: T::Id,
        direction: MoveDirection,
    ) -> Result<MoveResult, ReconcileError> {
        require_owner(session)?;
        let items = std::mem::take(&mut self.items);
        self.apply(session, move_adjacent(items, item_id, direction))
    }

    /// Moves the item at `source_index` into drop gap `target_index` and
    /// persists the new order.
    pub fn move_to_index(
        &mut self,
        session: Option<&Session>,
        source_index: usize,
        target_index: usize,
    ) -> Result<MoveResult, ReconcileError> {
        require_owner(session)?;
        let items = std::mem::take(&mut self.items);
        self.apply(session, move_to_index(items, source_index, target_index))
    }

    /// Installs `new_items` as the visible order, then writes every item's
    /// position as its ordinal.
    ///
    /// # Errors
    /// - `AuthRequired` before anything changes.
    /// - `Store` after the optimistic update; it is not rolled back.
    pub fn commit(
        &mut self,
        session: Option<&Session>,
        new_items: Vec<T>,
    ) -> Result<(), ReconcileError> {
        let owner = require_owner(session)?;
        self.items = new_items;
        normalize_ordinals(&mut self.items);

        let started_at = Instant::now();
        let ids: Vec<T::Id> = self.items.iter().map(|item| item.id()).collect();
        match self.store.write_order(owner, &self.scope, &ids) {
            Ok(written) => {
                let skipped = ids.len().saturating_sub(written.len());
                if skipped > 0 {
                    self.items.retain(|item| written.contains(&item.id()));
                    normalize_ordinals(&mut self.items);
                    warn!("event=reorder_commit module=reorder status=pruned skipped={skipped}");
                }
                info!(
                    "event=reorder_commit module=reorder status=ok count={} duration_ms={}",
                    written.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=reorder_commit module=reorder status=error count={} duration_ms={} error={}",
                    self.items.len(),
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err.into())
            }
        }
    }

    pub fn drag_state(&self) -> DragState {
        self.gesture.state()
    }

    /// Pointer pressed on the item at `source_index`.
    pub fn begin_drag(&mut self, source_index: usize) {
        self.gesture.begin(source_index);
    }

    /// Pointer moved over drop gap `candidate_index`; `true` if it changed.
    pub fn hover_drag(&mut self, candidate_index: usize) -> bool {
        self.gesture.hover(candidate_index)
    }

    /// Pointer released. Applies the hovered drop, if any.
    ///
    /// The gesture always returns to idle, even when the move fails.
    pub fn drop_drag(&mut self, session: Option<&Session>) -> Result<MoveResult, ReconcileError> {
        match self.gesture.release() {
            Some(intent) => self.move_to_index(session, intent.source_index, intent.target_index),
            None => Ok(MoveResult::Unchanged),
        }
    }

    /// Drag left the list without a drop.
    pub fn cancel_drag(&mut self) {
        self.gesture.cancel();
    }

    /// Appends an item the store has just created.
    pub fn push_created(&mut self, item: T) {
        self.items.push(item);
    }

    /// Drops a deleted item. Remaining ordinals are compacted by the next
    /// move, not here.
    pub fn forget(&mut self, item_id: T::Id) -> Option<T> {
        let index = self.items.iter().position(|item| item.id() == item_id)?;
        Some(self.items.remove(index))
    }

    fn apply(
        &mut self,
        session: Option<&Session>,
        outcome: ReorderOutcome<T>,
    ) -> Result<MoveResult, ReconcileError> {
        match outcome {
            ReorderOutcome::Moved(items) => {
                self.commit(session, items)?;
                Ok(MoveResult::Committed)
            }
            ReorderOutcome::Unchanged(items) => {
                self.items = items;
                Ok(MoveResult::Unchanged)
            }
            ReorderOutcome::Rejected { items, reason } => {
                warn!("event=reorder_move module=reorder status=rejected reason=\"{reason}\"");
                self.items = items;
                Ok(MoveResult::Rejected(reason))
            }
        }
    }
}

fn require_owner(session: Option<&Session>) -> Result<UserId, ReconcileError> {
    session
        .map(|session| session.user_id)
        .ok_or(ReconcileError::AuthRequired)
}
