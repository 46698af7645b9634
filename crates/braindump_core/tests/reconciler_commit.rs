use braindump_core::reorder::ordinals_are_dense;
use braindump_core::{
    DragState, InvalidMove, ListId, MoveDirection, MoveResult, OrderedListReconciler,
    ReconcileError, RecordStore, Session, StoreError, StoreResult, Task, TaskId, UserId,
};
use std::cell::{Cell, RefCell};
use uuid::Uuid;

/// In-memory task store that counts ordinal writes and can be told to fail.
#[derive(Default)]
struct MemoryTaskStore {
    rows: RefCell<Vec<Task>>,
    write_calls: Cell<usize>,
    fail_writes: Cell<bool>,
}

impl MemoryTaskStore {
    fn seeded(tasks: &[Task]) -> Self {
        let store = Self::default();
        store.rows.replace(tasks.to_vec());
        store
    }

    fn stored_order(&self, list_id: ListId) -> Vec<String> {
        let mut rows: Vec<Task> = self
            .rows
            .borrow()
            .iter()
            .filter(|task| task.list_id == list_id)
            .cloned()
            .collect();
        rows.sort_by_key(|task| task.ordinal);
        rows.into_iter().map(|task| task.text).collect()
    }
}

impl RecordStore<Task> for MemoryTaskStore {
    type Scope = ListId;

    fn list(&self, owner: UserId, scope: &ListId) -> StoreResult<Vec<Task>> {
        Ok(self
            .rows
            .borrow()
            .iter()
            .filter(|task| task.user_id == owner && task.list_id == *scope)
            .cloned()
            .collect())
    }

    fn upsert_many(&self, owner: UserId, records: &[Task]) -> StoreResult<Vec<Task>> {
        let mut rows = self.rows.borrow_mut();
        for record in records {
            if record.user_id != owner {
                return Err(StoreError::NotOwned(record.id));
            }
            match rows.iter_mut().find(|row| row.id == record.id) {
                Some(row) => *row = record.clone(),
                None => rows.push(record.clone()),
            }
        }
        Ok(records.to_vec())
    }

    fn write_order(
        &self,
        owner: UserId,
        scope: &ListId,
        ids: &[TaskId],
    ) -> StoreResult<Vec<TaskId>> {
        self.write_calls.set(self.write_calls.get() + 1);
        if self.fail_writes.get() {
            return Err(StoreError::InvalidData("store offline".to_string()));
        }
        let mut rows = self.rows.borrow_mut();
        let mut written = Vec::new();
        for id in ids {
            let row = rows
                .iter_mut()
                .find(|row| row.id == *id && row.user_id == owner && row.list_id == *scope);
            if let Some(row) = row {
                row.ordinal = written.len() as i64;
                written.push(*id);
            }
        }
        Ok(written)
    }

    fn delete_by_id(&self, id: TaskId, owner: UserId) -> StoreResult<()> {
        let mut rows = self.rows.borrow_mut();
        let before = rows.len();
        rows.retain(|row| !(row.id == id && row.user_id == owner));
        if rows.len() == before {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}

struct Fixture {
    session: Session,
    list_id: ListId,
    tasks: Vec<Task>,
}

fn fixture(names: &[&str]) -> Fixture {
    let session = Session::new(Uuid::new_v4());
    let list_id = Uuid::new_v4();
    let tasks = names
        .iter()
        .enumerate()
        .map(|(index, name)| Task::new(session.user_id, list_id, *name, index as i64))
        .collect();
    Fixture {
        session,
        list_id,
        tasks,
    }
}

fn texts(items: &[Task]) -> Vec<&str> {
    items.iter().map(|task| task.text.as_str()).collect()
}

fn ordinals(items: &[Task]) -> Vec<i64> {
    items.iter().map(|task| task.ordinal).collect()
}

#[test]
fn move_adjacent_up_swaps_and_renumbers_then_persists() {
    let fx = fixture(&["a", "b", "c"]);
    let store = MemoryTaskStore::seeded(&fx.tasks);
    let mut reconciler = OrderedListReconciler::with_items(&store, fx.list_id, fx.tasks.clone());

    let result = reconciler
        .move_adjacent(Some(&fx.session), fx.tasks[1].id, MoveDirection::Up)
        .unwrap();

    assert_eq!(result, MoveResult::Committed);
    assert_eq!(texts(reconciler.items()), vec!["b", "a", "c"]);
    assert_eq!(ordinals(reconciler.items()), vec![0, 1, 2]);
    assert_eq!(store.write_calls.get(), 1);
    assert_eq!(store.stored_order(fx.list_id), vec!["b", "a", "c"]);
}

#[test]
fn moving_first_item_up_is_a_no_op_without_store_call() {
    let fx = fixture(&["a", "b", "c"]);
    let store = MemoryTaskStore::seeded(&fx.tasks);
    let mut reconciler = OrderedListReconciler::with_items(&store, fx.list_id, fx.tasks.clone());

    let result = reconciler
        .move_adjacent(Some(&fx.session), fx.tasks[0].id, MoveDirection::Up)
        .unwrap();

    assert_eq!(result, MoveResult::Unchanged);
    assert_eq!(reconciler.items(), fx.tasks.as_slice());
    assert_eq!(store.write_calls.get(), 0);
}

#[test]
fn drop_after_third_item_lands_before_fourth() {
    let fx = fixture(&["a", "b", "c", "d"]);
    let store = MemoryTaskStore::seeded(&fx.tasks);
    let mut reconciler = OrderedListReconciler::with_items(&store, fx.list_id, fx.tasks.clone());

    let result = reconciler.move_to_index(Some(&fx.session), 0, 3).unwrap();

    assert_eq!(result, MoveResult::Committed);
    assert_eq!(texts(reconciler.items()), vec!["b", "c", "a", "d"]);
    assert!(ordinals_are_dense(reconciler.items()));
    assert_eq!(store.stored_order(fx.list_id), vec!["b", "c", "a", "d"]);
}

#[test]
fn drop_onto_own_position_does_not_commit() {
    let fx = fixture(&["a", "b", "c", "d"]);
    let store = MemoryTaskStore::seeded(&fx.tasks);
    let mut reconciler = OrderedListReconciler::with_items(&store, fx.list_id, fx.tasks.clone());

    assert_eq!(
        reconciler.move_to_index(Some(&fx.session), 2, 2).unwrap(),
        MoveResult::Unchanged
    );
    assert_eq!(
        reconciler.move_to_index(Some(&fx.session), 2, 3).unwrap(),
        MoveResult::Unchanged
    );
    assert_eq!(store.write_calls.get(), 0);
    assert_eq!(texts(reconciler.items()), vec!["a", "b", "c", "d"]);
}

#[test]
fn store_failure_keeps_optimistic_order_and_surfaces_error() {
    let fx = fixture(&["a", "b", "c"]);
    let store = MemoryTaskStore::seeded(&fx.tasks);
    store.fail_writes.set(true);
    let mut reconciler = OrderedListReconciler::with_items(&store, fx.list_id, fx.tasks.clone());

    let err = reconciler
        .move_adjacent(Some(&fx.session), fx.tasks[2].id, MoveDirection::Up)
        .unwrap_err();

    assert!(matches!(err, ReconcileError::Store(StoreError::InvalidData(_))));
    assert_eq!(texts(reconciler.items()), vec!["a", "c", "b"]);
    assert_eq!(store.stored_order(fx.list_id), vec!["a", "b", "c"]);
}

#[test]
fn missing_session_is_rejected_before_any_change() {
    let fx = fixture(&["a", "b", "c"]);
    let store = MemoryTaskStore::seeded(&fx.tasks);
    let mut reconciler = OrderedListReconciler::with_items(&store, fx.list_id, fx.tasks.clone());

    let err = reconciler
        .move_adjacent(None, fx.tasks[1].id, MoveDirection::Up)
        .unwrap_err();
    assert!(matches!(err, ReconcileError::AuthRequired));
    assert!(matches!(
        reconciler.move_to_index(None, 0, 3),
        Err(ReconcileError::AuthRequired)
    ));
    assert!(matches!(
        reconciler.load(None),
        Err(ReconcileError::AuthRequired)
    ));

    assert_eq!(store.write_calls.get(), 0);
    assert_eq!(reconciler.items(), fx.tasks.as_slice());
}

#[test]
fn invalid_requests_are_rejected_without_store_call() {
    let fx = fixture(&["a", "b"]);
    let store = MemoryTaskStore::seeded(&fx.tasks);
    let mut reconciler = OrderedListReconciler::with_items(&store, fx.list_id, fx.tasks.clone());

    let unknown = reconciler
        .move_adjacent(Some(&fx.session), Uuid::new_v4(), MoveDirection::Down)
        .unwrap();
    assert!(matches!(
        unknown,
        MoveResult::Rejected(InvalidMove::UnknownItem(_))
    ));

    let out_of_range = reconciler.move_to_index(Some(&fx.session), 5, 0).unwrap();
    assert_eq!(
        out_of_range,
        MoveResult::Rejected(InvalidMove::SourceOutOfRange { index: 5, len: 2 })
    );

    assert_eq!(store.write_calls.get(), 0);
    assert_eq!(texts(reconciler.items()), vec!["a", "b"]);
}

#[test]
fn ordinals_stay_dense_across_a_sequence_of_moves() {
    let fx = fixture(&["a", "b", "c", "d", "e"]);
    let store = MemoryTaskStore::seeded(&fx.tasks);
    let mut reconciler = OrderedListReconciler::with_items(&store, fx.list_id, fx.tasks.clone());
    let session = Some(&fx.session);

    let moves = [(0, 5), (4, 0), (1, 3), (3, 1), (2, 5), (0, 2)];
    for (source, target) in moves {
        reconciler.move_to_index(session, source, target).unwrap();
        assert!(ordinals_are_dense(reconciler.items()));
    }
    reconciler
        .move_adjacent(session, fx.tasks[2].id, MoveDirection::Down)
        .unwrap();
    assert!(ordinals_are_dense(reconciler.items()));

    let mut stored = store.list(fx.session.user_id, &fx.list_id).unwrap();
    stored.sort_by_key(|task| task.ordinal);
    assert!(ordinals_are_dense(&stored));
    assert_eq!(texts(&stored), texts(reconciler.items()));
}

#[test]
fn load_sorts_store_rows_and_requires_session() {
    let fx = fixture(&["a", "b", "c"]);
    let mut shuffled = fx.tasks.clone();
    shuffled.reverse();
    let store = MemoryTaskStore::seeded(&shuffled);
    let mut reconciler = OrderedListReconciler::new(&store, fx.list_id);

    let loaded = reconciler.load(Some(&fx.session)).unwrap();
    assert_eq!(texts(loaded), vec!["a", "b", "c"]);

    let stranger = Session::new(Uuid::new_v4());
    assert!(reconciler.load(Some(&stranger)).unwrap().is_empty());
}

#[test]
fn drag_gesture_commits_only_hovered_drops() {
    let fx = fixture(&["a", "b", "c", "d"]);
    let store = MemoryTaskStore::seeded(&fx.tasks);
    let mut reconciler = OrderedListReconciler::with_items(&store, fx.list_id, fx.tasks.clone());
    let session = Some(&fx.session);

    reconciler.begin_drag(0);
    assert!(reconciler.hover_drag(3));
    assert!(!reconciler.hover_drag(3));
    assert_eq!(
        reconciler.drag_state(),
        DragState::Hovering {
            source_index: 0,
            candidate_index: 3
        }
    );
    assert_eq!(reconciler.drop_drag(session).unwrap(), MoveResult::Committed);
    assert_eq!(reconciler.drag_state(), DragState::Idle);
    assert_eq!(texts(reconciler.items()), vec!["b", "c", "a", "d"]);

    reconciler.begin_drag(1);
    assert_eq!(reconciler.drop_drag(session).unwrap(), MoveResult::Unchanged);

    reconciler.begin_drag(2);
    reconciler.hover_drag(0);
    reconciler.cancel_drag();
    assert_eq!(reconciler.drag_state(), DragState::Idle);
    assert_eq!(reconciler.drop_drag(session).unwrap(), MoveResult::Unchanged);

    assert_eq!(store.write_calls.get(), 1);
}

#[test]
fn forgotten_item_leaves_gap_until_next_move() {
    let fx = fixture(&["a", "b", "c", "d"]);
    let store = MemoryTaskStore::seeded(&fx.tasks);
    let mut reconciler = OrderedListReconciler::with_items(&store, fx.list_id, fx.tasks.clone());
    let session = Some(&fx.session);

    let removed = reconciler.forget(fx.tasks[1].id).unwrap();
    store.delete_by_id(removed.id, fx.session.user_id).unwrap();
    assert_eq!(ordinals(reconciler.items()), vec![0, 2, 3]);
    assert!(reconciler.forget(removed.id).is_none());

    reconciler
        .move_adjacent(session, fx.tasks[3].id, MoveDirection::Up)
        .unwrap();
    assert_eq!(texts(reconciler.items()), vec!["a", "d", "c"]);
    assert_eq!(ordinals(reconciler.items()), vec![0, 1, 2]);

    let created = Task::new(fx.session.user_id, fx.list_id, "e", 3);
    reconciler.push_created(created);
    assert!(ordinals_are_dense(reconciler.items()));
}

#[test]
fn commit_drops_items_the_store_no_longer_has() {
    let fx = fixture(&["a", "b", "c"]);
    let store = MemoryTaskStore::seeded(&fx.tasks);
    let mut reconciler = OrderedListReconciler::with_items(&store, fx.list_id, fx.tasks.clone());
    store.delete_by_id(fx.tasks[1].id, fx.session.user_id).unwrap();

    let result = reconciler.move_to_index(Some(&fx.session), 2, 0).unwrap();

    assert_eq!(result, MoveResult::Committed);
    assert_eq!(texts(reconciler.items()), vec!["c", "a"]);
    assert_eq!(ordinals(reconciler.items()), vec![0, 1]);
    assert_eq!(store.stored_order(fx.list_id), vec!["c", "a"]);
}
