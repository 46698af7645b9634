//! Pointer drag gesture state machine.
//!
//! `Idle -> Dragging -> Hovering* -> (drop | cancel) -> Idle`. Dropping
//! without ever hovering a target counts as a cancel.

use log::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        source_index: usize,
    },
    Hovering {
        source_index: usize,
        candidate_index: usize,
    },
}

/// Completed drag handed to `move_to_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropIntent {
    pub source_index: usize,
    pub target_index: usize,
}

/// One drag interaction at a time over a single list.
#[derive(Debug, Clone, Default)]
pub struct DragGesture {
    state: DragState,
}

impl DragGesture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != DragState::Idle
    }

    /// Starts dragging the item at `source_index`.
    ///
    /// An unfinished gesture is discarded first.
    pub fn begin(&mut self, source_index: usize) {
        if self.is_active() {
            debug!("event=drag_restart module=reorder status=noop previous={:?}", self.state);
        }
        self.state = DragState::Dragging { source_index };
    }

    /// Records the gap under the pointer.
    ///
    /// Returns `true` only when the candidate changed; hovering the same gap
    /// again, or hovering while idle, changes nothing.
    pub fn hover(&mut self, candidate_index: usize) -> bool {
        let source_index = match self.state {
            DragState::Idle => return false,
            DragState::Hovering {
                candidate_index: current,
                ..
            } if current == candidate_index => return false,
            DragState::Dragging { source_index } | DragState::Hovering { source_index, .. } => {
                source_index
            }
        };
        self.state = DragState::Hovering {
            source_index,
            candidate_index,
        };
        true
    }

    /// Releases the pointer over the last hovered gap.
    pub fn release(&mut self) -> Option<DropIntent> {
        let intent = match self.state {
            DragState::Hovering {
                source_index,
                candidate_index,
            } => Some(DropIntent {
                source_index,
                target_index: candidate_index,
            }),
            DragState::Dragging { .. } | DragState::Idle => None,
        };
        self.state = DragState::Idle;
        intent
    }

    /// Ends the gesture without a drop.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::{DragGesture, DragState, DropIntent};

    #[test]
    fn full_gesture_produces_drop_intent_and_returns_to_idle() {
        let mut gesture = DragGesture::new();
        gesture.begin(0);
        assert!(gesture.hover(2));
        assert!(gesture.hover(3));

        let intent = gesture.release();
        assert_eq!(
            intent,
            Some(DropIntent {
                source_index: 0,
                target_index: 3
            })
        );
        assert_eq!(gesture.state(), DragState::Idle);
    }

    #[test]
    fn re_hovering_same_gap_is_not_a_change() {
        let mut gesture = DragGesture::new();
        gesture.begin(1);
        assert!(gesture.hover(3));
        let before = gesture.state();
        assert!(!gesture.hover(3));
        assert_eq!(gesture.state(), before);
    }

    #[test]
    fn drop_without_hover_and_cancel_yield_nothing() {
        let mut gesture = DragGesture::new();
        gesture.begin(1);
        assert_eq!(gesture.release(), None);
        assert!(!gesture.is_active());

        gesture.begin(1);
        gesture.hover(0);
        gesture.cancel();
        assert_eq!(gesture.release(), None);
    }

    #[test]
    fn hover_while_idle_is_ignored() {
        let mut gesture = DragGesture::new();
        assert!(!gesture.hover(1));
        assert_eq!(gesture.state(), DragState::Idle);
    }

    #[test]
    fn begin_during_active_gesture_restarts_from_new_source() {
        let mut gesture = DragGesture::new();
        gesture.begin(0);
        gesture.hover(2);
        gesture.begin(3);
        assert_eq!(gesture.state(), DragState::Dragging { source_index: 3 });
    }
}
