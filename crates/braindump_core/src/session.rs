//! Explicit session capability.
//!
//! Mutating operations receive `Option<&Session>` from their caller instead
//! of reading an ambient "current user", so the core stays testable without
//! a UI harness. Sign-in flows live outside this crate.

use crate::model::UserId;
use log::info;
use std::sync::RwLock;

/// Authenticated user for the duration of one sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserId,
}

impl Session {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}

/// Source of the current session, if any.
pub trait SessionSource {
    fn current_session(&self) -> Option<Session>;
}

/// In-process session holder updated by the host's auth listener.
#[derive(Debug, Default)]
pub struct SessionSlot {
    current: RwLock<Option<Session>>,
}

impl SessionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the session for `user_id`, replacing any previous one.
    pub fn sign_in(&self, user_id: UserId) -> Session {
        let session = Session::new(user_id);
        *self.write() = Some(session);
        info!("event=session_change module=session status=ok state=signed_in");
        session
    }

    /// Clears the session. Signing out twice is harmless.
    pub fn sign_out(&self) {
        *self.write() = None;
        info!("event=session_change module=session status=ok state=signed_out");
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<Session>> {
        // A poisoned lock still holds a valid Option<Session>.
        self.current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionSource for SessionSlot {
    fn current_session(&self) -> Option<Session> {
        *self
            .current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::{SessionSlot, SessionSource};
    use uuid::Uuid;

    #[test]
    fn sign_in_then_out_clears_session() {
        let slot = SessionSlot::new();
        assert!(slot.current_session().is_none());

        let user_id = Uuid::new_v4();
        slot.sign_in(user_id);
        assert_eq!(slot.current_session().map(|s| s.user_id), Some(user_id));

        slot.sign_out();
        slot.sign_out();
        assert!(slot.current_session().is_none());
    }
}
