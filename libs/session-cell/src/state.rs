use std::sync::{PoisonError, RwLock};

use crate::models::SessionUser;

/// Where the session currently stands. `Unknown` only exists between process
/// start and the first probe.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Unknown,
    Authenticated(SessionUser),
    Anonymous,
}

/// Process-wide session record. Guarded screens consult it instead of
/// re-verifying on their own, and the gateway's unauthorized hook clears it
/// so every screen sees the expiry at once.
#[derive(Default)]
pub struct SessionState {
    phase: RwLock<Phase>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn establish(&self, user: SessionUser) {
        *self.write() = Phase::Authenticated(user);
    }

    pub fn clear(&self) {
        *self.write() = Phase::Anonymous;
    }

    pub fn phase(&self) -> Phase {
        self.read().clone()
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        match &*self.read() {
            Phase::Authenticated(user) => Some(user.clone()),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(&*self.read(), Phase::Authenticated(_))
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Phase> {
        self.phase.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Phase> {
        self.phase.write().unwrap_or_else(PoisonError::into_inner)
    }
}
