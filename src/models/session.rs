//! Process-wide session state.
//!
//! The session is created empty at startup, mutated only by the primary
//! auth orchestrator, and read by the route guard and the cluster
//! orchestrator through cloned handles.

use std::sync::{Arc, RwLock};

use crate::models::user::AuthenticatedUser;

/// The authenticated identity for this process, plus the one-shot
/// initialization marker.
#[derive(Debug, Default, Clone)]
pub struct Session {
    pub user: Option<AuthenticatedUser>,
    /// True once the first initialization attempt has started, for the
    /// rest of the process lifetime.
    pub initialized: bool,
}

/// Shared view over the [`Session`].
///
/// Mutating methods exist only for the primary orchestrator; everything
/// else holds a clone and uses the read accessors. The lock is never held
/// across an await point.
#[derive(Clone, Default)]
pub struct SessionHandle {
    inner: Arc<RwLock<Session>>,
}

impl SessionHandle {
    pub fn new() -> Self {
        SessionHandle::default()
    }

    /// Marks the session initialized. Returns false if it already was,
    /// so callers can enforce run-once semantics.
    pub fn mark_initialized(&self) -> bool {
        let mut session = self.inner.write().expect("session lock poisoned");
        if session.initialized {
            return false;
        }
        session.initialized = true;
        true
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.read().expect("session lock poisoned").initialized
    }

    pub fn set_user(&self, user: AuthenticatedUser) {
        self.inner.write().expect("session lock poisoned").user = Some(user);
    }

    pub fn clear_user(&self) {
        self.inner.write().expect("session lock poisoned").user = None;
    }

    /// A valid session means a user is present and its token not expired.
    pub fn is_authenticated(&self) -> bool {
        self.inner
            .read()
            .expect("session lock poisoned")
            .user
            .as_ref()
            .is_some_and(|user| !user.expired())
    }

    pub fn access_token(&self) -> Option<String> {
        self.inner
            .read()
            .expect("session lock poisoned")
            .user
            .as_ref()
            .map(|user| user.access_token.clone())
    }

    pub fn user(&self) -> Option<AuthenticatedUser> {
        self.inner.read().expect("session lock poisoned").user.clone()
    }
}
