use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use reqwest::Url;

use crate::errors::AuthError;
use crate::models::AuthenticatedUser;

/// Capability interface over the identity provider.
///
/// The engine drives every protocol operation through this trait; the
/// production implementation is [`super::OidcSessionClient`], tests use
/// scripted stubs. Redirect-issuing operations return the target URL so
/// the failure stays visible at this boundary; callers decide whether to
/// log, absorb or surface it.
#[async_trait]
pub trait SessionClient: Send + Sync {
    /// URL of the provider's authorization endpoint for an interactive
    /// login, with a fresh state token recorded as pending.
    async fn begin_login(&self) -> Result<Url, AuthError>;

    /// URL of the provider's end-session endpoint. Clears the token
    /// cache as a side effect.
    async fn begin_logout(&self) -> Result<Url, AuthError>;

    /// Whether the provider is known to expose an end-session endpoint.
    fn supports_logout(&self) -> bool;

    /// Exchange the code/state pair from the primary callback URL for
    /// tokens. Fails with [`AuthError::Callback`] when the pair is
    /// invalid, mismatched or already consumed.
    async fn complete_callback(
        &self,
        query: &HashMap<String, String>,
    ) -> Result<AuthenticatedUser, AuthError>;

    /// Non-redirecting renewal through the refresh-token grant. Fails
    /// with [`AuthError::Renewal`] on provider rejection.
    async fn renew_silently(&self) -> Result<AuthenticatedUser, AuthError>;

    /// Read the cached session. Cheap, no network access.
    fn current_user(&self) -> Option<AuthenticatedUser>;
}

/// An authorization request we have redirected away for and not yet
/// completed. Consumed by the first matching callback, which is what
/// makes a replayed code fail locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAuthorization {
    pub state: String,
}

/// The identity-side token storage: the single source of truth the
/// in-memory session is rebuilt from on every initialization.
pub trait TokenCache: Send + Sync {
    fn load(&self) -> Option<AuthenticatedUser>;
    fn store(&self, user: &AuthenticatedUser);
    fn clear(&self);
    fn put_pending(&self, pending: PendingAuthorization);
    fn take_pending(&self) -> Option<PendingAuthorization>;
}

/// In-memory cache, the default backing for tests and hosts without a
/// persistent store.
#[derive(Default)]
pub struct MemoryTokenCache {
    user: RwLock<Option<AuthenticatedUser>>,
    pending: RwLock<Option<PendingAuthorization>>,
}

impl MemoryTokenCache {
    pub fn new() -> Self {
        MemoryTokenCache::default()
    }
}

impl TokenCache for MemoryTokenCache {
    fn load(&self) -> Option<AuthenticatedUser> {
        self.user.read().expect("token cache lock poisoned").clone()
    }

    fn store(&self, user: &AuthenticatedUser) {
        *self.user.write().expect("token cache lock poisoned") = Some(user.clone());
    }

    fn clear(&self) {
        *self.user.write().expect("token cache lock poisoned") = None;
        *self.pending.write().expect("token cache lock poisoned") = None;
    }

    fn put_pending(&self, pending: PendingAuthorization) {
        *self.pending.write().expect("token cache lock poisoned") = Some(pending);
    }

    fn take_pending(&self) -> Option<PendingAuthorization> {
        self.pending.write().expect("token cache lock poisoned").take()
    }
}
