//! Primary session lifecycle: initialization, interactive login, logout,
//! the primary OIDC callback and the silent-renew fallback.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::effects::{Effect, Notice};
use crate::models::SessionHandle;
use crate::routing::{RouteGuard, RouteId, RouteIntent};
use crate::session::SessionClient;

/// Named states of the session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Uninitialized,
    Initializing,
    Authenticated,
    Unauthenticated,
    RenewalPending,
    CallbackPending,
}

/// Owns the [`SessionHandle`]'s write side and drives all primary
/// protocol operations through the [`SessionClient`].
///
/// Every method returns the side effects for the host to execute; no
/// provider or network failure escapes as an error. The route guard is
/// handed out only after the first initialization has resolved, so a
/// guard-triggered login can never be the first redirect decision.
pub struct AuthOrchestrator {
    client: Arc<dyn SessionClient>,
    session: SessionHandle,
    automatic_silent_renew: bool,
    state: AuthState,
}

impl AuthOrchestrator {
    pub fn new(
        client: Arc<dyn SessionClient>,
        session: SessionHandle,
        automatic_silent_renew: bool,
    ) -> Self {
        AuthOrchestrator {
            client,
            session,
            automatic_silent_renew,
            state: AuthState::Uninitialized,
        }
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    pub fn session(&self) -> SessionHandle {
        self.session.clone()
    }

    /// `user != None && !expired`.
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Logout needs both a user and a provider end-session endpoint.
    pub fn is_logout_possible(&self) -> bool {
        self.session.user().is_some() && self.client.supports_logout()
    }

    pub fn access_token(&self) -> Option<String> {
        self.session.access_token()
    }

    /// The navigation guard, available only once `init` has resolved.
    pub fn guard(&self) -> Option<RouteGuard> {
        match self.state {
            AuthState::Uninitialized | AuthState::Initializing => None,
            _ => Some(RouteGuard::new(self.session.clone())),
        }
    }

    /// One-shot session initialization, driven by the route the
    /// application started on. A second call is a no-op.
    ///
    /// The session is marked initialized before any awaited work, so
    /// concurrent readers observe "initialized, no user yet" rather than
    /// an uninitialized session.
    pub async fn init(&mut self, current: &RouteIntent) -> Vec<Effect> {
        if !self.session.mark_initialized() {
            warn!("Session already initialized, ignoring repeated init");
            return Vec::new();
        }
        self.state = AuthState::Initializing;

        let user = self.client.current_user();
        let on_callback_route = current.id == RouteId::Callback;

        let effects = match user {
            Some(user) if !user.expired() && !on_callback_route => {
                info!("User is already signed in");
                let message = match user.display_name() {
                    Some(name) => format!("Signed in as {}", name),
                    None => "Signed in".to_string(),
                };
                self.session.set_user(user);
                self.state = AuthState::Authenticated;
                vec![Effect::Notify(Notice::success(message))]
            }
            Some(user) if user.expired() && self.automatic_silent_renew => {
                self.state = AuthState::RenewalPending;
                self.session.set_user(user);
                match self.client.renew_silently().await {
                    Ok(renewed) => {
                        self.session.set_user(renewed);
                        self.state = AuthState::Authenticated;
                        Vec::new()
                    }
                    Err(e) => {
                        warn!("Silent renewal failed, falling back to login: {}", e);
                        self.session.clear_user();
                        self.state = AuthState::Unauthenticated;
                        self.log_in().await
                    }
                }
            }
            _ if on_callback_route => {
                self.state = AuthState::CallbackPending;
                match self.client.complete_callback(&current.query).await {
                    Ok(user) => {
                        self.session.set_user(user);
                        self.state = AuthState::Authenticated;
                        vec![
                            Effect::NavigateTo(RouteId::Home),
                            Effect::Notify(Notice::success("Signed in")),
                        ]
                    }
                    Err(e) => {
                        error!("Callback exchange failed: {}", e);
                        self.state = AuthState::Unauthenticated;
                        // Navigate home anyway: staying on a dead
                        // callback URL helps nobody.
                        vec![
                            Effect::Notify(Notice::error("Sign-in failed, please try again")),
                            Effect::NavigateTo(RouteId::Home),
                        ]
                    }
                }
            }
            _ if current.requires_auth() => {
                info!(
                    "Route '{}' requires auth and no session exists, redirecting to login",
                    current.id.meta().display_name
                );
                self.state = AuthState::Unauthenticated;
                let mut effects = vec![Effect::Notify(Notice::info("Sign-in required"))];
                effects.extend(self.log_in().await);
                effects
            }
            _ => {
                self.state = AuthState::Unauthenticated;
                Vec::new()
            }
        };

        // The guard becomes available only now, after this first
        // resolution: see `guard()`.
        info!("Session initialized, state={:?}", self.state);
        effects
    }

    /// Interactive login. A redirect failure is logged and absorbed: the
    /// page is about to be replaced regardless, and breaking navigation
    /// over it would be worse.
    pub async fn log_in(&self) -> Vec<Effect> {
        match self.client.begin_login().await {
            Ok(url) => vec![Effect::RedirectTo(url)],
            Err(e) => {
                error!("Error during sign in: {}", e);
                Vec::new()
            }
        }
    }

    /// Logout: end-session redirect, then home plus a full reload so no
    /// stale in-memory state survives whatever the identity SDK cached.
    pub async fn log_out(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        match self.client.begin_logout().await {
            Ok(url) => effects.push(Effect::RedirectTo(url)),
            Err(e) => error!("Error during sign out: {}", e),
        }
        self.session.clear_user();
        self.state = AuthState::Unauthenticated;
        effects.push(Effect::NavigateTo(RouteId::Home));
        effects.push(Effect::ReloadPage);
        effects
    }
}
