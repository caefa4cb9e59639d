use tracing::info;

use crate::effects::Effect;
use crate::models::SessionHandle;
use crate::routing::RouteIntent;

/// Navigation hook consulted before every route transition.
///
/// The guard never blocks or cancels navigation itself: triggering the
/// interactive login replaces the page, and that redirect is the
/// cancellation mechanism. Repeated invocations (back-button spam) each
/// emit at most one login effect, so nothing queues up beyond one
/// redirect per distinct navigation attempt.
pub struct RouteGuard {
    session: SessionHandle,
}

impl RouteGuard {
    pub(crate) fn new(session: SessionHandle) -> Self {
        RouteGuard { session }
    }

    /// Decide on a navigation attempt towards `to`.
    pub fn before_each(&self, to: &RouteIntent) -> Vec<Effect> {
        if to.requires_auth() && !self.session.is_authenticated() {
            info!(
                "Route '{}' requires auth, redirecting to login",
                to.id.meta().display_name
            );
            return vec![Effect::BeginLogin];
        }
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::AuthenticatedUser;
    use crate::routing::RouteId;

    fn guard_with_user(expires_at: Option<i64>) -> RouteGuard {
        let session = SessionHandle::new();
        if let Some(expires_at) = expires_at {
            session.set_user(AuthenticatedUser::new(
                "token".into(),
                None,
                None,
                expires_at,
                None,
            ));
        }
        RouteGuard::new(session)
    }

    #[test]
    fn test_protected_route_without_session_triggers_one_login() {
        let guard = guard_with_user(None);
        let to = RouteIntent::to_route(RouteId::About);
        let effects = guard.before_each(&to);
        assert_eq!(effects, vec![Effect::BeginLogin]);

        // A repeated attempt re-issues the redirect, once, with no toasts
        // or timers attached.
        let effects = guard.before_each(&to);
        assert_eq!(effects.len(), 1);
    }

    #[test]
    fn test_expired_session_counts_as_unauthenticated() {
        let guard = guard_with_user(Some(Utc::now().timestamp() - 60));
        let effects = guard.before_each(&RouteIntent::to_route(RouteId::About));
        assert_eq!(effects, vec![Effect::BeginLogin]);
    }

    #[test]
    fn test_valid_session_passes_through() {
        let guard = guard_with_user(Some(Utc::now().timestamp() + 600));
        assert!(guard
            .before_each(&RouteIntent::to_route(RouteId::About))
            .is_empty());
    }

    #[test]
    fn test_public_route_never_triggers_login() {
        let guard = guard_with_user(None);
        assert!(guard
            .before_each(&RouteIntent::to_route(RouteId::Home))
            .is_empty());
        assert!(guard
            .before_each(&RouteIntent::to_route(RouteId::Callback))
            .is_empty());
    }
}
