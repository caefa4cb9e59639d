//! End-to-end primary flow: startup on the callback route, code exchange
//! against a mocked provider, effect execution, then navigation guarding
//! and logout.

mod common;

use std::sync::Arc;

use clustergate::auth::{AuthOrchestrator, AuthState};
use clustergate::effects::{Effect, EffectRunner};
use clustergate::models::SessionHandle;
use clustergate::routing::{RouteId, RouteIntent};
use clustergate::session::{MemoryTokenCache, OidcSessionClient, PendingAuthorization, SessionClient, TokenCache};
use common::{mount_discovery, oidc_config, query, RecordingHost};
use mockito::Server;

#[tokio::test]
async fn test_startup_on_callback_route_establishes_session() {
    let mut server = Server::new_async().await;
    let _discovery = mount_discovery(&mut server).await;
    let token = server
        .mock("POST", "/token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token": "at-1", "refresh_token": "rt-1", "expires_in": 300}"#)
        .create_async()
        .await;

    // The redirect away happened in a previous page load; the cache still
    // holds the pending authorization it recorded.
    let cache = Arc::new(MemoryTokenCache::new());
    cache.put_pending(PendingAuthorization { state: "s1".into() });
    let client = Arc::new(OidcSessionClient::new(oidc_config(&server), cache));

    let session = SessionHandle::new();
    let mut orchestrator = AuthOrchestrator::new(client.clone(), session.clone(), true);
    assert!(orchestrator.guard().is_none());

    let callback = RouteIntent {
        id: RouteId::Callback,
        path: "/auth/callback".into(),
        params: Default::default(),
        query: query(&[("code", "abc"), ("state", "s1")]),
    };
    let effects = orchestrator.init(&callback).await;
    token.assert_async().await;

    assert_eq!(orchestrator.state(), AuthState::Authenticated);
    assert!(session.is_initialized());
    assert_eq!(session.access_token().as_deref(), Some("at-1"));

    // Run the emitted effects against a recording host: the user lands
    // on home with a success toast.
    let host = RecordingHost::new();
    EffectRunner::new(client.clone(), host.clone(), host.clone())
        .run(effects)
        .await;
    assert_eq!(
        host.events(),
        vec![
            "navigate:Home".to_string(),
            "notify[Success]:Signed in".to_string(),
        ]
    );

    // The guard now exists and lets protected navigation through.
    let guard = orchestrator.guard().expect("guard after init");
    assert!(guard
        .before_each(&RouteIntent::to_route(RouteId::About))
        .is_empty());

    // Logout: end-session redirect, home, reload; session reset.
    let effects = orchestrator.log_out().await;
    assert!(matches!(
        effects.as_slice(),
        [
            Effect::RedirectTo(_),
            Effect::NavigateTo(RouteId::Home),
            Effect::ReloadPage,
        ]
    ));
    assert!(session.user().is_none());
    assert!(client.current_user().is_none());
}

#[tokio::test]
async fn test_startup_without_session_on_protected_route_redirects_to_login() {
    let mut server = Server::new_async().await;
    let _discovery = mount_discovery(&mut server).await;

    let cache = Arc::new(MemoryTokenCache::new());
    let client = Arc::new(OidcSessionClient::new(oidc_config(&server), cache));
    let mut orchestrator = AuthOrchestrator::new(client, SessionHandle::new(), true);

    let effects = orchestrator
        .init(&RouteIntent::to_route(RouteId::About))
        .await;

    assert_eq!(orchestrator.state(), AuthState::Unauthenticated);
    // Info toast plus the full-page redirect to the provider.
    assert_eq!(effects.len(), 2);
    let Effect::RedirectTo(url) = &effects[1] else {
        panic!("expected a login redirect, got {:?}", effects[1]);
    };
    assert!(url.as_str().starts_with(&format!("{}/auth?", server.url())));
    assert!(url.query_pairs().any(|(k, _)| k == "state"));
}

#[tokio::test]
async fn test_guard_spam_issues_one_redirect_per_attempt() {
    let mut server = Server::new_async().await;
    let _discovery = mount_discovery(&mut server).await;

    let cache = Arc::new(MemoryTokenCache::new());
    let client = Arc::new(OidcSessionClient::new(oidc_config(&server), cache));
    let mut orchestrator = AuthOrchestrator::new(client.clone(), SessionHandle::new(), true);
    let _ = orchestrator.init(&RouteIntent::to_route(RouteId::Home)).await;

    let guard = orchestrator.guard().expect("guard after init");
    let host = RecordingHost::new();
    let runner = EffectRunner::new(client, host.clone(), host.clone());

    // Back-button spam: three navigation attempts, three single redirects,
    // no toasts or timers accumulated.
    for _ in 0..3 {
        let effects = guard.before_each(&RouteIntent::to_route(RouteId::About));
        assert_eq!(effects.len(), 1);
        runner.run(effects).await;
    }
    let events = host.events();
    assert_eq!(events.len(), 3);
    assert!(events.iter().all(|event| event.starts_with("redirect:")));
}
