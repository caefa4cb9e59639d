//! End-to-end delegated flow: fetch the visible clusters, request a
//! delegated login, and complete the cluster callback, all against one
//! mocked business API.

mod common;

use std::collections::HashMap;

use chrono::Utc;
use clustergate::cluster::{ClusterApi, ClusterOrchestrator};
use clustergate::effects::{Effect, NoticeLevel};
use clustergate::models::{AuthenticatedUser, SessionHandle};
use clustergate::routing::{RouteId, RouteIntent};
use common::query;
use mockito::{Matcher, Server};

fn authenticated_session() -> SessionHandle {
    let session = SessionHandle::new();
    session.set_user(AuthenticatedUser::new(
        "at-1".into(),
        None,
        None,
        Utc::now().timestamp() + 600,
        None,
    ));
    session
}

#[tokio::test]
async fn test_full_delegated_handshake() {
    let mut server = Server::new_async().await;
    let clusters = server
        .mock("GET", "/clusters")
        .match_header("authorization", "Bearer at-1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"clusters": [
                {"enabled": true, "namespace": "team-a", "name": "prod",
                 "sso_enabled": true, "is_reachable": true},
                {"enabled": false, "namespace": "team-b", "name": "dev",
                 "sso_enabled": false, "is_reachable": null}]}"#,
        )
        .create_async()
        .await;
    let login = server
        .mock("GET", "/team-a/prod/auth/login")
        .match_header("x-front-callback", "true")
        .with_status(200)
        .with_body("https://cluster-idp.example.org/auth?state=xyz")
        .create_async()
        .await;
    let callback = server
        .mock("GET", "/team-a/prod/auth/callback")
        .match_header("x-front-callback", "true")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("code".into(), "abc".into()),
            Matcher::UrlEncoded("state".into(), "xyz".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"access_token": "cat", "refresh_token": "crt",
                "cluster_url": "https://k8s.team-a.example.org",
                "subject": "adam", "id_token": "cid"}"#,
        )
        .create_async()
        .await;

    let mut orchestrator = ClusterOrchestrator::new(
        ClusterApi::new(server.url()),
        authenticated_session(),
        false,
    );

    // 1. The user sees their clusters.
    let effects = orchestrator.fetch_visible_clusters().await;
    clusters.assert_async().await;
    assert!(effects.is_empty());
    assert_eq!(orchestrator.clusters().len(), 2);
    assert!(orchestrator.is_inited());

    // 2. Delegated login redirects to the cluster provider.
    let effects = orchestrator.request_delegated_login("team-a", "prod").await;
    login.assert_async().await;
    assert!(matches!(&effects[..], [Effect::RedirectTo(_)]));

    // 3. The provider redirected back; the exchange completes and the
    // payload is stored for the UI.
    let intent = RouteIntent::parse(
        "/auth/callback/team-a/prod",
        query(&[("code", "abc"), ("state", "xyz")]),
    )
    .expect("cluster callback route should match");
    assert_eq!(intent.id, RouteId::ClusterCallback);

    let effects = orchestrator.complete_delegated_callback(&intent).await;
    callback.assert_async().await;
    assert_eq!(effects.len(), 1);
    assert_eq!(effects[0].as_notice().unwrap().level, NoticeLevel::Success);
    let handshake = orchestrator.last_callback().unwrap();
    assert_eq!(handshake.payload.as_ref().unwrap().subject, "adam");
}

#[tokio::test]
async fn test_delegated_callback_with_missing_state_stays_local() {
    let mut server = Server::new_async().await;
    let api = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let mut orchestrator = ClusterOrchestrator::new(
        ClusterApi::new(server.url()),
        authenticated_session(),
        false,
    );

    // The cluster provider redirected back without a state token.
    let intent = RouteIntent {
        id: RouteId::ClusterCallback,
        path: "/auth/callback/team-a/prod".into(),
        params: HashMap::from([
            ("ns".to_string(), "team-a".to_string()),
            ("cluster".to_string(), "prod".to_string()),
        ]),
        query: query(&[("code", "abc")]),
    };
    let effects = orchestrator.complete_delegated_callback(&intent).await;
    api.assert_async().await;

    assert_eq!(effects[0].as_notice().unwrap().level, NoticeLevel::Error);
    assert!(matches!(
        effects[1],
        Effect::NavigateToAfter {
            route: RouteId::Home,
            ..
        }
    ));
    // Nothing was recorded for a handshake that never started.
    assert!(orchestrator.last_callback().is_none());
}
