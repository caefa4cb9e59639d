//! Shared helpers for the integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use clustergate::config::OidcConfig;
use clustergate::effects::{Navigator, Notice, Notifier};
use clustergate::routing::RouteId;
use mockito::ServerGuard;
use reqwest::Url;

/// OIDC settings pointing every endpoint at the given mock server.
pub fn oidc_config(server: &ServerGuard) -> OidcConfig {
    OidcConfig {
        authority: server.url(),
        client_id: "front".into(),
        redirect_uri: "https://app.example.org/auth/callback".into(),
        post_logout_redirect_uri: "https://app.example.org/".into(),
        response_type: "code".into(),
        scope: "openid profile".into(),
        automatic_silent_renew: true,
        load_user_info: false,
    }
}

/// Mounts a discovery document whose endpoints live on the mock server.
pub async fn mount_discovery(server: &mut ServerGuard) -> mockito::Mock {
    let body = format!(
        r#"{{"authorization_endpoint": "{0}/auth",
            "token_endpoint": "{0}/token",
            "userinfo_endpoint": "{0}/userinfo",
            "end_session_endpoint": "{0}/logout"}}"#,
        server.url()
    );
    server
        .mock("GET", "/.well-known/openid-configuration")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

pub fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Records every navigation and notification the effect runner performs.
#[derive(Default)]
pub struct RecordingHost {
    pub events: Mutex<Vec<String>>,
}

impl RecordingHost {
    pub fn new() -> Arc<Self> {
        Arc::new(RecordingHost::default())
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl Navigator for RecordingHost {
    fn redirect(&self, url: &Url) {
        self.push(format!("redirect:{}", url));
    }

    fn navigate(&self, route: RouteId) {
        self.push(format!("navigate:{:?}", route));
    }

    fn reload(&self) {
        self.push("reload".to_string());
    }
}

impl Notifier for RecordingHost {
    fn notify(&self, notice: &Notice) {
        self.push(format!("notify[{:?}]:{}", notice.level, notice.message));
    }
}
