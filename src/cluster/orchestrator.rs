//! Delegated cluster-auth: per-cluster login redirect, the resource-scoped
//! callback exchange, and the visible-cluster list the UI renders as
//! delegated-login targets.

use http::StatusCode;
use reqwest::Url;
use tracing::{error, info, warn};

use super::api::ClusterApi;
use crate::effects::{Effect, Notice, HOME_REDIRECT_DELAY};
use crate::errors::AuthError;
use crate::models::{DelegatedCallback, SessionHandle, VisibleCluster};
use crate::routing::{RouteId, RouteIntent};

/// Owns the delegated handshakes and the visible-cluster list. Reads the
/// primary session only for its bearer token; never writes it.
pub struct ClusterOrchestrator {
    api: ClusterApi,
    session: SessionHandle,
    /// When true, a 401 from the cluster endpoints appends an interactive
    /// re-login effect. Deliberately off by default.
    relogin_on_unauthorized: bool,
    clusters: Vec<VisibleCluster>,
    inited: bool,
    last_callback: Option<DelegatedCallback>,
}

impl ClusterOrchestrator {
    pub fn new(api: ClusterApi, session: SessionHandle, relogin_on_unauthorized: bool) -> Self {
        ClusterOrchestrator {
            api,
            session,
            relogin_on_unauthorized,
            clusters: Vec::new(),
            inited: false,
            last_callback: None,
        }
    }

    pub fn clusters(&self) -> &[VisibleCluster] {
        &self.clusters
    }

    pub fn is_inited(&self) -> bool {
        self.inited
    }

    /// The most recent delegated handshake, if any completed or failed
    /// this page load.
    pub fn last_callback(&self) -> Option<&DelegatedCallback> {
        self.last_callback.as_ref()
    }

    fn unauthorized_effects(&self, message: &str) -> Vec<Effect> {
        // Short-lived error notice: when the re-login policy is on, the
        // page is about to be replaced anyway.
        let mut effects = vec![Effect::Notify(Notice {
            level: crate::effects::NoticeLevel::Error,
            message: message.to_string(),
            duration: std::time::Duration::from_secs(2),
        })];
        if self.relogin_on_unauthorized {
            effects.push(Effect::BeginLogin);
        }
        effects
    }

    /// Fetch the clusters the user may act on. Every outcome, including
    /// failures, leaves the list in a defined state and marks the fetch
    /// as attempted.
    pub async fn fetch_visible_clusters(&mut self) -> Vec<Effect> {
        let bearer = self.session.access_token();
        let effects = match self.api.visible_clusters(bearer.as_deref()).await {
            Ok(resp) if resp.status == StatusCode::OK => match resp.data {
                Some(list) => {
                    info!("Fetched {} visible clusters", list.clusters.len());
                    self.clusters = list.clusters;
                    Vec::new()
                }
                None => {
                    error!("No cluster data received");
                    self.clusters = Vec::new();
                    vec![Effect::Notify(Notice::error(
                        "No cluster data received from server",
                    ))]
                }
            },
            Ok(resp) if resp.status == StatusCode::UNAUTHORIZED => {
                error!("Unauthorized access when fetching clusters");
                self.clusters = Vec::new();
                self.unauthorized_effects("Unauthorized access. Please log in again.")
            }
            Ok(resp) => {
                error!("Unexpected response status: {}", resp.status);
                self.clusters = Vec::new();
                vec![Effect::Notify(Notice::warning(format!(
                    "Unexpected response: {}",
                    resp.status.as_u16()
                )))]
            }
            Err(e) => {
                error!("Failed to fetch clusters: {}", e);
                self.clusters = Vec::new();
                vec![Effect::Notify(Notice::warning(
                    "Could not reach the server",
                ))]
            }
        };
        self.inited = true;
        effects
    }

    /// Ask the server for the cluster provider's authorization URL and
    /// redirect to it. Failures are logged; there is nothing useful to
    /// show the user beyond that.
    pub async fn request_delegated_login(&self, ns: &str, cluster: &str) -> Vec<Effect> {
        let bearer = self.session.access_token();
        match self.api.cluster_login(ns, cluster, bearer.as_deref()).await {
            Ok(resp) if resp.status == StatusCode::OK => match resp.data {
                Some(raw_url) => match Url::parse(&raw_url) {
                    Ok(url) => {
                        info!("Redirecting to cluster login URL: {}", url);
                        vec![Effect::RedirectTo(url)]
                    }
                    Err(_) => {
                        error!("Invalid URL received for cluster login redirect");
                        Vec::new()
                    }
                },
                None => {
                    error!("Cluster login returned no redirect URL");
                    Vec::new()
                }
            },
            Ok(resp) if resp.status == StatusCode::UNAUTHORIZED => {
                error!("Unauthorized access when redirecting to cluster login");
                if self.relogin_on_unauthorized {
                    vec![Effect::BeginLogin]
                } else {
                    Vec::new()
                }
            }
            Ok(resp) => {
                error!("Unexpected response status: {}", resp.status);
                Vec::new()
            }
            Err(e) => {
                error!("Cluster login request failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Complete the delegated callback the cluster provider redirected
    /// back to. All four identifiers must be present before any network
    /// call; on failure the user is sent home after the notice has had
    /// time to register.
    pub async fn complete_delegated_callback(&mut self, route: &RouteIntent) -> Vec<Effect> {
        let context = match extract_callback_context(route) {
            Ok(context) => context,
            Err(e) => {
                error!("Missing parameters in callback URL: {}", e);
                return vec![
                    Effect::Notify(Notice::error("Missing parameters in callback URL")),
                    Effect::NavigateToAfter {
                        route: RouteId::Home,
                        delay: HOME_REDIRECT_DELAY,
                    },
                ];
            }
        };

        let bearer = self.session.access_token();
        let result = self
            .api
            .cluster_callback(
                &context.namespace,
                &context.cluster,
                &context.code,
                &context.state,
                bearer.as_deref(),
            )
            .await;

        let mut context = context;
        let effects = match result {
            Ok(resp) if resp.status == StatusCode::OK && resp.data.is_some() => {
                info!(
                    "Delegated login to {}/{} completed",
                    context.namespace, context.cluster
                );
                context.payload = resp.data;
                vec![Effect::Notify(Notice::success(
                    "Successfully authenticated with the cluster",
                ))]
            }
            Ok(resp) if resp.status == StatusCode::UNAUTHORIZED => {
                error!("Unauthorized access during callback login");
                vec![
                    Effect::Notify(Notice::error("Unauthorized access during callback login")),
                    Effect::NavigateToAfter {
                        route: RouteId::Home,
                        delay: HOME_REDIRECT_DELAY,
                    },
                ]
            }
            Ok(resp) => {
                warn!(
                    "Unexpected response status during callback login: {}",
                    resp.status
                );
                vec![Effect::Notify(Notice::warning(format!(
                    "Unexpected response: {}",
                    resp.status.as_u16()
                )))]
            }
            Err(e) => {
                error!("Error during callback login: {}", e);
                vec![
                    Effect::Notify(Notice::error(format!("Error during callback login: {}", e))),
                    Effect::NavigateToAfter {
                        route: RouteId::Home,
                        delay: HOME_REDIRECT_DELAY,
                    },
                ]
            }
        };
        self.last_callback = Some(context);
        effects
    }
}

/// Validate and extract the four mandatory identifiers from the delegated
/// callback route. Empty values count as missing.
fn extract_callback_context(route: &RouteIntent) -> Result<DelegatedCallback, AuthError> {
    let required = |value: Option<&str>, name: &'static str| {
        value
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .ok_or(AuthError::MissingCallbackParameter(name))
    };

    Ok(DelegatedCallback {
        namespace: required(route.param("ns"), "ns")?,
        cluster: required(route.param("cluster"), "cluster")?,
        code: required(route.query("code"), "code")?,
        state: required(route.query("state"), "state")?,
        payload: None,
    })
}
