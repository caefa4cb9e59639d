//! HTTP client for the cluster proxy's auth-related business endpoints.
//!
//! All three calls are bearer-authenticated; the two handshake calls
//! carry the front-callback marker header so the server issues redirect
//! URIs pointing back at the front-end. Only 200 and 401 are interpreted
//! specially by callers; every other status is the generic unexpected
//! class.

use http::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::errors::AuthError;
use crate::models::{ClusterCallbackPayload, VisibleClusterList};

/// Marks a request as part of a front-end-initiated callback flow.
pub const FRONT_CALLBACK_HEADER: &str = "x-front-callback";

/// Status plus optionally-parsed body. `data` is None when the body was
/// empty or not parseable as `T`, which callers treat as
/// "success without data" on a 200.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub status: StatusCode,
    pub data: Option<T>,
}

pub struct ClusterApi {
    base_url: String,
    http: reqwest::Client,
}

impl ClusterApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        ClusterApi {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        bearer: Option<&str>,
        front_callback: bool,
    ) -> Result<ApiResponse<T>, AuthError> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        debug!("GET {}", url);

        let mut request = self.http.get(&url).query(query);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        if front_callback {
            request = request.header(FRONT_CALLBACK_HEADER, "true");
        }

        let resp = request.send().await?;
        let status = resp.status();
        let data = if status.is_success() {
            resp.json::<T>().await.ok()
        } else {
            None
        };
        Ok(ApiResponse { status, data })
    }

    /// `GET /clusters` — the clusters visible to the authenticated user.
    pub async fn visible_clusters(
        &self,
        bearer: Option<&str>,
    ) -> Result<ApiResponse<VisibleClusterList>, AuthError> {
        self.get("/clusters", &[], bearer, false).await
    }

    /// `GET /{ns}/{cluster}/auth/login` — returns the cluster provider's
    /// authorization URL as a plain string body.
    pub async fn cluster_login(
        &self,
        ns: &str,
        cluster: &str,
        bearer: Option<&str>,
    ) -> Result<ApiResponse<String>, AuthError> {
        let url = format!(
            "{}/{}/{}/auth/login",
            self.base_url.trim_end_matches('/'),
            ns,
            cluster
        );
        debug!("GET {}", url);

        let mut request = self.http.get(&url).header(FRONT_CALLBACK_HEADER, "true");
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let resp = request.send().await?;
        let status = resp.status();
        let data = if status.is_success() {
            resp.text().await.ok().filter(|body| !body.is_empty())
        } else {
            None
        };
        Ok(ApiResponse { status, data })
    }

    /// `GET /{ns}/{cluster}/auth/callback?code&state` — completes the
    /// delegated exchange.
    pub async fn cluster_callback(
        &self,
        ns: &str,
        cluster: &str,
        code: &str,
        state: &str,
        bearer: Option<&str>,
    ) -> Result<ApiResponse<ClusterCallbackPayload>, AuthError> {
        self.get(
            &format!("/{}/{}/auth/callback", ns, cluster),
            &[("code", code), ("state", state)],
            bearer,
            true,
        )
        .await
    }
}
