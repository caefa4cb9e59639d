use serde::{Deserialize, Serialize};

/// A cluster the authenticated user may act on, as reported by the
/// business API.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VisibleCluster {
    pub enabled: bool,
    pub namespace: String,
    pub name: String,
    pub sso_enabled: bool,
    pub is_reachable: Option<bool>,
}

/// Body of `GET /clusters`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VisibleClusterList {
    pub clusters: Vec<VisibleCluster>,
}

/// Payload returned by the delegated callback exchange: the credentials
/// the cluster proxy minted for this user. Opaque to the engine beyond
/// storage and display.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ClusterCallbackPayload {
    pub access_token: String,
    pub refresh_token: String,
    pub cluster_url: String,
    pub subject: String,
    pub id_token: String,
}

/// One in-flight delegated handshake, created per callback navigation
/// event and held only for the duration of the exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct DelegatedCallback {
    pub namespace: String,
    pub cluster: String,
    pub code: String,
    pub state: String,
    pub payload: Option<ClusterCallbackPayload>,
}
