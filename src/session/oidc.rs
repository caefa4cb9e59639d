use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::Utc;
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::client::{PendingAuthorization, SessionClient, TokenCache};
use crate::config::OidcConfig;
use crate::errors::AuthError;
use crate::models::AuthenticatedUser;

/// Fallback token lifetime when the provider omits `expires_in`.
const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 300;

/// The subset of the provider's discovery document we use.
#[derive(Deserialize, Debug, Clone)]
pub struct DiscoveryDocument {
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    #[serde(default)]
    pub userinfo_endpoint: Option<String>,
    #[serde(default)]
    pub end_session_endpoint: Option<String>,
}

#[derive(Deserialize, Debug)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    id_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Production [`SessionClient`] speaking the authorization-code flow.
///
/// Endpoints come from the issuer's `/.well-known/openid-configuration`,
/// fetched on first use and held for the process lifetime. Token
/// signature validation is the provider's concern; the ID token payload
/// is only decoded for its claims.
pub struct OidcSessionClient {
    config: OidcConfig,
    http: reqwest::Client,
    cache: Arc<dyn TokenCache>,
    discovery: RwLock<Option<DiscoveryDocument>>,
}

impl OidcSessionClient {
    pub fn new(config: OidcConfig, cache: Arc<dyn TokenCache>) -> Self {
        info!(
            "Creating OIDC session client for authority '{}', client_id='{}'",
            config.authority, config.client_id
        );
        OidcSessionClient {
            config,
            http: reqwest::Client::new(),
            cache,
            discovery: RwLock::new(None),
        }
    }

    fn check_config(&self) -> Result<(), AuthError> {
        if self.config.authority.trim().is_empty() || self.config.client_id.trim().is_empty() {
            return Err(AuthError::Configuration(
                "missing issuer URL or client id".into(),
            ));
        }
        Ok(())
    }

    /// Fetch (once) and return the provider's discovery document.
    async fn discovery(&self) -> Result<DiscoveryDocument, AuthError> {
        if let Some(doc) = self.discovery.read().expect("discovery lock poisoned").clone() {
            return Ok(doc);
        }
        self.check_config()?;

        let well_known = format!(
            "{}/.well-known/openid-configuration",
            self.config.authority.trim_end_matches('/')
        );
        debug!("Fetching discovery document from {}", well_known);

        let resp = self.http.get(&well_known).send().await?;
        if !resp.status().is_success() {
            return Err(AuthError::Configuration(format!(
                "discovery endpoint returned {}",
                resp.status()
            )));
        }
        let doc = resp
            .json::<DiscoveryDocument>()
            .await
            .map_err(|e| AuthError::Configuration(format!("invalid discovery document: {}", e)))?;

        *self.discovery.write().expect("discovery lock poisoned") = Some(doc.clone());
        Ok(doc)
    }

    /// Claims merged from the ID token payload and, when configured, the
    /// userinfo endpoint. Userinfo failures degrade to the ID-token
    /// claims alone.
    async fn load_profile(
        &self,
        discovery: &DiscoveryDocument,
        tokens: &TokenResponse,
    ) -> HashMap<String, Value> {
        let mut profile = tokens
            .id_token
            .as_deref()
            .and_then(id_token_claims)
            .unwrap_or_default();

        if self.config.load_user_info {
            if let Some(userinfo_endpoint) = &discovery.userinfo_endpoint {
                match self
                    .http
                    .get(userinfo_endpoint)
                    .bearer_auth(&tokens.access_token)
                    .send()
                    .await
                {
                    Ok(resp) if resp.status().is_success() => {
                        if let Ok(Value::Object(claims)) = resp.json::<Value>().await {
                            profile.extend(claims);
                        }
                    }
                    Ok(resp) => warn!("Userinfo endpoint returned {}", resp.status()),
                    Err(e) => warn!("Failed to fetch userinfo: {}", e),
                }
            }
        }
        profile
    }

    fn user_from_tokens(
        tokens: TokenResponse,
        profile: HashMap<String, Value>,
    ) -> AuthenticatedUser {
        let expires_at =
            Utc::now().timestamp() + tokens.expires_in.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS);
        AuthenticatedUser::new(
            tokens.access_token,
            tokens.refresh_token,
            tokens.id_token,
            expires_at,
            Some(profile),
        )
    }
}

/// Decode the (unverified) payload segment of a JWT into its claims.
fn id_token_claims(id_token: &str) -> Option<HashMap<String, Value>> {
    let payload = id_token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    serde_json::from_slice(&bytes).ok()
}

#[async_trait]
impl SessionClient for OidcSessionClient {
    async fn begin_login(&self) -> Result<Url, AuthError> {
        self.check_config()?;
        let discovery = self.discovery().await?;

        let state = Uuid::new_v4().to_string();
        self.cache.put_pending(PendingAuthorization {
            state: state.clone(),
        });

        let mut url = Url::parse(&discovery.authorization_endpoint)
            .map_err(|e| AuthError::Configuration(format!("bad authorization endpoint: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("response_type", &self.config.response_type)
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("scope", &self.config.scope)
            .append_pair("state", &state);
        Ok(url)
    }

    async fn begin_logout(&self) -> Result<Url, AuthError> {
        let discovery = self.discovery().await?;
        let end_session = discovery.end_session_endpoint.ok_or_else(|| {
            AuthError::Configuration("provider does not expose an end-session endpoint".into())
        })?;

        let id_token = self.cache.load().and_then(|user| user.id_token);
        self.cache.clear();

        let mut url = Url::parse(&end_session)
            .map_err(|e| AuthError::Configuration(format!("bad end-session endpoint: {}", e)))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair(
                "post_logout_redirect_uri",
                &self.config.post_logout_redirect_uri,
            );
            if let Some(id_token) = &id_token {
                pairs.append_pair("id_token_hint", id_token);
            }
        }
        Ok(url)
    }

    fn supports_logout(&self) -> bool {
        self.discovery
            .read()
            .expect("discovery lock poisoned")
            .as_ref()
            .is_some_and(|doc| doc.end_session_endpoint.is_some())
    }

    async fn complete_callback(
        &self,
        query: &HashMap<String, String>,
    ) -> Result<AuthenticatedUser, AuthError> {
        let code = query
            .get("code")
            .filter(|code| !code.is_empty())
            .ok_or_else(|| AuthError::Callback("no authorization code in callback URL".into()))?;
        let state = query
            .get("state")
            .filter(|state| !state.is_empty())
            .ok_or_else(|| AuthError::Callback("no state in callback URL".into()))?;

        // The pending record is consumed here: a replayed callback finds
        // nothing to match and fails before any network call.
        let pending = self.cache.take_pending().ok_or_else(|| {
            AuthError::Callback("no pending authorization request for this callback".into())
        })?;
        if pending.state != *state {
            return Err(AuthError::Callback("state token mismatch".into()));
        }

        let discovery = self.discovery().await?;
        let resp = self
            .http
            .post(&discovery.token_endpoint)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("client_id", self.config.client_id.as_str()),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(AuthError::Callback(format!(
                "token endpoint returned {}",
                resp.status()
            )));
        }
        let tokens = resp
            .json::<TokenResponse>()
            .await
            .map_err(|e| AuthError::Callback(format!("invalid token response: {}", e)))?;

        let profile = self.load_profile(&discovery, &tokens).await;
        let user = Self::user_from_tokens(tokens, profile);
        self.cache.store(&user);
        info!("Code exchange completed, session established");
        Ok(user)
    }

    async fn renew_silently(&self) -> Result<AuthenticatedUser, AuthError> {
        let current = self
            .cache
            .load()
            .ok_or_else(|| AuthError::Renewal("no cached session to renew".into()))?;
        let refresh_token = current
            .refresh_token
            .as_deref()
            .ok_or_else(|| AuthError::Renewal("no refresh token available".into()))?;

        let discovery = self.discovery().await?;
        debug!("Attempting silent renewal against the token endpoint");
        let resp = self
            .http
            .post(&discovery.token_endpoint)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", self.config.client_id.as_str()),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(AuthError::Renewal(format!(
                "token endpoint returned {}",
                resp.status()
            )));
        }
        let tokens = resp
            .json::<TokenResponse>()
            .await
            .map_err(|e| AuthError::Renewal(format!("invalid token response: {}", e)))?;

        // Renewal keeps the established profile; a missing rotated
        // refresh token falls back to the previous one.
        let user = AuthenticatedUser::new(
            tokens.access_token,
            tokens.refresh_token.or(current.refresh_token),
            tokens.id_token.or(current.id_token),
            Utc::now().timestamp() + tokens.expires_in.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS),
            Some(current.profile),
        );
        self.cache.store(&user);
        info!("Silent renewal succeeded");
        Ok(user)
    }

    fn current_user(&self) -> Option<AuthenticatedUser> {
        self.cache.load()
    }
}
