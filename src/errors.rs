use thiserror::Error;

/// Failure classes surfaced by the session client and the cluster API.
///
/// Orchestrators map these onto user-facing notices and navigation;
/// the variants therefore distinguish what the user can act on
/// (sign in again, fix deployment config) rather than transport detail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The engine or provider is misconfigured. Startup-time failures
    /// such as an unreachable discovery document land here.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The authorization callback could not be completed.
    #[error("callback error: {0}")]
    Callback(String),

    /// Silent renewal failed and an interactive login is needed.
    #[error("renewal error: {0}")]
    Renewal(String),

    /// The server rejected the bearer token.
    #[error("unauthorized response from {endpoint}")]
    Unauthorized { endpoint: &'static str },

    /// The callback URL lacks a required parameter.
    #[error("missing callback parameter: {0}")]
    MissingCallbackParameter(&'static str),

    /// A status outside the handled set was returned.
    #[error("unexpected response {status} from {endpoint}")]
    UnexpectedResponse { status: u16, endpoint: &'static str },

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(e: reqwest::Error) -> Self {
        AuthError::Transport(e.to_string())
    }
}
