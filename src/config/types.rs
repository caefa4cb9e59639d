use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0: identity provider settings, the business API
/// endpoint, and logging.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ConfigV1 {
    pub oidc: OidcConfig,
    pub api: ApiConfig,
    pub logging: LoggingConfig,
}

/// Identity-provider redirect contract, sourced from configuration at
/// startup. `redirect_uri` is expected to be `<origin>/auth/callback` and
/// `post_logout_redirect_uri` `<origin>/`.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct OidcConfig {
    pub authority: String,
    pub client_id: String,
    pub redirect_uri: String,
    pub post_logout_redirect_uri: String,
    #[serde(default = "default_response_type")]
    pub response_type: String,
    pub scope: String,
    #[serde(default)]
    pub automatic_silent_renew: bool,
    #[serde(default)]
    pub load_user_info: bool,
}

fn default_response_type() -> String {
    "code".to_string()
}

/// Where the cluster-proxy business API lives, and the 401 policy.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ApiConfig {
    pub base_url: String,
    /// When true, a 401 from the cluster endpoints appends an interactive
    /// re-login to the emitted effects. Off by default: the automatic
    /// re-login was retired to avoid redirect loops, and turning it back
    /// on is a deliberate choice.
    #[serde(default)]
    pub relogin_on_unauthorized: bool,
}

/// Load config from a YAML file named "config.yaml" in the current
/// directory, with `CLUSTERGATE_`-prefixed environment overrides.
pub fn load_config() -> Result<ConfigV1, figment::Error> {
    let figment = Figment::new()
        .merge(Yaml::file("./config.yaml"))
        .merge(Env::prefixed("CLUSTERGATE_").split("__"));
    let Config::ConfigV1(config) = figment.extract::<Config>()?;
    Ok(config)
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() {
    let schema = schema_for!(Config);
    println!("{}", serde_json::to_string_pretty(&schema).unwrap());
}
