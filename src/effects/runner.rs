use std::sync::Arc;

use reqwest::Url;
use tracing::{error, info};

use super::effect::{Effect, Notice};
use crate::routing::RouteId;
use crate::session::SessionClient;

/// Navigation capability supplied by the embedding UI layer.
pub trait Navigator: Send + Sync {
    /// Full-page redirect to an external URL.
    fn redirect(&self, url: &Url);
    /// In-app navigation to a declared route.
    fn navigate(&self, route: RouteId);
    /// Full reload of the current page.
    fn reload(&self);
}

/// Toast capability supplied by the embedding UI layer.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}

/// Executes effect batches against the host's capabilities.
///
/// Login/logout redirects are resolved through the session client here,
/// so a failure to build the redirect URL is logged and absorbed instead
/// of breaking navigation.
pub struct EffectRunner {
    client: Arc<dyn SessionClient>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
}

impl EffectRunner {
    pub fn new(
        client: Arc<dyn SessionClient>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        EffectRunner {
            client,
            navigator,
            notifier,
        }
    }

    pub async fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            self.run_one(effect).await;
        }
    }

    async fn run_one(&self, effect: Effect) {
        match effect {
            Effect::Notify(notice) => self.notifier.notify(&notice),
            Effect::RedirectTo(url) => self.navigator.redirect(&url),
            Effect::NavigateTo(route) => self.navigator.navigate(route),
            Effect::NavigateToAfter { route, delay } => {
                tokio::time::sleep(delay).await;
                self.navigator.navigate(route);
            }
            Effect::BeginLogin => match self.client.begin_login().await {
                Ok(url) => {
                    info!("Redirecting to interactive login");
                    self.navigator.redirect(&url);
                }
                Err(e) => error!("Error during sign in: {}", e),
            },
            Effect::BeginLogout => match self.client.begin_logout().await {
                Ok(url) => self.navigator.redirect(&url),
                Err(e) => error!("Error during sign out: {}", e),
            },
            Effect::ReloadPage => self.navigator.reload(),
        }
    }
}
