//! Side effects emitted by the orchestrators.
//!
//! Transition logic stays pure: orchestrator methods return a batch of
//! effects instead of touching the browsing context inline, and the host
//! runs them through an [`super::EffectRunner`]. This keeps every decision
//! testable without a browser.

use std::time::Duration;

use reqwest::Url;

use crate::routing::RouteId;

/// An action for the effect-execution layer to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Show a transient toast notification.
    Notify(Notice),
    /// Full-page redirect to an external URL; replaces the browsing
    /// context, abandoning any in-flight work.
    RedirectTo(Url),
    /// In-app navigation to a declared route.
    NavigateTo(RouteId),
    /// In-app navigation after a fixed delay. The delay lets an error
    /// notice remain visible before moving away.
    NavigateToAfter { route: RouteId, delay: Duration },
    /// Ask the session client for the interactive-login URL and redirect
    /// to it. Resolution failures are logged and absorbed.
    BeginLogin,
    /// Same, for the provider's end-session endpoint.
    BeginLogout,
    /// Force a full reload so no stale in-memory state survives.
    ReloadPage,
}

/// How long an error notice stays visible before a scheduled navigation
/// away from the failed callback.
pub const HOME_REDIRECT_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A transient toast. Durations follow the original UI conventions:
/// short-lived confirmations, longer-lived errors.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub duration: Duration,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Info,
            message: message.into(),
            duration: Duration::from_secs(2),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Success,
            message: message.into(),
            duration: Duration::from_secs(3),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Warning,
            message: message.into(),
            duration: Duration::from_secs(5),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Error,
            message: message.into(),
            duration: Duration::from_secs(5),
        }
    }
}

impl Effect {
    /// Convenience matcher for tests and hosts filtering notifications.
    pub fn as_notice(&self) -> Option<&Notice> {
        match self {
            Effect::Notify(notice) => Some(notice),
            _ => None,
        }
    }
}
