//! Gate for routes that need a signed-in session.

use crate::{routes::AppRoute, service::SessionState};

/// What to show for a requested route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// The session is still being established.
    Loading,
    /// Navigate to `to`, replacing the current history entry when `replace` is set.
    Redirect { to: AppRoute, replace: bool },
    /// Show the requested content.
    Render,
}

/// Stateless guard; every decision is a function of the session state alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteGuard;

impl RouteGuard {
    /// Decision for protected content.
    #[must_use]
    pub fn check(state: &SessionState) -> GuardDecision {
        if !state.is_initialized || state.is_loading {
            GuardDecision::Loading
        } else if !state.is_authenticated {
            GuardDecision::Redirect {
                to: AppRoute::Entry,
                replace: true,
            }
        } else {
            GuardDecision::Render
        }
    }

    /// Decision for `route`; public routes always render.
    #[must_use]
    pub fn resolve(state: &SessionState, route: &AppRoute) -> GuardDecision {
        if route.is_protected() {
            Self::check(state)
        } else {
            GuardDecision::Render
        }
    }
}
