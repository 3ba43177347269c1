use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::AuthState;

/// Who may see a route.
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RouteIntent {
    /// Only reachable while signed out, e.g. login and signup.
    PublicOnly,
    /// Only reachable while signed in.
    Protected,
    Unrestricted,
}

/// The outcome of a guard for one navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    /// Render nothing of the requested view and go here instead.
    Redirect(String),
    /// The session check has not answered yet; show a loading state and
    /// evaluate again once the state settles.
    Pending,
}

/// Decides whether a view with `intent` may render under `state`.
///
/// Redirects always target `landing`, which must be unrestricted.
pub fn authorize(state: &AuthState, intent: RouteIntent, landing: &str) -> GuardDecision {
    if intent == RouteIntent::Unrestricted {
        return GuardDecision::Render;
    }
    if !state.is_settled() {
        return GuardDecision::Pending;
    }

    let allowed = match intent {
        RouteIntent::Protected => state.is_authenticated(),
        RouteIntent::PublicOnly => !state.is_authenticated(),
        RouteIntent::Unrestricted => true,
    };

    if allowed {
        GuardDecision::Render
    } else {
        debug!(
            event_name = "guards.redirect",
            event_domain = "guards",
            intent = ?intent,
            state = state.name(),
            target = landing,
            "navigation redirected"
        );
        GuardDecision::Redirect(landing.to_string())
    }
}
