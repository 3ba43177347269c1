use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Where the backend session service lives and how long we wait for it.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct SessionConfig {
    /// Base URL of the session service, e.g. `http://localhost:4001`.
    pub base_url: String,
    #[serde(default = "default_session_path")]
    pub session_path: String,
    #[serde(default = "default_logout_path")]
    pub logout_path: String,
    /// Upper bound for a single check or logout call.
    #[serde(default = "default_timeout_in_ms")]
    pub timeout_in_ms: u64,
    /// Optional `name=value` cookie seeded into the jar before the first request.
    /// Browsers carry the cookie themselves; headless clients need this.
    #[serde(default)]
    pub cookie: Option<String>,
}

impl SessionConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            session_path: default_session_path(),
            logout_path: default_logout_path(),
            timeout_in_ms: default_timeout_in_ms(),
            cookie: None,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_in_ms)
    }

    pub fn session_url(&self) -> String {
        join_url(&self.base_url, &self.session_path)
    }

    pub fn logout_url(&self) -> String {
        join_url(&self.base_url, &self.logout_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn default_session_path() -> String {
    "/session".to_string()
}

fn default_logout_path() -> String {
    "/logout".to_string()
}

fn default_timeout_in_ms() -> u64 {
    5000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_joined_without_double_slashes() {
        let config = SessionConfig::new("http://localhost:4001/");
        assert_eq!(config.session_url(), "http://localhost:4001/session");
        assert_eq!(config.logout_url(), "http://localhost:4001/logout");
    }

    #[test]
    fn timeout_is_in_milliseconds() {
        let mut config = SessionConfig::new("http://localhost:4001");
        config.timeout_in_ms = 250;
        assert_eq!(config.timeout(), Duration::from_millis(250));
    }
}
