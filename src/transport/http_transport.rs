use std::sync::Arc;

use http::StatusCode;
use reqwest::cookie::Jar;
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::{debug, info};

use super::{SessionCheck, SessionTransport, TransportError};
use crate::config::SessionConfig;
use crate::models::SessionRecord;

/// Talks to the session service over HTTP, keeping cookies in a shared jar so
/// whatever the login flow set is sent with every check and logout.
pub struct HttpSessionTransport {
    client: Client,
    session_url: String,
    logout_url: String,
}

impl HttpSessionTransport {
    pub fn new(config: &SessionConfig) -> Result<Self, TransportError> {
        let jar = Arc::new(Jar::default());
        if let Some(cookie) = &config.cookie {
            let url = Url::parse(&config.base_url).map_err(|e| TransportError::InvalidUrl {
                url: config.base_url.clone(),
                reason: e.to_string(),
            })?;
            jar.add_cookie_str(cookie, &url);
        }
        Self::with_cookie_jar(config, jar)
    }

    /// Shares `jar` with whatever else performs requests for this user
    /// (e.g. the credential-submission flow).
    pub fn with_cookie_jar(config: &SessionConfig, jar: Arc<Jar>) -> Result<Self, TransportError> {
        info!(
            "Creating HTTP session transport for '{}'",
            config.base_url
        );
        let client = Client::builder().cookie_provider(jar).build()?;
        Ok(Self {
            client,
            session_url: config.session_url(),
            logout_url: config.logout_url(),
        })
    }
}

#[async_trait::async_trait]
impl SessionTransport for HttpSessionTransport {
    fn get_name(&self) -> &str {
        "http"
    }

    async fn check_session(&self) -> Result<SessionCheck, TransportError> {
        debug!("Sending session check request to: {}", self.session_url);
        let response = self.client.get(&self.session_url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Ok(SessionCheck::Invalid {
                status,
                reason: format!("unexpected status code: {}", status),
            });
        }

        let body = response.text().await.map_err(TransportError::Body)?;
        if body.trim().is_empty() {
            return Ok(SessionCheck::Invalid {
                status,
                reason: "empty session body".to_string(),
            });
        }

        let parsed = match serde_json::from_str::<Value>(&body) {
            Ok(v) => SessionRecord::from_json(&v).map_err(|e| e.to_string()),
            Err(e) => Err(format!("error parsing JSON: {}", e)),
        };
        Ok(match parsed {
            Ok(record) => SessionCheck::Valid(record),
            Err(reason) => SessionCheck::Invalid { status, reason },
        })
    }

    async fn end_session(&self) -> Result<StatusCode, TransportError> {
        debug!("Sending logout request to: {}", self.logout_url);
        let response = self.client.get(&self.logout_url).send().await?;
        Ok(response.status())
    }
}
