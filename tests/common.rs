#![allow(dead_code)]

use std::sync::Arc;

use figment::{
    providers::{Format, Yaml},
    Figment,
};
use http::StatusCode;
use sessiontron::app::App;
use sessiontron::config::{extract_config, ConfigV1};
use sessiontron::transport::{HttpSessionTransport, SessionCheck, SessionTransport, TransportError};

pub const SESSION_BODY: &str = r#"{"id": 1, "username": "ana", "credentialMaterial": "x"}"#;

/// Test config pointed at `base_url`, with the default route table.
pub fn build_config(base_url: &str, timeout_in_ms: u64) -> ConfigV1 {
    let yaml = format!(
        r#"
version: "1.0.0"
logging:
  level: "warn"
  format: "json"
session:
  base_url: "{base_url}"
  timeout_in_ms: {timeout_in_ms}
"#
    );
    extract_config(Figment::new().merge(Yaml::string(&yaml))).expect("Failed to parse test config YAML")
}

/// Mounts an app talking HTTP to `base_url`.
pub fn mount_http(base_url: &str) -> App {
    let config = build_config(base_url, 3000);
    let transport =
        Arc::new(HttpSessionTransport::new(&config.session).expect("transport should build"));
    App::mount(&config, transport).expect("app should mount")
}

/// A transport whose calls never return.
pub struct HangingTransport;

#[async_trait::async_trait]
impl SessionTransport for HangingTransport {
    fn get_name(&self) -> &str {
        "hanging"
    }

    async fn check_session(&self) -> Result<SessionCheck, TransportError> {
        std::future::pending().await
    }

    async fn end_session(&self) -> Result<StatusCode, TransportError> {
        std::future::pending().await
    }
}
