use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::logging::LoggingConfig;
use super::session::SessionConfig;
use crate::routes::{default_routes, RouteConfig, RouteTable, RouteTableError, DEFAULT_LANDING};

/// Environment variable pointing at an alternative config file.
pub const CONFIG_PATH_ENV: &str = "SESSIONTRON_CONFIG";
/// Prefix for environment overrides, e.g. `SESSIONTRON_SESSION__BASE_URL`.
pub const ENV_PREFIX: &str = "SESSIONTRON_";

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0: logging, the session service and the route table.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ConfigV1 {
    #[serde(default)]
    pub logging: LoggingConfig,
    pub session: SessionConfig,
    /// Unrestricted view used as the redirect target.
    #[serde(default = "default_landing")]
    pub landing: String,
    #[serde(default = "default_routes")]
    pub routes: Vec<RouteConfig>,
}

impl ConfigV1 {
    /// Config with the built-in route table, pointed at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            logging: LoggingConfig::default(),
            session: SessionConfig::new(base_url),
            landing: default_landing(),
            routes: default_routes(),
        }
    }

    /// Builds the validated route table described by this config.
    pub fn route_table(&self) -> Result<RouteTable, RouteTableError> {
        RouteTable::new(self.routes.clone(), &self.landing)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("error loading configuration: {0}")]
    Figment(#[from] figment::Error),
    #[error("invalid route configuration: {0}")]
    Routes(#[from] RouteTableError),
    #[error("session.timeout_in_ms must be greater than zero")]
    ZeroTimeout,
}

fn default_landing() -> String {
    DEFAULT_LANDING.to_string()
}

/// The standard figment: YAML file merged with prefixed environment variables.
pub fn figment() -> Figment {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "./config.yaml".to_string());
    Figment::new()
        .merge(Yaml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Extracts and validates a config from any figment.
pub fn extract_config(figment: Figment) -> Result<ConfigV1, ConfigError> {
    let config = match figment.extract::<Config>()? {
        Config::ConfigV1(c) => c,
    };
    // handle configuration migration between versions here when necessary
    if config.session.timeout_in_ms == 0 {
        return Err(ConfigError::ZeroTimeout);
    }
    config.route_table()?;
    Ok(config)
}

/// Load config from "config.yaml" (or `$SESSIONTRON_CONFIG`), exiting on error.
pub fn load_config() -> ConfigV1 {
    match extract_config(figment()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    }
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() -> Result<(), serde_json::Error> {
    let schema = schema_for!(Config);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guards::RouteIntent;

    fn extract(yaml: &str) -> Result<ConfigV1, ConfigError> {
        extract_config(Figment::new().merge(Yaml::string(yaml)))
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let config = extract(
            r#"
version: "1.0.0"
session:
  base_url: "http://localhost:4001"
"#,
        )
        .expect("config should parse");

        assert_eq!(config.landing, "/");
        assert_eq!(config.session.session_path, "/session");
        assert_eq!(config.session.logout_path, "/logout");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.routes, default_routes());
    }

    #[test]
    fn custom_routes_are_parsed() {
        let config = extract(
            r#"
version: "1.0.0"
session:
  base_url: "http://localhost:4001"
  timeout_in_ms: 1500
landing: "/home"
routes:
  - path: "/home"
    title: "Home"
    access: "unrestricted"
  - path: "/reports"
    title: "Reports"
    access: "protected"
  - path: "/login"
    title: "Login"
    access: "public-only"
"#,
        )
        .expect("config should parse");

        assert_eq!(config.session.timeout_in_ms, 1500);
        let table = config.route_table().expect("table should be valid");
        assert_eq!(table.landing(), "/home");
        assert_eq!(
            table.resolve("/login").map(|r| r.access),
            Some(RouteIntent::PublicOnly)
        );
    }

    #[test]
    fn protected_landing_is_rejected() {
        let result = extract(
            r#"
version: "1.0.0"
session:
  base_url: "http://localhost:4001"
landing: "/states"
"#,
        );
        assert!(matches!(result, Err(ConfigError::Routes(_))));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let result = extract(
            r#"
version: "1.0.0"
session:
  base_url: "http://localhost:4001"
  timeout_in_ms: 0
"#,
        );
        assert!(matches!(result, Err(ConfigError::ZeroTimeout)));
    }

    #[test]
    fn unknown_version_is_rejected() {
        let result = extract(
            r#"
version: "0.9.0"
session:
  base_url: "http://localhost:4001"
"#,
        );
        assert!(matches!(result, Err(ConfigError::Figment(_))));
    }
}
