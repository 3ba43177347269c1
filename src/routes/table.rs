use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::guards::RouteIntent;

pub const DEFAULT_LANDING: &str = "/";

/// One navigable view.
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq, Eq)]
pub struct RouteConfig {
    pub path: String,
    pub title: String,
    pub access: RouteIntent,
}

impl RouteConfig {
    pub fn new(path: &str, title: &str, access: RouteIntent) -> Self {
        Self {
            path: path.to_string(),
            title: title.to_string(),
            access,
        }
    }
}

/// The routes of the data explorer: a public home page, three data views
/// behind a session, and the sign-in pages.
pub fn default_routes() -> Vec<RouteConfig> {
    vec![
        RouteConfig::new("/", "Home", RouteIntent::Unrestricted),
        RouteConfig::new("/states", "States Search Example", RouteIntent::Protected),
        RouteConfig::new("/college", "College Concentrations", RouteIntent::Protected),
        RouteConfig::new("/commutes", "Commutes", RouteIntent::Protected),
        RouteConfig::new("/login", "Login", RouteIntent::PublicOnly),
        RouteConfig::new("/signup", "Signup", RouteIntent::PublicOnly),
    ]
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteTableError {
    #[error("landing path '{0}' is not a configured route")]
    MissingLanding(String),
    #[error("landing path '{0}' must be unrestricted")]
    RestrictedLanding(String),
    #[error("route path '{0}' is declared more than once")]
    DuplicatePath(String),
    #[error("route path '{0}' must start with '/'")]
    RelativePath(String),
}

/// Validated lookup from path to route.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteConfig>,
    landing: String,
}

impl RouteTable {
    pub fn new(routes: Vec<RouteConfig>, landing: &str) -> Result<Self, RouteTableError> {
        let mut routes = routes;
        for route in &mut routes {
            if !route.path.starts_with('/') {
                return Err(RouteTableError::RelativePath(route.path.clone()));
            }
            route.path = normalize(&route.path).to_string();
        }
        for (i, route) in routes.iter().enumerate() {
            if routes[..i].iter().any(|r| r.path == route.path) {
                return Err(RouteTableError::DuplicatePath(route.path.clone()));
            }
        }

        let landing = normalize(landing).to_string();
        match routes.iter().find(|r| r.path == landing) {
            None => return Err(RouteTableError::MissingLanding(landing)),
            Some(r) if r.access != RouteIntent::Unrestricted => {
                return Err(RouteTableError::RestrictedLanding(landing))
            }
            Some(_) => {}
        }

        Ok(Self { routes, landing })
    }

    /// The route serving `path`, ignoring any query string, fragment and
    /// trailing slash.
    pub fn resolve(&self, path: &str) -> Option<&RouteConfig> {
        let path = normalize(path);
        self.routes.iter().find(|r| r.path == path)
    }

    pub fn landing(&self) -> &str {
        &self.landing
    }

    pub fn routes(&self) -> &[RouteConfig] {
        &self.routes
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            routes: default_routes(),
            landing: DEFAULT_LANDING.to_string(),
        }
    }
}

fn normalize(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_matches_the_explorer_layout() {
        let table = RouteTable::new(default_routes(), DEFAULT_LANDING).expect("valid table");
        let access = |path| table.resolve(path).map(|r| r.access);

        assert_eq!(access("/"), Some(RouteIntent::Unrestricted));
        assert_eq!(access("/states"), Some(RouteIntent::Protected));
        assert_eq!(access("/college"), Some(RouteIntent::Protected));
        assert_eq!(access("/commutes"), Some(RouteIntent::Protected));
        assert_eq!(access("/login"), Some(RouteIntent::PublicOnly));
        assert_eq!(access("/signup"), Some(RouteIntent::PublicOnly));
        assert_eq!(access("/missing"), None);
    }

    #[test]
    fn resolve_ignores_query_and_trailing_slash() {
        let table = RouteTable::default();
        assert_eq!(
            table.resolve("/states/?name=Ohio#top").map(|r| r.path.as_str()),
            Some("/states")
        );
        assert_eq!(table.resolve("").map(|r| r.path.as_str()), Some("/"));
    }

    #[test]
    fn landing_must_exist_and_be_unrestricted() {
        assert_eq!(
            RouteTable::new(default_routes(), "/nowhere").unwrap_err(),
            RouteTableError::MissingLanding("/nowhere".to_string())
        );
        assert_eq!(
            RouteTable::new(default_routes(), "/login").unwrap_err(),
            RouteTableError::RestrictedLanding("/login".to_string())
        );
    }

    #[test]
    fn duplicate_and_relative_paths_are_rejected() {
        let mut routes = default_routes();
        routes.push(RouteConfig::new("/states/", "Again", RouteIntent::Protected));
        assert_eq!(
            RouteTable::new(routes, "/").unwrap_err(),
            RouteTableError::DuplicatePath("/states".to_string())
        );

        let routes = vec![RouteConfig::new("home", "Home", RouteIntent::Unrestricted)];
        assert_eq!(
            RouteTable::new(routes, "/").unwrap_err(),
            RouteTableError::RelativePath("home".to_string())
        );
    }
}
