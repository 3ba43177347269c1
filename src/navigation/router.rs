use std::sync::Mutex;

use tracing::{debug, info};

use crate::guards::{authorize, GuardDecision};
use crate::routes::RouteTable;
use crate::store::AuthStateStore;

/// What the view layer should show after a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    View { path: String, title: String },
    /// The session check hasn't answered yet for a guarded route.
    Loading { path: String },
    NotFound { path: String },
}

impl Screen {
    pub fn path(&self) -> &str {
        match self {
            Screen::View { path, .. } | Screen::Loading { path } | Screen::NotFound { path } => path,
        }
    }
}

/// Something that can move the user to another view.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str) -> Screen;
}

/// Resolves paths against the route table and guards them with the store's
/// current value at the moment of navigation.
pub struct Router {
    table: RouteTable,
    store: AuthStateStore,
    location: Mutex<String>,
}

impl Router {
    pub fn new(table: RouteTable, store: AuthStateStore) -> Self {
        let location = table.landing().to_string();
        Self {
            table,
            store,
            location: Mutex::new(location),
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// The path of the last screen shown.
    pub fn location(&self) -> String {
        match self.location.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Guards and shows `path`, following a redirect to the landing view.
    pub fn visit(&self, path: &str) -> Screen {
        let screen = self.evaluate(path);
        match self.location.lock() {
            Ok(mut guard) => *guard = screen.path().to_string(),
            Err(poisoned) => *poisoned.into_inner() = screen.path().to_string(),
        }
        info!(
            event_name = "navigation.visit",
            event_domain = "navigation",
            requested = path,
            shown = screen.path(),
            "navigated"
        );
        screen
    }

    /// Re-evaluates the current location, e.g. after the auth state changed.
    pub fn refresh(&self) -> Screen {
        let location = self.location();
        self.visit(&location)
    }

    fn evaluate(&self, path: &str) -> Screen {
        let state = self.store.read();
        let Some(route) = self.table.resolve(path) else {
            debug!("No route for '{}'", path);
            return Screen::NotFound {
                path: path.to_string(),
            };
        };

        match authorize(&state, route.access, self.table.landing()) {
            GuardDecision::Render => Screen::View {
                path: route.path.clone(),
                title: route.title.clone(),
            },
            GuardDecision::Pending => Screen::Loading {
                path: route.path.clone(),
            },
            // The landing route is unrestricted, so one hop always renders.
            GuardDecision::Redirect(target) => match self.table.resolve(&target) {
                Some(landing) => Screen::View {
                    path: landing.path.clone(),
                    title: landing.title.clone(),
                },
                None => Screen::NotFound { path: target },
            },
        }
    }
}

impl Navigator for Router {
    fn navigate(&self, path: &str) -> Screen {
        self.visit(path)
    }
}
