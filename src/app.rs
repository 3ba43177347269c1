//! One running application instance.
//!
//! An [`App`] owns its own auth state store, router and controller. Nothing
//! is process-global, so several instances (e.g. in tests) never interfere.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::info;
use uuid::Uuid;

use crate::auth::{AuthController, LogoutOutcome};
use crate::config::ConfigV1;
use crate::models::{AuthState, SessionRecord};
use crate::navigation::{links, NavLink, Router, Screen};
use crate::routes::RouteTableError;
use crate::store::AuthStateStore;
use crate::transport::SessionTransport;
use crate::utils::cancel::CancellationToken;

/// Read access to the session plus the login / logout operations, as handed
/// to views and UI affordances.
#[derive(Clone)]
pub struct AuthContext {
    controller: Arc<AuthController>,
    store: AuthStateStore,
}

impl AuthContext {
    pub fn state(&self) -> AuthState {
        self.store.read()
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.read().is_authenticated()
    }

    pub fn user(&self) -> Option<SessionRecord> {
        self.store.read().user().cloned()
    }

    /// Waits until the session check has produced an answer.
    pub async fn settled(&self) -> AuthState {
        let mut receiver = self.store.subscribe();
        let state = match receiver.wait_for(AuthState::is_settled).await {
            Ok(state) => state.clone(),
            Err(_) => self.store.read(),
        };
        state
    }

    pub async fn login(&self) {
        self.controller.login().await;
    }

    pub async fn logout(&self) -> LogoutOutcome {
        self.controller.logout().await
    }
}

pub struct App {
    id: Uuid,
    store: AuthStateStore,
    router: Arc<Router>,
    controller: Arc<AuthController>,
    cancel: CancellationToken,
    mounted: AtomicBool,
    activation: JoinHandle<bool>,
}

impl App {
    /// Builds the instance and starts the initial session check in the
    /// background. Must be called from within a tokio runtime.
    pub fn mount(
        config: &ConfigV1,
        transport: Arc<dyn SessionTransport>,
    ) -> Result<Self, RouteTableError> {
        let id = Uuid::new_v4();
        let table = config.route_table()?;
        let landing = table.landing().to_string();
        let store = AuthStateStore::new();
        let cancel = CancellationToken::new();
        let router = Arc::new(Router::new(table, store.clone()));
        let controller = Arc::new(AuthController::new(
            transport,
            store.clone(),
            router.clone(),
            landing,
            config.session.timeout(),
            cancel.clone(),
        ));

        info!(
            event_name = "app.mount",
            event_domain = "app",
            instance_id = %id,
            "application instance mounted"
        );
        let activation = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.activate().await })
        };

        Ok(App {
            id,
            store,
            router,
            controller,
            cancel,
            mounted: AtomicBool::new(true),
            activation,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    /// The auth context of this instance.
    ///
    /// # Panics
    ///
    /// When called after [`App::unmount`]; that is a wiring defect, not a
    /// runtime condition.
    pub fn auth(&self) -> AuthContext {
        assert!(
            self.is_mounted(),
            "auth context used outside an active application instance"
        );
        AuthContext {
            controller: self.controller.clone(),
            store: self.store.clone(),
        }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Navigates to `path` through the guards.
    pub fn visit(&self, path: &str) -> Screen {
        self.router.visit(path)
    }

    pub fn nav_links(&self) -> Vec<NavLink> {
        links(&self.store.read(), self.router.table())
    }

    /// Cancels in-flight session calls; their answers are discarded.
    pub fn unmount(&self) {
        if self.mounted.swap(false, Ordering::SeqCst) {
            self.cancel.cancel();
            info!(
                event_name = "app.unmount",
                event_domain = "app",
                instance_id = %self.id,
                "application instance unmounted"
            );
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.activation.abort();
    }
}
