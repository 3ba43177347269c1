use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use http::StatusCode;
use tracing::{debug, info, warn};

use crate::models::AuthState;
use crate::navigation::Navigator;
use crate::store::AuthStateStore;
use crate::transport::{SessionCheck, SessionTransport};
use crate::utils::cancel::{bounded, Bounded, CancellationToken};
use crate::utils::log_throttle::LogThrottle;

const FAILURE_LOG_WINDOW: Duration = Duration::from_secs(30);

/// How a logout attempt ended. Only `Confirmed` changes the auth state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutOutcome {
    Confirmed,
    /// The server answered with something other than `204 No Content`.
    Rejected(StatusCode),
    /// No answer: transport error or timeout.
    Failed,
    /// The owning application instance went away first.
    Cancelled,
}

/// Owns the check / login / logout protocol and is the only writer of the
/// auth state store.
///
/// Transport failures never escape: a failed check degrades to
/// `Unauthenticated`, a failed logout leaves the state untouched.
pub struct AuthController {
    transport: Arc<dyn SessionTransport>,
    store: AuthStateStore,
    navigator: Arc<dyn Navigator>,
    landing: String,
    timeout: Duration,
    cancel: CancellationToken,
    throttle: LogThrottle,
    activated: AtomicBool,
}

impl AuthController {
    pub fn new(
        transport: Arc<dyn SessionTransport>,
        store: AuthStateStore,
        navigator: Arc<dyn Navigator>,
        landing: impl Into<String>,
        timeout: Duration,
        cancel: CancellationToken,
    ) -> Self {
        info!(
            "Creating auth controller using '{}' session transport",
            transport.get_name()
        );
        AuthController {
            transport,
            store,
            navigator,
            landing: landing.into(),
            timeout,
            cancel,
            throttle: LogThrottle::new(FAILURE_LOG_WINDOW),
            activated: AtomicBool::new(false),
        }
    }

    /// Current auth state.
    pub fn state(&self) -> AuthState {
        self.store.read()
    }

    /// Runs the start-up session check. Only the first call does anything;
    /// returns whether this call was it.
    pub async fn activate(&self) -> bool {
        if self.activated.swap(true, Ordering::SeqCst) {
            debug!("Auth controller already activated");
            return false;
        }
        self.check_session().await;
        true
    }

    /// Asks the session service who we are and records the answer.
    pub async fn check_session(&self) {
        // A signed-in user keeps their state while we re-check.
        if !self.store.read().is_authenticated() {
            self.store.write(AuthState::Checking);
        }

        let next = match bounded(self.transport.check_session(), self.timeout, &self.cancel).await
        {
            Bounded::Completed(Ok(SessionCheck::Valid(user))) => {
                info!(
                    event_name = "auth.session.check",
                    event_domain = "auth",
                    result = "authenticated",
                    user = %user,
                    "session check succeeded"
                );
                AuthState::Authenticated(user)
            }
            Bounded::Completed(Ok(SessionCheck::Invalid { status, reason })) => {
                debug!(
                    event_name = "auth.session.check",
                    event_domain = "auth",
                    result = "unauthenticated",
                    status = status.as_u16(),
                    reason = reason.as_str(),
                    "no valid session"
                );
                AuthState::Unauthenticated
            }
            Bounded::Completed(Err(e)) => {
                self.report_check_failure(&e.to_string());
                AuthState::Unauthenticated
            }
            Bounded::TimedOut => {
                self.report_check_failure(&format!("timed out after {:?}", self.timeout));
                AuthState::Unauthenticated
            }
            Bounded::Cancelled => {
                debug!("Session check cancelled; discarding result");
                return;
            }
        };

        self.store.write(next);
    }

    /// Resynchronizes with the server after an out-of-band sign-in.
    /// Calling it redundantly is harmless.
    pub async fn login(&self) {
        self.check_session().await;
    }

    /// Ends the session. The client only considers itself signed out once
    /// the server confirms with `204 No Content`.
    pub async fn logout(&self) -> LogoutOutcome {
        let outcome = match bounded(self.transport.end_session(), self.timeout, &self.cancel).await
        {
            Bounded::Completed(Ok(status)) if status == StatusCode::NO_CONTENT => {
                LogoutOutcome::Confirmed
            }
            Bounded::Completed(Ok(status)) => {
                warn!(
                    event_name = "auth.logout",
                    event_domain = "auth",
                    result = "rejected",
                    status = status.as_u16(),
                    "logout not confirmed by server; keeping current session state"
                );
                LogoutOutcome::Rejected(status)
            }
            Bounded::Completed(Err(e)) => {
                warn!(
                    event_name = "auth.logout",
                    event_domain = "auth",
                    result = "failed",
                    error = %e,
                    "failed to logout"
                );
                LogoutOutcome::Failed
            }
            Bounded::TimedOut => {
                warn!(
                    event_name = "auth.logout",
                    event_domain = "auth",
                    result = "timeout",
                    timeout_ms = self.timeout.as_millis() as u64,
                    "logout timed out"
                );
                LogoutOutcome::Failed
            }
            Bounded::Cancelled => {
                debug!("Logout cancelled; discarding result");
                LogoutOutcome::Cancelled
            }
        };

        if outcome == LogoutOutcome::Confirmed {
            info!(
                event_name = "auth.logout",
                event_domain = "auth",
                result = "confirmed",
                "session ended"
            );
            self.store.write(AuthState::Unauthenticated);
            self.navigator.navigate(&self.landing);
        }
        outcome
    }

    fn report_check_failure(&self, error: &str) {
        if let Some(suppressed_count) = self.throttle.should_emit("auth.session.check.failed") {
            warn!(
                event_name = "auth.session.check",
                event_domain = "auth",
                result = "failed",
                error,
                suppressed_count,
                "failed to check session; treating as unauthenticated"
            );
        }
    }
}
