use tokio::sync::watch;
use tracing::debug;

use crate::models::AuthState;

/// Holds the one `AuthState` of an application instance.
///
/// Cloning yields another handle to the same value. Only the controller can
/// write; everything else reads or subscribes.
#[derive(Clone)]
pub struct AuthStateStore {
    sender: watch::Sender<AuthState>,
}

impl AuthStateStore {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(AuthState::Unknown);
        Self { sender }
    }

    /// The latest value.
    pub fn read(&self) -> AuthState {
        self.sender.borrow().clone()
    }

    /// A receiver that is woken on every write.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.sender.subscribe()
    }

    /// Replaces the whole state; readers see either the old or the new value.
    pub(crate) fn write(&self, next: AuthState) {
        let previous = self.sender.send_replace(next);
        debug!(
            event_name = "store.auth_state.write",
            event_domain = "store",
            from = previous.name(),
            to = self.sender.borrow().name(),
            "auth state replaced"
        );
    }
}

impl Default for AuthStateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionRecord;

    #[test]
    fn starts_unknown() {
        assert_eq!(AuthStateStore::new().read(), AuthState::Unknown);
    }

    #[test]
    fn write_replaces_and_is_visible_to_every_handle() {
        let store = AuthStateStore::new();
        let other = store.clone();
        let user = SessionRecord::new("1", "ana").expect("valid record");

        store.write(AuthState::Authenticated(user.clone()));
        assert_eq!(other.read(), AuthState::Authenticated(user));

        store.write(AuthState::Unauthenticated);
        assert_eq!(other.read(), AuthState::Unauthenticated);
        assert!(other.read().user().is_none());
    }

    #[tokio::test]
    async fn subscribers_are_notified() {
        let store = AuthStateStore::new();
        let mut receiver = store.subscribe();

        store.write(AuthState::Checking);
        receiver.changed().await.expect("sender alive");
        assert_eq!(*receiver.borrow(), AuthState::Checking);
    }

    #[test]
    fn separate_stores_do_not_interfere() {
        let first = AuthStateStore::new();
        let second = AuthStateStore::new();
        first.write(AuthState::Unauthenticated);
        assert_eq!(second.read(), AuthState::Unknown);
    }
}
