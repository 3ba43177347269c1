use serde::Serialize;

use super::session::SessionRecord;

/// The client's belief about the current session.
///
/// A record exists exactly when the session is authenticated; the two can't
/// drift apart because they are the same variant.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(tag = "status", content = "user", rename_all = "snake_case")]
pub enum AuthState {
    /// Nothing has been asked yet.
    #[default]
    Unknown,
    /// A session check is in flight and no earlier answer is available.
    Checking,
    Authenticated(SessionRecord),
    Unauthenticated,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }

    pub fn user(&self) -> Option<&SessionRecord> {
        match self {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// False while the first answer from the session service is outstanding.
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            AuthState::Authenticated(_) | AuthState::Unauthenticated
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            AuthState::Unknown => "unknown",
            AuthState::Checking => "checking",
            AuthState::Authenticated(_) => "authenticated",
            AuthState::Unauthenticated => "unauthenticated",
        }
    }
}
