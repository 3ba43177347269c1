pub mod auth_state;
pub mod session;

pub use auth_state::AuthState;
pub use session::{MalformedSession, SessionRecord};
