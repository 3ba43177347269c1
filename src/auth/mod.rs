pub mod controller;

// Re-export from controller.rs so we can do "use crate::auth::*;"
pub use controller::{AuthController, LogoutOutcome};
