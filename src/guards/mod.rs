//! Route authorization policies.
//!
//! Both policies are pure functions of the current [`AuthState`](crate::models::AuthState)
//! and the intent of the requested route. Callers pass the state in; nothing
//! here reaches for shared context.

pub mod policy;

pub use policy::{authorize, GuardDecision, RouteIntent};
