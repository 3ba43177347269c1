pub mod state_store;

pub use state_store::AuthStateStore;
