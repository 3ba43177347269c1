//! Library exports for sessiontron, shared between the binary and tests.

pub mod app;
pub mod auth;
pub mod config;
pub mod guards;
pub mod models;
pub mod navigation;
pub mod routes;
pub mod startup;
pub mod store;
pub mod transport;
pub mod utils;
