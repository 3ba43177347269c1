//! Static route configuration.
//!
//! Every navigable view is declared here with the access policy that guards
//! it. The table is built once from config and never changes at runtime.

mod table;

pub use table::{default_routes, RouteConfig, RouteTable, RouteTableError, DEFAULT_LANDING};
