pub mod base;
pub mod http_transport;

// Re-export from base.rs so we can do "use crate::transport::*;"
pub use base::*;
pub use http_transport::HttpSessionTransport;
