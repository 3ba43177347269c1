pub mod navbar;
pub mod router;

pub use navbar::{links, NavLink};
pub use router::{Navigator, Router, Screen};
