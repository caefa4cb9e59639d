//! Statically declared routes and navigation intents.
//!
//! Route metadata is a typed descriptor attached to each route rather
//! than a dynamic property bag: the guard reads `requires_auth` through
//! an explicit accessor.

pub mod guard;
pub mod route;

pub use guard::*;
pub use route::*;
