// This module re-exports important pieces for convenience,
// so we can "use crate::models::*" easily.
pub mod cluster;
pub mod session;
pub mod user;

pub use cluster::*;
pub use session::*;
pub use user::*;
