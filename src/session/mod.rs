// This module re-exports important pieces for convenience,
// so we can "use crate::session::*" easily.
pub mod client;
pub mod oidc;

pub use client::*;
pub use oidc::*;
