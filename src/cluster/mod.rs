// This module re-exports important pieces for convenience,
// so we can "use crate::cluster::*" easily.
pub mod api;
pub mod orchestrator;

pub use api::*;
pub use orchestrator::*;
