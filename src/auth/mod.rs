// This module re-exports important pieces for convenience,
// so we can "use crate::auth::*" easily.
pub mod orchestrator;

pub use orchestrator::*;
