// This module re-exports important pieces for convenience,
// so we can "use crate::effects::*" easily.
pub mod effect;
pub mod runner;

pub use effect::*;
pub use runner::*;
