pub mod classify;
pub mod engine;
pub mod lookup;
pub mod matcher;
pub mod result;

pub use engine::{ReconConfig, ReconEngine};
pub use result::*;
