//! Per-sticker asset step and the bounded batch runner that drives it.

pub mod batch;
pub mod model;
pub mod scheduler;
pub mod step;
