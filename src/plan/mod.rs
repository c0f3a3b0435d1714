//! Turning a request's mood, style and language into concrete work items.

pub mod builder;
pub mod selector;
pub mod text_plan;
