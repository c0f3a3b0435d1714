//! Job lifecycle: submission, background execution, status polling and pack persistence.

pub mod orchestrator;
pub mod store;
