//! Core orchestration logic.
//!
//! - `orchestrator`: drives one research run end to end

pub mod orchestrator;

pub use orchestrator::Orchestrator;
