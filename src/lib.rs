//! research-runner - CLI front-end for an external deep-research script
//!
//! Collects a research topic plus breadth/depth parameters, feeds them to
//! the script on standard input, waits for it to finish within a wall-clock
//! budget, then renders the markdown report the script leaves behind.
//!
//! # Architecture
//!
//! The research logic itself lives entirely in the external script; this
//! crate is the orchestration around it:
//! - Validate the request, serialize it to the script's stdin protocol
//! - Spawn the script, capture stdout/stderr, enforce the time budget
//! - Load the report artifact (its absence is an expected outcome, not a bug)
//!
//! # Modules
//!
//! - `adapters`: External script invocation (subprocess)
//! - `core`: Orchestration logic (Orchestrator)
//! - `domain`: Data structures (ResearchRequest, Run, ReportArtifact)
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Run with defaults (topic "Education in India", breadth 4, depth 2)
//! research-runner run
//!
//! # Run with explicit parameters and save the report
//! research-runner run "Rust adoption in embedded" --breadth 6 --depth 3 --save report.md
//!
//! # Re-display the last generated report
//! research-runner report
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;

// Re-export main types at crate root for convenience
pub use adapters::{RunError, Runner, ScriptRunner};
pub use core::Orchestrator;
pub use domain::{ReportArtifact, RequestError, ResearchRequest, Run, RunResult, RunState};
