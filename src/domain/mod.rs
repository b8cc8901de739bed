//! Domain types for research runs.

pub mod artifact;
pub mod request;
pub mod run;

pub use artifact::ReportArtifact;
pub use request::{RequestError, ResearchRequest};
pub use run::{Run, RunResult, RunState};
