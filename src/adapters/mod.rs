//! Adapter interface for the external research script.
//!
//! The script is an opaque collaborator: this crate never parses its
//! output, it only delivers the request on stdin and captures whatever
//! comes back.

pub mod script;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::RunResult;

// Re-export the subprocess runner
pub use script::ScriptRunner;

/// Trait for invoking the research script
#[async_trait]
pub trait Runner: Send + Sync {
    /// Human-readable runner name
    fn name(&self) -> &str;

    /// Deliver `payload` on the script's stdin and wait for it to exit,
    /// bounded by `budget`
    async fn run(&self, payload: &str, budget: Duration) -> Result<RunResult, RunError>;
}

/// Failures of one script invocation
#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to spawn research script `{command}`")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write request to script stdin")]
    Stdin(#[source] std::io::Error),

    #[error("research script exceeded the {}s time budget and was terminated", .budget.as_secs())]
    Timeout { budget: Duration },

    #[error("failed while waiting for research script")]
    Wait(#[source] std::io::Error),
}

impl RunError {
    /// Whether this failure is the wall-clock budget being exceeded
    pub fn is_timeout(&self) -> bool {
        matches!(self, RunError::Timeout { .. })
    }
}
