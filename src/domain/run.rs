//! Run state and captured process output.
//!
//! A Run represents a single invocation of the research script. There is no
//! retry and no resume: every state other than Running is terminal, and a
//! new submission always starts a fresh run.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::artifact::ReportArtifact;
use super::request::ResearchRequest;

/// Captured output of one script invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Exit code of the script (None if terminated by a signal)
    pub exit_code: Option<i32>,

    /// Everything the script wrote to stdout, unmodified
    pub stdout: String,

    /// Everything the script wrote to stderr, unmodified
    pub stderr: String,

    /// Wall-clock time the invocation took
    pub duration: Duration,
}

impl RunResult {
    /// Whether the script exited with status 0
    ///
    /// A clean exit does not imply a report was produced; the artifact
    /// check decides the run outcome.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// A single research run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    /// Unique identifier for this run
    pub id: Uuid,

    /// The validated request that started the run
    pub request: ResearchRequest,

    /// Current state of the run
    pub state: RunState,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run reached a terminal state
    pub completed_at: Option<DateTime<Utc>>,

    /// Captured script output (absent when the run timed out)
    pub result: Option<RunResult>,

    /// The report the script produced, if any
    pub artifact: Option<ReportArtifact>,
}

impl Run {
    /// Start a new run for a request
    pub fn new(request: ResearchRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            request,
            state: RunState::Running,
            started_at: Utc::now(),
            completed_at: None,
            result: None,
            artifact: None,
        }
    }

    /// Move the run to a terminal state
    pub fn finish(&mut self, state: RunState) {
        self.state = state;
        self.completed_at = Some(Utc::now());
    }

    /// Check if the run is still in progress
    pub fn is_running(&self) -> bool {
        matches!(self.state, RunState::Running)
    }

    /// Check if the run has reached a terminal state
    pub fn is_finished(&self) -> bool {
        !self.is_running()
    }
}

/// State of a research run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum RunState {
    /// The script is executing
    Running,

    /// The script finished and left a report behind
    CompletedWithReport,

    /// The script finished but no report file exists
    CompletedWithoutReport,

    /// The script exceeded the wall-clock budget and was terminated
    TimedOut,
}
