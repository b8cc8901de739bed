//! Orchestrator for research runs.
//!
//! Mediates between the validated request and the external script: clears
//! any stale report, spawns exactly one child process per submission, then
//! checks whether the script left a report behind. A clean exit is never
//! taken as proof of success; only the artifact check decides the outcome.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, error, info, instrument, warn};

use crate::adapters::{RunError, Runner, ScriptRunner};
use crate::config;
use crate::domain::{ReportArtifact, ResearchRequest, Run, RunResult, RunState};

/// Drives one research run end to end
pub struct Orchestrator {
    /// Subprocess runner for the research script
    runner: ScriptRunner,

    /// Where the script writes its report
    artifact_path: PathBuf,

    /// Wall-clock budget for one submission
    timeout: Duration,
}

impl Orchestrator {
    /// Create an orchestrator from the resolved configuration
    pub fn from_config() -> Result<Self> {
        let config = config::config()?;
        Ok(Self {
            runner: ScriptRunner::from_config(config),
            artifact_path: config.artifact_path.clone(),
            timeout: config.timeout(),
        })
    }

    /// Create an orchestrator with explicit collaborators
    pub fn new(runner: ScriptRunner, artifact_path: PathBuf, timeout: Duration) -> Self {
        Self {
            runner,
            artifact_path,
            timeout,
        }
    }

    /// Override the wall-clock budget
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Invoke the script once with the serialized request
    ///
    /// Spawns exactly one child process, no retries. Stdout and stderr are
    /// captured unmodified. On timeout the child is terminated and no
    /// partial result is returned.
    #[instrument(skip(self, request), fields(topic = %request.topic, breadth = request.breadth, depth = request.depth))]
    pub async fn submit(&self, request: &ResearchRequest) -> Result<RunResult, RunError> {
        // A report left by a previous run must never be presented as this
        // run's output.
        self.clear_stale_artifact();

        info!("starting research run");
        let result = self.runner.run(&request.stdin_payload(), self.timeout).await?;

        if result.success() {
            info!(duration_ms = result.duration.as_millis() as u64, "script finished");
        } else {
            warn!(
                exit_code = ?result.exit_code,
                duration_ms = result.duration.as_millis() as u64,
                "script exited with non-zero status"
            );
        }

        Ok(result)
    }

    /// Load the report the script writes, if it exists
    pub fn load_artifact(&self) -> Result<Option<ReportArtifact>> {
        ReportArtifact::load(&self.artifact_path)
    }

    /// Run a request end to end and classify the outcome
    ///
    /// Timeouts become a terminal `TimedOut` state with no artifact read.
    /// Spawn and IO failures propagate; they indicate a broken setup, not
    /// a run outcome.
    pub async fn execute(&self, request: ResearchRequest) -> Result<Run> {
        let mut run = Run::new(request);

        match self.submit(&run.request).await {
            Ok(result) => {
                run.result = Some(result);
                match self.load_artifact()? {
                    Some(artifact) => {
                        info!(
                            size_bytes = artifact.size_bytes,
                            path = %artifact.path.display(),
                            "report generated"
                        );
                        run.artifact = Some(artifact);
                        run.finish(RunState::CompletedWithReport);
                    }
                    None => {
                        warn!(
                            path = %self.artifact_path.display(),
                            "script completed but produced no report"
                        );
                        run.finish(RunState::CompletedWithoutReport);
                    }
                }
            }
            Err(e) if e.is_timeout() => {
                error!(timeout_secs = self.timeout.as_secs(), "research run timed out");
                run.finish(RunState::TimedOut);
            }
            Err(e) => return Err(e.into()),
        }

        Ok(run)
    }

    /// Remove a leftover report file from a previous run
    fn clear_stale_artifact(&self) {
        match std::fs::remove_file(&self.artifact_path) {
            Ok(()) => debug!(path = %self.artifact_path.display(), "removed stale report"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                path = %self.artifact_path.display(),
                error = %e,
                "failed to remove stale report"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orchestrator_construction() {
        let runner = ScriptRunner::with_command("true", vec![], std::env::temp_dir());
        let orchestrator = Orchestrator::new(
            runner,
            std::env::temp_dir().join("output.md"),
            Duration::from_secs(600),
        )
        .with_timeout(Duration::from_secs(5));

        assert_eq!(orchestrator.timeout, Duration::from_secs(5));
    }
}
