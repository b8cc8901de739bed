//! Timeout Integration Tests
//!
//! The wall-clock budget is the only cancellation mechanism: a run that
//! exceeds it is reported as timed out, its child is terminated, and no
//! artifact is read.

use std::time::{Duration, Instant};

use research_runner::{Orchestrator, ResearchRequest, RunState, ScriptRunner};
use tempfile::TempDir;

fn sh_orchestrator(dir: &TempDir, script: &str, budget: Duration) -> Orchestrator {
    let runner = ScriptRunner::with_command(
        "/bin/sh",
        vec!["-c".to_string(), script.to_string()],
        dir.path().to_path_buf(),
    );
    Orchestrator::new(runner, dir.path().join("output.md"), budget)
}

#[tokio::test]
async fn test_timeout_reported() {
    let temp = TempDir::new().unwrap();
    let orchestrator = sh_orchestrator(&temp, "sleep 5", Duration::from_millis(100));

    let start = Instant::now();
    let err = orchestrator
        .submit(&ResearchRequest::default())
        .await
        .unwrap_err();

    assert!(err.is_timeout());
    // The wait was abandoned at the budget, not at script completion
    assert!(start.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_timed_out_run_reads_no_artifact() {
    let temp = TempDir::new().unwrap();
    // The script manages to write a report before stalling; a timed-out
    // run must not trust it
    let orchestrator = sh_orchestrator(
        &temp,
        "printf '# Partial report' > output.md; sleep 5",
        Duration::from_millis(200),
    );

    let run = orchestrator
        .execute(ResearchRequest::default())
        .await
        .unwrap();

    assert_eq!(run.state, RunState::TimedOut);
    assert!(run.result.is_none());
    assert!(run.artifact.is_none());
}

#[tokio::test]
async fn test_child_is_terminated_on_timeout() {
    let temp = TempDir::new().unwrap();
    let marker = temp.path().join("late.txt");
    let orchestrator = sh_orchestrator(
        &temp,
        "sleep 1; touch late.txt",
        Duration::from_millis(100),
    );

    let err = orchestrator
        .submit(&ResearchRequest::default())
        .await
        .unwrap_err();
    assert!(err.is_timeout());

    // If the shell had survived the timeout it would create the marker
    // after its sleep finished
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(!marker.exists());
}

#[tokio::test]
async fn test_run_within_budget_is_unaffected() {
    let temp = TempDir::new().unwrap();
    let orchestrator = sh_orchestrator(
        &temp,
        "cat > /dev/null; printf '# Quick' > output.md",
        Duration::from_secs(10),
    );

    let run = orchestrator
        .execute(ResearchRequest::default())
        .await
        .unwrap();

    assert_eq!(run.state, RunState::CompletedWithReport);
}

#[tokio::test]
async fn test_timeout_error_names_the_budget() {
    let temp = TempDir::new().unwrap();
    let orchestrator = sh_orchestrator(&temp, "sleep 5", Duration::from_secs(1));

    let err = orchestrator
        .submit(&ResearchRequest::default())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("1s"));
}
