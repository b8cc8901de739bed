//! Subprocess runner for the research script.
//!
//! Spawns the configured command (default: `npx tsx --env-file=.env.local
//! src/run.ts`) inside the script's project root, pipes the three-line
//! request to stdin, and collects stdout/stderr. The child is spawned with
//! kill-on-drop so the timeout path terminates it instead of leaving
//! orphaned work behind.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;

use super::{RunError, Runner};
use crate::config::ResolvedConfig;
use crate::domain::RunResult;

/// Runs the research script as a child process
pub struct ScriptRunner {
    /// Program to execute (e.g. "npx")
    program: String,

    /// Arguments (e.g. ["tsx", "--env-file=.env.local", "src/run.ts"])
    args: Vec<String>,

    /// Working directory for the child (the script's project root)
    workdir: PathBuf,
}

impl ScriptRunner {
    /// Create a runner from resolved configuration
    ///
    /// The resolved command is guaranteed non-empty by config loading.
    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self {
            program: config.command[0].clone(),
            args: config.command[1..].to_vec(),
            workdir: config.project_root.clone(),
        }
    }

    /// Create a runner with an explicit command line and working directory
    pub fn with_command(program: impl Into<String>, args: Vec<String>, workdir: PathBuf) -> Self {
        Self {
            program: program.into(),
            args,
            workdir,
        }
    }

    /// Full command line, for error messages
    fn command_line(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }

    /// Spawn the script, deliver the payload, and wait within `budget`
    async fn invoke(&self, payload: &str, budget: Duration) -> Result<RunResult, RunError> {
        let start = Instant::now();

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .current_dir(&self.workdir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RunError::Spawn {
                command: self.command_line(),
                source,
            })?;

        // Write the request to stdin, then drop the handle to signal EOF.
        // A script that exits before draining stdin closes the pipe; that
        // is not an invocation failure.
        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(payload.as_bytes()).await {
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(RunError::Stdin(e));
                }
            }
        }

        // On timeout the wait future is dropped, which kills the child
        // via kill_on_drop.
        let output = match timeout(budget, child.wait_with_output()).await {
            Ok(result) => result.map_err(RunError::Wait)?,
            Err(_) => return Err(RunError::Timeout { budget }),
        };

        Ok(RunResult {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            duration: start.elapsed(),
        })
    }
}

#[async_trait]
impl Runner for ScriptRunner {
    fn name(&self) -> &str {
        "script"
    }

    async fn run(&self, payload: &str, budget: Duration) -> Result<RunResult, RunError> {
        self.invoke(payload, budget).await
    }
}
