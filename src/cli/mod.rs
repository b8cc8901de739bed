//! Command-line interface for research-runner.
//!
//! This is the "form": a topic with a default value and two bounded
//! numeric parameters, one submit action (`run`), and one download action
//! (`--save`). Rendering mirrors the run transparently: the script's
//! stdout and stderr are always shown verbatim, even on success.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config;
use crate::core::Orchestrator;
use crate::domain::{
    request::{BREADTH_MAX, BREADTH_MIN, DEPTH_MAX, DEPTH_MIN},
    ReportArtifact, ResearchRequest, Run, RunState,
};

/// research-runner - run a deep-research script and render its report
#[derive(Parser, Debug)]
#[command(name = "research-runner")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the research script and display the generated report
    Run {
        /// Research topic
        #[arg(default_value = ResearchRequest::DEFAULT_TOPIC)]
        topic: String,

        /// Research breadth (recommended 2-10)
        #[arg(short, long, default_value_t = 4,
              value_parser = clap::value_parser!(u8).range(BREADTH_MIN as i64..=BREADTH_MAX as i64))]
        breadth: u8,

        /// Research depth (recommended 1-5)
        #[arg(short, long, default_value_t = 2,
              value_parser = clap::value_parser!(u8).range(DEPTH_MIN as i64..=DEPTH_MAX as i64))]
        depth: u8,

        /// Save a copy of the generated report to this path
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Override the wall-clock budget in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Print the run record as JSON instead of rendered text
        #[arg(long)]
        json: bool,
    },

    /// Display the current report without running the script
    Report {
        /// Save a copy of the report to this path
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Run {
                topic,
                breadth,
                depth,
                save,
                timeout,
                json,
            } => run_research(topic, breadth, depth, save, timeout, json).await,
            Commands::Report { save } => show_report(save),
            Commands::Config => show_config(),
        }
    }
}

/// Submit one research run and render the outcome
async fn run_research(
    topic: String,
    breadth: u8,
    depth: u8,
    save: Option<PathBuf>,
    timeout: Option<u64>,
    json: bool,
) -> Result<()> {
    let request = ResearchRequest::new(topic, breadth, depth)?;

    let mut orchestrator = Orchestrator::from_config()?;
    if let Some(secs) = timeout {
        orchestrator = orchestrator.with_timeout(Duration::from_secs(secs));
    }

    if !json {
        println!(
            "Researching \"{}\" (breadth {}, depth {})... this may take a while.",
            request.topic, request.breadth, request.depth
        );
    }

    let run = orchestrator.execute(request).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&run)?);
        return Ok(());
    }

    render_run(&run);
    offer_save(run.artifact.as_ref(), save.as_deref())?;

    Ok(())
}

/// Print the captured script output and the run outcome
fn render_run(run: &Run) {
    if let Some(result) = &run.result {
        println!();
        println!("=== CLI output ===");
        print_verbatim(&result.stdout);
        print_verbatim(&result.stderr);

        if !result.success() {
            match result.exit_code {
                Some(code) => println!("(script exited with status {})", code),
                None => println!("(script was terminated by a signal)"),
            }
        }
    }

    match run.state {
        RunState::CompletedWithReport => {
            if let Some(artifact) = &run.artifact {
                println!();
                println!("=== Generated report ===");
                print_verbatim(&artifact.content);
            }
        }
        RunState::CompletedWithoutReport => {
            println!();
            println!(
                "Error: the script completed but produced no {} file. \
                 Check the CLI output above for issues.",
                ReportArtifact::FILE_NAME
            );
        }
        RunState::TimedOut => {
            println!();
            println!("Error: the research run timed out. Try smaller breadth/depth.");
        }
        RunState::Running => {}
    }
}

/// Write a copy of the report where the user asked for it
fn offer_save(artifact: Option<&ReportArtifact>, save: Option<&std::path::Path>) -> Result<()> {
    let Some(dest) = save else {
        return Ok(());
    };

    match artifact {
        Some(artifact) => {
            artifact.save_to(dest)?;
            println!("Report saved to {}", dest.display());
        }
        None => println!("No report to save."),
    }

    Ok(())
}

/// Print text exactly as captured, without doubling trailing newlines
fn print_verbatim(text: &str) {
    if text.is_empty() {
        return;
    }
    print!("{}", text);
    if !text.ends_with('\n') {
        println!();
    }
}

/// Display the current report file, if any
fn show_report(save: Option<PathBuf>) -> Result<()> {
    let config = config::config()?;
    let artifact = ReportArtifact::load(&config.artifact_path)?
        .with_context(|| format!("No report found at {}", config.artifact_path.display()))?;

    print_verbatim(&artifact.content);
    offer_save(Some(&artifact), save.as_deref())?;

    Ok(())
}

/// Print the resolved configuration
fn show_config() -> Result<()> {
    let config = config::config()?;

    println!("Resolved configuration:");
    println!("  project root: {}", config.project_root.display());
    println!("  command:      {}", config.command.join(" "));
    println!("  artifact:     {}", config.artifact_path.display());
    println!("  timeout:      {}s", config.timeout_seconds);
    match &config.config_file {
        Some(path) => println!("  config file:  {}", path.display()),
        None => println!("  config file:  (none found, using defaults)"),
    }

    Ok(())
}
