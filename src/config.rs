//! Configuration for research-runner.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (RESEARCH_RUNNER_ROOT, RESEARCH_RUNNER_TIMEOUT)
//! 2. Config file (.research-runner/config.yaml)
//! 3. Defaults (current directory, `npx tsx --env-file=.env.local src/run.ts`,
//!    `output.md`, 600 second budget)
//!
//! Config file discovery:
//! - Searches current directory and parents for .research-runner/config.yaml,
//!   then falls back to ~/.research-runner/config.yaml
//! - Paths in the config file are relative to the config file's parent directory

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Wall-clock budget for one script run when nothing overrides it
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 600;

/// Env file the script runner loads by default
pub const DEFAULT_ENV_FILE: &str = ".env.local";

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub script: ScriptConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub limits: Option<LimitsConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScriptConfig {
    /// Full command line, first element is the program
    pub command: Option<Vec<String>>,
    /// Env file forwarded to the default command (ignored when `command` is set)
    pub env_file: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Script project root (relative to the config file's parent directory)
    pub project_root: Option<String>,
    /// Report file the script writes, relative to the project root
    pub artifact: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    pub timeout_seconds: Option<u64>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Absolute path to the script's project root (child working directory)
    pub project_root: PathBuf,

    /// Command line to invoke the script (never empty)
    pub command: Vec<String>,

    /// Absolute path to the report file the script writes
    pub artifact_path: PathBuf,

    /// Wall-clock budget for one run, in seconds
    pub timeout_seconds: u64,

    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl ResolvedConfig {
    /// The run budget as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Default script invocation: a TypeScript entry point driven by tsx,
/// with its environment file loaded from the project root
fn default_command(env_file: &str) -> Vec<String> {
    vec![
        "npx".to_string(),
        "tsx".to_string(),
        format!("--env-file={}", env_file),
        "src/run.ts".to_string(),
    ]
}

/// Find config file by searching current directory and parents,
/// then the home directory
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".research-runner").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    let home_config = dirs::home_dir()?.join(".research-runner").join("config.yaml");
    if home_config.exists() {
        return Some(home_config);
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to a base directory
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;

    let config_file = find_config_file();
    let file = match config_file.as_deref() {
        Some(path) => Some(load_config_file(path)?),
        None => None,
    };

    // Base for relative paths: the directory holding .research-runner/
    let base_dir = config_file
        .as_deref()
        .and_then(|p| p.parent())
        .and_then(|p| p.parent())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| cwd.clone());

    // Project root: env var wins, then config file, then current directory
    let project_root = if let Ok(env_root) = std::env::var("RESEARCH_RUNNER_ROOT") {
        PathBuf::from(env_root)
    } else if let Some(root) = file.as_ref().and_then(|f| f.paths.project_root.as_deref()) {
        resolve_path(&base_dir, root)
    } else {
        cwd
    };

    let command = match file.as_ref().and_then(|f| f.script.command.clone()) {
        Some(command) if !command.is_empty() => command,
        _ => {
            let env_file = file
                .as_ref()
                .and_then(|f| f.script.env_file.as_deref())
                .unwrap_or(DEFAULT_ENV_FILE);
            default_command(env_file)
        }
    };

    let artifact = file
        .as_ref()
        .and_then(|f| f.paths.artifact.as_deref())
        .unwrap_or(crate::domain::ReportArtifact::FILE_NAME);
    let artifact_path = project_root.join(artifact);

    let timeout_seconds = if let Ok(env_timeout) = std::env::var("RESEARCH_RUNNER_TIMEOUT") {
        env_timeout
            .parse()
            .context("RESEARCH_RUNNER_TIMEOUT must be an integer number of seconds")?
    } else {
        file.as_ref()
            .and_then(|f| f.limits.as_ref())
            .and_then(|l| l.timeout_seconds)
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    };

    Ok(ResolvedConfig {
        project_root,
        command,
        artifact_path,
        timeout_seconds,
        config_file,
    })
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_default_command_shape() {
        assert_eq!(
            default_command(".env.local"),
            vec!["npx", "tsx", "--env-file=.env.local", "src/run.ts"]
        );
        assert_eq!(
            default_command("prod.env")[2],
            "--env-file=prod.env".to_string()
        );
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let config_dir = temp.path().join(".research-runner");
        std::fs::create_dir_all(&config_dir).unwrap();

        let config_path = config_dir.join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            r#"
version: "1.0"
script:
  env_file: .env.production
paths:
  project_root: ./deep-research
  artifact: output.md
limits:
  timeout_seconds: 1200
"#
        )
        .unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.script.env_file, Some(".env.production".to_string()));
        assert_eq!(
            config.paths.project_root,
            Some("./deep-research".to_string())
        );
        assert_eq!(config.limits.unwrap().timeout_seconds, Some(1200));
    }

    #[test]
    fn test_config_file_explicit_command() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.yaml");
        std::fs::write(
            &config_path,
            r#"
version: "1.0"
script:
  command: ["node", "dist/run.js"]
"#,
        )
        .unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(
            config.script.command,
            Some(vec!["node".to_string(), "dist/run.js".to_string()])
        );
    }

    #[test]
    fn test_resolve_relative_path() {
        let base = PathBuf::from("/home/user/project");

        assert_eq!(
            resolve_path(&base, "./subdir"),
            PathBuf::from("/home/user/project/subdir")
        );
        assert_eq!(
            resolve_path(&base, "/absolute/path"),
            PathBuf::from("/absolute/path")
        );
    }

    #[test]
    fn test_resolved_timeout() {
        let config = ResolvedConfig {
            project_root: PathBuf::from("/project"),
            command: default_command(DEFAULT_ENV_FILE),
            artifact_path: PathBuf::from("/project/output.md"),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            config_file: None,
        };
        assert_eq!(config.timeout(), Duration::from_secs(600));
    }
}
