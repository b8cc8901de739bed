//! The report artifact produced by the research script.
//!
//! The script writes `output.md` into its project root as a side effect;
//! this layer only ever reads it. Absence of the file after a completed
//! run is an expected outcome to detect, not an invariant violation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A markdown report read from the script's output path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportArtifact {
    /// Where the report was read from
    pub path: PathBuf,

    /// Full UTF-8 contents of the report
    pub content: String,

    /// Size in bytes
    pub size_bytes: u64,

    /// When the report was read
    pub loaded_at: DateTime<Utc>,
}

impl ReportArtifact {
    /// Well-known file name the script writes, and the default name
    /// offered when saving a copy
    pub const FILE_NAME: &'static str = "output.md";

    /// Load the report at `path` if it exists
    ///
    /// Returns `Ok(None)` when the file is absent. Errors only on real
    /// IO failures or non-UTF-8 content.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read report at {}", path.display()))?;

        Ok(Some(Self {
            path: path.to_path_buf(),
            size_bytes: content.len() as u64,
            content,
            loaded_at: Utc::now(),
        }))
    }

    /// Write an exact copy of the report to `dest`
    pub fn save_to(&self, dest: &Path) -> Result<()> {
        std::fs::write(dest, self.content.as_bytes())
            .with_context(|| format!("Failed to save report to {}", dest.display()))
    }
}
