//! Workspace-level configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const CONFIG_FILE: &str = "trellis.toml";

/// Configuration read from `trellis.toml` at the monorepo root.
///
/// Every field has a default; the file itself is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrellisConfig {
    /// Directory holding the workspace packages, relative to the repo root.
    pub packages_dir: PathBuf,
    /// Branch that `--changed` diffs against when no ref is given.
    pub compare_branch: String,
    /// Default number of concurrent build jobs.
    pub concurrency: Option<usize>,
}

impl Default for TrellisConfig {
    fn default() -> Self {
        Self {
            packages_dir: PathBuf::from("packages"),
            compare_branch: "main".to_string(),
            concurrency: None,
        }
    }
}

impl TrellisConfig {
    /// Loads the config from `<root>/trellis.toml`, falling back to defaults
    /// when the file does not exist.
    pub fn load(root_dir: &Path) -> Result<Self> {
        let path = root_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        toml::from_str(&content).map_err(|error| Error::Config {
            error,
            context: CONFIG_FILE.to_string(),
        })
    }

    /// Resolves the concurrency limit: explicit override, then the config
    /// value, then the logical CPU count. Never less than 1.
    pub fn effective_concurrency(&self, requested: Option<usize>) -> usize {
        requested
            .or(self.concurrency)
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1)
            })
            .max(1)
    }
}
