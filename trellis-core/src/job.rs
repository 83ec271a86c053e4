//! The external build-job interface and the process-backed runner.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::package::WorkspacePackage;

/// The opaque "build one package" collaborator.
///
/// Bundler invocation, declaration emission, and everything else that
/// happens inside a job is behind this seam; the orchestrator only sees
/// success or failure.
#[async_trait]
pub trait JobRunner: Send + Sync {
    async fn run_job(&self, package: &WorkspacePackage) -> Result<()>;
}

/// Runs a named manifest script via `sh -c` in the package directory.
///
/// Packages without the script complete as no-ops: a workspace with no
/// build step has nothing to do but may still gate its dependents.
pub struct ScriptJobRunner {
    repo_root: PathBuf,
    script: String,
}

impl ScriptJobRunner {
    pub fn new(repo_root: impl Into<PathBuf>, script: impl Into<String>) -> Self {
        Self {
            repo_root: repo_root.into(),
            script: script.into(),
        }
    }
}

#[async_trait]
impl JobRunner for ScriptJobRunner {
    async fn run_job(&self, package: &WorkspacePackage) -> Result<()> {
        let Some(command) = package.script(&self.script) else {
            return Ok(());
        };

        let package_dir = self.repo_root.join(&package.location);
        let output = tokio::process::Command::new("sh")
            .arg("-c")
            .arg(command)
            .current_dir(&package_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| Error::Job {
                package: package.name.clone(),
                message: format!("failed to spawn '{}': {}", self.script, e),
            })?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        let message = if stderr.is_empty() {
            format!("script '{}' exited with {}", self.script, output.status)
        } else {
            format!("script '{}' failed: {}", self.script, stderr)
        };
        Err(Error::Job {
            package: package.name.clone(),
            message,
        })
    }
}
