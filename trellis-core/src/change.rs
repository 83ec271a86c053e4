//! Changed-file discovery via git.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Error, Result};

/// Paths changed relative to `base`, as reported by
/// `git diff --name-only`, relative to the repo root.
pub fn changed_files_from_git(repo_root: &Path, base: &str) -> Result<Vec<PathBuf>> {
    let output = Command::new("git")
        .arg("diff")
        .arg("--name-only")
        .arg(base)
        .current_dir(repo_root)
        .output()
        .map_err(|e| Error::Git(format!("failed to run git diff: {}", e)))?;

    if !output.status.success() {
        return Err(Error::Git(format!(
            "git diff against '{}' failed: {}",
            base,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(stdout
        .lines()
        .map(|line| PathBuf::from(line.trim()))
        .filter(|p| !p.as_os_str().is_empty())
        .collect())
}
