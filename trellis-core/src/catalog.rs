//! Workspace catalog: discovery and validation of workspace members.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::config::TrellisConfig;
use crate::error::{Error, Result};
use crate::manifest::{package_from_manifest, read_manifest};
use crate::package::WorkspacePackage;

const MANIFEST_FILE: &str = "package.json";

/// A point-in-time snapshot of every workspace member plus the synthetic
/// root entry.
///
/// Built once per command invocation and threaded through by the caller.
/// There is no process-wide cache; a caller that needs a fresh view loads a
/// new catalog.
#[derive(Debug, Clone)]
pub struct WorkspaceCatalog {
    packages: Vec<WorkspacePackage>,
    root_dir: PathBuf,
    packages_root: PathBuf,
}

impl WorkspaceCatalog {
    /// Scans the monorepo for workspace manifests and validates the result.
    ///
    /// # Errors
    ///
    /// Fails on an unreadable or malformed manifest, a duplicate workspace
    /// name, or a workspace located outside the packages root.
    pub fn load(root_dir: impl AsRef<Path>, config: &TrellisConfig) -> Result<Self> {
        let root_dir = root_dir.as_ref().to_path_buf();
        let packages_root = config.packages_dir.clone();

        let mut packages = Vec::new();

        let root_manifest = root_dir.join(MANIFEST_FILE);
        if root_manifest.exists() {
            let (manifest, raw) = read_manifest(&root_manifest)?;
            packages.push(package_from_manifest(
                manifest,
                raw,
                &root_manifest,
                PathBuf::from("."),
                true,
            )?);
        }

        let scan_dir = root_dir.join(&packages_root);
        if scan_dir.exists() {
            let manifest_paths: Vec<PathBuf> = WalkDir::new(&scan_dir)
                .max_depth(3)
                .into_iter()
                .filter_entry(|e| e.file_name() != "node_modules")
                .filter_map(|e| e.ok())
                .filter(|e| e.file_name() == MANIFEST_FILE)
                .map(|e| e.path().to_path_buf())
                .collect();

            let scanned: Result<Vec<WorkspacePackage>> = manifest_paths
                .into_par_iter()
                .map(|manifest_path| {
                    let package_dir =
                        manifest_path
                            .parent()
                            .ok_or_else(|| Error::Manifest {
                                path: manifest_path.clone(),
                                message: "manifest has no parent directory".to_string(),
                            })?;
                    let location = package_dir
                        .strip_prefix(&root_dir)
                        .map(|p| p.to_path_buf())
                        .unwrap_or_else(|_| package_dir.to_path_buf());

                    let (manifest, raw) = read_manifest(&manifest_path)?;
                    package_from_manifest(manifest, raw, &manifest_path, location, false)
                })
                .collect();

            packages.extend(scanned?);
        }

        Self::from_packages(root_dir, packages_root, packages)
    }

    /// Builds a catalog from already-loaded package descriptors.
    ///
    /// This is the validation seam: duplicate names and out-of-root
    /// locations are rejected here regardless of where the descriptors came
    /// from.
    pub fn from_packages(
        root_dir: PathBuf,
        packages_root: PathBuf,
        mut packages: Vec<WorkspacePackage>,
    ) -> Result<Self> {
        packages.sort_by(|a, b| a.name.cmp(&b.name));

        let mut seen: HashMap<&str, &Path> = HashMap::new();
        for package in &packages {
            if let Some(first) = seen.insert(&package.name, &package.location) {
                return Err(Error::DuplicateWorkspace {
                    name: package.name.clone(),
                    first: first.to_path_buf(),
                    second: package.location.clone(),
                });
            }
            if !package.is_workspace_root && !package.location.starts_with(&packages_root) {
                return Err(Error::LocationOutsideRoot {
                    name: package.name.clone(),
                    location: package.location.clone(),
                    packages_root: packages_root.clone(),
                });
            }
        }

        Ok(Self {
            packages,
            root_dir,
            packages_root,
        })
    }

    #[inline]
    pub fn packages(&self) -> &[WorkspacePackage] {
        &self.packages
    }

    pub fn get(&self, name: &str) -> Option<&WorkspacePackage> {
        self.packages.iter().find(|p| p.name == name)
    }

    #[inline]
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    #[inline]
    pub fn packages_root(&self) -> &Path {
        &self.packages_root
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}
