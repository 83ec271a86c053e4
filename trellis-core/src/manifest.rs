//! `package.json` manifest parsing.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::package::{WorkspaceKind, WorkspacePackage};

/// The subset of `package.json` the orchestrator understands.
///
/// Everything else rides along in the raw JSON value kept on the package.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawManifest {
    pub name: Option<String>,
    pub version: Option<String>,
    pub private: bool,
    pub dependencies: BTreeMap<String, String>,
    pub dev_dependencies: BTreeMap<String, String>,
    pub scripts: BTreeMap<String, String>,
    pub trellis: Option<TrellisMeta>,
}

/// The `"trellis"` metadata block carrying the workspace kind tag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrellisMeta {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Reads and deserializes a manifest, returning both the typed view and the
/// raw JSON value.
pub fn read_manifest(path: &Path) -> Result<(RawManifest, serde_json::Value)> {
    let content = std::fs::read_to_string(path)?;
    let raw: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| Error::Manifest {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    let manifest: RawManifest =
        serde_json::from_value(raw.clone()).map_err(|e| Error::Manifest {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    Ok((manifest, raw))
}

/// Builds a `WorkspacePackage` from a parsed manifest.
///
/// The root manifest becomes the synthetic root entry regardless of any kind
/// tag it carries. Other manifests default to `package` when untagged; an
/// unrecognized tag is a malformed manifest.
pub fn package_from_manifest(
    manifest: RawManifest,
    raw: serde_json::Value,
    manifest_path: &Path,
    location: PathBuf,
    is_workspace_root: bool,
) -> Result<WorkspacePackage> {
    let name = manifest.name.ok_or_else(|| Error::Manifest {
        path: manifest_path.to_path_buf(),
        message: "missing \"name\" field".to_string(),
    })?;

    let version = match manifest.version.as_deref() {
        Some(v) => Some(semver::Version::parse(v).map_err(|e| Error::Manifest {
            path: manifest_path.to_path_buf(),
            message: format!("invalid version '{}': {}", v, e),
        })?),
        None => None,
    };

    let kind = if is_workspace_root {
        WorkspaceKind::Root
    } else {
        match manifest.trellis.as_ref().and_then(|m| m.kind.as_deref()) {
            Some(tag) => WorkspaceKind::from_str(tag).ok_or_else(|| Error::Manifest {
                path: manifest_path.to_path_buf(),
                message: format!("unknown workspace type '{}'", tag),
            })?,
            None => WorkspaceKind::Package,
        }
    };

    Ok(WorkspacePackage {
        name,
        location,
        version,
        kind,
        is_workspace_root,
        dependencies: manifest.dependencies,
        dev_dependencies: manifest.dev_dependencies,
        scripts: manifest.scripts,
        raw_manifest: raw,
    })
}
