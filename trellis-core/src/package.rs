//! Workspace package model and kind policy.

use std::collections::BTreeMap;
use std::path::PathBuf;

use semver::Version;
use serde::{Deserialize, Serialize};

/// Category of a workspace, read from manifest metadata.
///
/// The kind governs build and test policy: only some kinds produce a build
/// artifact, and the synthetic root never appears in a build plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkspaceKind {
    App,
    View,
    EsmView,
    Package,
    Template,
    Source,
    Root,
}

impl WorkspaceKind {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkspaceKind::App => "app",
            WorkspaceKind::View => "view",
            WorkspaceKind::EsmView => "esm-view",
            WorkspaceKind::Package => "package",
            WorkspaceKind::Template => "template",
            WorkspaceKind::Source => "source",
            WorkspaceKind::Root => "root",
        }
    }

    /// Parses a kind string as written in manifest metadata.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "app" => Some(WorkspaceKind::App),
            "view" => Some(WorkspaceKind::View),
            "esm-view" => Some(WorkspaceKind::EsmView),
            "package" => Some(WorkspaceKind::Package),
            "template" => Some(WorkspaceKind::Template),
            "source" => Some(WorkspaceKind::Source),
            "root" => Some(WorkspaceKind::Root),
            _ => None,
        }
    }

    /// Whether workspaces of this kind produce a build artifact.
    #[inline]
    pub fn is_buildable(&self) -> bool {
        matches!(
            self,
            WorkspaceKind::App
                | WorkspaceKind::View
                | WorkspaceKind::EsmView
                | WorkspaceKind::Package
        )
    }

    /// Whether workspaces of this kind can carry a test suite.
    #[inline]
    pub fn is_testable(&self) -> bool {
        matches!(
            self,
            WorkspaceKind::App
                | WorkspaceKind::View
                | WorkspaceKind::EsmView
                | WorkspaceKind::Package
                | WorkspaceKind::Source
        )
    }
}

/// A single workspace member, plus one synthetic entry for the repo root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspacePackage {
    pub name: String,
    /// Path relative to the monorepo root.
    pub location: PathBuf,
    pub version: Option<Version>,
    pub kind: WorkspaceKind,
    pub is_workspace_root: bool,
    pub dependencies: BTreeMap<String, String>,
    pub dev_dependencies: BTreeMap<String, String>,
    pub scripts: BTreeMap<String, String>,
    /// The original manifest, passed through untouched to the job runner.
    pub raw_manifest: serde_json::Value,
}

impl WorkspacePackage {
    pub fn new(
        name: impl Into<String>,
        kind: WorkspaceKind,
        location: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            version: None,
            kind,
            is_workspace_root: kind == WorkspaceKind::Root,
            dependencies: BTreeMap::new(),
            dev_dependencies: BTreeMap::new(),
            scripts: BTreeMap::new(),
            raw_manifest: serde_json::Value::Null,
        }
    }

    pub fn with_version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }

    pub fn with_dependency(mut self, name: impl Into<String>, range: impl Into<String>) -> Self {
        self.dependencies.insert(name.into(), range.into());
        self
    }

    pub fn with_dev_dependency(
        mut self,
        name: impl Into<String>,
        range: impl Into<String>,
    ) -> Self {
        self.dev_dependencies.insert(name.into(), range.into());
        self
    }

    pub fn with_script(mut self, name: impl Into<String>, command: impl Into<String>) -> Self {
        self.scripts.insert(name.into(), command.into());
        self
    }

    /// Union of `dependencies` and `devDependencies`, runtime ranges winning
    /// when a name appears in both.
    pub fn declared_ranges(&self) -> BTreeMap<&str, &str> {
        let mut ranges: BTreeMap<&str, &str> = BTreeMap::new();
        for (name, range) in &self.dev_dependencies {
            ranges.insert(name.as_str(), range.as_str());
        }
        for (name, range) in &self.dependencies {
            ranges.insert(name.as_str(), range.as_str());
        }
        ranges
    }

    #[inline]
    pub fn script(&self, name: &str) -> Option<&str> {
        self.scripts.get(name).map(String::as_str)
    }
}
