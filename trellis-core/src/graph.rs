//! Workspace dependency graph construction.

use indexmap::IndexMap;
use semver::{Version, VersionReq};
use serde::Serialize;
use smallvec::SmallVec;

use crate::catalog::WorkspaceCatalog;
use crate::error::{Error, Result};
use crate::package::WorkspacePackage;

/// A directed dependency relation from the owning package to `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyEdge {
    pub to: String,
    /// The semver range as written in the manifest.
    pub declared_range: String,
    /// Whether the target's actual version satisfies the declared range.
    pub satisfied: bool,
}

/// The workspace dependency graph: packages by name plus each package's
/// outgoing edges.
///
/// Built once per invocation and never mutated; transformations produce a
/// new graph value.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceGraph {
    packages: IndexMap<String, WorkspacePackage>,
    edges: IndexMap<String, SmallVec<[DependencyEdge; 4]>>,
}

impl WorkspaceGraph {
    /// Cross-references every package's declared ranges against the catalog.
    ///
    /// Declared names that match no catalog entry are external registry
    /// dependencies and produce no edge. The synthetic root participates so
    /// that root-pinned shared tooling is covered by mismatch detection.
    ///
    /// # Errors
    ///
    /// Returns an error if a package declares a dependency on itself.
    pub fn build(catalog: &WorkspaceCatalog) -> Result<Self> {
        let mut packages = IndexMap::with_capacity(catalog.len());
        for package in catalog.packages() {
            packages.insert(package.name.clone(), package.clone());
        }

        let mut edges: IndexMap<String, SmallVec<[DependencyEdge; 4]>> =
            IndexMap::with_capacity(packages.len());
        for package in catalog.packages() {
            let mut outgoing = SmallVec::new();
            for (dep_name, declared_range) in package.declared_ranges() {
                if dep_name == package.name {
                    return Err(Error::SelfDependency {
                        name: package.name.clone(),
                    });
                }
                let Some(target) = packages.get(dep_name) else {
                    continue;
                };
                outgoing.push(DependencyEdge {
                    to: dep_name.to_string(),
                    declared_range: declared_range.to_string(),
                    satisfied: range_satisfied(declared_range, target.version.as_ref()),
                });
            }
            edges.insert(package.name.clone(), outgoing);
        }

        Ok(Self { packages, edges })
    }

    pub fn get(&self, name: &str) -> Option<&WorkspacePackage> {
        self.packages.get(name)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    pub fn packages(&self) -> impl Iterator<Item = &WorkspacePackage> {
        self.packages.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }

    /// Outgoing edges of a package; empty for unknown names.
    pub fn edges_of(&self, name: &str) -> &[DependencyEdge] {
        self.edges.get(name).map(|e| e.as_slice()).unwrap_or(&[])
    }

    /// Direct workspace dependencies of a package.
    pub fn dependencies_of(&self, name: &str) -> Vec<&str> {
        self.edges_of(name).iter().map(|e| e.to.as_str()).collect()
    }

    /// Direct dependents of a package (packages with an edge into it).
    pub fn dependents_of(&self, name: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|(_, outgoing)| outgoing.iter().any(|e| e.to == name))
            .map(|(from, _)| from.as_str())
            .collect()
    }

    /// Every edge whose declared range the target's version does not satisfy.
    pub fn mismatched_edges(&self) -> Vec<(&str, &DependencyEdge)> {
        self.edges
            .iter()
            .flat_map(|(from, outgoing)| {
                outgoing
                    .iter()
                    .filter(|e| !e.satisfied)
                    .map(move |e| (from.as_str(), e))
            })
            .collect()
    }

    /// The induced subgraph over buildable packages.
    ///
    /// Edges to non-buildable packages are dropped: they contribute no
    /// artifact to wait on. The synthetic root is never buildable.
    pub fn restrict_to_buildable(&self) -> WorkspaceGraph {
        let packages: IndexMap<String, WorkspacePackage> = self
            .packages
            .iter()
            .filter(|(_, p)| p.kind.is_buildable())
            .map(|(name, p)| (name.clone(), p.clone()))
            .collect();

        let edges = self
            .edges
            .iter()
            .filter(|(name, _)| packages.contains_key(*name))
            .map(|(name, outgoing)| {
                let kept: SmallVec<[DependencyEdge; 4]> = outgoing
                    .iter()
                    .filter(|e| packages.contains_key(&e.to))
                    .cloned()
                    .collect();
                (name.clone(), kept)
            })
            .collect();

        WorkspaceGraph { packages, edges }
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

/// Standard semver range matching, with the workspace-protocol forms that
/// are satisfied by construction handled up front.
///
/// Ranges that do not parse as semver requirements (git URLs, `file:`
/// specifiers) count as unsatisfied so they surface during validation.
fn range_satisfied(declared: &str, actual: Option<&Version>) -> bool {
    let range = declared.strip_prefix("workspace:").unwrap_or(declared);
    if range.is_empty() || range == "*" || range == "^" || range == "~" {
        return true;
    }
    let Ok(req) = VersionReq::parse(range) else {
        return false;
    };
    actual.is_some_and(|version| req.matches(version))
}
