//! Selection engine: explicit targets, changed files, graph expansion.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::graph::WorkspaceGraph;
use crate::traverse;

/// What the caller asked to act on.
#[derive(Debug, Clone, Default)]
pub struct SelectOptions {
    /// Explicitly requested workspace names.
    pub targets: Vec<String>,
    /// Changed file paths relative to the repo root. `None` means change
    /// detection was not requested; `Some(vec![])` means it ran and found
    /// nothing.
    pub changed_files: Option<Vec<PathBuf>>,
    /// Expand the scope with everything that depends on it.
    pub ancestors: bool,
    /// Expand the scope with everything it depends on.
    pub descendants: bool,
}

/// The resolved scope, with the expansion subsets kept distinct from the
/// explicitly requested base so callers can filter after ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionResult {
    pub base_scope: BTreeSet<String>,
    pub ancestor_names: BTreeSet<String>,
    pub descendant_names: BTreeSet<String>,
}

impl SelectionResult {
    /// The full scope: base plus both expansions.
    pub fn scope(&self) -> BTreeSet<String> {
        let mut scope = self.base_scope.clone();
        scope.extend(self.ancestor_names.iter().cloned());
        scope.extend(self.descendant_names.iter().cloned());
        scope
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.base_scope.is_empty()
            && self.ancestor_names.is_empty()
            && self.descendant_names.is_empty()
    }
}

/// Computes the package scope for a command.
///
/// Explicit targets must exist in the graph; names discovered through
/// change detection are trusted. An empty base scope is a valid, empty
/// result — "nothing to do" is the caller's message, not an error.
pub fn select(graph: &WorkspaceGraph, opts: &SelectOptions) -> Result<SelectionResult> {
    let mut base_scope: BTreeSet<String> = BTreeSet::new();

    for target in &opts.targets {
        if !graph.contains(target) {
            let available: Vec<&str> = graph
                .names()
                .filter(|n| !is_root(graph, n))
                .collect();
            return Err(Error::UnknownWorkspace {
                name: target.clone(),
                available: available.join(", "),
            });
        }
        base_scope.insert(target.clone());
    }

    if let Some(files) = &opts.changed_files {
        base_scope.extend(changed_workspaces(graph, files));
    }

    if base_scope.is_empty() {
        return Ok(SelectionResult::default());
    }

    let mut result = SelectionResult {
        base_scope,
        ..Default::default()
    };

    if opts.descendants {
        result.descendant_names = traverse::descendants(graph, &result.base_scope)
            .into_iter()
            .filter(|n| !is_root(graph, n))
            .collect();
    }
    if opts.ancestors {
        result.ancestor_names = traverse::ancestors(graph, &result.base_scope)
            .into_iter()
            .filter(|n| !is_root(graph, n))
            .collect();
    }

    Ok(result)
}

/// Maps changed files to the workspaces containing them.
///
/// Each file maps to the workspace whose location is its nearest containing
/// directory. A file under no workspace marks the whole catalog changed:
/// when change detection is ambiguous (a root config file, say), building
/// too much is safer than silently skipping builds.
fn changed_workspaces(graph: &WorkspaceGraph, files: &[PathBuf]) -> BTreeSet<String> {
    let mut changed = BTreeSet::new();
    for file in files {
        match owning_workspace(graph, file) {
            Some(name) => {
                changed.insert(name.to_string());
            }
            None => {
                return graph
                    .packages()
                    .filter(|p| !p.is_workspace_root)
                    .map(|p| p.name.clone())
                    .collect();
            }
        }
    }
    changed
}

fn owning_workspace<'a>(graph: &'a WorkspaceGraph, file: &Path) -> Option<&'a str> {
    graph
        .packages()
        .filter(|p| !p.is_workspace_root)
        .filter(|p| file.starts_with(&p.location))
        .max_by_key(|p| p.location.components().count())
        .map(|p| p.name.as_str())
}

fn is_root(graph: &WorkspaceGraph, name: &str) -> bool {
    graph.get(name).is_some_and(|p| p.is_workspace_root)
}
