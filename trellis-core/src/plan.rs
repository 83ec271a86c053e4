//! Build planning: buildable filtering, leveling, batch grouping.

use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::graph::WorkspaceGraph;
use crate::select::SelectionResult;
use crate::traverse;

/// Ordered batches of parallel-safe work, leaves first.
///
/// For any two packages in the same batch there is no dependency edge
/// between them; a package's dependencies always sit in an earlier batch.
#[derive(Debug, Clone, Default)]
pub struct BuildPlan {
    pub batches: Vec<Vec<String>>,
    /// Cycles that were permitted rather than fatal (all members
    /// non-buildable, override in effect). Reported upstream as warnings.
    pub permitted_cycles: Vec<Vec<String>>,
}

impl BuildPlan {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    pub fn package_count(&self) -> usize {
        self.batches.iter().map(Vec::len).sum()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlanOptions {
    /// Permit cycles whose members are all non-buildable, downgrading them
    /// to warnings. Cycles touching a buildable package stay fatal.
    pub ignore_unbuildable_cycles: bool,
}

/// Converts a selection into an ordered build plan.
///
/// Leveling runs over the entire buildable graph so a package's batch
/// reflects its true position in the workspace, then batches are filtered
/// down to the selected scope.
///
/// # Errors
///
/// Returns an error for any cycle involving a buildable package, and for
/// cycles among non-buildable packages unless the override is set.
pub fn plan(
    graph: &WorkspaceGraph,
    selection: &SelectionResult,
    opts: PlanOptions,
) -> Result<BuildPlan> {
    let all_names: BTreeSet<String> = graph.names().map(str::to_string).collect();

    let mut permitted_cycles = Vec::new();
    for cycle in traverse::detect_cycles(graph, &all_names) {
        let touches_buildable = cycle
            .iter()
            .any(|name| graph.get(name).is_some_and(|p| p.kind.is_buildable()));
        if touches_buildable || !opts.ignore_unbuildable_cycles {
            return Err(Error::CircularDependency { members: cycle });
        }
        permitted_cycles.push(cycle);
    }

    let buildable = graph.restrict_to_buildable();
    let buildable_names: BTreeSet<String> = buildable.names().map(str::to_string).collect();
    let levels = traverse::level_order(&buildable, &buildable_names)?;

    let scope = selection.scope();
    let batches: Vec<Vec<String>> = traverse::batches(&levels)
        .into_iter()
        .map(|batch| {
            batch
                .into_iter()
                .filter(|name| scope.contains(name))
                .collect::<Vec<String>>()
        })
        .filter(|batch| !batch.is_empty())
        .collect();

    Ok(BuildPlan {
        batches,
        permitted_cycles,
    })
}
