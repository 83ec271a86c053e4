//! Pure graph traversal: closures, leveling, and cycle detection.

use std::collections::BTreeSet;

use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::graph::WorkspaceGraph;

/// All packages that transitively depend on any seed. Seeds are excluded
/// from the result.
pub fn ancestors(graph: &WorkspaceGraph, seeds: &BTreeSet<String>) -> BTreeSet<String> {
    let mut reverse: FxHashMap<&str, Vec<&str>> = FxHashMap::default();
    for name in graph.names() {
        for edge in graph.edges_of(name) {
            reverse.entry(edge.to.as_str()).or_default().push(name);
        }
    }

    let mut result = BTreeSet::new();
    let mut stack: Vec<&str> = seeds
        .iter()
        .filter(|s| graph.contains(s))
        .map(String::as_str)
        .collect();
    while let Some(current) = stack.pop() {
        if let Some(dependents) = reverse.get(current) {
            for &dependent in dependents {
                if !seeds.contains(dependent) && result.insert(dependent.to_string()) {
                    stack.push(dependent);
                }
            }
        }
    }
    result
}

/// All packages reachable by following dependency edges out of any seed.
/// Seeds are excluded from the result.
pub fn descendants(graph: &WorkspaceGraph, seeds: &BTreeSet<String>) -> BTreeSet<String> {
    let mut result = BTreeSet::new();
    let mut stack: Vec<&str> = seeds
        .iter()
        .filter(|s| graph.contains(s))
        .map(String::as_str)
        .collect();
    while let Some(current) = stack.pop() {
        for edge in graph.edges_of(current) {
            let dep = edge.to.as_str();
            if !seeds.contains(dep) && result.insert(dep.to_string()) {
                stack.push(dep);
            }
        }
    }
    result
}

/// Cycles in the subgraph induced by `scope`, as sorted member lists.
///
/// Self-dependencies are rejected at graph construction, so only
/// multi-member strongly-connected components count.
pub fn detect_cycles(graph: &WorkspaceGraph, scope: &BTreeSet<String>) -> Vec<Vec<String>> {
    let (digraph, _) = induced_subgraph(graph, scope);
    tarjan_scc(&digraph)
        .into_iter()
        .filter(|component| component.len() > 1)
        .map(|component| {
            let mut members: Vec<String> = component
                .into_iter()
                .map(|idx| digraph[idx].clone())
                .collect();
            members.sort();
            members
        })
        .collect()
}

/// Assigns each package in `scope` a level: leaves (no in-scope
/// dependencies) at 0, every other package at one more than its deepest
/// in-scope dependency.
///
/// Levels order batches: two packages on the same level have no dependency
/// relation between them within the scope.
///
/// # Errors
///
/// Returns an error listing the participating packages if the induced
/// subgraph contains a cycle.
pub fn level_order(
    graph: &WorkspaceGraph,
    scope: &BTreeSet<String>,
) -> Result<FxHashMap<String, usize>> {
    let (digraph, _) = induced_subgraph(graph, scope);

    let sorted = toposort(&digraph, None).map_err(|_| {
        let members = detect_cycles(graph, scope)
            .into_iter()
            .next()
            .unwrap_or_default();
        Error::CircularDependency { members }
    })?;

    // Toposort yields dependents before dependencies; walk it reversed so
    // every dependency's level is known before its dependents are assigned.
    let mut levels: FxHashMap<String, usize> = FxHashMap::default();
    for idx in sorted.into_iter().rev() {
        let name = &digraph[idx];
        let level = digraph
            .neighbors_directed(idx, petgraph::Direction::Outgoing)
            .filter_map(|dep| levels.get(&digraph[dep]))
            .max()
            .map(|l| l + 1)
            .unwrap_or(0);
        levels.insert(name.clone(), level);
    }
    Ok(levels)
}

/// Groups a level assignment into batches ordered leaves-first, names
/// sorted within each batch.
pub fn batches(levels: &FxHashMap<String, usize>) -> Vec<Vec<String>> {
    let Some(max_level) = levels.values().copied().max() else {
        return Vec::new();
    };
    let mut grouped: Vec<Vec<String>> = vec![Vec::new(); max_level + 1];
    for (name, level) in levels {
        grouped[*level].push(name.clone());
    }
    for batch in &mut grouped {
        batch.sort();
    }
    grouped
}

/// Builds a petgraph view of the subgraph induced by `scope`, keeping only
/// edges with both endpoints in scope.
fn induced_subgraph(
    graph: &WorkspaceGraph,
    scope: &BTreeSet<String>,
) -> (DiGraph<String, ()>, FxHashMap<String, NodeIndex>) {
    let mut digraph = DiGraph::new();
    let mut node_map: FxHashMap<String, NodeIndex> = FxHashMap::default();

    for name in scope {
        if graph.contains(name) {
            let idx = digraph.add_node(name.clone());
            node_map.insert(name.clone(), idx);
        }
    }
    for (name, &from) in &node_map {
        for edge in graph.edges_of(name) {
            if let Some(&to) = node_map.get(&edge.to) {
                digraph.add_edge(from, to, ());
            }
        }
    }
    (digraph, node_map)
}
