//! Graph validation: every violation reported, not just the first.

use std::collections::BTreeSet;
use std::fmt;

use crate::graph::WorkspaceGraph;
use crate::traverse;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// One validation finding, already formatted for a one-line report.
#[derive(Debug, Clone)]
pub struct CheckFinding {
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for CheckFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validates the full graph: unsatisfied edges and cycles.
///
/// A cycle touching a buildable package is an error; a cycle entirely among
/// non-buildable packages produces no artifact ordering problem and is a
/// warning.
pub fn run_checks(graph: &WorkspaceGraph) -> Vec<CheckFinding> {
    let mut findings = Vec::new();

    for (from, edge) in graph.mismatched_edges() {
        let actual = graph
            .get(&edge.to)
            .and_then(|p| p.version.as_ref())
            .map(|v| v.to_string())
            .unwrap_or_else(|| "(no version)".to_string());
        findings.push(CheckFinding {
            severity: Severity::Error,
            message: format!(
                "mismatched workspace dependency: {} requires {}@{} but {} is at {}",
                from, edge.to, edge.declared_range, edge.to, actual
            ),
        });
    }

    let all_names: BTreeSet<String> = graph.names().map(str::to_string).collect();
    for cycle in traverse::detect_cycles(graph, &all_names) {
        let touches_buildable = cycle
            .iter()
            .any(|name| graph.get(name).is_some_and(|p| p.kind.is_buildable()));
        let severity = if touches_buildable {
            Severity::Error
        } else {
            Severity::Warning
        };
        findings.push(CheckFinding {
            severity,
            message: format!("circular dependency involving: {}", cycle.join(", ")),
        });
    }

    findings
}

pub fn has_errors(findings: &[CheckFinding]) -> bool {
    findings.iter().any(|f| f.severity == Severity::Error)
}
