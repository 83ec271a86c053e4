use std::path::PathBuf;

use semver::Version;

use trellis_core::catalog::WorkspaceCatalog;
use trellis_core::error::Error;
use trellis_core::graph::WorkspaceGraph;
use trellis_core::package::{WorkspaceKind, WorkspacePackage};
use trellis_core::select::{select, SelectOptions};

fn pkg(name: &str, deps: &[&str]) -> WorkspacePackage {
    let mut package =
        WorkspacePackage::new(name, WorkspaceKind::Package, format!("packages/{}", name))
            .with_version(Version::new(1, 0, 0));
    for dep in deps {
        package = package.with_dependency(*dep, "*");
    }
    package
}

/// pkg-a -> pkg-b -> pkg-c, plus a synthetic root.
fn graph() -> WorkspaceGraph {
    let root = WorkspacePackage::new("acme-monorepo", WorkspaceKind::Root, ".");
    let catalog = WorkspaceCatalog::from_packages(
        PathBuf::from("."),
        PathBuf::from("packages"),
        vec![
            root,
            pkg("pkg-a", &["pkg-b"]),
            pkg("pkg-b", &["pkg-c"]),
            pkg("pkg-c", &[]),
        ],
    )
    .unwrap();
    WorkspaceGraph::build(&catalog).unwrap()
}

fn targets(names: &[&str]) -> SelectOptions {
    SelectOptions {
        targets: names.iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    }
}

#[test]
fn test_explicit_targets_form_base_scope() {
    let graph = graph();
    let result = select(&graph, &targets(&["pkg-a", "pkg-c"])).unwrap();

    assert_eq!(result.base_scope.len(), 2);
    assert!(result.base_scope.contains("pkg-a"));
    assert!(result.base_scope.contains("pkg-c"));
    assert!(result.ancestor_names.is_empty());
    assert!(result.descendant_names.is_empty());
}

#[test]
fn test_unknown_target_rejected() {
    let graph = graph();
    let result = select(&graph, &targets(&["pkg-x"]));

    assert!(matches!(
        result,
        Err(Error::UnknownWorkspace { ref name, .. }) if name == "pkg-x"
    ));
}

#[test]
fn test_empty_selection_is_empty_result() {
    let graph = graph();

    let result = select(&graph, &SelectOptions::default()).unwrap();
    assert!(result.is_empty());
    assert!(result.scope().is_empty());

    let with_empty_diff = select(
        &graph,
        &SelectOptions {
            changed_files: Some(vec![]),
            ..Default::default()
        },
    )
    .unwrap();
    assert!(with_empty_diff.is_empty());
}

#[test]
fn test_changed_file_maps_to_owning_workspace() {
    let graph = graph();
    let result = select(
        &graph,
        &SelectOptions {
            changed_files: Some(vec![PathBuf::from("packages/pkg-b/src/index.ts")]),
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(result.base_scope.len(), 1);
    assert!(result.base_scope.contains("pkg-b"));
}

#[test]
fn test_changed_file_maps_to_nearest_workspace() {
    let nested = WorkspacePackage::new(
        "nested-lib",
        WorkspaceKind::Package,
        "packages/pkg-a/nested-lib",
    )
    .with_version(Version::new(1, 0, 0));
    let catalog = WorkspaceCatalog::from_packages(
        PathBuf::from("."),
        PathBuf::from("packages"),
        vec![pkg("pkg-a", &[]), nested],
    )
    .unwrap();
    let graph = WorkspaceGraph::build(&catalog).unwrap();

    let result = select(
        &graph,
        &SelectOptions {
            changed_files: Some(vec![PathBuf::from("packages/pkg-a/nested-lib/src/x.ts")]),
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(result.base_scope.len(), 1);
    assert!(result.base_scope.contains("nested-lib"));
}

#[test]
fn test_unmatched_changed_file_selects_entire_catalog() {
    let graph = graph();
    let result = select(
        &graph,
        &SelectOptions {
            changed_files: Some(vec![PathBuf::from("tsconfig.json")]),
            ..Default::default()
        },
    )
    .unwrap();

    // Conservative fallback: everything except the synthetic root.
    assert_eq!(result.base_scope.len(), 3);
    assert!(!result.base_scope.contains("acme-monorepo"));
}

#[test]
fn test_descendants_expansion_tracked_separately() {
    let graph = graph();
    let result = select(
        &graph,
        &SelectOptions {
            targets: vec!["pkg-a".to_string()],
            descendants: true,
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(result.base_scope.len(), 1);
    assert!(result.descendant_names.contains("pkg-b"));
    assert!(result.descendant_names.contains("pkg-c"));
    assert_eq!(result.scope().len(), 3);
}

#[test]
fn test_ancestors_expansion_tracked_separately() {
    let graph = graph();
    let result = select(
        &graph,
        &SelectOptions {
            targets: vec!["pkg-c".to_string()],
            ancestors: true,
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(result.base_scope.len(), 1);
    assert!(result.ancestor_names.contains("pkg-a"));
    assert!(result.ancestor_names.contains("pkg-b"));
}

#[test]
fn test_selection_idempotent_without_expansion() {
    let graph = graph();
    let first = select(
        &graph,
        &SelectOptions {
            targets: vec!["pkg-a".to_string()],
            changed_files: Some(vec![PathBuf::from("packages/pkg-c/src/util.ts")]),
            descendants: true,
            ..Default::default()
        },
    )
    .unwrap();

    // Feeding the base scope back as explicit targets with expansion
    // disabled reproduces it exactly.
    let replay = select(
        &graph,
        &targets(&first.base_scope.iter().map(String::as_str).collect::<Vec<_>>()),
    )
    .unwrap();

    assert_eq!(replay.base_scope, first.base_scope);
    assert!(replay.ancestor_names.is_empty());
    assert!(replay.descendant_names.is_empty());
}
