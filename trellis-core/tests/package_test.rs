use trellis_core::package::{WorkspaceKind, WorkspacePackage};

#[test]
fn test_kind_round_trip() {
    for kind in [
        WorkspaceKind::App,
        WorkspaceKind::View,
        WorkspaceKind::EsmView,
        WorkspaceKind::Package,
        WorkspaceKind::Template,
        WorkspaceKind::Source,
        WorkspaceKind::Root,
    ] {
        assert_eq!(WorkspaceKind::from_str(kind.as_str()), Some(kind));
    }

    assert_eq!(WorkspaceKind::from_str("widget"), None);
}

#[test]
fn test_buildable_policy() {
    assert!(WorkspaceKind::App.is_buildable());
    assert!(WorkspaceKind::View.is_buildable());
    assert!(WorkspaceKind::EsmView.is_buildable());
    assert!(WorkspaceKind::Package.is_buildable());

    assert!(!WorkspaceKind::Template.is_buildable());
    assert!(!WorkspaceKind::Source.is_buildable());
    assert!(!WorkspaceKind::Root.is_buildable());
}

#[test]
fn test_testable_policy() {
    assert!(WorkspaceKind::Source.is_testable());
    assert!(!WorkspaceKind::Template.is_testable());
    assert!(!WorkspaceKind::Root.is_testable());
}

#[test]
fn test_declared_ranges_union_prefers_runtime_deps() {
    let package = WorkspacePackage::new("web-app", WorkspaceKind::App, "packages/web-app")
        .with_dependency("shared-lib", "^1.0.0")
        .with_dev_dependency("shared-lib", "^2.0.0")
        .with_dev_dependency("test-helpers", "*");

    let ranges = package.declared_ranges();
    assert_eq!(ranges.get("shared-lib"), Some(&"^1.0.0"));
    assert_eq!(ranges.get("test-helpers"), Some(&"*"));
    assert_eq!(ranges.len(), 2);
}

#[test]
fn test_script_lookup() {
    let package = WorkspacePackage::new("web-app", WorkspaceKind::App, "packages/web-app")
        .with_script("build", "webpack --mode production");

    assert_eq!(package.script("build"), Some("webpack --mode production"));
    assert_eq!(package.script("lint"), None);
}

#[test]
fn test_root_flag_follows_kind() {
    let root = WorkspacePackage::new("monorepo-root", WorkspaceKind::Root, ".");
    assert!(root.is_workspace_root);

    let package = WorkspacePackage::new("shared-lib", WorkspaceKind::Package, "packages/shared-lib");
    assert!(!package.is_workspace_root);
}
