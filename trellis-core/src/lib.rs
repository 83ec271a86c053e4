//! Core library for monorepo build orchestration.

pub mod catalog;
pub mod change;
pub mod check;
pub mod config;
pub mod error;
pub mod executor;
pub mod graph;
pub mod job;
pub mod manifest;
pub mod package;
pub mod plan;
pub mod select;
pub mod traverse;

pub use catalog::WorkspaceCatalog;
pub use check::{has_errors, run_checks, CheckFinding, Severity};
pub use config::TrellisConfig;
pub use error::{Error, Result};
pub use executor::BuildExecutor;
pub use graph::{DependencyEdge, WorkspaceGraph};
pub use job::{JobRunner, ScriptJobRunner};
pub use manifest::{RawManifest, TrellisMeta};
pub use package::{WorkspaceKind, WorkspacePackage};
pub use plan::{plan, BuildPlan, PlanOptions};
pub use select::{select, SelectOptions, SelectionResult};
