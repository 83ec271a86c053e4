use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use semver::Version;

use trellis_core::catalog::WorkspaceCatalog;
use trellis_core::error::{Error, Result};
use trellis_core::executor::BuildExecutor;
use trellis_core::graph::WorkspaceGraph;
use trellis_core::job::JobRunner;
use trellis_core::package::{WorkspaceKind, WorkspacePackage};
use trellis_core::plan::BuildPlan;

fn pkg(name: &str) -> WorkspacePackage {
    WorkspacePackage::new(name, WorkspaceKind::Package, format!("packages/{}", name))
        .with_version(Version::new(1, 0, 0))
}

fn graph_of(names: &[&str]) -> WorkspaceGraph {
    let catalog = WorkspaceCatalog::from_packages(
        PathBuf::from("."),
        PathBuf::from("packages"),
        names.iter().map(|n| pkg(n)).collect(),
    )
    .unwrap();
    WorkspaceGraph::build(&catalog).unwrap()
}

fn plan_of(batches: &[&[&str]]) -> BuildPlan {
    BuildPlan {
        batches: batches
            .iter()
            .map(|batch| batch.iter().map(|s| s.to_string()).collect())
            .collect(),
        permitted_cycles: Vec::new(),
    }
}

/// Tracks peak in-flight jobs and records completions; fails the named
/// package if configured.
struct ProbeRunner {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    started: Mutex<Vec<String>>,
    fail: Option<String>,
}

impl ProbeRunner {
    fn new(fail: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            started: Mutex::new(Vec::new()),
            fail: fail.map(str::to_string),
        })
    }
}

#[async_trait]
impl JobRunner for ProbeRunner {
    async fn run_job(&self, package: &WorkspacePackage) -> Result<()> {
        self.started.lock().unwrap().push(package.name.clone());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(10)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail.as_deref() == Some(package.name.as_str()) {
            return Err(Error::Job {
                package: package.name.clone(),
                message: "bundler exited with 1".to_string(),
            });
        }
        Ok(())
    }
}

#[tokio::test]
async fn test_concurrency_limit_respected() {
    let graph = graph_of(&["pkg-a", "pkg-b", "pkg-c", "pkg-d", "pkg-e"]);
    let plan = plan_of(&[&["pkg-a", "pkg-b", "pkg-c", "pkg-d", "pkg-e"]]);
    let runner = ProbeRunner::new(None);

    let executor = BuildExecutor::new(runner.clone(), 2);
    let completed = executor.execute(&plan, &graph).await.unwrap();

    assert_eq!(completed.len(), 5);
    assert!(runner.peak.load(Ordering::SeqCst) <= 2);
}

#[tokio::test]
async fn test_failure_attributed_and_later_batches_skipped() {
    let graph = graph_of(&["pkg-a", "pkg-b", "pkg-c"]);
    let plan = plan_of(&[&["pkg-a", "pkg-b"], &["pkg-c"]]);
    let runner = ProbeRunner::new(Some("pkg-a"));

    let executor = BuildExecutor::new(runner.clone(), 2);
    let result = executor.execute(&plan, &graph).await;

    match result {
        Err(Error::Job { package, .. }) => assert_eq!(package, "pkg-a"),
        other => panic!("expected Job error, got {:?}", other),
    }
    assert!(!runner.started.lock().unwrap().contains(&"pkg-c".to_string()));
}

#[tokio::test]
async fn test_no_new_jobs_after_failure() {
    let graph = graph_of(&["pkg-a", "pkg-b", "pkg-c", "pkg-d"]);
    let plan = plan_of(&[&["pkg-a", "pkg-b", "pkg-c", "pkg-d"]]);
    let runner = ProbeRunner::new(Some("pkg-a"));

    // Serial execution: the first job fails, the rest never launch.
    let executor = BuildExecutor::new(runner.clone(), 1);
    let result = executor.execute(&plan, &graph).await;

    assert!(result.is_err());
    assert_eq!(*runner.started.lock().unwrap(), vec!["pkg-a".to_string()]);
}

#[tokio::test]
async fn test_in_flight_siblings_drain_on_failure() {
    let graph = graph_of(&["pkg-a", "pkg-b"]);
    let plan = plan_of(&[&["pkg-a", "pkg-b"]]);
    let runner = ProbeRunner::new(Some("pkg-a"));

    let executor = BuildExecutor::new(runner.clone(), 2);
    let result = executor.execute(&plan, &graph).await;

    assert!(result.is_err());
    // Both were launched together; the sibling ran to completion.
    assert_eq!(runner.started.lock().unwrap().len(), 2);
    assert_eq!(runner.in_flight.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_empty_plan_completes_immediately() {
    let graph = graph_of(&["pkg-a"]);
    let plan = BuildPlan::default();
    let runner = ProbeRunner::new(None);

    let executor = BuildExecutor::new(runner.clone(), 4);
    let completed = executor.execute(&plan, &graph).await.unwrap();

    assert!(completed.is_empty());
    assert!(runner.started.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_batches_run_strictly_in_order() {
    let graph = graph_of(&["pkg-a", "pkg-b", "pkg-c"]);
    let plan = plan_of(&[&["pkg-c"], &["pkg-b"], &["pkg-a"]]);
    let runner = ProbeRunner::new(None);

    let executor = BuildExecutor::new(runner.clone(), 4);
    executor.execute(&plan, &graph).await.unwrap();

    assert_eq!(
        *runner.started.lock().unwrap(),
        vec!["pkg-c".to_string(), "pkg-b".to_string(), "pkg-a".to_string()]
    );
}

#[tokio::test]
async fn test_zero_concurrency_clamped_to_one() {
    let graph = graph_of(&["pkg-a", "pkg-b"]);
    let plan = plan_of(&[&["pkg-a", "pkg-b"]]);
    let runner = ProbeRunner::new(None);

    let executor = BuildExecutor::new(runner.clone(), 0);
    let completed = executor.execute(&plan, &graph).await.unwrap();

    assert_eq!(completed.len(), 2);
    assert_eq!(runner.peak.load(Ordering::SeqCst), 1);
}
