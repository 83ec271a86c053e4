//! Bounded-concurrency execution of build plans.

use std::sync::Arc;

use tokio::task::JoinSet;

use crate::error::{Error, Result};
use crate::graph::WorkspaceGraph;
use crate::job::JobRunner;
use crate::package::WorkspacePackage;
use crate::plan::BuildPlan;

/// Runs a build plan: batches strictly in order, jobs within a batch under
/// a shared concurrency limit.
///
/// On the first failure no further jobs are launched; in-flight siblings
/// are allowed to finish so they don't leave half-written outputs, and the
/// failure surfaces attributed to its package. Completed batches' artifacts
/// stay on disk.
pub struct BuildExecutor {
    runner: Arc<dyn JobRunner>,
    concurrency: usize,
}

impl BuildExecutor {
    pub fn new(runner: Arc<dyn JobRunner>, concurrency: usize) -> Self {
        Self {
            runner,
            concurrency: concurrency.max(1),
        }
    }

    /// Executes every batch, returning the names of all completed packages
    /// in completion order.
    ///
    /// An empty plan completes immediately.
    pub async fn execute(&self, plan: &BuildPlan, graph: &WorkspaceGraph) -> Result<Vec<String>> {
        let mut completed = Vec::with_capacity(plan.package_count());
        for batch in &plan.batches {
            self.run_batch(batch, graph, &mut completed).await?;
        }
        Ok(completed)
    }

    async fn run_batch(
        &self,
        batch: &[String],
        graph: &WorkspaceGraph,
        completed: &mut Vec<String>,
    ) -> Result<()> {
        let packages: Vec<Arc<WorkspacePackage>> = batch
            .iter()
            .filter_map(|name| graph.get(name))
            .cloned()
            .map(Arc::new)
            .collect();

        let mut pending = packages.into_iter();
        let mut join_set: JoinSet<(String, Result<()>)> = JoinSet::new();
        let mut first_failure: Option<Error> = None;

        loop {
            while first_failure.is_none() && join_set.len() < self.concurrency {
                let Some(package) = pending.next() else {
                    break;
                };
                let runner = Arc::clone(&self.runner);
                join_set.spawn(async move {
                    let name = package.name.clone();
                    let outcome = runner.run_job(&package).await;
                    (name, outcome)
                });
            }

            match join_set.join_next().await {
                Some(Ok((name, Ok(())))) => completed.push(name),
                Some(Ok((name, Err(error)))) => {
                    if first_failure.is_none() {
                        first_failure = Some(attribute(name, error));
                    }
                }
                Some(Err(join_error)) => {
                    if first_failure.is_none() {
                        first_failure = Some(Error::Job {
                            package: "unknown".to_string(),
                            message: format!("job task failed: {}", join_error),
                        });
                    }
                }
                None => break,
            }
        }

        match first_failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn attribute(package: String, error: Error) -> Error {
    match error {
        already @ Error::Job { .. } => already,
        other => Error::Job {
            package,
            message: other.to_string(),
        },
    }
}
