//! Build execution command.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use async_trait::async_trait;
use indicatif::ProgressBar;

use trellis_core::{
    change, plan, select, BuildExecutor, BuildPlan, JobRunner, PlanOptions, ScriptJobRunner,
    SelectOptions, WorkspacePackage,
};

use crate::formatting::{
    create_progress_bar, format_duration, print_batch_table, print_error, print_section_header,
    print_separator_with_spacing, print_success, print_summary_box, print_warning, SectionStyle,
};

use super::load_workspace;

/// Forwards jobs to the real runner while keeping the progress bar moving.
struct ProgressRunner {
    inner: ScriptJobRunner,
    progress: ProgressBar,
}

#[async_trait]
impl JobRunner for ProgressRunner {
    async fn run_job(&self, package: &WorkspacePackage) -> trellis_core::Result<()> {
        let outcome = self.inner.run_job(package).await;
        self.progress.inc(1);
        outcome
    }
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_build(
    root: PathBuf,
    targets: Vec<String>,
    changed: bool,
    ancestors: bool,
    descendants: bool,
    compare_branch: Option<String>,
    concurrency: Option<usize>,
    dangerously_ignore_circular_dependencies: bool,
) -> Result<()> {
    let start = Instant::now();
    let (config, graph) = load_workspace(&root)?;

    let mismatched = graph.mismatched_edges();
    if !mismatched.is_empty() {
        print_section_header("Build", SectionStyle::Error);
        for (from, edge) in &mismatched {
            print_error(&format!(
                "mismatched workspace dependency: {} requires {}@{}",
                from, edge.to, edge.declared_range
            ));
        }
        print_error("refusing to build against a version-inconsistent graph");
        std::process::exit(1);
    }

    let changed_files = if changed {
        let base = compare_branch.unwrap_or_else(|| config.compare_branch.clone());
        Some(change::changed_files_from_git(&root, &base)?)
    } else {
        None
    };

    let selection = select(
        &graph,
        &SelectOptions {
            targets,
            changed_files,
            ancestors,
            descendants,
        },
    )?;

    let build_plan = plan(
        &graph,
        &selection,
        PlanOptions {
            ignore_unbuildable_cycles: dangerously_ignore_circular_dependencies,
        },
    )?;

    for cycle in &build_plan.permitted_cycles {
        print_warning(&format!(
            "permitted circular dependency involving: {}",
            cycle.join(", ")
        ));
    }

    print_section_header("Building workspaces", SectionStyle::Primary);

    if build_plan.is_empty() {
        print_success("Nothing to build");
        println!();
        return Ok(());
    }

    print_batch_table(&build_plan.batches);
    println!();

    let limit = config.effective_concurrency(concurrency);
    tracing::debug!(
        batches = build_plan.batches.len(),
        packages = build_plan.package_count(),
        concurrency = limit,
        "executing build plan"
    );

    ctrlc::set_handler(move || {
        eprintln!("interrupted, aborting build");
        std::process::exit(130);
    })?;

    let progress = create_progress_bar(build_plan.package_count() as u64);
    progress.set_message("Building...");

    let runner = Arc::new(ProgressRunner {
        inner: ScriptJobRunner::new(&root, "build"),
        progress: progress.clone(),
    });
    let executor = BuildExecutor::new(runner, limit);

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| anyhow::anyhow!("Failed to create tokio runtime: {}", e))?;
    let outcome = runtime.block_on(executor.execute(&build_plan, &graph));
    progress.finish_and_clear();

    match outcome {
        Ok(completed) => {
            print_build_summary(&build_plan, completed.len(), start.elapsed().as_secs_f64());
            Ok(())
        }
        Err(error) => {
            print_error(&error.to_string());
            print_separator_with_spacing();
            std::process::exit(1);
        }
    }
}

fn print_build_summary(build_plan: &BuildPlan, built: usize, elapsed: f64) {
    print_success(&format!("All {} workspaces built successfully", built));
    print_separator_with_spacing();
    print_summary_box(
        "Summary",
        &[
            ("Duration", &format_duration(elapsed)),
            ("Batches", &build_plan.batches.len().to_string()),
            ("Workspaces", &built.to_string()),
        ],
    );
    println!();
}
