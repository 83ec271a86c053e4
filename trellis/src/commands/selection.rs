//! Selection command.

use std::path::PathBuf;

use anyhow::Result;

use trellis_core::{change, plan, select, PlanOptions, SelectOptions};

use super::load_workspace;

#[allow(clippy::too_many_arguments)]
pub fn cmd_select(
    root: PathBuf,
    targets: Vec<String>,
    buildable: bool,
    changed: bool,
    ancestors: bool,
    descendants: bool,
    compare_branch: Option<String>,
    json: bool,
) -> Result<()> {
    let (config, graph) = load_workspace(&root)?;

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

    if buildable {
        let build_plan = plan(&graph, &selection, PlanOptions::default())?;
        if json {
            println!("{}", serde_json::to_string_pretty(&build_plan.batches)?);
        } else {
            for batch in &build_plan.batches {
                println!("{}", batch.join(" "));
            }
        }
        return Ok(());
    }

    let scope = selection.scope();
    if json {
        let names: Vec<&String> = scope.iter().collect();
        println!("{}", serde_json::to_string_pretty(&names)?);
    } else {
        for name in &scope {
            println!("{}", name);
        }
    }

    Ok(())
}
