//! Validation and graph inspection commands.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::Result;
use owo_colors::OwoColorize;

use trellis_core::{has_errors, run_checks, traverse, Severity};

use crate::formatting::{
    print_error, print_section_header, print_success, print_warning, SectionStyle,
};

use super::load_workspace;

pub fn cmd_check(root: PathBuf) -> Result<()> {
    let (_config, graph) = load_workspace(&root)?;

    let findings = run_checks(&graph);

    print_section_header("Workspace Check", SectionStyle::Primary);

    if findings.is_empty() {
        print_success("No mismatched dependencies");
        print_success("No circular dependencies");
        println!();
        return Ok(());
    }

    for finding in &findings {
        match finding.severity {
            Severity::Error => print_error(&finding.message),
            Severity::Warning => print_warning(&finding.message),
        }
    }
    println!();

    if has_errors(&findings) {
        std::process::exit(1);
    }
    Ok(())
}

pub fn cmd_graph(root: PathBuf, json: bool) -> Result<()> {
    let (_config, graph) = load_workspace(&root)?;

    let scope: BTreeSet<String> = graph
        .packages()
        .filter(|p| !p.is_workspace_root)
        .map(|p| p.name.clone())
        .collect();
    let levels = traverse::level_order(&graph, &scope)?;
    let batches = traverse::batches(&levels);

    if json {
        let payload = serde_json::json!({
            "levels": batches,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    print_section_header("Dependency Graph", SectionStyle::Primary);

    if batches.is_empty() {
        print_warning("No workspaces found");
        println!();
        return Ok(());
    }

    for (level, batch) in batches.iter().enumerate() {
        println!(
            "  {} {}",
            format!("{:2}", level).bright_black(),
            batch.join(", ").bold().white()
        );
    }
    println!();

    Ok(())
}
