mod commands;
mod formatting;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;

#[derive(Parser)]
#[command(name = "trellis")]
#[command(about = "Monorepo build orchestration for JavaScript/TypeScript workspaces")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Monorepo root directory.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[arg(short, long, action)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build workspaces in dependency order.
    Build {
        /// Workspace names to build.
        targets: Vec<String>,
        /// Include workspaces changed against the comparison branch.
        #[arg(long, action)]
        changed: bool,
        /// Also build everything that depends on the scope.
        #[arg(long, action)]
        ancestors: bool,
        /// Also build everything the scope depends on.
        #[arg(long, action)]
        descendants: bool,
        /// Git ref to diff against for --changed.
        #[arg(long)]
        compare_branch: Option<String>,
        /// Maximum concurrent build jobs.
        #[arg(short = 'j', long)]
        concurrency: Option<usize>,
        /// Permit circular dependencies among non-buildable workspaces.
        #[arg(long, action)]
        dangerously_ignore_circular_dependencies: bool,
    },
    /// Resolve a selection and print the workspace names.
    Select {
        /// Workspace names to select.
        targets: Vec<String>,
        /// Print ordered build batches restricted to buildable workspaces.
        #[arg(long, action)]
        buildable: bool,
        /// Include workspaces changed against the comparison branch.
        #[arg(long, action)]
        changed: bool,
        #[arg(long, action)]
        ancestors: bool,
        #[arg(long, action)]
        descendants: bool,
        /// Git ref to diff against for --changed.
        #[arg(long)]
        compare_branch: Option<String>,
        #[arg(long, action)]
        json: bool,
    },
    /// Validate the workspace graph without building.
    Check,
    /// Print the workspace dependency graph in topological order.
    Graph {
        #[arg(long, action)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    tracing_subscriber::fmt().with_max_level(log_level).init();

    match cli.command {
        Commands::Build {
            targets,
            changed,
            ancestors,
            descendants,
            compare_branch,
            concurrency,
            dangerously_ignore_circular_dependencies,
        } => commands::cmd_build(
            cli.root,
            targets,
            changed,
            ancestors,
            descendants,
            compare_branch,
            concurrency,
            dangerously_ignore_circular_dependencies,
        )?,
        Commands::Select {
            targets,
            buildable,
            changed,
            ancestors,
            descendants,
            compare_branch,
            json,
        } => commands::cmd_select(
            cli.root,
            targets,
            buildable,
            changed,
            ancestors,
            descendants,
            compare_branch,
            json,
        )?,
        Commands::Check => commands::cmd_check(cli.root)?,
        Commands::Graph { json } => commands::cmd_graph(cli.root, json)?,
    }

    Ok(())
}
