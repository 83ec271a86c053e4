//! Command implementations for the CLI.

mod execution;
mod inspection;
mod selection;

use std::path::Path;

use anyhow::Result;

use trellis_core::{TrellisConfig, WorkspaceCatalog, WorkspaceGraph};

pub use execution::cmd_build;
pub use inspection::{cmd_check, cmd_graph};
pub use selection::cmd_select;

fn load_workspace(root: &Path) -> Result<(TrellisConfig, WorkspaceGraph)> {
    let config = TrellisConfig::load(root)?;
    let catalog = WorkspaceCatalog::load(root, &config)?;
    let graph = WorkspaceGraph::build(&catalog)?;
    Ok((config, graph))
}
