pub mod completions;
pub mod config;
pub mod edges;
pub mod hit;
pub mod layout;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use lanes_core::config::resolve_config;
use lanes_core::model::read_commits;
use lanes_core::{Commit, LayoutConfig};
use tracing::debug;

/// Commit history source shared by every layout command.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// JSON array of commits, newest first. Reads stdin when omitted or `-`.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,
}

impl InputArgs {
    /// Read and validate the commit sequence.
    pub fn load(&self) -> anyhow::Result<Vec<Commit>> {
        let commits = match self.file.as_deref() {
            Some(path) if path != Path::new("-") => {
                let file = File::open(path)
                    .with_context(|| format!("failed to open {}", path.display()))?;
                read_commits(BufReader::new(file))
                    .with_context(|| format!("failed to read commits from {}", path.display()))?
            }
            _ => read_commits(io::stdin().lock()).context("failed to read commits from stdin")?,
        };
        debug!(count = commits.len(), "loaded commit history");
        Ok(commits)
    }
}

/// Effective layout config for a command run from `project_root`.
pub fn load_config(project_root: &Path, explicit: Option<&Path>) -> anyhow::Result<LayoutConfig> {
    let effective = resolve_config(project_root, explicit)?;
    Ok(effective.layout)
}
