//! `lanes hit`: find the commit under a canvas point.

use std::io::{self, Write};
use std::path::Path;

use clap::Args;
use lanes_core::layout::{GraphNode, build_layout, hit_test};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::cmd::{InputArgs, load_config};
use crate::output::{OutputMode, pretty_kv, render_mode};

/// Arguments for `lanes hit`.
#[derive(Args, Debug)]
pub struct HitArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Horizontal canvas coordinate.
    #[arg(long, allow_negative_numbers = true)]
    pub x: f64,

    /// Vertical canvas coordinate.
    #[arg(long, allow_negative_numbers = true)]
    pub y: f64,
}

#[derive(Debug, Serialize)]
struct HitReport<'a> {
    x: f64,
    y: f64,
    hit: Option<&'a GraphNode>,
}

/// Execute `lanes hit`. A miss is not an error.
#[instrument(skip_all, fields(x = args.x, y = args.y))]
pub fn run_hit(
    args: &HitArgs,
    output: OutputMode,
    project_root: &Path,
    config_path: Option<&Path>,
) -> anyhow::Result<()> {
    let config = load_config(project_root, config_path)?;
    let commits = args.input.load()?;
    let layout = build_layout(&commits, &config);
    let hit = hit_test(&layout, args.x, args.y);
    debug!(hit = hit.map(GraphNode::id), "hit test done");

    let report = HitReport {
        x: args.x,
        y: args.y,
        hit,
    };
    render_mode(output, &report, write_hit, write_hit_pretty)
}

fn write_hit(report: &HitReport<'_>, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{}", report.hit.map_or("none", GraphNode::id))
}

fn write_hit_pretty(report: &HitReport<'_>, w: &mut dyn Write) -> io::Result<()> {
    let Some(node) = report.hit else {
        return writeln!(w, "No commit at ({}, {})", report.x, report.y);
    };
    pretty_kv(w, "Commit", node.id())?;
    pretty_kv(w, "Row", node.row.to_string())?;
    pretty_kv(w, "Lane", node.lane.to_string())?;
    pretty_kv(w, "Position", format!("({}, {})", node.x, node.y))?;
    if !node.commit.author.is_empty() {
        pretty_kv(w, "Author", &node.commit.author)?;
    }
    if !node.commit.message.is_empty() {
        pretty_kv(w, "Subject", node.commit.subject())?;
    }
    Ok(())
}
