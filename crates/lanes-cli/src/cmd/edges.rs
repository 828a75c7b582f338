//! `lanes edges`: list child-to-parent connectors with their geometry.

use std::io::{self, Write};
use std::path::Path;

use clap::Args;
use lanes_core::layout::{Edge, EdgeKind, build_layout};
use serde::Serialize;
use tracing::instrument;

use crate::cmd::{InputArgs, load_config};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `lanes edges`.
#[derive(Args, Debug, Default)]
pub struct EdgesArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Debug, Serialize)]
struct EdgesReport<'a> {
    edges: Vec<Edge<'a>>,
    straight: usize,
    curved: usize,
}

impl<'a> EdgesReport<'a> {
    fn new(edges: Vec<Edge<'a>>) -> Self {
        let straight = edges
            .iter()
            .filter(|e| e.kind == EdgeKind::Straight)
            .count();
        let curved = edges.len() - straight;
        Self {
            edges,
            straight,
            curved,
        }
    }
}

/// Execute `lanes edges`.
#[instrument(skip_all)]
pub fn run_edges(
    args: &EdgesArgs,
    output: OutputMode,
    project_root: &Path,
    config_path: Option<&Path>,
) -> anyhow::Result<()> {
    let config = load_config(project_root, config_path)?;
    let commits = args.input.load()?;
    let layout = build_layout(&commits, &config);
    let report = EdgesReport::new(layout.edges().collect());
    render_mode(
        output,
        &report,
        |r, w| write_edges(&r.edges, w),
        write_edges_pretty,
    )
}

/// `child parent kind color x1 y1 x2 y2`, tab-separated.
fn write_edges(edges: &[Edge<'_>], w: &mut dyn Write) -> io::Result<()> {
    for edge in edges {
        let (from, to) = (edge.path.start(), edge.path.end());
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            edge.child,
            edge.parent,
            edge.kind.as_str(),
            edge.color,
            from.x,
            from.y,
            to.x,
            to.y
        )?;
    }
    Ok(())
}

fn write_edges_pretty(report: &EdgesReport<'_>, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Edges")?;
    pretty_kv(w, "Straight", report.straight.to_string())?;
    pretty_kv(w, "Curved", report.curved.to_string())?;
    if report.edges.is_empty() {
        return Ok(());
    }
    writeln!(w)?;
    for edge in &report.edges {
        let (from, to) = (edge.path.start(), edge.path.end());
        writeln!(
            w,
            "{:<12} -> {:<12} {:<8} ({}, {}) -> ({}, {})",
            edge.child,
            edge.parent,
            edge.kind.as_str(),
            from.x,
            from.y,
            to.x,
            to.y
        )?;
    }
    Ok(())
}
