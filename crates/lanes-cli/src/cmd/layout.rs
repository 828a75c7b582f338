//! `lanes layout`: lay out a commit history and print the positioned rows.

use std::io::{self, Write};
use std::path::Path;

use chrono::DateTime;
use clap::Args;
use lanes_core::layout::{Edge, Layout, UnresolvedParent, build_layout};
use lanes_core::model::Commit;
use serde::Serialize;
use tracing::instrument;

use crate::cmd::{InputArgs, load_config};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `lanes layout`.
#[derive(Args, Debug, Default)]
pub struct LayoutArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

/// JSON shape of `lanes layout`.
#[derive(Debug, Serialize)]
pub struct LayoutReport<'a> {
    #[serde(flatten)]
    pub layout: &'a Layout,
    pub edges: Vec<Edge<'a>>,
    pub unresolved: Vec<UnresolvedParent<'a>>,
}

impl<'a> LayoutReport<'a> {
    pub fn new(layout: &'a Layout) -> Self {
        Self {
            layout,
            edges: layout.edges().collect(),
            unresolved: layout.unresolved_parents().collect(),
        }
    }
}

/// Execute `lanes layout`.
#[instrument(skip_all)]
pub fn run_layout(
    args: &LayoutArgs,
    output: OutputMode,
    project_root: &Path,
    config_path: Option<&Path>,
) -> anyhow::Result<()> {
    let config = load_config(project_root, config_path)?;
    let commits = args.input.load()?;
    let layout = build_layout(&commits, &config);
    let report = LayoutReport::new(&layout);
    render_mode(
        output,
        &report,
        |r, w| write_rows(r.layout, w),
        |r, w| write_preview(r.layout, w),
    )
}

/// One tab-separated line per row: row, lane, x, y, color, id, parents.
pub fn write_rows(layout: &Layout, w: &mut dyn Write) -> io::Result<()> {
    for node in layout.nodes() {
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            node.row,
            node.lane,
            node.x,
            node.y,
            node.color,
            node.id(),
            node.commit.parent_ids.join(",")
        )?;
    }
    Ok(())
}

/// Human lane preview: one glyph column per lane, then commit details.
pub fn write_preview(layout: &Layout, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Commit graph")?;
    pretty_kv(w, "Commits", layout.len().to_string())?;
    pretty_kv(w, "Lanes", layout.lane_count().to_string())?;
    let size = layout.size();
    pretty_kv(w, "Canvas", format!("{} x {}", size.width, size.height))?;
    if layout.is_empty() {
        return Ok(());
    }
    writeln!(w)?;

    let width = preview_width(layout);
    for node in layout.nodes() {
        let through = layout.through_lanes(node.row);
        let graph: String = (0..width)
            .map(|lane| {
                if lane == node.lane {
                    if node.commit.is_merge() { 'M' } else { '*' }
                } else if through.contains(&lane) {
                    '|'
                } else {
                    ' '
                }
            })
            .flat_map(|glyph| [' ', glyph])
            .skip(1)
            .collect();
        writeln!(
            w,
            "{graph} {:<7}  {}  {:<16}  {}",
            node.commit.short_id(),
            display_date(&node.commit),
            node.commit.author,
            node.commit.subject()
        )?;
    }
    Ok(())
}

/// Columns needed so dangling pass-through lanes stay visible.
fn preview_width(layout: &Layout) -> usize {
    (0..layout.len())
        .flat_map(|row| layout.through_lanes(row).iter().map(|lane| lane + 1))
        .fold(layout.lane_count(), usize::max)
}

/// The producer's date string when present, else the UTC timestamp.
fn display_date(commit: &Commit) -> String {
    if let Some(date) = commit.date.as_deref() {
        return date.to_string();
    }
    DateTime::from_timestamp(commit.timestamp, 0).map_or_else(
        || commit.timestamp.to_string(),
        |dt| dt.format("%Y-%m-%d %H:%M:%S").to_string(),
    )
}
