//! `lanes config`: show the effective layout configuration.

use std::io::{self, Write};
use std::path::Path;

use clap::Args;
use lanes_core::config::{EffectiveConfig, resolve_config};

use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `lanes config`.
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {}

/// Execute `lanes config`.
pub fn run_config(
    _args: &ConfigArgs,
    output: OutputMode,
    project_root: &Path,
    config_path: Option<&Path>,
) -> anyhow::Result<()> {
    let effective = resolve_config(project_root, config_path)?;
    render_mode(output, &effective, write_config, write_config_pretty)
}

fn source_label(effective: &EffectiveConfig) -> String {
    effective
        .source
        .as_ref()
        .map_or_else(|| "built-in defaults".to_string(), |p| p.display().to_string())
}

fn write_config(effective: &EffectiveConfig, w: &mut dyn Write) -> io::Result<()> {
    let layout = &effective.layout;
    writeln!(w, "source\t{}", source_label(effective))?;
    writeln!(w, "node_radius\t{}", layout.node_radius)?;
    writeln!(w, "row_height\t{}", layout.row_height)?;
    writeln!(w, "column_width\t{}", layout.column_width)?;
    writeln!(w, "margin\t{}", layout.margin)?;
    writeln!(w, "hit_slack\t{}", layout.hit_slack)?;
    writeln!(w, "clamped\t{}", effective.clamped)?;
    writeln!(w, "palette\t{}", layout.palette.colors().join(","))
}

fn write_config_pretty(effective: &EffectiveConfig, w: &mut dyn Write) -> io::Result<()> {
    let layout = &effective.layout;
    pretty_section(w, "Layout config")?;
    pretty_kv(w, "Source", source_label(effective))?;
    pretty_kv(w, "Node radius", layout.node_radius.to_string())?;
    pretty_kv(w, "Row height", layout.row_height.to_string())?;
    pretty_kv(w, "Column width", layout.column_width.to_string())?;
    pretty_kv(w, "Margin", layout.margin.to_string())?;
    pretty_kv(w, "Hit slack", layout.hit_slack.to_string())?;
    if effective.clamped {
        pretty_kv(w, "Warning", "negative or non-finite dimensions are clamped to 0")?;
    }
    pretty_kv(w, "Palette", layout.palette.colors().join(" "))
}
