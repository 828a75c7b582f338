//! Layout configuration.
//!
//! Geometry constants and the lane palette live in [`LayoutConfig`]. Values
//! come from, in increasing precedence:
//!
//! 1. built-in defaults,
//! 2. the user file `<config_dir>/lanes/config.toml`,
//! 3. the project file `<root>/.lanes.toml`,
//! 4. an explicit path passed by the caller.
//!
//! The highest-precedence file that exists is used as a whole; fields it
//! omits fall back to the defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::LayoutError;
use crate::layout::color::Palette;

/// Project-level config file name, looked up in the project root.
pub const PROJECT_CONFIG_FILE: &str = ".lanes.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Radius of a commit dot.
    #[serde(default = "default_node_radius")]
    pub node_radius: f64,
    /// Vertical distance between consecutive rows.
    #[serde(default = "default_row_height")]
    pub row_height: f64,
    /// Horizontal distance between consecutive lanes.
    #[serde(default = "default_column_width")]
    pub column_width: f64,
    /// Left (and right) canvas margin.
    #[serde(default = "default_margin")]
    pub margin: f64,
    /// Extra pick radius added to `node_radius` by the hit tester.
    #[serde(default = "default_hit_slack")]
    pub hit_slack: f64,
    #[serde(default)]
    pub palette: Palette,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_radius: default_node_radius(),
            row_height: default_row_height(),
            column_width: default_column_width(),
            margin: default_margin(),
            hit_slack: default_hit_slack(),
            palette: Palette::default(),
        }
    }
}

const fn default_node_radius() -> f64 {
    4.0
}

const fn default_row_height() -> f64 {
    24.0
}

const fn default_column_width() -> f64 {
    16.0
}

const fn default_margin() -> f64 {
    12.0
}

const fn default_hit_slack() -> f64 {
    4.0
}

impl LayoutConfig {
    /// Copy of this config with every dimension clamped to a finite value
    /// `>= 0`.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        Self {
            node_radius: clamp_dimension(self.node_radius),
            row_height: clamp_dimension(self.row_height),
            column_width: clamp_dimension(self.column_width),
            margin: clamp_dimension(self.margin),
            hit_slack: clamp_dimension(self.hit_slack),
            palette: self.palette.clone(),
        }
    }

    /// Distance within which a query point hits a node.
    #[must_use]
    pub fn hit_radius(&self) -> f64 {
        self.node_radius + self.hit_slack
    }
}

fn clamp_dimension(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

/// Parse a config document.
///
/// `path` is only used to annotate errors.
///
/// # Errors
///
/// Returns [`LayoutError::ConfigParse`] on TOML syntax errors, unknown value
/// types, or an invalid palette.
pub fn parse_layout_config(content: &str, path: &Path) -> Result<LayoutConfig, LayoutError> {
    toml::from_str::<LayoutConfig>(content).map_err(|e| LayoutError::ConfigParse {
        path: path.to_path_buf(),
        reason: e.message().to_string(),
    })
}

/// Load a config file.
///
/// # Errors
///
/// Returns [`LayoutError::ConfigRead`] if the file cannot be read and
/// [`LayoutError::ConfigParse`] if it cannot be parsed.
pub fn load_layout_config(path: &Path) -> Result<LayoutConfig, LayoutError> {
    let content = std::fs::read_to_string(path).map_err(|source| LayoutError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_layout_config(&content, path)
}

/// Location of the per-user config file, if the platform has a config dir.
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("lanes/config.toml"))
}

/// Candidate config files in increasing precedence.
fn candidate_paths(project_root: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = user_config_path().into_iter().collect();
    paths.push(project_root.join(PROJECT_CONFIG_FILE));
    paths
}

/// A resolved configuration and the file it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectiveConfig {
    pub layout: LayoutConfig,
    /// `None` when built-in defaults are in effect.
    pub source: Option<PathBuf>,
    /// `true` when some dimension in the file is clamped at layout time.
    pub clamped: bool,
}

impl EffectiveConfig {
    fn defaults() -> Self {
        Self {
            layout: LayoutConfig::default(),
            source: None,
            clamped: false,
        }
    }

    fn from_file(path: &Path) -> Result<Self, LayoutError> {
        let layout = load_layout_config(path)?;
        let clamped = layout.sanitized() != layout;
        if clamped {
            warn!(path = %path.display(), "layout config has negative or non-finite dimensions, clamping");
        }
        debug!(path = %path.display(), "loaded layout config");
        Ok(Self {
            layout,
            source: Some(path.to_path_buf()),
            clamped,
        })
    }
}

/// Resolve the effective config for `project_root`.
///
/// An explicit path must exist; the user and project files are optional.
///
/// # Errors
///
/// Returns an error if the explicit path is unreadable or the selected file
/// fails to parse.
pub fn resolve_config(
    project_root: &Path,
    explicit: Option<&Path>,
) -> Result<EffectiveConfig, LayoutError> {
    if let Some(path) = explicit {
        return EffectiveConfig::from_file(path);
    }

    let selected = candidate_paths(project_root)
        .into_iter()
        .rev()
        .find(|p| p.is_file());

    selected.map_or_else(
        || {
            debug!("no layout config found, using defaults");
            Ok(EffectiveConfig::defaults())
        },
        |path| EffectiveConfig::from_file(&path),
    )
}
